pub mod launch;
pub mod play;
pub mod schema;

pub use launch::ConnectArgs;
pub use play::{run_game, PlayCommand};
pub use schema::{wire_schemas, write_schemas};
