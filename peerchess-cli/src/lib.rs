pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use application::{ConnectArgs, PlayCommand};
pub use infrastructure::{CliError, LogConfig, Result};
pub use presentation::ConsolePresenter;
