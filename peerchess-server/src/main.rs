use clap::Parser;
use peerchess_server::telemetry::init_tracing;
use peerchess_server::{run, ServerArgs, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args = ServerArgs::parse();
    init_tracing(args.json_logs)?;

    run(args).await
}
