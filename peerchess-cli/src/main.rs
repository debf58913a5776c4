use clap::{Parser, Subcommand};
use peerchess_cli::application::play::spawn_stdin_reader;
use peerchess_cli::application::{run_game, schema, ConnectArgs};
use peerchess_cli::{ConsolePresenter, LogConfig, Result};
use peerchess_core::{OccupancyRules, RoomId};
use peerchess_p2p::{GameOrchestrator, MatchboxConnection, SessionConfig, WsRoomStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "peerchess")]
#[command(version, about = "peerchess - play chess peer-to-peer over WebRTC")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a room and wait for an opponent (you play white)
    Host {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Join an existing room (you play black)
    Join {
        /// Room id shared by the host
        room: String,

        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Host or join based on a page URL (`https://…/#room` joins)
    Open {
        url: String,

        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Print the JSON schemas of the wire messages
    Schema {
        /// Write one file per schema into this directory instead
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::dev()
    } else {
        LogConfig::default()
    };
    let log_config = if cli.json_logs {
        log_config.with_json()
    } else {
        log_config
    };
    log_config.init()?;

    match cli.command {
        Commands::Host { connect } => {
            let config = connect.config()?;
            play(config, &connect, None).await
        }
        Commands::Join { room, connect } => {
            let room = RoomId::parse(&room)?;
            let config = connect.config()?;
            play(config, &connect, Some(room)).await
        }
        Commands::Open { url, connect } => {
            let (launch, room) = SessionConfig::from_launch_url(&url)?;
            let config = connect.apply(launch)?;
            play(config, &connect, room).await
        }
        Commands::Schema { out_dir } => match out_dir {
            Some(dir) => {
                for path in schema::write_schemas(&dir)? {
                    println!("{}", path.display());
                }
                Ok(())
            }
            None => {
                println!("{}", schema::schemas_json()?);
                Ok(())
            }
        },
    }
}

async fn play(config: SessionConfig, connect: &ConnectArgs, room: Option<RoomId>) -> Result<()> {
    info!("Connecting to room server: {}", config.room_server_url());
    let store = WsRoomStore::connect(&config.room_server_url()).await?;
    let transport = MatchboxConnection::open(&config);

    let presenter = ConsolePresenter::new();
    let orchestrator = GameOrchestrator::new(config, store, connect.devices())
        .on_event(move |event| presenter.print_event(event));

    let game = match room {
        Some(room) => {
            orchestrator
                .join(transport, &room, OccupancyRules::new())
                .await?
        }
        None => orchestrator.host(transport, OccupancyRules::new()).await?,
    };

    run_game(game, presenter, spawn_stdin_reader()).await
}
