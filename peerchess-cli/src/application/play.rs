use crate::infrastructure::{CliError, Result};
use crate::presentation::ConsolePresenter;
use peerchess_core::{ChessMove, OccupancyRules};
use peerchess_p2p::{Game, SessionError, Transport};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

/// One line of player input
#[derive(Debug, Clone, PartialEq)]
pub enum PlayCommand {
    Move(ChessMove),
    Board,
    Help,
    Quit,
}

impl PlayCommand {
    /// Blank lines parse to `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let command = match line.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "board" | "b" => PlayCommand::Board,
            "help" | "?" => PlayCommand::Help,
            "quit" | "exit" | "q" => PlayCommand::Quit,
            notation if (4..=6).contains(&notation.len()) => {
                PlayCommand::Move(ChessMove::parse_coordinate(notation)?)
            }
            _ => return Err(CliError::UnknownCommand(line.to_string())),
        };
        Ok(Some(command))
    }
}

/// Forward stdin lines into a channel; the channel closes on EOF
pub fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        debug!("stdin closed");
    });
    rx
}

/// Drive the turn loop until the opponent leaves, the player quits or
/// Ctrl+C is pressed
pub async fn run_game<T: Transport>(
    mut game: Game<T, OccupancyRules>,
    presenter: ConsolePresenter,
    mut input: UnboundedReceiver<String>,
) -> Result<()> {
    let interval = game.session().config().poll_interval_ms.max(1);
    let mut ticker = tokio::time::interval(Duration::from_millis(interval));
    let mut input_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    presenter.print(&presenter.board(game.rules()));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if game.poll() > 0 {
                    presenter.print(&presenter.board(game.rules()));
                }
                if game.is_disconnected() {
                    return Ok(());
                }
            }
            line = input.recv(), if input_open => match line {
                Some(line) => {
                    if !handle_line(&mut game, &presenter, &line)? {
                        info!("👋 Leaving the game");
                        return Ok(());
                    }
                }
                None => input_open = false,
            },
            _ = &mut ctrl_c => {
                info!("👋 Interrupted");
                return Ok(());
            }
        }
    }
}

/// Returns `false` when the player quits
fn handle_line<T: Transport>(
    game: &mut Game<T, OccupancyRules>,
    presenter: &ConsolePresenter,
    line: &str,
) -> Result<bool> {
    let command = match PlayCommand::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(true),
        Err(e) => {
            println!("❌ {}", e);
            return Ok(true);
        }
    };

    match command {
        PlayCommand::Move(mv) => match game.play_local(mv) {
            Ok(_) => presenter.print(&presenter.board(game.rules())),
            // Already reported through the event sink
            Err(SessionError::Turn(_)) => {}
            Err(SessionError::Disconnected) => return Ok(false),
            Err(e @ SessionError::SendFailed(_)) => println!("❌ {}", e),
            Err(e) => return Err(e.into()),
        },
        PlayCommand::Board => presenter.print(&presenter.board(game.rules())),
        PlayCommand::Help => presenter.print(&presenter.help()),
        PlayCommand::Quit => return Ok(false),
    }
    Ok(true)
}
