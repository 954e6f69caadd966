use clap::{Parser, ValueEnum};
use log::{error, info};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use uttt::{Difficulty, GameMode, Move, Player, Session, SessionError, Update};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Protocol {
    /// One JSON request per line in, one JSON update per line out.
    Json,
    /// Human-readable board and prompts.
    Text,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play ultimate tic-tac-toe against the computer", long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value_t = Difficulty::Deep)]
    difficulty: Difficulty,
    #[arg(long, value_enum, default_value_t = GameMode::OnePlayer)]
    mode: GameMode,
    /// Symbol played by the human in one-player mode.
    #[arg(long, value_enum, default_value_t = Player::X)]
    human: Player,
    #[arg(long, value_enum, default_value_t = Protocol::Text)]
    protocol: Protocol,
    /// Seed for the computer's random choices.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = log::Level::Warn)]
    log_level: log::Level,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level)?;
    info!("{:?}", args);

    let mut session = Session::new(args.mode, args.difficulty, args.seed);
    let input = BufReader::new(tokio::io::stdin()).lines();
    let mut output = tokio::io::stdout();

    match args.protocol {
        Protocol::Json => run_json(&mut session, input, &mut output).await,
        Protocol::Text => run_text(&mut session, args.human, input, &mut output).await,
    }
}

async fn emit(output: &mut Stdout, text: &str) -> Result<(), SessionError> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn run_json(session: &mut Session, mut input: Input, output: &mut Stdout) -> Result<(), SessionError> {
    while let Some(line) = input.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Value>(&line) {
            Ok(data) => {
                info!("Received: {}", data);
                match session.handle_message(data).await {
                    Ok(update) => serde_json::to_value(&update)?,
                    Err(e) => {
                        error!("Error handling message: {}", e);
                        json!({ "status": "error", "error": e.to_string() })
                    }
                }
            }
            Err(e) => {
                error!("Error parsing JSON: {}", e);
                json!({ "status": "error", "error": format!("malformed JSON: {}", e) })
            }
        };
        let response_str = response.to_string();
        emit(output, &response_str).await?;
        info!("Sent: {}", response_str);
    }
    Ok(())
}

const HELP: &str = "enter a move as 'board_row board_col cell_row cell_col' (each 0-2), 'new' to restart, 'quit' to leave";

async fn run_text(session: &mut Session, human: Player, mut input: Input, output: &mut Stdout) -> Result<(), SessionError> {
    emit(output, HELP).await?;
    let update = session.handle_start(human).await?;
    emit(output, &render(session, &update, None)).await?;

    while let Some(line) = input.next_line().await? {
        let command = line.trim();
        let (typed, result) = match command {
            "" => continue,
            "quit" | "q" | "exit" => break,
            "help" | "?" => {
                emit(output, HELP).await?;
                continue;
            }
            "new" | "r" => (None, session.handle_start(human).await),
            _ => match command.parse::<Move>() {
                Ok(mv) => (Some(mv), session.handle_move(mv).await),
                Err(e) => (None, Err(e.into())),
            },
        };
        match result {
            Ok(update) => emit(output, &render(session, &update, typed)).await?,
            Err(e) => emit(output, &format!("error: {}", e)).await?,
        }
    }
    Ok(())
}

/// Board, the computer's reply if any, then whose turn it is.
fn render(session: &Session, update: &Update, typed: Option<Move>) -> String {
    let mut text = session.board().to_string();
    let (moves, status) = match update {
        Update::Turn { moves, active, current, .. } => {
            let target = match active {
                Some((row, col)) => format!("sub-board {} {}", row, col),
                None => "any open sub-board".to_string(),
            };
            (moves, format!("{} to move in {}", current, target))
        }
        Update::End { moves, winner: Some(winner) } => (moves, format!("{} wins!", winner)),
        Update::End { moves, winner: None } => (moves, "Broke even!".to_string()),
    };
    for mv in moves.iter().filter(|&&mv| Some(mv) != typed) {
        text.push_str(&format!("computer played {}\n", mv));
    }
    text.push_str(&status);
    text
}
