//! Error types for move parsing and the session host.
//!
//! Rule violations on the board itself are reported as
//! [`InvalidMove`](crate::board::InvalidMove) or a plain `false`; the types here
//! cover what happens around the board.

use derive_more::{Display, Error, From};

use crate::board::{InvalidMove, Move};

/// Text move could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseMoveError {
    #[display("expected 4 coordinates, got {_0}")]
    WrongArity(#[error(not(source))] usize),
    #[display("bad coordinate {_0:?}, expected 0, 1 or 2")]
    BadCoordinate(#[error(not(source))] String),
}

#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    #[display("game has not started yet")]
    NotStarted,
    #[display("it is not your turn")]
    NotYourTurn,
    #[display("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: InvalidMove },
    #[display("invalid message: {_0}")]
    InvalidMessage(#[error(not(source))] String),
    #[display("{_0}")]
    #[from]
    ParseMove(ParseMoveError),
    #[display("malformed JSON: {_0}")]
    #[from]
    Json(serde_json::Error),
    #[display("search worker failed: {_0}")]
    #[from]
    Worker(tokio::task::JoinError),
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("logger: {_0}")]
    #[from]
    Logger(log::SetLoggerError),
}
