//! Ultimate tic-tac-toe rules and computer opponent.
//!
//! Nine 3x3 sub-boards form a 3x3 meta-board. The cell you play inside a
//! sub-board names the sub-board your opponent must play in next; if that one
//! is already decided the opponent may play in any open sub-board. Winning
//! three sub-boards in a row wins the game.
//!
//! - [`board`]: sub-boards, the global board and move legality
//! - [`movegen`]: legal move enumeration
//! - [`eval`]: static position evaluation
//! - [`engine`]: minimax search with alpha-beta pruning
//! - [`ai`]: difficulty levels on top of the engine
//! - [`session`]: message-driven game host used by the `uttt` binary
//!
//! ```
//! use uttt::{AiPlayer, Difficulty, GlobalBoard, Player};
//!
//! let mut board = GlobalBoard::new();
//! assert!(board.make_move(1, 1, 0, 2));
//! assert_eq!(board.active_sub_board(), Some((0, 2)));
//!
//! let mut ai = AiPlayer::with_seed(Difficulty::Shallow, Player::O, 0);
//! let reply = ai.get_move(&board).unwrap();
//! assert_eq!(reply.board(), (0, 2));
//! assert!(board.play(reply).is_ok());
//! ```

pub mod ai;
pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod session;

#[cfg(test)]
mod fixtures;

pub use ai::{AiPlayer, Difficulty};
pub use board::{GlobalBoard, InvalidMove, Move, Player, SubBoard};
pub use engine::{Engine, SearchResult};
pub use error::SessionError;
pub use eval::{Evaluator, Weights};
pub use movegen::get_valid_moves;
pub use session::{GameMode, Session, Update};
