//! Computer opponent.
//!
//! Strength is fixed when the player is built; the search itself is
//! deterministic and all randomness lives here.

use clap::ValueEnum;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::board::{GlobalBoard, Move, Player};
use crate::engine::{Engine, SHALLOW_DEPTH};
use crate::movegen::get_valid_moves;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    /// Uniformly random legal move.
    #[value(alias = "easy")]
    Random,
    /// Fixed two-ply search.
    #[value(alias = "medium")]
    Shallow,
    /// Depth chosen from the branching factor, center-first move ordering.
    #[value(alias = "big-brain")]
    Deep,
}

pub struct AiPlayer {
    difficulty: Difficulty,
    symbol: Player,
    engine: Engine,
    rng: StdRng,
}

impl AiPlayer {
    pub fn new(difficulty: Difficulty, symbol: Player) -> Self {
        Self::with_rng(difficulty, symbol, StdRng::from_os_rng())
    }

    /// Reproducible random choices, for tests and `--seed`.
    pub fn with_seed(difficulty: Difficulty, symbol: Player, seed: u64) -> Self {
        Self::with_rng(difficulty, symbol, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, symbol: Player, rng: StdRng) -> Self {
        let engine = Engine::new().with_move_ordering(difficulty == Difficulty::Deep);
        Self { difficulty, symbol, engine, rng }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn symbol(&self) -> Player {
        self.symbol
    }

    /// The move to play, or `None` when the game is over or it is not this
    /// player's turn.
    pub fn get_move(&mut self, board: &GlobalBoard) -> Option<Move> {
        if board.is_game_over() || board.current_player() != self.symbol {
            return None;
        }
        let moves = get_valid_moves(board);
        if moves.is_empty() {
            return None;
        }

        let searched = match self.difficulty {
            Difficulty::Random => return Some(self.random_move(&moves)),
            Difficulty::Shallow => self.engine.best_move(board, SHALLOW_DEPTH),
            Difficulty::Deep => {
                let depth = Engine::adaptive_depth(moves.len());
                debug!("{} legal moves, searching depth {}", moves.len(), depth);
                self.engine.best_move(board, depth)
            }
        };
        match searched {
            Some(mv) => Some(mv),
            None => {
                warn!("search returned no move with {} legal, playing at random", moves.len());
                Some(self.random_move(&moves))
            }
        }
    }

    fn random_move(&mut self, moves: &[Move]) -> Move {
        moves[self.rng.random_range(0..moves.len())]
    }

    /// Runs [`get_move`](Self::get_move) on the blocking pool over a private
    /// copy of `board`; the player comes back with the result.
    pub fn spawn_move(mut self, board: GlobalBoard) -> JoinHandle<(Self, Option<Move>)> {
        tokio::task::spawn_blocking(move || {
            let mv = self.get_move(&board);
            (self, mv)
        })
    }
}
