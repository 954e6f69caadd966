//! Minimax search with alpha-beta pruning.
//!
//! The searching player is whoever is to move at the root. Terminal positions
//! score `WIN_SCORE` plus the remaining depth, so of two forced wins the
//! shorter one scores higher and of two forced losses the longer one does.

use std::time::Instant;

use log::debug;

use crate::board::{GlobalBoard, Move, Player};
use crate::eval::Evaluator;
use crate::movegen::get_valid_moves;

/// Base magnitude of a decided game.
pub const WIN_SCORE: i32 = 1000;
/// Depth used by the weaker difficulty regardless of branching factor.
pub const SHALLOW_DEPTH: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Minimax value of the root for the player to move.
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    evaluator: Evaluator,
    order_moves: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self { evaluator, order_moves: false }
    }

    /// Try center cells, then corners, then edges at the root.
    pub fn with_move_ordering(mut self, enabled: bool) -> Self {
        self.order_moves = enabled;
        self
    }

    /// Fewer legal moves at the root buy a deeper search.
    pub fn adaptive_depth(num_moves: usize) -> u32 {
        if num_moves > 30 {
            4
        } else if num_moves > 10 {
            5
        } else {
            6
        }
    }

    fn cell_rank(mv: &Move) -> u8 {
        match mv.cell() {
            (1, 1) => 0,
            (0, 0) | (0, 2) | (2, 0) | (2, 2) => 1,
            _ => 2,
        }
    }

    /// Stable, so moves of equal rank keep their generation order.
    pub fn order_moves(moves: &mut [Move]) {
        moves.sort_by_key(Self::cell_rank);
    }

    pub fn eval(&self, board: &GlobalBoard, player: Player) -> i32 {
        self.evaluator.score(board, player)
    }

    pub fn best_move(&self, board: &GlobalBoard, depth: u32) -> Option<Move> {
        self.search(board, depth).best_move
    }

    pub fn search(&self, board: &GlobalBoard, depth: u32) -> SearchResult {
        let started = Instant::now();
        let me = board.current_player();
        let depth = depth.max(1);
        let mut nodes = 0u64;

        let mut moves = get_valid_moves(board);
        if board.is_game_over() || moves.is_empty() {
            let score = self.minimax(board, depth, i32::MIN, i32::MAX, true, me, &mut nodes);
            return SearchResult { best_move: None, score, depth, nodes };
        }
        if self.order_moves {
            Self::order_moves(&mut moves);
        }

        let mut alpha = i32::MIN;
        let mut best_move = None;
        let mut best_score = i32::MIN;
        for mv in moves {
            let mut child = *board;
            if child.play(mv).is_err() {
                continue;
            }
            let score = self.minimax(&child, depth - 1, alpha, i32::MAX, false, me, &mut nodes);
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
        }

        debug!(
            "searched depth {} for {}: best {:?} score {} nodes {} in {:?}",
            depth,
            me,
            best_move,
            best_score,
            nodes,
            started.elapsed()
        );
        SearchResult { best_move, score: best_score, depth, nodes }
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        board: &GlobalBoard,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        me: Player,
        nodes: &mut u64,
    ) -> i32 {
        *nodes += 1;

        if board.is_game_over() {
            let magnitude = WIN_SCORE + depth as i32;
            return match board.winner() {
                Some(winner) if winner == me => magnitude,
                Some(_) => -magnitude,
                None => 0,
            };
        }
        if depth == 0 {
            return self.evaluator.score(board, me);
        }

        let moves = get_valid_moves(board);
        if moves.is_empty() {
            return 0;
        }

        if maximizing {
            let mut max_score = i32::MIN;
            for mv in moves {
                let mut child = *board;
                if child.play(mv).is_err() {
                    continue;
                }
                let score = self.minimax(&child, depth - 1, alpha, beta, false, me, nodes);
                max_score = max_score.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            max_score
        } else {
            let mut min_score = i32::MAX;
            for mv in moves {
                let mut child = *board;
                if child.play(mv).is_err() {
                    continue;
                }
                let score = self.minimax(&child, depth - 1, alpha, beta, true, me, nodes);
                min_score = min_score.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            min_score
        }
    }
}
