//! Static evaluation of non-terminal positions.
//!
//! The score is computed from one player's point of view, positive when the
//! position favours that player. Every term is antisymmetric, so
//! `score(board, p) == -score(board, p.other())` always holds.

use crate::board::{BitArr2D, BitBoard, GlobalBoard, Player, SubBoard, WIN_LINES};

/// Hand-tuned weights. Only playing strength depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    /// Per sub-board won.
    pub material: i32,
    /// Per meta-line holding two won sub-boards and none of the opponent's.
    pub meta_near_win: i32,
    /// Owning the center sub-board.
    pub meta_center: i32,
    /// Per corner sub-board owned.
    pub meta_corner: i32,
    /// Per own mark on a line inside a sub-board that the opponent has not touched.
    pub local_line: i32,
    /// Holding the center cell of a sub-board.
    pub local_center: i32,
    pub center_multiplier: i32,
    pub corner_multiplier: i32,
    pub edge_multiplier: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            material: 50,
            meta_near_win: 20,
            meta_center: 30,
            meta_corner: 15,
            local_line: 2,
            local_center: 3,
            center_multiplier: 3,
            corner_multiplier: 2,
            edge_multiplier: 1,
        }
    }
}

const CORNERS: [(u8, u8); 4] = [(0, 0), (0, 2), (2, 0), (2, 2)];

fn is_corner(row: u8, col: u8) -> bool {
    CORNERS.contains(&(row, col))
}

fn count(line: &BitBoard, squares: BitBoard) -> u32 {
    (*line & squares).count_ones() as u32
}

/// Lines where `mine` has two marks and `theirs` has none.
fn near_wins(mine: BitBoard, theirs: BitBoard) -> i32 {
    WIN_LINES
        .iter()
        .filter(|line| count(line, mine) == 2 && count(line, theirs) == 0)
        .count() as i32
}

fn control(mine: BitBoard, theirs: BitBoard, row: u8, col: u8) -> i32 {
    match (mine.has_point(row, col), theirs.has_point(row, col)) {
        (true, false) => 1,
        (false, true) => -1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    weights: Weights,
}

impl Evaluator {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Strategic weight of a sub-board by its place on the meta-board.
    pub fn positional_multiplier(&self, row: u8, col: u8) -> i32 {
        if (row, col) == (1, 1) {
            self.weights.center_multiplier
        } else if is_corner(row, col) {
            self.weights.corner_multiplier
        } else {
            self.weights.edge_multiplier
        }
    }

    pub fn score(&self, board: &GlobalBoard, player: Player) -> i32 {
        let w = &self.weights;
        let mine = board.meta_cells(player);
        let theirs = board.meta_cells(player.other());

        let mut score = (mine.count_ones() as i32 - theirs.count_ones() as i32) * w.material;
        score += (near_wins(mine, theirs) - near_wins(theirs, mine)) * w.meta_near_win;
        score += control(mine, theirs, 1, 1) * w.meta_center;
        for (row, col) in CORNERS {
            score += control(mine, theirs, row, col) * w.meta_corner;
        }

        for ((row, col), sub) in board.sub_boards() {
            if sub.is_playable() {
                score += self.sub_board_score(sub, player) * self.positional_multiplier(row, col);
            }
        }
        score
    }

    /// Local score of a single sub-board for `player`.
    pub fn sub_board_score(&self, sub: &SubBoard, player: Player) -> i32 {
        let w = &self.weights;
        let mine = sub.cells(player);
        let theirs = sub.cells(player.other());

        let mut score = 0;
        for line in WIN_LINES.iter() {
            let own = count(line, mine) as i32;
            let opp = count(line, theirs) as i32;
            if opp == 0 && own > 0 {
                score += own * w.local_line;
            } else if own == 0 && opp > 0 {
                score -= opp * w.local_line;
            }
        }
        score + control(mine, theirs, 1, 1) * w.local_center
    }
}
