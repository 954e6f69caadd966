//! Positions shared by the unit tests.

use crate::board::{GlobalBoard, Move};

pub fn board_after(moves: &[(u8, u8, u8, u8)]) -> GlobalBoard {
    let mut board = GlobalBoard::new();
    for &(br, bc, cr, cc) in moves {
        assert!(board.make_move(br, bc, cr, cc), "move {:?} rejected", (br, bc, cr, cc));
    }
    board
}

/// X to move with five legal replies, exactly one of which wins the game.
pub const NEAR_WIN: [(u8, u8, u8, u8); 28] = [
    (0, 2, 1, 0), (1, 0, 1, 1), (1, 1, 0, 2), (0, 2, 0, 1),
    (0, 1, 1, 2), (1, 2, 0, 2), (0, 2, 1, 1), (1, 1, 2, 0),
    (2, 0, 1, 1), (1, 1, 2, 1), (2, 1, 2, 2), (2, 2, 0, 1),
    (0, 1, 2, 0), (2, 0, 2, 0), (2, 0, 2, 2), (2, 2, 1, 1),
    (1, 1, 0, 0), (0, 0, 2, 0), (2, 0, 2, 1), (2, 1, 2, 1),
    (2, 1, 1, 0), (1, 0, 2, 0), (2, 0, 0, 2), (0, 2, 0, 2),
    (0, 2, 1, 2), (1, 2, 2, 0), (2, 0, 0, 1), (0, 1, 1, 1),
];

pub const WINNING_MOVE: Move = Move::new(1, 1, 0, 1);

pub fn one_move_from_victory() -> (GlobalBoard, Move) {
    (board_after(&NEAR_WIN), WINNING_MOVE)
}

/// The NEAR_WIN game played out: X has won.
pub fn finished_game() -> GlobalBoard {
    let mut board = board_after(&NEAR_WIN);
    board.play(WINNING_MOVE).unwrap();
    board
}
