use crate::board::{GlobalBoard, Move, SIZE};

/// All legal moves for the player to move, row-major over sub-boards and then
/// over cells. Empty only once the game is over.
pub fn get_valid_moves(board: &GlobalBoard) -> Vec<Move> {
    let mut moves = Vec::new();
    for br in 0..SIZE as u8 {
        for bc in 0..SIZE as u8 {
            if !board.is_valid_board(br, bc) {
                continue;
            }
            moves.extend(
                board
                    .sub_board(br, bc)
                    .empty_cells()
                    .map(|(cr, cc)| Move::new(br, bc, cr, cc)),
            );
        }
    }
    moves
}
