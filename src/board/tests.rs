use super::*;

fn play_all(board: &mut GlobalBoard, moves: &[(u8, u8, u8, u8)]) {
    for &(br, bc, cr, cc) in moves {
        assert!(board.make_move(br, bc, cr, cc), "move {} {} {} {} rejected", br, bc, cr, cc);
    }
}

#[test]
fn test_player_other() {
    assert_eq!(Player::X.other(), Player::O);
    assert_eq!(Player::O.other(), Player::X);
}

#[test]
fn test_win_lines() {
    assert_eq!(WIN_LINES.len(), 8);
    for line in WIN_LINES.iter() {
        assert_eq!(line.count_ones(), 3);
    }
    let mut diagonal = BitBoard::empty();
    for i in 0..3 {
        diagonal.set_point(i, i, true);
    }
    assert!(completes_line(diagonal));
    assert!(!completes_line(BitBoard::from_point(1, 1)));
}

#[test]
fn test_iter_set_points() {
    let mut squares = BitBoard::empty();
    squares.set_point(0, 2, true);
    squares.set_point(2, 1, true);
    let points: Vec<_> = squares.iter_set_points().collect();
    assert_eq!(points, vec![(0, 2), (2, 1)]);
}

#[test]
fn test_sub_board_row_win() {
    let mut sub = SubBoard::new();
    assert!(sub.make_move(0, 0, Player::X));
    assert!(sub.make_move(0, 1, Player::X));
    assert_eq!(sub.winner(), None);
    assert!(sub.make_move(0, 2, Player::X));
    assert_eq!(sub.winner(), Some(Player::X));
    assert!(!sub.is_playable());
}

#[test]
fn test_sub_board_rejects_after_win() {
    let mut sub = SubBoard::new();
    for col in 0..3 {
        assert!(sub.make_move(col, col, Player::O));
    }
    assert_eq!(sub.winner(), Some(Player::O));
    let before = sub;
    assert!(!sub.make_move(1, 0, Player::X));
    assert_eq!(sub, before);
}

#[test]
fn test_sub_board_rejects_occupied_and_out_of_range() {
    let mut sub = SubBoard::new();
    assert!(sub.make_move(1, 1, Player::X));
    let before = sub;
    assert!(!sub.make_move(1, 1, Player::O));
    assert!(!sub.make_move(3, 0, Player::O));
    assert!(!sub.make_move(0, 3, Player::O));
    assert_eq!(sub, before);
    assert_eq!(sub.cell(1, 1), Some(Player::X));
}

#[test]
fn test_sub_board_full_without_winner() {
    // X O X
    // X O O
    // O X X
    let layout = [
        (0, 0, Player::X), (0, 1, Player::O), (0, 2, Player::X),
        (1, 0, Player::X), (1, 1, Player::O), (1, 2, Player::O),
        (2, 0, Player::O), (2, 1, Player::X), (2, 2, Player::X),
    ];
    let mut sub = SubBoard::new();
    for (row, col, player) in layout {
        assert!(sub.make_move(row, col, player));
    }
    assert_eq!(sub.winner(), None);
    assert!(sub.is_full());
    assert!(!sub.is_playable());
    assert_eq!(sub.empty_cells().count(), 0);
}

#[test]
fn test_empty_cells_row_major() {
    let mut sub = SubBoard::new();
    sub.make_move(0, 0, Player::X);
    sub.make_move(1, 1, Player::O);
    let cells: Vec<_> = sub.empty_cells().collect();
    assert_eq!(cells, vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]);
}

#[test]
fn test_new_board() {
    let board = GlobalBoard::new();
    assert_eq!(board.current_player(), Player::X);
    assert_eq!(board.active_sub_board(), None);
    assert_eq!(board.winner(), None);
    assert!(!board.is_game_over());
    assert!(!board.just_ended());
    assert_eq!(board.moves_played(), 0);
}

#[test]
fn test_move_sets_active_board() {
    let mut board = GlobalBoard::new();
    assert!(board.make_move(0, 0, 1, 2));
    assert_eq!(board.active_sub_board(), Some((1, 2)));
    assert_eq!(board.current_player(), Player::O);
    assert_eq!(board.sub_board(0, 0).cell(1, 2), Some(Player::X));
}

#[test]
fn test_wrong_board_rejected() {
    let mut board = GlobalBoard::new();
    play_all(&mut board, &[(0, 0, 1, 2)]);
    let before = board;
    assert_eq!(
        board.play(Move::new(0, 0, 0, 0)),
        Err(InvalidMove::WrongBoard { board_row: 1, board_col: 2 })
    );
    assert_eq!(board, before);
    assert!(board.make_move(1, 2, 0, 0));
}

#[test]
fn test_occupied_cell_rejected() {
    let mut board = GlobalBoard::new();
    play_all(&mut board, &[(0, 0, 0, 0)]);
    // O is sent back into (0, 0)
    assert_eq!(board.check_move(Move::new(0, 0, 0, 0)), Err(InvalidMove::CellOccupied));
    assert_eq!(board.current_player(), Player::O);
}

#[test]
fn test_out_of_range_rejected() {
    let mut board = GlobalBoard::new();
    assert_eq!(board.play(Move::new(3, 0, 0, 0)), Err(InvalidMove::OutOfRange));
    assert!(!board.make_move(0, 0, 0, 7));
    assert_eq!(board, GlobalBoard::new());
}

#[test]
fn test_free_move_when_target_board_won() {
    let mut board = GlobalBoard::new();
    // X wins sub-board (1, 2) along its top row
    play_all(&mut board, &[
        (1, 2, 0, 0), (0, 0, 1, 2),
        (1, 2, 0, 1), (0, 1, 1, 2),
        (1, 2, 0, 2),
    ]);
    assert_eq!(board.sub_board(1, 2).winner(), Some(Player::X));
    assert_eq!(board.active_sub_board(), Some((0, 2)));
    // O is sent towards (1, 2), which is closed
    play_all(&mut board, &[(0, 2, 1, 2)]);
    assert_eq!(board.active_sub_board(), None);
    assert_eq!(board.current_player(), Player::X);
    assert!(board.is_valid_board(2, 2));
    assert!(!board.is_valid_board(1, 2));
    assert_eq!(board.check_move(Move::new(1, 2, 1, 1)), Err(InvalidMove::BoardClosed));
}

#[test]
fn test_scenario_e_meta_diagonal() {
    // outcomes are set up directly so the next move completes the diagonal
    let mut board = GlobalBoard::new();
    board.active_sub_board = None;
    for (br, bc) in [(0u8, 0u8), (1, 1)] {
        for col in 0..3 {
            assert!(board.sub_boards[br as usize][bc as usize].make_move(0, col, Player::X));
        }
    }
    assert!(board.sub_boards[2][2].make_move(0, 0, Player::X));
    assert!(board.sub_boards[2][2].make_move(0, 1, Player::X));
    assert!(board.sub_boards[2][2].make_move(2, 2, Player::O));
    board.current_player = Player::X;
    board.active_sub_board = Some((2, 2));

    assert!(board.make_move(2, 2, 0, 2));
    assert_eq!(board.sub_board(2, 2).winner(), Some(Player::X));
    assert_eq!(board.winner(), Some(Player::X));
    assert!(board.is_game_over());
    assert!(!board.is_draw());
    assert!(board.just_ended());
    // winning move does not hand the turn over
    assert_eq!(board.current_player(), Player::X);

    assert!(board.take_just_ended());
    assert!(!board.take_just_ended());

    let before = board;
    assert!(!board.make_move(0, 2, 0, 0));
    assert_eq!(board.play(Move::new(1, 0, 1, 1)), Err(InvalidMove::GameOver));
    assert_eq!(board, before);
    assert!(!board.just_ended());
}

#[test]
fn test_draw_when_no_board_playable() {
    let mut board = GlobalBoard::new();
    // X owns (0, 0), O owns (0, 1) and (1, 0); the rest are full stalemates
    let stalemate = [
        (0, 0, Player::X), (0, 1, Player::O), (0, 2, Player::X),
        (1, 0, Player::X), (1, 1, Player::O), (1, 2, Player::O),
        (2, 0, Player::O), (2, 1, Player::X), (2, 2, Player::X),
    ];
    for ((br, bc), owner) in [((0usize, 0usize), Player::X), ((0, 1), Player::O), ((1, 0), Player::O)] {
        for col in 0..3 {
            assert!(board.sub_boards[br][bc].make_move(1, col, owner));
        }
    }
    for br in 0..3usize {
        for bc in 0..3usize {
            if (br, bc) == (2, 2) || board.sub_boards[br][bc].winner().is_some() {
                continue;
            }
            for (row, col, player) in stalemate {
                assert!(board.sub_boards[br][bc].make_move(row, col, player));
            }
        }
    }
    // last board: everything but the bottom-right corner
    for (row, col, player) in stalemate.iter().take(8) {
        assert!(board.sub_boards[2][2].make_move(*row, *col, *player));
    }
    board.active_sub_board = Some((2, 2));
    board.current_player = Player::X;

    assert!(board.make_move(2, 2, 2, 2));
    assert!(board.is_game_over());
    assert!(board.is_draw());
    assert_eq!(board.winner(), None);
    assert!(board.take_just_ended());
}

#[test]
fn test_move_parse_and_display() {
    let mv: Move = "0 1 2 0".parse().unwrap();
    assert_eq!(mv, Move::new(0, 1, 2, 0));
    assert_eq!(mv.to_string(), "0 1 2 0");
    assert_eq!("2,2, 1,1".parse::<Move>().unwrap(), Move::new(2, 2, 1, 1));
    assert!("0 1 2".parse::<Move>().is_err());
    assert!("0 1 2 3".parse::<Move>().is_err());
    assert!("a b c d".parse::<Move>().is_err());
}

#[test]
fn test_move_tuple_conversion() {
    let mv = Move::from((2, 1, 0, 2));
    let tuple: (u8, u8, u8, u8) = mv.into();
    assert_eq!(tuple, (2, 1, 0, 2));
}

#[test]
fn test_move_json() {
    let json = serde_json::to_string(&Move::new(1, 2, 0, 1)).unwrap();
    assert_eq!(json, "[1,2,0,1]");
    let mv: Move = serde_json::from_str("[2,0,1,1]").unwrap();
    assert_eq!(mv, Move::new(2, 0, 1, 1));
    assert!(serde_json::from_str::<Move>("[2,0,1,3]").is_err());
    assert!(serde_json::from_str::<Move>("[2,0,1]").is_err());
    assert!(serde_json::from_str::<Move>("[2,0,1,1,1]").is_err());
}

#[test]
fn test_display_marks_open_cells() {
    let mut board = GlobalBoard::new();
    board.make_move(1, 1, 0, 0);
    let text = board.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 11);
    // only sub-board (0, 0) is open, so row 0 shows dots on its left third only
    assert!(lines[0].starts_with(". . . |"));
    assert_eq!(lines[0].matches('.').count(), 3);
    assert_eq!(lines[3], "------+-------+------");
    assert!(lines[4].contains('X'));
}
