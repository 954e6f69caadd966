use std::fmt;
use std::str::FromStr;

use bitvec::{prelude::*, slice::IterOnes};
use derive_more::{Display, Error};
use lazy_static::lazy_static;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::error::ParseMoveError;

pub const SIZE: usize = 3;
const CELLS: usize = SIZE * SIZE;
pub type BitBoard = BitArr!(for CELLS, in u16, Lsb0);
// bit index is row * 3 + col, the same layout is used for cells inside a
// sub-board and for sub-boards inside the meta-board
// bits 9..16 are padding and never set

pub trait BitArr2D {
    fn empty() -> Self;
    fn set_point(&mut self, row: u8, col: u8, value: bool);
    fn has_point(&self, row: u8, col: u8) -> bool;
    fn from_point(row: u8, col: u8) -> Self;
    type IterPoints<'a>: Iterator<Item = (u8, u8)> + 'a where Self: 'a;
    fn iter_set_points(&'_ self) -> Self::IterPoints<'_>;
}

fn point_of(idx: usize) -> (u8, u8) {
    ((idx / SIZE) as u8, (idx % SIZE) as u8)
}

fn index_of(row: u8, col: u8) -> usize {
    row as usize * SIZE + col as usize
}

impl BitArr2D for BitBoard {
    fn empty() -> Self {
        bitarr!(u16, Lsb0; 0; CELLS)
    }

    fn set_point(&mut self, row: u8, col: u8, value: bool) {
        self.set(index_of(row, col), value);
    }

    fn has_point(&self, row: u8, col: u8) -> bool {
        self[index_of(row, col)]
    }

    fn from_point(row: u8, col: u8) -> Self {
        let mut square = BitBoard::empty();
        square.set_point(row, col, true);
        square
    }

    type IterPoints<'a> = std::iter::Map<IterOnes<'a, u16, Lsb0>, fn(usize) -> (u8, u8)>;

    fn iter_set_points(&'_ self) -> Self::IterPoints<'_> {
        self[..CELLS].iter_ones().map(point_of as fn(usize) -> (u8, u8))
    }
}

lazy_static! {
    /// The eight three-in-a-row masks: rows, then columns, then both diagonals.
    pub static ref WIN_LINES: Vec<BitBoard> = {
        let mut lines = Vec::<BitBoard>::new();
        for i in 0..SIZE as u8 {
            let mut row = BitBoard::empty();
            let mut col = BitBoard::empty();
            for j in 0..SIZE as u8 {
                row.set_point(i, j, true);
                col.set_point(j, i, true);
            }
            lines.push(row);
            lines.push(col);
        }
        let mut main_diagonal = BitBoard::empty();
        let mut anti_diagonal = BitBoard::empty();
        for i in 0..SIZE as u8 {
            main_diagonal.set_point(i, i, true);
            anti_diagonal.set_point(i, SIZE as u8 - 1 - i, true);
        }
        lines.push(main_diagonal);
        lines.push(anti_diagonal);
        lines
    };
}

/// Whether `squares` covers at least one complete winning line.
pub fn completes_line(squares: BitBoard) -> bool {
    WIN_LINES.iter().any(|line| *line & squares == *line)
}

/// Owner of a completed line, given both players' squares on a 3x3 grid.
fn line_owner(x_squares: BitBoard, o_squares: BitBoard) -> Option<Player> {
    if completes_line(x_squares) {
        Some(Player::X)
    } else if completes_line(o_squares) {
        Some(Player::O)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => f.pad("X"),
            Player::O => f.pad("O"),
        }
    }
}

/// A move addressed by sub-board `(board_row, board_col)` and the cell
/// `(cell_row, cell_col)` inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub board_row: u8,
    pub board_col: u8,
    pub cell_row: u8,
    pub cell_col: u8,
}

impl Move {
    pub const fn new(board_row: u8, board_col: u8, cell_row: u8, cell_col: u8) -> Self {
        Self { board_row, board_col, cell_row, cell_col }
    }

    pub fn board(&self) -> (u8, u8) {
        (self.board_row, self.board_col)
    }

    pub fn cell(&self) -> (u8, u8) {
        (self.cell_row, self.cell_col)
    }

    pub fn is_in_range(&self) -> bool {
        [self.board_row, self.board_col, self.cell_row, self.cell_col]
            .iter()
            .all(|&c| (c as usize) < SIZE)
    }
}

impl From<(u8, u8, u8, u8)> for Move {
    fn from((board_row, board_col, cell_row, cell_col): (u8, u8, u8, u8)) -> Self {
        Self::new(board_row, board_col, cell_row, cell_col)
    }
}

impl From<Move> for (u8, u8, u8, u8) {
    fn from(mv: Move) -> Self {
        (mv.board_row, mv.board_col, mv.cell_row, mv.cell_col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.board_row, self.board_col, self.cell_row, self.cell_col)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Parses `"br bc cr cc"`; commas are accepted as separators too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<u8>() {
                Ok(c) if (c as usize) < SIZE => Ok(c),
                _ => Err(ParseMoveError::BadCoordinate(part.to_string())),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        match coords[..] {
            [br, bc, cr, cc] => Ok(Move::new(br, bc, cr, cc)),
            _ => Err(ParseMoveError::WrongArity(coords.len())),
        }
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let mut s = serializer.serialize_tuple(4)?;
        s.serialize_element(&self.board_row)?;
        s.serialize_element(&self.board_col)?;
        s.serialize_element(&self.cell_row)?;
        s.serialize_element(&self.cell_col)?;
        s.end()
    }
}

struct MoveVisitor;
impl<'de> Visitor<'de> for MoveVisitor {
    type Value = Move;
    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array [board_row, board_col, cell_row, cell_col] of values 0..=2")
    }
    fn visit_seq<V>(self, mut seq: V) -> Result<Move, V::Error> where V: SeqAccess<'de> {
        let mut coords = [0u8; 4];
        for (i, coord) in coords.iter_mut().enumerate() {
            let value: u8 = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(i, &self))?;
            if value as usize >= SIZE {
                return Err(de::Error::invalid_value(de::Unexpected::Unsigned(value as u64), &self));
            }
            *coord = value;
        }
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(5, &self));
        }
        let [br, bc, cr, cc] = coords;
        Ok(Move::new(br, bc, cr, cc))
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'de> {
        deserializer.deserialize_seq(MoveVisitor)
    }
}

/// Why a move was refused. Refusal never changes the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum InvalidMove {
    #[display("the game is already over")]
    GameOver,
    #[display("coordinates must be in 0..=2")]
    OutOfRange,
    #[display("must play in sub-board ({board_row}, {board_col})")]
    WrongBoard { board_row: u8, board_col: u8 },
    #[display("sub-board is already decided")]
    BoardClosed,
    #[display("cell is already taken")]
    CellOccupied,
}

/// One 3x3 grid. Cells are only ever filled, never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubBoard {
    x_cells: BitBoard,
    o_cells: BitBoard,
    winner: Option<Player>,
}

impl Default for SubBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubBoard {
    pub fn new() -> Self {
        Self {
            x_cells: BitBoard::empty(),
            o_cells: BitBoard::empty(),
            winner: None,
        }
    }

    /// Squares held by `player`.
    pub fn cells(&self, player: Player) -> BitBoard {
        match player {
            Player::X => self.x_cells,
            Player::O => self.o_cells,
        }
    }

    fn occupied(&self) -> BitBoard {
        self.x_cells | self.o_cells
    }

    pub fn cell(&self, row: u8, col: u8) -> Option<Player> {
        if self.x_cells.has_point(row, col) {
            Some(Player::X)
        } else if self.o_cells.has_point(row, col) {
            Some(Player::O)
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_full(&self) -> bool {
        self.occupied()[..CELLS].all()
    }

    pub fn is_playable(&self) -> bool {
        self.winner.is_none() && !self.is_full()
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (u8, u8)> {
        let occupied = self.occupied();
        (0..CELLS).filter(move |&idx| !occupied[idx]).map(point_of)
    }

    /// Places `player` at `(row, col)`. Fails without side effects if the cell
    /// is taken, out of range, or the board already has a winner.
    pub fn make_move(&mut self, row: u8, col: u8, player: Player) -> bool {
        if row as usize >= SIZE || col as usize >= SIZE {
            return false;
        }
        if self.winner.is_some() || self.cell(row, col).is_some() {
            return false;
        }
        let squares = match player {
            Player::X => &mut self.x_cells,
            Player::O => &mut self.o_cells,
        };
        squares.set_point(row, col, true);
        self.winner = line_owner(self.x_cells, self.o_cells);
        true
    }
}

/// The full game: nine sub-boards, turn order and the active-board rule.
///
/// `GlobalBoard` is a plain `Copy` value so the search can branch by copying
/// it instead of undoing moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalBoard {
    sub_boards: [[SubBoard; SIZE]; SIZE],
    current_player: Player,
    active_sub_board: Option<(u8, u8)>,
    winner: Option<Player>,
    game_over: bool,
    just_ended: bool,
    moves_played: u8,
}

impl Default for GlobalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalBoard {
    pub fn new() -> Self {
        Self {
            sub_boards: [[SubBoard::new(); SIZE]; SIZE],
            current_player: Player::X,
            active_sub_board: None,
            winner: None,
            game_over: false,
            just_ended: false,
            moves_played: 0,
        }
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// The sub-board the next move is confined to, `None` for a free move.
    pub fn active_sub_board(&self) -> Option<(u8, u8)> {
        self.active_sub_board
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_draw(&self) -> bool {
        self.game_over && self.winner.is_none()
    }

    /// Raised on the move that ended the game, until taken.
    pub fn just_ended(&self) -> bool {
        self.just_ended
    }

    /// Reads and clears the end-of-game signal.
    pub fn take_just_ended(&mut self) -> bool {
        std::mem::take(&mut self.just_ended)
    }

    pub fn moves_played(&self) -> u8 {
        self.moves_played
    }

    pub fn sub_board(&self, board_row: u8, board_col: u8) -> &SubBoard {
        &self.sub_boards[board_row as usize][board_col as usize]
    }

    pub fn sub_boards(&self) -> impl Iterator<Item = ((u8, u8), &SubBoard)> {
        self.sub_boards.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(c, sub)| ((r as u8, c as u8), sub))
        })
    }

    /// Meta-board squares: the sub-boards won by `player`.
    pub fn meta_cells(&self, player: Player) -> BitBoard {
        let mut squares = BitBoard::empty();
        for ((r, c), sub) in self.sub_boards() {
            if sub.winner() == Some(player) {
                squares.set_point(r, c, true);
            }
        }
        squares
    }

    /// Whether the next move may be made in `(board_row, board_col)`.
    pub fn is_valid_board(&self, board_row: u8, board_col: u8) -> bool {
        if self.game_over || board_row as usize >= SIZE || board_col as usize >= SIZE {
            return false;
        }
        if !self.sub_board(board_row, board_col).is_playable() {
            return false;
        }
        match self.active_sub_board {
            Some(active) => active == (board_row, board_col),
            None => true,
        }
    }

    /// Checks `mv` against the current position without changing it.
    pub fn check_move(&self, mv: Move) -> Result<(), InvalidMove> {
        if self.game_over {
            return Err(InvalidMove::GameOver);
        }
        if !mv.is_in_range() {
            return Err(InvalidMove::OutOfRange);
        }
        if let Some((board_row, board_col)) = self.active_sub_board {
            if mv.board() != (board_row, board_col) {
                return Err(InvalidMove::WrongBoard { board_row, board_col });
            }
        }
        let sub = self.sub_board(mv.board_row, mv.board_col);
        if !sub.is_playable() {
            return Err(InvalidMove::BoardClosed);
        }
        if sub.cell(mv.cell_row, mv.cell_col).is_some() {
            return Err(InvalidMove::CellOccupied);
        }
        Ok(())
    }

    /// Plays `mv` for the current player, or reports why it is illegal.
    pub fn play(&mut self, mv: Move) -> Result<(), InvalidMove> {
        self.check_move(mv)?;
        let player = self.current_player;
        let sub = &mut self.sub_boards[mv.board_row as usize][mv.board_col as usize];
        if !sub.make_move(mv.cell_row, mv.cell_col, player) {
            return Err(InvalidMove::CellOccupied);
        }
        self.moves_played += 1;

        let was_over = self.game_over;
        self.update_outcome();
        if self.game_over {
            if !was_over {
                self.just_ended = true;
            }
            return Ok(());
        }

        // the cell just played names the opponent's sub-board
        self.active_sub_board = if self.sub_board(mv.cell_row, mv.cell_col).is_playable() {
            Some(mv.cell())
        } else {
            None
        };
        self.current_player = player.other();
        Ok(())
    }

    pub fn make_move(&mut self, board_row: u8, board_col: u8, cell_row: u8, cell_col: u8) -> bool {
        self.play(Move::new(board_row, board_col, cell_row, cell_col)).is_ok()
    }

    fn update_outcome(&mut self) {
        // a completed meta-line wins even when every sub-board is closed
        if let Some(winner) = line_owner(self.meta_cells(Player::X), self.meta_cells(Player::O)) {
            self.winner = Some(winner);
            self.game_over = true;
            return;
        }
        if self.sub_boards().all(|(_, sub)| !sub.is_playable()) {
            self.game_over = true;
        }
    }
}

impl fmt::Display for GlobalBoard {
    /// 9x9 grid; empty cells that accept the next move are shown as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for br in 0..SIZE as u8 {
            if br > 0 {
                writeln!(f, "------+-------+------")?;
            }
            for cr in 0..SIZE as u8 {
                let mut line = String::new();
                for bc in 0..SIZE as u8 {
                    if bc > 0 {
                        line.push_str("| ");
                    }
                    let open = self.is_valid_board(br, bc);
                    for cc in 0..SIZE as u8 {
                        let symbol = match self.sub_board(br, bc).cell(cr, cc) {
                            Some(Player::X) => 'X',
                            Some(Player::O) => 'O',
                            None if open => '.',
                            None => ' ',
                        };
                        line.push(symbol);
                        line.push(' ');
                    }
                }
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
