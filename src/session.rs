//! Message-driven game host.
//!
//! A `Session` sits between a front-end and the rules: it applies human moves,
//! asks the computer for replies off the calling thread, and reports each turn
//! back as an [`Update`].
//!
//! Client messages: `{"start": "X"}` (the human's symbol), `{"move": [br, bc, cr, cc]}`
//! and `{"state": true}`.

use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::{AiPlayer, Difficulty};
use crate::board::{GlobalBoard, Move, Player};
use crate::error::SessionError;
use crate::movegen::get_valid_moves;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Human against the computer.
    OnePlayer,
    /// Two humans sharing the input.
    TwoPlayer,
}

/// What changed since the last request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Update {
    Turn {
        /// Moves applied while handling the request, in order.
        moves: Vec<Move>,
        legal_moves: Vec<Move>,
        active: Option<(u8, u8)>,
        current: Player,
    },
    End {
        moves: Vec<Move>,
        /// `None` for a draw.
        winner: Option<Player>,
    },
}

pub struct Session {
    started: bool,
    mode: GameMode,
    difficulty: Difficulty,
    seed: Option<u64>,
    human: Player,
    board: GlobalBoard,
    ai: Option<AiPlayer>,
}

impl Session {
    pub fn new(mode: GameMode, difficulty: Difficulty, seed: Option<u64>) -> Self {
        Self {
            started: false,
            mode,
            difficulty,
            seed,
            human: Player::X,
            board: GlobalBoard::new(),
            ai: None,
        }
    }

    pub fn board(&self) -> &GlobalBoard {
        &self.board
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub async fn handle_message(&mut self, data: Value) -> Result<Update, SessionError> {
        let map = data
            .as_object()
            .ok_or_else(|| SessionError::InvalidMessage("expected an object".to_string()))?;

        if map.contains_key("start") {
            let human: Player = serde_json::from_value(data["start"].clone())?;
            self.handle_start(human).await
        } else if map.contains_key("move") {
            if !self.started {
                return Err(SessionError::NotStarted);
            }
            let mv: Move = serde_json::from_value(data["move"].clone())?;
            self.handle_move(mv).await
        } else if map.contains_key("state") {
            if !self.started {
                return Err(SessionError::NotStarted);
            }
            Ok(self.update(Vec::new()))
        } else {
            Err(SessionError::InvalidMessage(data.to_string()))
        }
    }

    /// Starts a fresh game, discarding any game in progress. In one-player
    /// mode the computer takes the other symbol and moves at once if it is X.
    pub async fn handle_start(&mut self, human: Player) -> Result<Update, SessionError> {
        self.started = true;
        self.human = human;
        self.board = GlobalBoard::new();
        self.ai = match self.mode {
            GameMode::OnePlayer => Some(match self.seed {
                Some(seed) => AiPlayer::with_seed(self.difficulty, human.other(), seed),
                None => AiPlayer::new(self.difficulty, human.other()),
            }),
            GameMode::TwoPlayer => None,
        };
        info!("new {:?} game, human plays {}", self.mode, human);

        let mut moves = Vec::new();
        self.make_engine_move(&mut moves).await?;
        Ok(self.update(moves))
    }

    pub async fn handle_move(&mut self, mv: Move) -> Result<Update, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if self.mode == GameMode::OnePlayer
            && !self.board.is_game_over()
            && self.board.current_player() != self.human
        {
            return Err(SessionError::NotYourTurn);
        }
        let player = self.board.current_player();
        self.board
            .play(mv)
            .map_err(|reason| SessionError::IllegalMove { mv, reason })?;
        info!("{} played {}", player, mv);

        let mut moves = vec![mv];
        self.make_engine_move(&mut moves).await?;
        Ok(self.update(moves))
    }

    /// Lets the computer move if it is its turn.
    async fn make_engine_move(&mut self, moves: &mut Vec<Move>) -> Result<(), SessionError> {
        let Some(ai) = self.ai.take() else {
            return Ok(());
        };
        if self.board.is_game_over() || self.board.current_player() != ai.symbol() {
            self.ai = Some(ai);
            return Ok(());
        }

        let symbol = ai.symbol();
        let (ai, selected) = ai.spawn_move(self.board).await?;
        self.ai = Some(ai);
        if let Some(mv) = selected {
            self.board
                .play(mv)
                .map_err(|reason| SessionError::IllegalMove { mv, reason })?;
            info!("{} (computer) played {}", symbol, mv);
            moves.push(mv);
        }
        Ok(())
    }

    fn update(&mut self, moves: Vec<Move>) -> Update {
        if self.board.take_just_ended() {
            match self.board.winner() {
                Some(winner) => info!("game over, {} wins after {} moves", winner, self.board.moves_played()),
                None => info!("game over, broke even after {} moves", self.board.moves_played()),
            }
        }
        if self.board.is_game_over() {
            return Update::End { moves, winner: self.board.winner() };
        }
        Update::Turn {
            moves,
            legal_moves: get_valid_moves(&self.board),
            active: self.board.active_sub_board(),
            current: self.board.current_player(),
        }
    }
}
