//! Game session: one board, its score and the random source that feeds it.
//!
//! A session moves through `Setup -> Playing -> Over`. `Setup` is transient
//! and handled entirely inside [`Game::new_game`]; afterwards the session is
//! either in progress or over, which [`GameStatus`] reports.
//!
//! ```
//! use tile_2048::engine::Move;
//! use tile_2048::game::{Game, GameStatus};
//!
//! let mut game = Game::seeded(7);
//! let start = game.new_game();
//! assert_eq!(start.score, 0);
//! assert_eq!(start.board.count_empty(), 14);
//!
//! let outcome = game.handle_input(Move::Left);
//! assert_eq!(outcome.status, GameStatus::InProgress);
//! ```

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::engine::{Board, Move, Score, Spawn, Tile, START_TILE};

/// Number of tiles placed by `Setup`.
pub const START_TILES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Over,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub score: Score,
}

impl BoardSnapshot {
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Tile { self.board.get(row, col) }
}

/// What a single directional input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub snapshot: BoardSnapshot,
    pub changed: bool,
    pub status: GameStatus,
    /// Tile placed after the move, if any.
    #[serde(skip)]
    pub spawned: Option<Spawn>,
}

/// A 2048 session driven by an injected random source.
///
/// The board is only ever written by `Setup`, moves and spawns:
/// ```compile_fail
/// use tile_2048::engine::Board;
/// use tile_2048::game::Game;
/// let mut game = Game::seeded(1);
/// game.load_board(Board::from_rows([[3, 3, 0, 0], [0; 4], [0; 4], [0; 4]]));
/// ```
pub struct Game<R = StdRng> {
    board: Board,
    score: Score,
    status: GameStatus,
    moves: u64,
    rng: R,
}

impl Game<StdRng> {
    /// Session with a deterministic tile sequence.
    pub fn seeded(seed: u64) -> Self { Self::with_rng(StdRng::seed_from_u64(seed)) }

    /// Session seeded from OS entropy.
    pub fn from_entropy() -> Self { Self::with_rng(StdRng::from_entropy()) }
}

impl<R: Rng> Game<R> {
    /// Wrap `rng` and run `Setup`, so the session starts in progress.
    pub fn with_rng(rng: R) -> Self {
        let mut game = Self {
            board: Board::EMPTY,
            score: 0,
            status: GameStatus::InProgress,
            moves: 0,
            rng,
        };
        game.setup();
        game
    }

    /// Reset to `Setup` and return the fresh board.
    pub fn new_game(&mut self) -> BoardSnapshot {
        self.setup();
        self.snapshot()
    }

    fn setup(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.moves = 0;
        for _ in 0..START_TILES {
            self.board.place_random(START_TILE, &mut self.rng);
        }
        self.status = GameStatus::InProgress;
        info!("new game\n{}", self.board);
    }

    /// Apply one directional input.
    ///
    /// Inputs received once the game is over are ignored and report the
    /// unchanged snapshot.
    pub fn handle_input(&mut self, dir: Move) -> MoveOutcome {
        if self.status == GameStatus::Over {
            return MoveOutcome {
                snapshot: self.snapshot(),
                changed: false,
                status: GameStatus::Over,
                spawned: None,
            };
        }

        let delta = self.board.apply_move(dir);
        self.score += delta.gained;
        self.moves += 1;

        let spawned = if delta.changed {
            let spawn = self.board.spawn_tile(&mut self.rng);
            if spawn.is_none() {
                debug!("move {dir} filled the board; no tile spawned");
            }
            spawn
        } else {
            None
        };
        debug!(
            "move {} {dir}: changed={} gained={} score={}",
            self.moves, delta.changed, delta.gained, self.score
        );

        if self.board.is_game_over() {
            self.status = GameStatus::Over;
            info!("game over after {} moves, score {}", self.moves, self.score);
        }

        MoveOutcome {
            snapshot: self.snapshot(),
            changed: delta.changed,
            status: self.status,
            spawned,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> BoardSnapshot { BoardSnapshot { board: self.board, score: self.score } }

    #[inline]
    pub fn status(&self) -> GameStatus { self.status }

    #[inline]
    pub fn score(&self) -> Score { self.score }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    /// Directional inputs handled since the last `Setup`, including no-op ones.
    #[inline]
    pub fn moves(&self) -> u64 { self.moves }

    /// Replace the board mid-session. Status is recomputed; score is kept.
    #[cfg(test)]
    pub(crate) fn load_board(&mut self, board: Board) {
        let board = Board::try_from_rows(board.into_rows()).expect("test board holds valid tiles");
        self.board = board;
        self.status = if board.is_game_over() { GameStatus::Over } else { GameStatus::InProgress };
    }
}
