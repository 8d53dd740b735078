//! tile-2048: a 2048 board engine plus a terminal front end
//!
//! This crate provides:
//! - A `Board` type implementing the four moves as a table of primitive
//!   steps (`Stack`, `Combine`, `Reverse`, `Transpose`) with merge scoring
//! - A `Game` session owning a board, its score and an injected RNG
//! - A stateless `render` of a `BoardSnapshot` and a crossterm `ui` loop
//!
//! Quick start:
//! ```
//! use tile_2048::engine::{Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let (b1, gained) = b0.shift(Move::Left);
//! assert!(b1.count_empty() >= b0.count_empty());
//! assert!(gained <= 8);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use tile_2048::engine::Move;
//! use tile_2048::game::{Game, GameStatus};
//!
//! let mut game = Game::seeded(123);
//! let mut inputs = 0usize;
//! let mut last_score = 0;
//! while game.status() == GameStatus::InProgress && inputs < 64 {
//!     let outcome = game.handle_input(Move::ALL[inputs % 4]);
//!     assert!(outcome.snapshot.score >= last_score);
//!     last_score = outcome.snapshot.score;
//!     inputs += 1;
//! }
//! assert!(game.board().highest_tile() >= 2);
//! ```
//!
pub mod autoplay;
pub mod engine;
pub mod game;
pub mod render;
pub mod ui;
