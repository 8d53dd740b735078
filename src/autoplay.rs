//! Headless sessions driven by uniformly random legal moves.
//!
//! Used by the `autoplay` binary as a soak run of the engine; nothing here
//! evaluates positions.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::engine::{Score, Tile};
use crate::game::{Game, GameStatus};

// Keeps the move stream independent of the tile stream for the same seed.
const MOVE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub games: usize,
    pub seed: u64,
    /// Stop a game after this many inputs even if it is not over.
    pub max_moves: Option<u64>,
}

impl Default for AutoplayConfig {
    fn default() -> Self { Self { games: 100, seed: 0, max_moves: None } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub seed: u64,
    pub score: Score,
    pub highest_tile: Tile,
    pub moves: u64,
    pub finished: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoplayReport {
    pub games: usize,
    pub mean_score: f64,
    pub max_score: Score,
    pub best_tile: Tile,
    /// Number of games whose highest tile was exactly this value.
    pub highest_tiles: BTreeMap<Tile, usize>,
}

impl AutoplayReport {
    pub fn from_summaries(summaries: &[GameSummary]) -> Self {
        let mut highest_tiles = BTreeMap::new();
        for s in summaries {
            *highest_tiles.entry(s.highest_tile).or_insert(0) += 1;
        }
        let total: Score = summaries.iter().map(|s| s.score).sum();
        Self {
            games: summaries.len(),
            mean_score: if summaries.is_empty() { 0.0 } else { total as f64 / summaries.len() as f64 },
            max_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
            best_tile: summaries.iter().map(|s| s.highest_tile).max().unwrap_or(0),
            highest_tiles,
        }
    }
}

/// Play one seeded session to the end (or `max_moves`).
pub fn play_random_game(seed: u64, max_moves: Option<u64>) -> GameSummary {
    let mut game = Game::seeded(seed);
    let mut picker = StdRng::seed_from_u64(seed ^ MOVE_STREAM);
    while game.status() == GameStatus::InProgress {
        if max_moves.is_some_and(|limit| game.moves() >= limit) {
            break;
        }
        let legal = game.board().legal_moves();
        if legal.is_empty() {
            break;
        }
        let dir = legal[picker.gen_range(0..legal.len())];
        game.handle_input(dir);
    }
    GameSummary {
        seed,
        score: game.score(),
        highest_tile: game.board().highest_tile(),
        moves: game.moves(),
        finished: game.status() == GameStatus::Over,
    }
}

/// Play `cfg.games` sessions on the rayon pool; `on_done` runs after each one.
pub fn run_games<F>(cfg: &AutoplayConfig, on_done: F) -> Vec<GameSummary>
where
    F: Fn(&GameSummary) + Sync,
{
    (0..cfg.games as u64)
        .into_par_iter()
        .map(|i| {
            let summary = play_random_game(cfg.seed.wrapping_add(i), cfg.max_moves);
            on_done(&summary);
            summary
        })
        .collect()
}
