use std::time::{Duration, Instant};

use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use tile_2048::autoplay::{self, AutoplayConfig, AutoplayReport};

#[derive(Debug, Parser)]
#[command(name = "autoplay", about = "Play seeded 2048 games with random moves and report scores")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Stop each game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = AutoplayConfig {
        games: args.games,
        seed: args.seed.unwrap_or_else(rand::random),
        max_moves: args.max_moves,
    };
    info!("playing {} games from seed {}", cfg.games, cfg.seed);

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(cfg.games as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} | last: {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    let summaries = autoplay::run_games(&cfg, |s| {
        pb.inc(1);
        pb.set_message(format!("{} (tile {})", s.score, s.highest_tile));
    });
    pb.finish_and_clear();

    let capped = summaries.iter().filter(|s| !s.finished).count();
    if capped > 0 {
        warn!("{capped} games hit the move cap before game over");
    }

    let report = AutoplayReport::from_summaries(&summaries);
    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    println!(
        "Games: {} | games/sec: {:.1} | mean score: {:.1} | max score: {} | best tile: {}",
        report.games,
        report.games as f64 / elapsed,
        report.mean_score,
        report.max_score,
        report.best_tile
    );
    for (tile, count) in &report.highest_tiles {
        println!("{:>6}: {}", tile, count);
    }
    Ok(())
}
