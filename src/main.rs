use clap::Parser;
use env_logger::Env;
use log::info;
use tile_2048::game::Game;
use tile_2048::render::RenderOptions;
use tile_2048::ui;

#[derive(Debug, Parser)]
#[command(name = "tile-2048", about = "Play 2048 in the terminal")]
struct Args {
    /// Seed the tile sequence for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Draw tiles without colours
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, which the alternate screen hides; keep it quiet by default.
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut game = match args.seed {
        Some(seed) => Game::seeded(seed),
        None => Game::from_entropy(),
    };
    let opts = RenderOptions { color: !args.no_color };
    ui::run(&mut game, opts)?;

    info!("exited with score {}", game.score());
    println!("Score: {} | highest tile: {}", game.score(), game.board().highest_tile());
    Ok(())
}
