//! `ludo` - play a game of Ludo unattended and print the result.
//!
//! ## Usage
//!
//! - `ludo` - four players, single-threaded random play
//! - `ludo --players 4 --team` - 2v2 team game
//! - `ludo --threaded --delay-ms 5` - play on worker threads
//!
//! Set `RUST_LOG=ludo_engine=debug` to see every roll and move.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ludo_engine::{Color, GameResult, LudoConfig, LudoGame, SimulationConfig};

/// Headless Ludo simulator
#[derive(Parser, Debug)]
#[command(name = "ludo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of players (2-4)
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Pair players 1 & 3 against 2 & 4
    #[arg(short, long)]
    team: bool,

    /// Dice seed, for reproducible games
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run player workers, line watchers and a supervisor on threads
    #[arg(long)]
    threaded: bool,

    /// Pause after each threaded move, in milliseconds
    #[arg(long, default_value_t = 1)]
    delay_ms: u64,

    /// Supervisor ticks without a six or capture before a player is removed
    /// (0 disables)
    #[arg(long, default_value_t = 20)]
    stall_threshold: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = LudoConfig::new(cli.players)
        .with_team_mode(cli.team)
        .with_simulation(cli.threaded);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let simulation = SimulationConfig::default()
        .with_move_delay(Duration::from_millis(cli.delay_ms))
        .with_stall_threshold(cli.stall_threshold);
    let mut game = LudoGame::configure(config)
        .context("invalid game configuration")?
        .with_simulation_config(simulation);

    info!(players = cli.players, team = cli.team, threaded = cli.threaded, "starting game");

    if cli.threaded {
        game.run_simulation().context("simulation failed")?;
    } else {
        while !game.is_game_over() {
            game.play_random_turn().context("random turn rejected")?;
        }
    }

    print_summary(&game);
    Ok(())
}

fn print_summary(game: &LudoGame) {
    let standings = game.standings();
    println!("Game over after {} moves", game.history().len());

    for placement in standings.placements() {
        let color = Color::of(placement.player);
        let note = if placement.eliminated {
            " (eliminated)"
        } else if !placement.finished {
            " (still playing)"
        } else {
            ""
        };
        println!("  {}. {} ({color}){note}", placement.place, placement.player);
    }

    match standings.result() {
        Some(GameResult::Winner(player)) => println!("Winner: {player}"),
        Some(GameResult::Winners(team, members)) => {
            let names: Vec<String> = members.iter().map(ToString::to_string).collect();
            println!("Winners: {team} ({})", names.join(" & "));
        }
        Some(GameResult::Draw) | None => println!("No winner"),
    }
}
