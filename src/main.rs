mod console;
mod game;
mod minimax;
mod tic_tac_toe;

use std::time::Duration;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use crate::console::Terminal;
use crate::game::Session;

/// Tic-tac-toe against a computer that never loses.
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(version, long_about = None)]
struct Cli {
    /// Seed for the computer's random opening move.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after each computer move, in milliseconds.
    #[arg(long, default_value = "1000")]
    delay_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli);
    console::exit_on_interrupt()?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let terminal = Terminal::new(Duration::from_millis(cli.delay_ms));

    Session::new(terminal, rng).run()?;
    Ok(())
}
