use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "MMR Processor",
    long_about = "Simulates a matchmaking queue: forms balanced matches, fakes their results \
    and applies role-aware rating adjustments"
)]
pub struct Args {
    /// JSON file with processor settings. Fields left out keep their defaults.
    #[arg(short, long, env = "MMR_CONFIG", help = "Path to a JSON processor configuration")]
    pub config: Option<PathBuf>,

    /// Number of players queued before the first round
    #[arg(short, long, env = "MMR_PLAYERS", default_value_t = 200)]
    pub players: usize,

    /// Number of matchmaking rounds to simulate
    #[arg(short, long, env = "MMR_ROUNDS", default_value_t = 500)]
    pub rounds: usize,

    /// Seed for the simulated population and results
    #[arg(short, long, env = "MMR_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}
