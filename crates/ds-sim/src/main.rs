//! Deep Sea Slots command line
//!
//! Usage:
//!   ds-sim simulate --players 8 --spins 1000   - Parallel batch run, JSON report
//!   ds-sim autospin --spins 20 --speed turbo   - Paced auto-spin for one player
//!   ds-sim evaluate fish fish fish ...         - Score a recorded 15-cell grid
//!   ds-sim config --format yaml                - Print the default configuration

mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use ds_ledger::MemoryLedger;
use ds_slot::{
    AutoSpinSequencer, Grid, NoDelay, Pacer, SlotConfig, SlotEngine, SpeedTier, StopReason,
    ThreadPacer,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::simulate::SimulationParams;

#[derive(Parser)]
#[command(name = "ds-sim", about = "Deep Sea Slots engine tools")]
struct Cli {
    /// Engine configuration (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate many players in parallel and print a JSON report
    Simulate {
        #[arg(short, long, default_value_t = 8)]
        players: usize,
        /// Spins per player
        #[arg(short, long, default_value_t = 1000)]
        spins: u32,
        /// Starting credit per player
        #[arg(long, default_value_t = 100_000)]
        credit: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Rayon worker threads (default: one per core)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Auto-spin one player with paced delays
    Autospin {
        #[arg(short, long, default_value_t = 10)]
        spins: u32,
        /// normal, fast or turbo
        #[arg(long, default_value = "normal")]
        speed: SpeedTier,
        #[arg(long, default_value_t = 1_000)]
        credit: u64,
        /// Seed for a reproducible session (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the pauses between spins
        #[arg(long)]
        no_delay: bool,
    },
    /// Score a grid given as 15 symbol ids in row-major order
    Evaluate {
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Print the configuration in effect
    Config {
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            players,
            spins,
            credit,
            seed,
            threads,
        } => run_simulation(
            config,
            SimulationParams {
                players,
                spins,
                credit,
                seed,
            },
            threads,
        ),
        Commands::Autospin {
            spins,
            speed,
            credit,
            seed,
            no_delay,
        } => run_autospin(config, spins, speed, credit, seed, no_delay),
        Commands::Evaluate { symbols } => evaluate(config, symbols),
        Commands::Config { format } => print_config(&config, format),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: Option<&Path>) -> Result<SlotConfig> {
    match path {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(SlotConfig::default()),
    }
}

fn build_engine(config: SlotConfig) -> Result<SlotEngine> {
    SlotEngine::new(config).context("Invalid engine configuration")
}

fn run_simulation(
    config: SlotConfig,
    params: SimulationParams,
    threads: Option<usize>,
) -> Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let engine = build_engine(config)?;
    let report = simulate::run(&engine, &params)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_autospin(
    config: SlotConfig,
    spins: u32,
    speed: SpeedTier,
    credit: u64,
    seed: Option<u64>,
    no_delay: bool,
) -> Result<()> {
    const PLAYER: &str = "player";

    let engine = build_engine(config)?;
    let ledger = MemoryLedger::new();
    ledger.register(PLAYER)?;
    ledger.grant_credit(PLAYER, credit)?;

    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_os_rng()),
    };
    let mut pacer: Box<dyn Pacer> = if no_delay {
        Box::new(NoDelay::default())
    } else {
        Box::new(ThreadPacer)
    };

    let sequencer = AutoSpinSequencer::new(&ledger, &engine);
    let report = sequencer.run(
        PLAYER,
        spins,
        speed,
        rng.as_mut(),
        pacer.as_mut(),
        |outcome| {
            println!("{}", outcome.grid.render(engine.catalog()));
            if outcome.is_win() {
                println!(
                    "WIN {} on {} line(s) | credit {}\n",
                    outcome.total_payout,
                    outcome.line_wins.len(),
                    outcome.account.credit
                );
            } else {
                println!("no win | credit {}\n", outcome.account.credit);
            }
        },
    );

    let stats = &report.stats;
    println!(
        "{} spins | bet {} | won {} | RTP {:.3} | hit rate {:.3} | best {}",
        stats.total_spins,
        stats.total_bet,
        stats.total_win,
        stats.rtp(),
        stats.hit_rate(),
        stats.best_payout
    );

    match report.stop {
        StopReason::Completed | StopReason::Aborted => Ok(()),
        StopReason::InsufficientFunds { credit, stake } => {
            println!("stopped: credit {credit} below stake {stake}");
            Ok(())
        }
        StopReason::Failed { message } => bail!("auto-spin failed: {message}"),
    }
}

fn evaluate(config: SlotConfig, symbols: Vec<String>) -> Result<()> {
    let engine = build_engine(config)?;
    let grid = Grid::from_ids(symbols);
    let evaluation = engine
        .evaluate_grid(&grid)
        .context("Grid cannot be evaluated")?;

    println!("{}", grid.render(engine.catalog()));
    for win in &evaluation.line_wins {
        let name = engine
            .paytable()
            .paylines()
            .iter()
            .find(|line| line.index == win.line_index)
            .map_or("", |line| line.name.as_str());
        println!(
            "line {} {:<14} {} pays {}",
            win.line_index, name, win.symbol_id, win.payout
        );
    }
    println!("total payout: {}", evaluation.total_payout);
    Ok(())
}

fn print_config(config: &SlotConfig, format: Format) -> Result<()> {
    let text = match format {
        Format::Json => config.to_json()?,
        Format::Yaml => config.to_yaml()?,
    };
    println!("{text}");
    Ok(())
}
