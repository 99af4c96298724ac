use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cube_snake::game::GameConfig;
use cube_snake::modes::{format_summary, HeadlessMode, HumanMode};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cube_snake")]
#[command(version, about = "Two-snake 3D cube Snake game in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON configuration file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between two ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Number of ticks to simulate in headless mode
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Headless mode only: do not sleep between ticks
    #[arg(long)]
    fast: bool,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "cube_snake.log")]
    log_file: PathBuf,

    /// Log debug events as well
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with the keyboard against the rival snake
    Play,
    /// Simulate without a terminal and print a summary
    Headless,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };

    // Command line flags win over the file
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;
    info!("Starting cube_snake {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless_mode = HeadlessMode::new(config, cli.ticks, !cli.fast)?;
            let summary = headless_mode.run();
            println!("{}", format_summary(&summary));
        }
    }

    Ok(())
}
