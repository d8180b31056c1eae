//! Profile Card CLI
//!
//! Usage:
//!   profile-card [OPTIONS] [TARGETS]...
//!
//! Options:
//!   -c, --config <FILE>  Profile configuration (YAML) [default: config.yml]
//!   -f, --fill <CHAR>    Character used to pad prefix elements [default: .]
//!   -v, --verbose        Raise log verbosity (-v info, -vv debug)
//!   -h, --help           Print help

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use profile_card::{default_targets, run, UpdateConfig, DEFAULT_CONFIG_PATH, DEFAULT_FILL};

#[derive(Parser)]
#[command(name = "profile-card")]
#[command(about = "Write profile values into dark/light SVG cards")]
struct Cli {
    /// Card files to update in place (defaults to dark_mode.svg and light_mode.svg)
    targets: Vec<PathBuf>,

    /// Profile configuration file (YAML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Character used to pad prefix elements
    #[arg(short, long, default_value_t = DEFAULT_FILL)]
    fill: char,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let targets = if cli.targets.is_empty() {
        default_targets()
    } else {
        cli.targets
    };

    let config = UpdateConfig::new().with_fill(cli.fill);
    if let Err(e) = run(&cli.config, &targets, &config) {
        eprintln!("Error: {}", e.format());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
