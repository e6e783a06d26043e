use std::path::PathBuf;

use availability::DEFAULT_TARGETS_PATH;
use clap::Parser;

/// Poll HTTP targets and report per-domain availability
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// YAML file listing the targets to poll
    #[arg(short, long, default_value = DEFAULT_TARGETS_PATH)]
    pub targets: PathBuf,

    /// TOML polling settings, defaults to $XDG_CONFIG_HOME/uppe/availability.toml
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Write the default settings file (if missing) and exit
    #[arg(long)]
    pub init_settings: bool,

    /// Stop after this many rounds instead of polling forever
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub rounds: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
