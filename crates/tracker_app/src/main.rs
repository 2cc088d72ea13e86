mod platform;

use std::path::PathBuf;

use clap::Parser;

use platform::{LaunchOptions, LogDestination};

/// Console front-end for the job applications list.
#[derive(Debug, Parser)]
#[command(name = "job-tracker", version, about)]
struct Cli {
    /// RON configuration file.
    #[arg(long, default_value = "tracker.ron")]
    config: PathBuf,
    /// Initial query string, e.g. `?page=2&status[]=offer`. Overrides the saved one.
    #[arg(long)]
    location: Option<String>,
    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(LaunchOptions {
        config_path: cli.config,
        location: cli.location,
        log: cli.log,
    })
}
