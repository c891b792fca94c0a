//! Command-line plumbing shared by the neuroconn binaries.

use clap::Args;
use log::LevelFilter;

use std::path::PathBuf;
use std::process::ExitCode;

use crate::batch::BatchReport;
use crate::layout::{DataLayout, DEFAULT_ROOT};


/// Options accepted by every binary.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Root of the data directory tree
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub path: PathBuf,

    /// Log every written file
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.path)
    }
}


/// Set up timestamped logging to stderr: `info` by default, `debug` when verbose.
pub fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

/// Exit successfully only if every file of the batch was processed.
pub fn exit_code(report: &BatchReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        for (input, err) in &report.failed {
            log::warn!("Not processed: '{}' ({})", input.display(), err);
        }
        ExitCode::FAILURE
    }
}
