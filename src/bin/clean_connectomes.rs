//! Remove known-invalid ROI rows and columns from the raw connectomes of an atlas.
//!
//! Reads `Connectomes_old/<Atlas>_<roi>_weights.tsv` and writes `Connectomes/<roi>_<Atlas>_weights.tsv`.
//! Atlases with a known defect (currently Juelich) have a preset correction; for any other atlas,
//! or to override the preset, pass `--expected-size` and `--remove`.

use clap::Parser;

use std::process::ExitCode;

use neuroconn::cli::{exit_code, init_logging, CommonArgs};
use neuroconn::AtlasCorrection;

#[derive(Parser, Debug)]
#[command(name = "clean-connectomes", version, about = "Remove invalid ROIs from connectome matrices")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Atlas name
    #[arg(long, default_value = "Juelich")]
    atlas: String,

    /// Size of the raw connectomes
    #[arg(long)]
    expected_size: Option<usize>,

    /// Indices and inclusive index ranges to remove, in the raw index space, e.g. "0,281-413"
    #[arg(long)]
    remove: Option<String>,
}

fn main() -> neuroconn::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    let correction = AtlasCorrection::resolve(&cli.atlas, cli.expected_size, cli.remove.as_deref())?;
    let report = neuroconn::clean_connectomes(&cli.common.layout(), &correction)?;
    Ok(exit_code(&report))
}
