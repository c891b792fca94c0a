//! Render the cleaned connectomes of an atlas as heatmap images.
//!
//! Reads `Connectomes/<roi>_<Atlas>_weights.tsv` and writes `<out-dir>/<roi>_<Atlas>_connectivity.png`.

use clap::Parser;

use std::path::PathBuf;
use std::process::ExitCode;

use neuroconn::cli::{exit_code, init_logging, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "plot-connectomes", version, about = "Render connectome matrices as heatmaps")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Atlas name
    #[arg(long, default_value = "Juelich")]
    atlas: String,

    /// Directory for the heatmap images
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// The matrices carry their own row and column labels, no LUT is used
    #[arg(long)]
    labeled: bool,
}

fn main() -> neuroconn::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    let report = neuroconn::render_connectomes(&cli.common.layout(), &cli.atlas, &cli.out_dir, cli.labeled)?;
    Ok(exit_code(&report))
}
