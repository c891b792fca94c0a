//! Compute the mapping of every Area Fraction CC mask onto the regions of an atlas.
//!
//! Reads `Templates/<Atlas>_parcellation.nii.gz`, `Templates/<Atlas>_LUT.txt` and the masks in
//! `AreaFractionCCMasks/`, and writes one `AreaFractionCCMappings/<Atlas>/<roi>_mapping.json` per mask.

use clap::Parser;

use std::process::ExitCode;

use neuroconn::cli::{exit_code, init_logging, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "roi-mapping", version, about = "Map Area Fraction CC masks onto atlas regions")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Atlas name
    #[arg(long, default_value = "Juelich")]
    atlas: String,
}

fn main() -> neuroconn::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    let report = neuroconn::compute_mappings(&cli.common.layout(), &cli.atlas)?;
    Ok(exit_code(&report))
}
