//! Zero the spurious labels of a parcellation volume.
//!
//! Reads `Templates/<Atlas>_parcellation.nii.gz` and writes `Templates/<Atlas>_parcellation_repaired.nii.gz`
//! together with a mask of the removed voxels, `Templates/<Atlas>_removed.nii.gz`.

use clap::Parser;

use neuroconn::cli::{init_logging, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "repair-parcellation", version, about = "Remove labels above the valid maximum from a parcellation")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Atlas name
    #[arg(long, default_value = "AAN")]
    atlas: String,

    /// Highest valid label, all labels above are set to background
    #[arg(long, default_value = "281")]
    max_label: i32,
}

fn main() -> neuroconn::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    neuroconn::repair_parcellation(&cli.common.layout(), &cli.atlas, cli.max_label)?;
    Ok(())
}
