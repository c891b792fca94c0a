//! The directory layout shared by all processing steps.
//!
//! Every path is derived from a configurable root directory (`/data` by default), so the same
//! operations run unchanged on synthetic directory trees.

use std::path::{Path, PathBuf};

use crate::error::{NeuroconnError, Result};

pub const DEFAULT_ROOT: &str = "/data";

const TEMPLATES_DIR: &str = "Templates";
const MASKS_DIR: &str = "AreaFractionCCMasks";
const MAPPINGS_DIR: &str = "AreaFractionCCMappings";
const OLD_CONNECTOMES_DIR: &str = "Connectomes_old";
const CONNECTOMES_DIR: &str = "Connectomes";
const WEIGHTS_SUFFIX: &str = "_weights.tsv";


/// Models the data directory tree below `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> DataLayout {
        DataLayout::new(DEFAULT_ROOT)
    }
}

impl DataLayout {

    pub fn new<P: AsRef<Path>>(root: P) -> DataLayout {
        DataLayout { root: root.as_ref().to_path_buf() }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    /// The parcellation volume of an atlas. The compressed `.nii.gz` variant is preferred when both exist.
    pub fn parcellation(&self, atlas: &str) -> Result<PathBuf> {
        let gz = self.templates_dir().join(format!("{}_parcellation.nii.gz", atlas));
        let plain = self.templates_dir().join(format!("{}_parcellation.nii", atlas));
        if gz.is_file() {
            Ok(gz)
        } else if plain.is_file() {
            Ok(plain)
        } else {
            Err(NeuroconnError::MissingInput(gz))
        }
    }

    pub fn lut(&self, atlas: &str) -> PathBuf {
        self.templates_dir().join(format!("{}_LUT.txt", atlas))
    }

    pub fn repaired_parcellation(&self, atlas: &str) -> PathBuf {
        self.templates_dir().join(format!("{}_parcellation_repaired.nii.gz", atlas))
    }

    pub fn removed_labels_mask(&self, atlas: &str) -> PathBuf {
        self.templates_dir().join(format!("{}_removed.nii.gz", atlas))
    }

    pub fn masks_dir(&self) -> PathBuf {
        self.root.join(MASKS_DIR)
    }

    pub fn mappings_dir(&self, atlas: &str) -> PathBuf {
        self.root.join(MAPPINGS_DIR).join(atlas)
    }

    pub fn mapping(&self, atlas: &str, roi: &str) -> PathBuf {
        self.mappings_dir(atlas).join(format!("{}_mapping.json", roi))
    }

    pub fn old_connectomes_dir(&self) -> PathBuf {
        self.root.join(OLD_CONNECTOMES_DIR)
    }

    pub fn connectomes_dir(&self) -> PathBuf {
        self.root.join(CONNECTOMES_DIR)
    }

    /// The cleaned connectome of a ROI: `Connectomes/<roi>_<Atlas>_weights.tsv`.
    pub fn connectome(&self, roi: &str, atlas: &str) -> PathBuf {
        self.connectomes_dir().join(format!("{}_{}{}", roi, atlas, WEIGHTS_SUFFIX))
    }
}


/// The ROI of a raw connectome file named `<Atlas>_<roi>_weights.tsv`, if the name matches.
pub fn roi_of_old_connectome(file_name: &str, atlas: &str) -> Option<String> {
    file_name
        .strip_prefix(atlas)?
        .strip_prefix('_')?
        .strip_suffix(WEIGHTS_SUFFIX)
        .filter(|roi| !roi.is_empty())
        .map(|roi| roi.to_string())
}

/// The ROI of a cleaned connectome file named `<roi>_<Atlas>_weights.tsv`, if the name matches.
pub fn roi_of_connectome(file_name: &str, atlas: &str) -> Option<String> {
    file_name
        .strip_suffix(WEIGHTS_SUFFIX)?
        .strip_suffix(atlas)?
        .strip_suffix('_')
        .filter(|roi| !roi.is_empty())
        .map(|roi| roi.to_string())
}

/// The heatmap image for a cleaned connectome: `<out_dir>/<roi>_<Atlas>_connectivity.png`.
pub fn heatmap_file(out_dir: &Path, roi: &str, atlas: &str) -> PathBuf {
    out_dir.join(format!("{}_{}_connectivity.png", roi, atlas))
}
