//! Post-processing of connectome matrices and ROI label mappings.
//!
//! The crate maps Area Fraction CC masks onto the regions of a brain atlas, removes known-invalid
//! ROIs from connectivity matrices, repairs parcellation volumes with spurious labels, and renders
//! connectivity matrices as heatmaps. The [`batch`] module runs these steps over a [`DataLayout`]
//! directory tree; the binaries in `src/bin` expose them on the command line.

pub mod batch;
pub mod cleaner;
pub mod cli;
pub mod error;
pub mod layout;
pub mod lut;
pub mod matrix;
pub mod parcellation;
pub mod render;
pub mod roi_mapping;
pub mod util;
pub mod volume;

pub use batch::{clean_connectomes, compute_mappings, render_connectomes, repair_parcellation, BatchReport};
pub use cleaner::{clean_connectome, AtlasCorrection};
pub use error::{NeuroconnError, Result};
pub use layout::DataLayout;
pub use lut::{read_lut, Lut};
pub use matrix::{read_labeled_matrix, read_matrix, write_matrix, LabeledMatrix};
pub use parcellation::{distinct_labels, labels_above, truncate_labels};
pub use render::{pink_colormap, render_heatmap, AxisLabels, HeatmapLayout};
pub use roi_mapping::{map_rois, overlap_labels, RoiMapping};
pub use volume::{write_volume, LabelVolume, MaskVolume};
