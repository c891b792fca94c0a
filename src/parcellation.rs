//! Repair of parcellation volumes that contain spurious labels.
//!
//! Overlapping single-ROI masks can leave labels above the atlas' real region count in a
//! parcellation volume. These functions zero such labels, and extract the affected voxels as a
//! binary mask for inspection.

use ndarray::Array3;

use std::collections::BTreeSet;


/// Set every label above `max_label` to background (0). All other voxels are kept unchanged.
pub fn truncate_labels(labels: &Array3<i32>, max_label: i32) -> Array3<i32> {
    labels.mapv(|l| if l > max_label { 0 } else { l })
}

/// A binary mask which is 1 wherever the label exceeds `threshold`, and 0 elsewhere.
pub fn labels_above(labels: &Array3<i32>, threshold: i32) -> Array3<u8> {
    labels.mapv(|l| u8::from(l > threshold))
}

/// The distinct positive labels of a volume, ascending.
pub fn distinct_labels(labels: &Array3<i32>) -> BTreeSet<i32> {
    labels.iter().copied().filter(|l| *l > 0).collect()
}
