//! Batch drivers that run one processing step over all matching files of a [`DataLayout`].
//!
//! Files are processed sequentially in file name order. A failure aborts the current file only:
//! it is logged, recorded in the [`BatchReport`], and the batch continues with the next file.
//! Setup failures that affect every file (e.g. a missing atlas) abort the whole batch.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cleaner::{clean_connectome, AtlasCorrection};
use crate::error::{NeuroconnError, Result};
use crate::layout::{heatmap_file, roi_of_connectome, roi_of_old_connectome, DataLayout};
use crate::lut::Lut;
use crate::matrix::{read_labeled_matrix, read_matrix, write_matrix};
use crate::parcellation::{distinct_labels, labels_above, truncate_labels};
use crate::render::{render_heatmap, AxisLabels};
use crate::roi_mapping::map_rois;
use crate::util::{is_nifti_file, name_before_first_dot, sorted_files};
use crate::volume::{write_volume, LabelVolume, MaskVolume};


/// The outcome of a batch: the files written, and the inputs that failed with their error.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, NeuroconnError)>,
}

impl BatchReport {

    /// Record the result of processing `input`.
    pub fn record(&mut self, input: &Path, result: Result<PathBuf>) {
        match result {
            Ok(output) => {
                log::debug!("Wrote '{}'.", output.display());
                self.written.push(output);
            }
            Err(err) => {
                log::error!("Failed to process '{}': {}", input.display(), err);
                self.failed.push((input.to_path_buf(), err));
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} file(s) written, {} failed.", self.written.len(), self.failed.len())
    }
}


/// Compute the ROI mapping of every Area Fraction CC mask onto `atlas`, one JSON file per mask.
///
/// A mask whose shape differs from the atlas, or which overlaps a label missing from the LUT,
/// fails and produces no mapping file.
pub fn compute_mappings(layout: &DataLayout, atlas: &str) -> Result<BatchReport> {
    let parcellation = LabelVolume::from_file(layout.parcellation(atlas)?)?;
    let lut = Lut::from_file(layout.lut(atlas))?;
    let masks = sorted_files(&layout.masks_dir(), |n| is_nifti_file(n))?;
    let out_dir = layout.mappings_dir(atlas);
    fs::create_dir_all(&out_dir)?;

    log::info!("START: computing ROI mappings of {} masks for {} ({}, {})", masks.len(), atlas, parcellation, lut);
    let mut report = BatchReport::default();
    for (idx, mask_file) in masks.iter().enumerate() {
        let roi = name_before_first_dot(mask_file);
        log::info!("UPDATE: [{}/{}] mapping {}", idx + 1, masks.len(), roi);
        let result = MaskVolume::from_file(mask_file)
            .and_then(|mask| map_rois(&parcellation.data, &mask.data, &lut))
            .and_then(|mapping| {
                let out = layout.mapping(atlas, &roi);
                mapping.write_json(&out)?;
                Ok(out)
            });
        report.record(mask_file, result);
    }
    log::info!("FINISHED: computing ROI mappings for {}: {}", atlas, report);
    Ok(report)
}


/// Clean every raw connectome `Connectomes_old/<Atlas>_<roi>_weights.tsv` of the correction's atlas,
/// writing `Connectomes/<roi>_<Atlas>_weights.tsv`. The raw files are left untouched.
pub fn clean_connectomes(layout: &DataLayout, correction: &AtlasCorrection) -> Result<BatchReport> {
    let atlas = correction.atlas.as_str();
    let inputs = sorted_files(&layout.old_connectomes_dir(), |n| roi_of_old_connectome(n, atlas).is_some())?;
    fs::create_dir_all(layout.connectomes_dir())?;

    log::info!("START: cleaning {} connectomes, {}", inputs.len(), correction);
    let mut report = BatchReport::default();
    for (idx, input) in inputs.iter().enumerate() {
        let file_name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let roi = roi_of_old_connectome(&file_name, atlas).unwrap_or_default();
        log::info!("UPDATE: [{}/{}] cleaning {}", idx + 1, inputs.len(), roi);
        let result = read_matrix(input)
            .and_then(|cc| clean_connectome(&cc, correction))
            .and_then(|cleaned| {
                let out = layout.connectome(&roi, atlas);
                write_matrix(&out, &cleaned)?;
                Ok(out)
            });
        report.record(input, result);
    }
    log::info!("FINISHED: cleaning connectomes for {}: {}", atlas, report);
    Ok(report)
}


/// Render every cleaned connectome `Connectomes/<roi>_<Atlas>_weights.tsv` as a heatmap in `out_dir`.
///
/// Bare matrices are labeled with the atlas LUT's region names. With `labeled`, the matrices are
/// self-describing and carry their own labels, and no LUT is needed.
pub fn render_connectomes(layout: &DataLayout, atlas: &str, out_dir: &Path, labeled: bool) -> Result<BatchReport> {
    let lut_labels = if labeled {
        None
    } else {
        Some(AxisLabels::from_lut(&Lut::from_file(layout.lut(atlas))?))
    };
    let inputs = sorted_files(&layout.connectomes_dir(), |n| roi_of_connectome(n, atlas).is_some())?;
    fs::create_dir_all(out_dir)?;

    log::info!("START: rendering {} connectomes for {}", inputs.len(), atlas);
    let mut report = BatchReport::default();
    for (idx, input) in inputs.iter().enumerate() {
        let file_name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let roi = roi_of_connectome(&file_name, atlas).unwrap_or_default();
        let title = file_name.trim_end_matches(".tsv").to_string();
        let out = heatmap_file(out_dir, &roi, atlas);
        log::info!("UPDATE: [{}/{}] rendering {}", idx + 1, inputs.len(), title);

        let result = match &lut_labels {
            Some(labels) => read_matrix(input)
                .and_then(|cc| render_heatmap(&cc, labels, labels, &title, &out)),
            None => read_labeled_matrix(input).and_then(|m| {
                let (rows, cols) = AxisLabels::from_labeled(&m);
                render_heatmap(&m.data, &rows, &cols, &title, &out)
            }),
        };
        if result.is_err() && out.exists() {
            // A failed file leaves no image behind, not even a partially flushed one.
            if let Err(err) = fs::remove_file(&out) {
                log::warn!("Could not remove partial heatmap '{}': {}", out.display(), err);
            }
        }
        report.record(input, result.map(|_| out));
    }
    log::info!("FINISHED: rendering connectomes for {}: {}", atlas, report);
    Ok(report)
}


/// Zero all labels above `max_label` in the parcellation of `atlas`. Writes the repaired volume and
/// a binary mask of the removed voxels next to the original, which is left untouched.
///
/// Returns the paths of the two written volumes.
pub fn repair_parcellation(layout: &DataLayout, atlas: &str, max_label: i32) -> Result<(PathBuf, PathBuf)> {
    let parcellation = LabelVolume::from_file(layout.parcellation(atlas)?)?;
    let before = distinct_labels(&parcellation.data);

    log::info!("START: repairing {} parcellation, removing labels above {}", atlas, max_label);
    let repaired = truncate_labels(&parcellation.data, max_label);
    let removed = labels_above(&parcellation.data, max_label);
    let after = distinct_labels(&repaired);

    let repaired_path = layout.repaired_parcellation(atlas);
    let removed_path = layout.removed_labels_mask(atlas);
    write_volume(&repaired_path, &repaired.mapv(|l| l as f32), Some(&parcellation.header))?;
    write_volume(&removed_path, &removed.mapv(f32::from), Some(&parcellation.header))?;

    log::info!(
        "FINISHED: {} parcellation went from {} to {} labels, wrote '{}' and '{}'",
        atlas,
        before.len(),
        after.len(),
        repaired_path.display(),
        removed_path.display()
    );
    Ok((repaired_path, removed_path))
}
