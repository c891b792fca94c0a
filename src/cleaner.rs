//! Removal of known-invalid ROI rows and columns from connectivity matrices.
//!
//! Some parcellation volumes used during connectome creation contain erroneous ROIs, e.g. the
//! Juelich volume starts labeling at 2 (leaving an always-empty first ROI) and contains spurious
//! ROIs 281+ created by midline overlaps of single-ROI masks. An [`AtlasCorrection`] describes
//! such a defect for one atlas version.

use ndarray::{Array2, Axis};

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{NeuroconnError, Result};


/// Models the rows/columns to remove from the connectomes of one atlas version.
/// All ranges are inclusive and given in the original, uncorrected index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasCorrection {
    pub atlas: String,
    pub expected_size: usize,
    pub removed: Vec<RangeInclusive<usize>>,
}

impl AtlasCorrection {

    pub fn new<S: Into<String>>(atlas: S, expected_size: usize, removed: Vec<RangeInclusive<usize>>) -> AtlasCorrection {
        AtlasCorrection {
            atlas: atlas.into(),
            expected_size,
            removed,
        }
    }

    /// The Juelich connectomes: 414 ROIs, of which the empty ROI 0 and the midline-overlap ROIs 281-413 are invalid.
    pub fn juelich() -> AtlasCorrection {
        AtlasCorrection::new("Juelich", 414, vec![0..=0, 281..=413])
    }

    /// Get the known correction for an atlas by name, if any.
    pub fn preset(atlas: &str) -> Option<AtlasCorrection> {
        match atlas {
            "Juelich" => Some(AtlasCorrection::juelich()),
            _ => None,
        }
    }

    /// Combine the preset of `atlas` with explicit overrides.
    ///
    /// Without overrides the preset is used. Each given override replaces the corresponding part of
    /// the preset. Atlases without a preset need both `expected_size` and `removed`.
    ///
    /// # Errors
    ///
    /// [`NeuroconnError::InvalidCorrection`] if a part is neither given nor known from a preset, or if
    /// `removed` cannot be parsed by [`AtlasCorrection::parse_ranges`].
    pub fn resolve(atlas: &str, expected_size: Option<usize>, removed: Option<&str>) -> Result<AtlasCorrection> {
        let preset = AtlasCorrection::preset(atlas);
        let expected_size = match (expected_size, &preset) {
            (Some(size), _) => size,
            (None, Some(p)) => p.expected_size,
            (None, None) => {
                return Err(NeuroconnError::InvalidCorrection(format!(
                    "no preset for atlas '{}', the expected matrix size is required",
                    atlas
                )))
            }
        };
        let removed = match (removed, &preset) {
            (Some(list), _) => AtlasCorrection::parse_ranges(list)?,
            (None, Some(p)) => p.removed.clone(),
            (None, None) => {
                return Err(NeuroconnError::InvalidCorrection(format!(
                    "no preset for atlas '{}', the indices to remove are required",
                    atlas
                )))
            }
        };
        Ok(AtlasCorrection::new(atlas, expected_size, removed))
    }

    /// Parse a comma-separated list of indices and inclusive index ranges, e.g. `"0,281-413"`.
    pub fn parse_ranges(list: &str) -> Result<Vec<RangeInclusive<usize>>> {
        let parse_index = |s: &str| -> Result<usize> {
            s.trim()
                .parse::<usize>()
                .map_err(|_| NeuroconnError::InvalidCorrection(format!("'{}' is not an index", s.trim())))
        };

        let mut ranges = Vec::new();
        for part in list.split(',').map(|p| p.trim()).filter(|p| !p.is_empty()) {
            let range = match part.split_once('-') {
                Some((start, end)) => parse_index(start)?..=parse_index(end)?,
                None => {
                    let idx = parse_index(part)?;
                    idx..=idx
                }
            };
            if range.is_empty() {
                return Err(NeuroconnError::InvalidCorrection(format!("range '{}' is empty", part)));
            }
            ranges.push(range);
        }
        Ok(ranges)
    }

    /// The indices that survive the correction, ascending, in the original index space.
    ///
    /// All removals are resolved against the original indexing before anything is removed, so the
    /// order of `removed` and overlaps between its ranges do not matter.
    pub fn kept_indices(&self) -> Result<Vec<usize>> {
        let mut keep = vec![true; self.expected_size];
        for range in &self.removed {
            if *range.end() >= self.expected_size {
                return Err(NeuroconnError::InvalidCorrection(format!(
                    "range {}-{} exceeds matrix size {}",
                    range.start(),
                    range.end(),
                    self.expected_size
                )));
            }
            for idx in range.clone() {
                keep[idx] = false;
            }
        }
        Ok(keep
            .iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(idx, _)| idx)
            .collect())
    }

    /// The size of the corrected matrices.
    pub fn corrected_size(&self) -> Result<usize> {
        Ok(self.kept_indices()?.len())
    }
}

impl fmt::Display for AtlasCorrection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ranges: Vec<String> = self
            .removed
            .iter()
            .map(|r| if r.start() == r.end() { r.start().to_string() } else { format!("{}-{}", r.start(), r.end()) })
            .collect();
        write!(f, "{} correction removing [{}] from {}x{} connectomes.", self.atlas, ranges.join(","), self.expected_size, self.expected_size)
    }
}


/// Remove the invalid rows and columns described by `correction` from a square connectivity matrix.
///
/// The input is left untouched, the corrected matrix is returned.
///
/// # Errors
///
/// * [`NeuroconnError::NonSquareMatrix`] if the matrix is not square.
/// * [`NeuroconnError::UnexpectedMatrixSize`] if the matrix size does not match the correction.
/// * [`NeuroconnError::InvalidCorrection`] if a removal range exceeds the matrix.
///
/// # Examples
///
/// ```no_run
/// let cc = neuroconn::read_matrix("/data/Connectomes_old/Juelich_V1_weights.tsv").unwrap();
/// let cleaned = neuroconn::clean_connectome(&cc, &neuroconn::AtlasCorrection::juelich()).unwrap();
/// assert_eq!((280, 280), cleaned.dim());
/// ```
pub fn clean_connectome(matrix: &Array2<f64>, correction: &AtlasCorrection) -> Result<Array2<f64>> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(NeuroconnError::NonSquareMatrix(rows, cols));
    }
    if rows != correction.expected_size {
        return Err(NeuroconnError::UnexpectedMatrixSize(correction.expected_size, rows));
    }
    let keep = correction.kept_indices()?;
    Ok(matrix.select(Axis(0), &keep).select(Axis(1), &keep))
}
