//! Functions for mapping an Area Fraction CC mask onto the regions of a brain atlas.
//!
//! A mapping is defined as the overlay of a mask with a parcellation volume: every atlas label
//! found under a nonzero mask voxel is part of the mapping, and is resolved to its region name
//! through the atlas lookup table.

use ndarray::{Array3, Zip};
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{NeuroconnError, Result};
use crate::lut::Lut;


/// Models the atlas regions overlapped by one mask: label -> region name, in ascending label order.
///
/// Serialized as a JSON object with the decimal label strings as keys, e.g. `{"2":"GM_Area_2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoiMapping {
    pub regions: BTreeMap<i32, String>,
}

impl RoiMapping {

    /// Read a mapping from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<RoiMapping> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The mapped labels, ascending.
    pub fn labels(&self) -> Vec<i32> {
        self.regions.keys().copied().collect()
    }

    pub fn get(&self, label: i32) -> Option<&str> {
        self.regions.get(&label).map(|n| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&i32, &String)> {
        self.regions.iter()
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the mapping to a JSON file.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut file, self)?;
        file.flush()?;
        Ok(())
    }
}

impl fmt::Display for RoiMapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ROI mapping onto {} atlas regions.", self.regions.len())
    }
}


/// Compute the set of positive atlas labels under the nonzero voxels of `mask`.
///
/// The mask is binarized, so mask values never scale the labels.
///
/// # Errors
///
/// [`NeuroconnError::DimensionMismatch`] if the volumes do not share the same shape.
pub fn overlap_labels(labels: &Array3<i32>, mask: &Array3<f32>) -> Result<BTreeSet<i32>> {
    if labels.shape() != mask.shape() {
        return Err(NeuroconnError::DimensionMismatch(labels.shape().to_vec(), mask.shape().to_vec()));
    }

    let mut found: BTreeSet<i32> = BTreeSet::new();
    Zip::from(labels).and(mask).for_each(|&label, &m| {
        if m != 0.0 && label > 0 {
            found.insert(label);
        }
    });
    Ok(found)
}


/// Map a mask onto the atlas regions it overlaps, resolving each label to its name through the LUT.
///
/// # Errors
///
/// * [`NeuroconnError::DimensionMismatch`] if the volumes do not share the same shape.
/// * [`NeuroconnError::UnmappedLabel`] if an overlapping label has no row in the LUT. Labels are never dropped silently.
///
/// # Examples
///
/// ```no_run
/// let atlas = neuroconn::LabelVolume::from_file("/data/Templates/Juelich_parcellation.nii.gz").unwrap();
/// let mask = neuroconn::MaskVolume::from_file("/data/AreaFractionCCMasks/V1.nii.gz").unwrap();
/// let lut = neuroconn::read_lut("/data/Templates/Juelich_LUT.txt").unwrap();
/// let mapping = neuroconn::map_rois(&atlas.data, &mask.data, &lut).unwrap();
/// println!("{}", mapping);
/// ```
pub fn map_rois(labels: &Array3<i32>, mask: &Array3<f32>, lut: &Lut) -> Result<RoiMapping> {
    let mut regions: BTreeMap<i32, String> = BTreeMap::new();
    for label in overlap_labels(labels, mask)? {
        let name = lut.name_of(label).ok_or(NeuroconnError::UnmappedLabel(label))?;
        regions.insert(label, name.to_string());
    }
    Ok(RoiMapping { regions })
}
