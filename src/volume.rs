//! Functions for reading and writing 3D brain volumes in NIfTI-1 files (`.nii` or `.nii.gz`).
//!
//! Parcellation volumes are read as [`LabelVolume`]s holding integer region labels, Area Fraction CC
//! masks as [`MaskVolume`]s. Both keep the NIfTI header they were read from, so that derived volumes
//! can be written back with identical geometry.

use ndarray::{Array3, ArrayD, Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use std::fmt;
use std::path::Path;

use crate::error::{NeuroconnError, Result};


/// Models a parcellation volume: each voxel holds 0 (background) or a positive region label.
#[derive(Debug, Clone)]
pub struct LabelVolume {
    pub header: NiftiHeader,
    pub data: Array3<i32>,
}

/// Models a mask volume: nonzero voxels belong to the masked region.
#[derive(Debug, Clone)]
pub struct MaskVolume {
    pub header: NiftiHeader,
    pub data: Array3<f32>,
}

impl LabelVolume {

    /// Read a label volume from a NIfTI file. Voxel values are rounded to the nearest integer label.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<LabelVolume> {
        let (header, data) = read_volume_f32(path.as_ref())?;
        Ok(LabelVolume {
            header,
            data: data.mapv(|v| v.round() as i32),
        })
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

impl MaskVolume {

    /// Read a mask volume from a NIfTI file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MaskVolume> {
        let (header, data) = read_volume_f32(path.as_ref())?;
        Ok(MaskVolume { header, data })
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// The number of voxels that are part of the mask.
    pub fn num_voxels(&self) -> usize {
        self.data.iter().filter(|v| **v != 0.0).count()
    }
}

impl fmt::Display for LabelVolume {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Label volume of shape {:?}.", self.data.shape())
    }
}

impl fmt::Display for MaskVolume {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mask volume of shape {:?} covering {} voxels.", self.data.shape(), self.num_voxels())
    }
}


/// Read a NIfTI volume as `f32` voxel data, squeezed to three dimensions.
fn read_volume_f32(path: &Path) -> Result<(NiftiHeader, Array3<f32>)> {
    if !path.is_file() {
        return Err(NeuroconnError::MissingInput(path.to_path_buf()));
    }
    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    let data: ArrayD<f32> = obj.into_volume().into_ndarray::<f32>()?;
    Ok((header, to_3d(data)?))
}

/// Accept 3D data, or higher-dimensional data whose trailing dimensions are all of length 1.
pub fn to_3d(data: ArrayD<f32>) -> Result<Array3<f32>> {
    let shape = data.shape().to_vec();
    if shape.len() < 3 || shape[3..].iter().any(|d| *d != 1) {
        return Err(NeuroconnError::InvalidVolume(format!("expected a 3D volume, found shape {:?}", shape)));
    }
    let mut data = data;
    while data.ndim() > 3 {
        let last = Axis(data.ndim() - 1);
        data = data.index_axis_move(last, 0);
    }
    Ok(data.into_dimensionality::<Ix3>()?)
}


/// Write a 3D volume to a NIfTI file, re-using the geometry of `reference` if given.
/// If the path ends with ".gz", the output is GZip compressed.
pub fn write_volume<P: AsRef<Path>>(path: P, data: &Array3<f32>, reference: Option<&NiftiHeader>) -> Result<()> {
    let mut options = WriterOptions::new(path.as_ref());
    if let Some(header) = reference {
        options = options.reference_header(header);
    }
    options.write_nifti(data)?;
    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{Array, IxDyn};

    #[test]
    fn volumes_with_trailing_singleton_dims_are_squeezed() {
        let data = Array::from_elem(IxDyn(&[2, 3, 4, 1]), 1.0f32);
        let squeezed = to_3d(data).unwrap();
        assert_eq!(&[2, 3, 4], squeezed.shape());
    }

    #[test]
    fn volumes_of_other_rank_are_rejected() {
        let data = Array::from_elem(IxDyn(&[2, 3, 4, 2]), 1.0f32);
        assert!(matches!(to_3d(data), Err(NeuroconnError::InvalidVolume(_))));

        let data = Array::from_elem(IxDyn(&[2, 3]), 1.0f32);
        assert!(matches!(to_3d(data), Err(NeuroconnError::InvalidVolume(_))));
    }

    #[test]
    fn label_volumes_survive_a_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Atlas_parcellation.nii.gz");

        let mut data = Array3::<f32>::zeros((4, 3, 2));
        data[[0, 0, 0]] = 2.0;
        data[[3, 2, 1]] = 281.0;
        write_volume(&path, &data, None).unwrap();

        let vol = LabelVolume::from_file(&path).unwrap();
        assert_eq!(&[4, 3, 2], vol.shape());
        assert_eq!(2, vol.data[[0, 0, 0]]);
        assert_eq!(281, vol.data[[3, 2, 1]]);
        assert_eq!(0, vol.data[[1, 1, 1]]);
    }

    #[test]
    fn missing_volumes_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.nii.gz");
        assert!(matches!(MaskVolume::from_file(&path), Err(NeuroconnError::MissingInput(_))));
    }
}
