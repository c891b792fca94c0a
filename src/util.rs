//! Utility functions used in all other neuroconn modules.

use flate2::read::GzDecoder;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{NeuroconnError, Result};

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Check whether the file name looks like a NIfTI volume, i.e., ends with ".nii" or ".nii.gz".
pub fn is_nifti_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| {
            let name = a.to_string_lossy();
            name.ends_with(".nii") || name.ends_with(".nii.gz")
        })
        .unwrap_or(false)
}

/// Open a text file for buffered line reading.
/// If the file's name ends with ".gz", the file is assumed to need GZip decoding. This is not typically the case
/// for LUTs or connectome matrices, but very handy (and it helps us to reduce the size of our test data).
pub fn open_text<P>(path: P) -> Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.is_file() {
        return Err(NeuroconnError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path)?;
    if is_gz_file(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// The part of the file name before the first '.', e.g. `"V1"` for `"V1.nii.gz"`.
pub fn name_before_first_dot<P>(path: P) -> String
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| {
            let name = a.to_string_lossy();
            name.split('.').next().unwrap_or("").to_string()
        })
        .unwrap_or_default()
}

/// List the regular files in `dir` whose name satisfies `accept`, sorted by file name.
pub fn sorted_files<F>(dir: &Path, accept: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    if !dir.is_dir() {
        return Err(NeuroconnError::MissingInput(dir.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let keep = path
            .file_name()
            .map(|n| accept(&n.to_string_lossy()))
            .unwrap_or(false);
        if keep {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
