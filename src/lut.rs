//! Functions for reading atlas lookup tables (LUTs) from text files.
//!
//! A LUT assigns a human-readable region name to every integer label of a parcellation volume.
//! The files are whitespace-delimited with the label in the first column and the name in the
//! second. Further columns, like the RGBA values of FreeSurfer-style color LUTs, are ignored.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use crate::error::{NeuroconnError, Result};
use crate::util::open_text;


/// Models an atlas lookup table. The `label` and `name` fields are parallel, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lut {
    pub label: Vec<i32>,
    pub name: Vec<String>,
}

impl Lut {

    /// Read a LUT from a text file.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Lut> {
        Lut::from_reader(open_text(path)?)
    }

    /// Read a LUT from a buffered reader. Blank lines and lines starting with '#' are skipped.
    pub fn from_reader<S>(input: S) -> Result<Lut>
    where
        S: BufRead,
    {
        let mut lut = Lut::default();

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.split_whitespace();
            let label_field = fields.next().unwrap_or("");
            let name_field = fields.next().ok_or_else(|| {
                NeuroconnError::InvalidLut(line_no, String::from("expected at least two columns"))
            })?;
            let label: i32 = label_field.parse().map_err(|_| {
                NeuroconnError::InvalidLut(line_no, format!("label '{}' is not an integer", label_field))
            })?;

            lut.label.push(label);
            lut.name.push(name_field.to_string());
        }
        Ok(lut)
    }

    /// Get the name for the given label. If the label occurs several times, the first row wins.
    pub fn name_of(&self, label: i32) -> Option<&str> {
        self.label
            .iter()
            .position(|l| *l == label)
            .map(|idx| self.name[idx].as_str())
    }

    pub fn len(&self) -> usize {
        self.label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    /// The names of all regions with a positive label, in file order. Background entries
    /// (label 0, sometimes called 'Unknown') are skipped.
    pub fn region_names(&self) -> Vec<String> {
        self.label
            .iter()
            .zip(self.name.iter())
            .filter(|(l, _)| **l > 0)
            .map(|(_, n)| n.clone())
            .collect()
    }
}

impl fmt::Display for Lut {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Lookup table for {} brain regions.", self.label.len())
    }
}


/// Read an atlas lookup table from a text file.
///
/// # Examples
///
/// ```no_run
/// let lut = neuroconn::read_lut("/data/Templates/Juelich_LUT.txt").unwrap();
/// println!("{}", lut);
/// ```
pub fn read_lut<P: AsRef<Path>>(path: P) -> Result<Lut> {
    Lut::from_file(path)
}
