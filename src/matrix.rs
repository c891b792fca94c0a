//! Functions for reading and writing connectivity matrices in delimited text files.
//!
//! Bare matrices are whitespace-delimited numbers, one matrix row per line. Labeled matrices are
//! tab-delimited and self-describing: the first line holds the column labels (after an ignored
//! corner cell), and every following line starts with its row label.

use ndarray::Array2;

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::error::{NeuroconnError, Result};
use crate::util::open_text;


/// A connectivity matrix together with its row and column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub data: Array2<f64>,
}

impl LabeledMatrix {

    /// Read a labeled matrix from a tab-delimited file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<LabeledMatrix> {
        LabeledMatrix::from_reader(open_text(path)?)
    }

    pub fn from_reader<S>(input: S) -> Result<LabeledMatrix>
    where
        S: BufRead,
    {
        let mut lines = input.lines().filter(|l| match l {
            Ok(l) => !is_skipped_line(l),
            Err(_) => true,
        });

        let col_labels: Vec<String> = match lines.next() {
            Some(header) => header?
                .trim_end_matches(['\r', '\n'])
                .split('\t')
                .skip(1)
                .map(|s| s.trim().to_string())
                .collect(),
            None => Vec::new(),
        };

        let mut row_labels: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (row, line) in lines.enumerate() {
            let line = line?;
            let mut cells = line.trim_end_matches(['\r', '\n']).split('\t');
            row_labels.push(cells.next().unwrap_or("").trim().to_string());
            rows.push(parse_row(cells, row)?);
        }

        let data = assemble(rows, Some(col_labels.len()))?;
        Ok(LabeledMatrix { row_labels, col_labels, data })
    }
}


/// Lines that carry no matrix data.
fn is_skipped_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse the numeric cells of one matrix row. The `row` index is only used for error reporting.
fn parse_row<'a, I>(cells: I, row: usize) -> Result<Vec<f64>>
where
    I: Iterator<Item = &'a str>,
{
    cells
        .enumerate()
        .map(|(column, token)| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| NeuroconnError::MalformedMatrix(row, column, token.to_string()))
        })
        .collect()
}

/// Stack parsed rows into a matrix, checking that every row has the same width.
fn assemble(rows: Vec<Vec<f64>>, expected_width: Option<usize>) -> Result<Array2<f64>> {
    let width = match expected_width {
        Some(w) => w,
        None => rows.first().map(|r| r.len()).unwrap_or(0),
    };
    let mut flat: Vec<f64> = Vec::with_capacity(rows.len() * width);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(NeuroconnError::RaggedMatrix(row, width, values.len()));
        }
        flat.extend_from_slice(values);
    }
    Ok(Array2::from_shape_vec((rows.len(), width), flat)?)
}


/// Read a bare connectivity matrix from a whitespace-delimited text file.
/// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
///
/// # Examples
///
/// ```no_run
/// let cc = neuroconn::read_matrix("/data/Connectomes_old/Juelich_V1_weights.tsv").unwrap();
/// println!("Read a {}x{} connectome.", cc.nrows(), cc.ncols());
/// ```
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    matrix_from_reader(open_text(path)?)
}

/// Read a self-describing connectivity matrix, see [`LabeledMatrix`].
pub fn read_labeled_matrix<P: AsRef<Path>>(path: P) -> Result<LabeledMatrix> {
    LabeledMatrix::from_file(path)
}

/// Read a bare connectivity matrix from a buffered reader. Blank lines and lines starting with '#' are skipped.
pub fn matrix_from_reader<S>(input: S) -> Result<Array2<f64>>
where
    S: BufRead,
{
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in input.lines() {
        let line = line?;
        if is_skipped_line(&line) {
            continue;
        }
        let row = rows.len();
        rows.push(parse_row(line.split_whitespace(), row)?);
    }
    assemble(rows, None)
}


/// Format a number like numpy's `savetxt` does with its default `%.18e` format, e.g. `1.000000000000000000e+00`.
pub fn format_sci(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }
    let repr = format!("{:.18e}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => repr,
    }
}

/// Render a matrix as tab-delimited text, one row per line.
pub fn matrix_to_string(matrix: &Array2<f64>) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        let cells: Vec<String> = row.iter().map(|v| format_sci(*v)).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

/// Write a connectivity matrix to a tab-delimited text file.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &Array2<f64>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(matrix_to_string(matrix).as_bytes())?;
    file.flush()?;
    Ok(())
}
