use quick_error::quick_error;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NeuroconnError {
        /// Label volume and mask volume do not share the same grid.
        DimensionMismatch(expected: Vec<usize>, found: Vec<usize>) {
            display("Dimension mismatch: expected volume of shape {:?}, found {:?}", expected, found)
        }

        /// A label found under a mask has no row in the lookup table.
        UnmappedLabel(label: i32) {
            display("Label {} has no entry in the lookup table", label)
        }

        MissingInput(path: PathBuf) {
            display("Missing input: {}", path.display())
        }

        /// A matrix cell could not be parsed as a number. Row and column are 0-based.
        MalformedMatrix(row: usize, column: usize, token: String) {
            display("Malformed matrix value '{}' at row {}, column {}", token, row, column)
        }

        RaggedMatrix(row: usize, expected: usize, found: usize) {
            display("Matrix row {} has {} columns, expected {}", row, found, expected)
        }

        NonSquareMatrix(rows: usize, cols: usize) {
            display("Expected a square matrix, found {}x{}", rows, cols)
        }

        UnexpectedMatrixSize(expected: usize, found: usize) {
            display("Expected a {0}x{0} matrix, found {1}x{1}", expected, found)
        }

        InvalidLut(line: usize, reason: String) {
            display("Invalid lookup table at line {}: {}", line, reason)
        }

        InvalidVolume(reason: String) {
            display("Invalid volume: {}", reason)
        }

        InvalidCorrection(reason: String) {
            display("Invalid atlas correction: {}", reason)
        }

        LabelCountMismatch(labels: usize, size: usize) {
            display("Got {} axis labels for a matrix of size {}", labels, size)
        }

        Render(reason: String) {
            display("Rendering failed: {}", reason)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }

        Nifti(err: nifti::NiftiError) {
            from()
            source(err)
            display("NIfTI error: {}", err)
        }

        Shape(err: ndarray::ShapeError) {
            from()
            source(err)
            display("Shape error: {}", err)
        }

        Json(err: serde_json::Error) {
            from()
            source(err)
            display("JSON error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NeuroconnError>;
