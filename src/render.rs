//! Rendering of connectivity matrices as labeled heatmap images.
//!
//! The values of a matrix are only mapped to colors, never transformed. Row 0 is drawn at the top,
//! like in an image, and every row and column gets a tick labeled with its ROI name.

use ndarray::Array2;
use ndarray_stats::QuantileExt;
use plotters::prelude::*;

use std::fmt;
use std::path::Path;

use crate::error::{NeuroconnError, Result};
use crate::lut::Lut;
use crate::matrix::LabeledMatrix;


/// The tick labels of one heatmap axis, one per matrix row or column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    pub names: Vec<String>,
}

impl AxisLabels {

    pub fn new(names: Vec<String>) -> AxisLabels {
        AxisLabels { names }
    }

    /// Use the region names of a LUT, in file order. Background entries (label <= 0) are skipped.
    pub fn from_lut(lut: &Lut) -> AxisLabels {
        AxisLabels::new(lut.region_names())
    }

    /// Plain 0-based indices, for matrices without any naming information.
    pub fn indices(n: usize) -> AxisLabels {
        AxisLabels::new((0..n).map(|i| i.to_string()).collect())
    }

    /// The (row, column) labels of a self-describing matrix.
    pub fn from_labeled(matrix: &LabeledMatrix) -> (AxisLabels, AxisLabels) {
        (AxisLabels::new(matrix.row_labels.clone()), AxisLabels::new(matrix.col_labels.clone()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}


/// The structure of a rendered heatmap: title, tick labels, color scale range and image size.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayout {
    pub title: String,
    pub x_ticks: Vec<String>,
    pub y_ticks: Vec<String>,
    /// Lower and upper end of the color scale.
    pub value_range: (f64, f64),
    /// Image width and height in pixels.
    pub size: (u32, u32),
}

impl HeatmapLayout {

    /// Check the labels against the matrix and compute the layout.
    ///
    /// # Errors
    ///
    /// [`NeuroconnError::LabelCountMismatch`] if the number of row (column) labels differs from the number of rows (columns).
    pub fn new(matrix: &Array2<f64>, rows: &AxisLabels, cols: &AxisLabels, title: &str) -> Result<HeatmapLayout> {
        let (nrows, ncols) = matrix.dim();
        if rows.len() != nrows {
            return Err(NeuroconnError::LabelCountMismatch(rows.len(), nrows));
        }
        if cols.len() != ncols {
            return Err(NeuroconnError::LabelCountMismatch(cols.len(), ncols));
        }

        let side = |n: usize| ((n as u32) * 4 + 400).clamp(600, 2400);
        Ok(HeatmapLayout {
            title: title.to_string(),
            x_ticks: cols.names.clone(),
            y_ticks: rows.names.clone(),
            value_range: value_range(matrix),
            size: (side(ncols) + LEGEND_WIDTH, side(nrows)),
        })
    }

    /// The number of (x, y) axis ticks.
    pub fn num_ticks(&self) -> (usize, usize) {
        (self.x_ticks.len(), self.y_ticks.len())
    }

    /// Position of a value on the color scale, in [0, 1].
    pub fn scale(&self, value: f64) -> f64 {
        let (lo, hi) = self.value_range;
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    }
}

impl fmt::Display for HeatmapLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Heatmap '{}' with {}x{} cells, color scale {} to {}.", self.title, self.y_ticks.len(), self.x_ticks.len(), self.value_range.0, self.value_range.1)
    }
}


const LEGEND_WIDTH: u32 = 140;
const LABEL_AREA: u32 = 120;
const COLORBAR_STEPS: usize = 256;

/// Min and max of the finite values of the matrix. Infinite values are clipped to the ends of the
/// scale when drawn. Constant matrices get a unit-width range around their value.
fn value_range(matrix: &Array2<f64>) -> (f64, f64) {
    let finite = matrix.mapv(|v| if v.is_finite() { v } else { f64::NAN });
    let lo = *finite.min_skipnan();
    let hi = *finite.max_skipnan();
    if lo.is_nan() || hi.is_nan() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else if !(hi - lo).is_finite() {
        // The span must stay finite for the color scale steps.
        (lo / 2.0, hi / 2.0)
    } else {
        (lo, hi)
    }
}


/// The 'pink' colormap known from matplotlib and MATLAB: the square root of a blend of gray and 'hot'.
/// Maps `t` in [0, 1] from black over pink to white.
pub fn pink_colormap(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let hot = [
        (t / 0.365079).min(1.0),
        ((t - 0.365079) / 0.380953).clamp(0.0, 1.0),
        ((t - 0.746032) / 0.253968).clamp(0.0, 1.0),
    ];
    let channel = |h: f64| (((2.0 * t + h) / 3.0).sqrt() * 255.0).round() as u8;
    RGBColor(channel(hot[0]), channel(hot[1]), channel(hot[2]))
}


fn render_err<E: fmt::Display>(err: E) -> NeuroconnError {
    NeuroconnError::Render(err.to_string())
}

/// The name of the row or column starting at `idx`. Positions outside the matrix get no label.
fn tick_label(names: &[String], idx: i32) -> String {
    if idx < 0 || idx as usize >= names.len() {
        return String::new();
    }
    names[idx as usize].clone()
}


/// Render a connectivity matrix as a heatmap PNG with a color scale legend, ROI-name tick labels and a title.
///
/// Returns the layout of the image that was drawn.
///
/// # Examples
///
/// ```no_run
/// let cc = neuroconn::read_matrix("/data/Connectomes/V1_Juelich_weights.tsv").unwrap();
/// let lut = neuroconn::read_lut("/data/Templates/Juelich_LUT.txt").unwrap();
/// let labels = neuroconn::AxisLabels::from_lut(&lut);
/// neuroconn::render_heatmap(&cc, &labels, &labels, "V1_Juelich_weights", "V1_Juelich_connectivity.png").unwrap();
/// ```
pub fn render_heatmap<P: AsRef<Path>>(matrix: &Array2<f64>, rows: &AxisLabels, cols: &AxisLabels, title: &str, path: P) -> Result<HeatmapLayout> {
    let layout = HeatmapLayout::new(matrix, rows, cols, title)?;
    let (nrows, ncols) = matrix.dim();
    let (width, height) = layout.size;

    let root = BitMapBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let (main, legend) = root.split_horizontally(width - LEGEND_WIDTH);

    // Ticks sit on cell boundaries, the offsets move their labels to the cell centers. Row 0 is
    // drawn at the top, so matrix row i covers y in [nrows - 1 - i, nrows - i].
    let cell_width = (width - LEGEND_WIDTH - LABEL_AREA - 20) as i32 / ncols.max(1) as i32;
    let cell_height = (height - LABEL_AREA - 54) as i32 / nrows.max(1) as i32;

    let mut chart = ChartBuilder::on(&main)
        .caption(&layout.title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(LABEL_AREA)
        .y_label_area_size(LABEL_AREA)
        .build_cartesian_2d(0..ncols as i32, 0..nrows as i32)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(ncols + 1)
        .y_labels(nrows + 1)
        .x_label_offset(cell_width / 2)
        .y_label_offset(-cell_height / 2)
        .x_label_style(("sans-serif", 8).into_font().transform(FontTransform::Rotate90))
        .y_label_style(("sans-serif", 8))
        .x_label_formatter(&|v| tick_label(&layout.x_ticks, *v))
        .y_label_formatter(&|v| tick_label(&layout.y_ticks, nrows as i32 - 1 - *v))
        .draw()
        .map_err(render_err)?;

    let cells = matrix.indexed_iter().filter(|(_, v)| !v.is_nan()).map(|((i, j), v)| {
        let (x, y) = (j as i32, (nrows - 1 - i) as i32);
        Rectangle::new([(x, y), (x + 1, y + 1)], pink_colormap(layout.scale(*v)).filled())
    });
    chart.draw_series(cells).map_err(render_err)?;

    let (lo, hi) = layout.value_range;
    let mut colorbar = ChartBuilder::on(&legend)
        .margin_top(44)
        .margin_bottom(LABEL_AREA + 10)
        .margin_right(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..1f64, lo..hi)
        .map_err(render_err)?;

    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_style(("sans-serif", 12))
        .draw()
        .map_err(render_err)?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    colorbar
        .draw_series((0..COLORBAR_STEPS).map(|s| {
            let v0 = lo + step * s as f64;
            Rectangle::new([(0.0, v0), (1.0, v0 + step)], pink_colormap(layout.scale(v0 + step / 2.0)).filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    log::debug!("Rendered {} to '{}'.", layout, path.as_ref().display());
    Ok(layout)
}
