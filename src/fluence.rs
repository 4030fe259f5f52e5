//! # Fluence reconstruction
//!
//! Rebuilds a coarse 2-D exposure map from the MLC leaf-position traces of a
//! decoded log: for every snapshot interval, the MU delivered in that
//! interval (as a fraction of the total) is added to every grid cell inside
//! the open aperture. The result is an MU-weighted open-aperture map for QA
//! comparison, **not** a clinically accurate dose distribution.
//!
//! The leaf geometry is empirical and fixed per MLC model; an unrecognized
//! model is a fatal error, never a guessed grid.
//!
//! Grid conventions: rows follow the leaf bands, columns follow the leaf
//! travel direction, with the aperture centered on the middle column. SX2
//! uses 1 mm cells (280x280), the NDS models use 0.5 mm cells (NDS120
//! 800x800, NDS120HD 440x800).

use nalgebra::DMatrix;

use crate::axis::Axis;
use crate::axis_store::AxisPair;
use crate::constants::{
    NDS120HD_GRID_ROWS, NDS120_GRID_ROWS, NDS_CELLS_PER_CM, NDS_GRID_COLS, SX2_CELLS_PER_CM,
    SX2_GRID_EDGE,
};
use crate::log_decoder::header::MlcModel;
use crate::log_decoder::TrajectoryLog;
use crate::trajlog_errors::TrajLogError;

/// Which of the two recorded traces drives the reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Expected,
    Actual,
}

impl Trace {
    fn of(self, pair: &AxisPair) -> &[f32] {
        match self {
            Trace::Expected => &pair.expected,
            Trace::Actual => &pair.actual,
        }
    }
}

/// 2-D fluence accumulation grid.
///
/// Wraps a dense `nalgebra` matrix; values are unitless MU fractions summed
/// over the delivery (a fully open, fully irradiated cell accumulates 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct FluenceGrid {
    data: DMatrix<f64>,
}

impl FluenceGrid {
    fn zeros(rows: usize, cols: usize) -> Self {
        FluenceGrid {
            data: DMatrix::zeros(rows, cols),
        }
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Row-major grayscale raster of the grid, min/max normalized to 0..=255.
    ///
    /// This is the form the report layer renders; a flat grid (max == min)
    /// produces an all-black raster rather than dividing by zero.
    pub fn to_gray8(&self) -> Vec<u8> {
        let min = self.data.min();
        let max = self.data.max();
        let span = max - min;
        let mut raster = Vec::with_capacity(self.data.len());
        for row in 0..self.data.nrows() {
            for col in 0..self.data.ncols() {
                let value = self.data[(row, col)];
                let byte = if span > 0.0 {
                    (255.0 * (value - min) / span).round() as u8
                } else {
                    0
                };
                raster.push(byte);
            }
        }
        raster
    }
}

/// Reconstruct the fluence grid for one trace of a decoded log.
///
/// MU bookkeeping follows the vendor tooling exactly: the per-snapshot
/// cumulative MU is always read from the **Expected** MU trace, while the
/// normalizing total is the maximum of the **selected** trace's MU array.
/// Each snapshot deposits `(mu_i - mu_{i-1}) / total` into every open cell.
///
/// Arguments
/// ---------
/// * `log`: the decoded log (must sample the MU and MLC channels)
/// * `trace`: which recorded trace drives leaf positions and the MU total
///
/// Return
/// ------
/// * the accumulated [`FluenceGrid`], or a fatal error for an unknown MLC
///   model, a missing MU/MLC channel, a short MLC bank, or an MU trace with
///   no positive maximum.
pub fn build_fluence(log: &TrajectoryLog, trace: Trace) -> Result<FluenceGrid, TrajLogError> {
    let header = &log.header;
    let model = header.mlc_model;
    let (rows, cols) = grid_dimensions(model)?;

    let mu_pair = header
        .axis_data
        .pairs(Axis::Mu)
        .and_then(|pairs| pairs.first())
        .ok_or(TrajLogError::AxisNotSampled(Axis::Mu.label()))?;
    let mlc = header
        .axis_data
        .pairs(Axis::Mlc)
        .ok_or(TrajLogError::AxisNotSampled(Axis::Mlc.label()))?;

    let needed = mlc_bank_size(model);
    if mlc.len() < needed {
        return Err(TrajLogError::MlcBankTooSmall {
            needed,
            found: mlc.len(),
        });
    }

    let total_mu = trace
        .of(mu_pair)
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    if !(total_mu > 0.0) {
        return Err(TrajLogError::DegenerateMuTrace);
    }

    let mut grid = FluenceGrid::zeros(rows, cols);
    let n_snapshots = mu_pair.expected.len();
    let mut mu_start = 0f32;
    for cp in 0..n_snapshots {
        let mu_current = mu_pair.expected[cp];
        let delta = ((mu_current - mu_start) / total_mu) as f64;
        match model {
            MlcModel::Sx2 => add_sx2_aperture(&mut grid.data, mlc, trace, cp, delta),
            MlcModel::Nds120 | MlcModel::Nds120Hd => {
                add_nds_aperture(&mut grid.data, mlc, trace, cp, delta, model)
            }
            // Rejected by grid_dimensions above.
            MlcModel::Unknown(_) => unreachable!("unknown MLC model rejected before accumulation"),
        }
        mu_start = mu_current;
    }
    Ok(grid)
}

/// Grid dimensions (rows, cols) for a supported MLC model.
pub fn grid_dimensions(model: MlcModel) -> Result<(usize, usize), TrajLogError> {
    match model {
        MlcModel::Sx2 => Ok((SX2_GRID_EDGE, SX2_GRID_EDGE)),
        MlcModel::Nds120 => Ok((NDS120_GRID_ROWS, NDS_GRID_COLS)),
        MlcModel::Nds120Hd => Ok((NDS120HD_GRID_ROWS, NDS_GRID_COLS)),
        MlcModel::Unknown(raw) => Err(TrajLogError::UnsupportedMlcModel(raw)),
    }
}

/// Minimum MLC pair-list length each geometry dereferences.
fn mlc_bank_size(model: MlcModel) -> usize {
    match model {
        // Highest index touched: 57 + 27 + 31
        MlcModel::Sx2 => 116,
        // Highest index touched: 59 + 62
        MlcModel::Nds120 | MlcModel::Nds120Hd => 122,
        MlcModel::Unknown(_) => 0,
    }
}

/// SX2 (Halcyon) aperture: 28 leaf bands of 10 rows, dual-layer banks.
///
/// Per band, the current leaf pair sits at pair indices `(i+2, 57+i+2)`
/// (two carriage slots first, X2 bank offset +57, minus sign on the X2 side
/// per the Varian scale). The band's first 5 rows use the column intersection
/// with the preceding distal leaf `(i+30, 57+i+30)`, the last 5 rows the
/// intersection with the following one `(i+31, 57+i+31)`, approximating
/// tongue-and-groove shadowing between the sub-banks.
fn add_sx2_aperture(
    grid: &mut DMatrix<f64>,
    mlc: &[AxisPair],
    trace: Trace,
    cp: usize,
    delta: f64,
) {
    let center = (grid.ncols() / 2) as i64;
    // Ties round to even, matching the vendor arithmetic on exact .5 products.
    let cells =
        |index: usize| (trace.of(&mlc[index])[cp] * SX2_CELLS_PER_CM).round_ties_even() as i64;

    for leaf in 0..28 {
        let col_start = center - cells(57 + leaf + 2);
        let col_end = center + cells(leaf + 2);
        let before_start = center - cells(57 + leaf + 30);
        let before_end = center + cells(leaf + 30);
        let after_start = center - cells(57 + leaf + 31);
        let after_end = center + cells(leaf + 31);

        let lower_start = col_start.max(before_start);
        let lower_end = col_end.min(before_end);
        let upper_start = col_start.max(after_start);
        let upper_end = col_end.min(after_end);

        let row = leaf * 10;
        deposit(grid, row..row + 5, lower_start, lower_end, delta);
        deposit(grid, row + 5..row + 10, upper_start, upper_end, delta);
    }
}

/// NDS120 / NDS120HD aperture: 60 leaf bands, single-layer banks.
///
/// X2 leaves occupy pair indices 2..62, X1 leaves 62..122. Band heights
/// follow the fixed leaf-width tables (edge leaves wide, center leaves
/// narrow), the row cursor advancing by each band's height.
fn add_nds_aperture(
    grid: &mut DMatrix<f64>,
    mlc: &[AxisPair],
    trace: Trace,
    cp: usize,
    delta: f64,
    model: MlcModel,
) {
    let center = (grid.ncols() / 2) as i64;
    let cells =
        |index: usize| (trace.of(&mlc[index])[cp] * NDS_CELLS_PER_CM).round_ties_even() as i64;

    // (first center leaf, last center leaf, edge rows, center rows)
    let (half_first, half_last, edge_rows, center_rows) = match model {
        MlcModel::Nds120 => (10, 49, 20usize, 10usize),
        _ => (14, 45, 10, 5),
    };

    let mut row = 0usize;
    for leaf in 0..60 {
        let col_start = center - cells(leaf + 62);
        let col_end = center + cells(leaf + 2);
        let height = if leaf < half_first || leaf > half_last {
            edge_rows
        } else {
            center_rows
        };
        deposit(grid, row..row + height, col_start, col_end, delta);
        row += height;
    }
}

/// Add `delta` to every cell of `rows` x `[col_start, col_end)`, clamping the
/// column range to the grid. An inverted range deposits nothing.
fn deposit(
    grid: &mut DMatrix<f64>,
    rows: std::ops::Range<usize>,
    col_start: i64,
    col_end: i64,
    delta: f64,
) {
    let cols = grid.ncols() as i64;
    let start = col_start.clamp(0, cols);
    let end = col_end.clamp(0, cols);
    for row in rows {
        for col in start..end {
            grid[(row, col as usize)] += delta;
        }
    }
}
