//! # Subbeam segmentation
//!
//! Partitions the full-course per-axis sample arrays of a decoded log into
//! one contiguous segment per subbeam, using the Actual control-point trace
//! against each subbeam's declared starting control point.
//!
//! A segment's arrays are **sliced copies** of the originals, never views:
//! every segment owns an independent [`AxisSampleStore`] and the decoded log
//! stays untouched.
//!
//! ## MLC slicing modes
//!
//! The vendor's own log-analysis tooling copies leaf 0's slice into every
//! MLC output slot instead of slicing each leaf at its own index. That looks
//! like a defect, but the intended behavior is unconfirmed, so both
//! renditions ship: [`MlcSliceMode::Literal`] reproduces it bit-for-bit,
//! [`MlcSliceMode::PerLeaf`] slices each leaf properly. Compare the two when
//! qualifying results against the vendor tooling.

use std::ops::Range;

use crate::axis::Axis;
use crate::axis_store::{AxisPair, AxisPairs, AxisSampleStore};
use crate::log_decoder::TrajectoryLog;
use crate::trajlog_errors::TrajLogError;

/// How the MLC channel's pair list is sliced into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MlcSliceMode {
    /// Every MLC output slot receives a copy of leaf 0's slice, matching the
    /// vendor tooling.
    #[default]
    Literal,
    /// Each leaf is sliced at its own index.
    PerLeaf,
}

/// One subbeam's share of the delivery.
///
/// # Fields
///
/// * `seq` - the subbeam's sequence index
/// * `snapshots` - the half-open snapshot range `[start, end)` this segment covers
/// * `axis_data` - sliced copies of every axis's sample arrays over that range
#[derive(Debug, Clone)]
pub struct BeamSegment {
    pub seq: i32,
    pub snapshots: Range<usize>,
    pub axis_data: AxisSampleStore,
}

/// Outcome of a split request. Single-subbeam logs have nothing to split;
/// that is an answer, not an error.
#[derive(Debug, Clone)]
pub enum SplitOutcome {
    NotApplicable,
    Split(Vec<BeamSegment>),
}

/// Partition a decoded log into per-subbeam segments.
///
/// Subbeam `i` (ordered by `seq`) ends at the first snapshot index, scanning
/// from the segment start, where the Actual control-point trace reaches or
/// exceeds subbeam `i+1`'s declared starting control point; the last segment
/// runs to the end of the arrays. Boundaries are therefore monotonically
/// non-decreasing and the segments tile the full snapshot range.
///
/// Arguments
/// ---------
/// * `log`: the decoded log to partition
/// * `mode`: MLC slicing rendition (see [`MlcSliceMode`])
///
/// Return
/// ------
/// * [`SplitOutcome::NotApplicable`] when `NumberOfSubbeams <= 1`,
/// * [`SplitOutcome::Split`] with one [`BeamSegment`] per subbeam otherwise,
/// * [`TrajLogError::AxisNotSampled`] if the log carries no control-point trace.
pub fn split_by_subbeam(
    log: &TrajectoryLog,
    mode: MlcSliceMode,
) -> Result<SplitOutcome, TrajLogError> {
    let header = &log.header;
    if header.number_of_subbeams <= 1 {
        return Ok(SplitOutcome::NotApplicable);
    }

    let cp_actual = header
        .axis_data
        .pairs(Axis::ControlPoint)
        .and_then(|pairs| pairs.first())
        .map(|pair| pair.actual.as_slice())
        .ok_or(TrajLogError::AxisNotSampled(Axis::ControlPoint.label()))?;

    let n_snapshots = header.number_of_snapshots.max(0) as usize;
    let ordered = header.subbeams_by_seq();

    let mut segments = Vec::with_capacity(ordered.len());
    let mut start = 0usize;
    for (i, subbeam) in ordered.iter().enumerate() {
        let end = match ordered.get(i + 1) {
            Some(next) => {
                let threshold = next.cp as f32;
                cp_actual[start..]
                    .iter()
                    .position(|&cp| cp >= threshold)
                    .map_or(n_snapshots, |offset| start + offset)
            }
            None => n_snapshots,
        };
        segments.push(BeamSegment {
            seq: subbeam.seq,
            snapshots: start..end,
            axis_data: slice_store(&header.axis_data, start..end, mode),
        });
        start = end;
    }

    Ok(SplitOutcome::Split(segments))
}

fn slice_store(store: &AxisSampleStore, range: Range<usize>, mode: MlcSliceMode) -> AxisSampleStore {
    let mut out = AxisSampleStore::new();
    for (axis, pairs) in store.iter() {
        let sliced: AxisPairs = pairs
            .iter()
            .map(|pair| {
                let source = match (mode, axis) {
                    (MlcSliceMode::Literal, Axis::Mlc) => &pairs[0],
                    _ => pair,
                };
                AxisPair {
                    expected: source.expected[range.clone()].to_vec(),
                    actual: source.actual[range.clone()].to_vec(),
                }
            })
            .collect();
        out.insert(axis, sliced);
    }
    out
}
