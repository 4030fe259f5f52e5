use itertools::Itertools;
use serde::Serialize;

use crate::axis_store::AxisSampleStore;
use crate::log_decoder::metadata::MetaData;
use crate::log_decoder::subbeam::Subbeam;

/// Sign/axis convention the machine reported positions in.
///
/// The Varian scale flips the sign of one MLC bank's positions; the fluence
/// builder applies the flip on the X2 side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisScale {
    Varian,
    Iec,
    /// Unrecognized wire value, kept verbatim. Recorded as a soft diagnostic
    /// during decode.
    Unknown(i32),
}

impl AxisScale {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => AxisScale::Varian,
            2 => AxisScale::Iec,
            other => AxisScale::Unknown(other),
        }
    }
}

impl Default for AxisScale {
    fn default() -> Self {
        AxisScale::Unknown(0)
    }
}

/// Collimator hardware the log was recorded against. The fluence geometry is
/// fixed per model and cannot be derived, so an unknown model makes fluence
/// reconstruction a fatal error rather than a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MlcModel {
    Nds120,
    Nds120Hd,
    Sx2,
    /// Unrecognized wire value, kept verbatim.
    Unknown(i32),
}

impl MlcModel {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            2 => MlcModel::Nds120,
            3 => MlcModel::Nds120Hd,
            4 => MlcModel::Sx2,
            other => MlcModel::Unknown(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            MlcModel::Nds120 => 2,
            MlcModel::Nds120Hd => 3,
            MlcModel::Sx2 => 4,
            MlcModel::Unknown(raw) => raw,
        }
    }
}

impl Default for MlcModel {
    fn default() -> Self {
        MlcModel::Unknown(0)
    }
}

/// Decoded trajectory-log header, including the metadata block, the subbeam
/// table, and the full per-axis sample store.
///
/// Built once by [`TrajectoryLog::from_bytes`](crate::log_decoder::TrajectoryLog::from_bytes)
/// and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryHeader {
    /// ASCII signature, trailing NULs stripped.
    pub signature: String,
    /// ASCII version string, kept verbatim (NUL padding included).
    pub version: String,
    pub header_size: i32,
    pub sample_interval_ms: i32,
    pub number_of_axes_sampled: i32,
    /// Wire codes of the sampled axes, in stream order.
    pub axis_enumeration: Vec<i32>,
    /// Physical sample count per enumerated axis, parallel to
    /// `axis_enumeration`.
    pub samples_per_axis: Vec<i32>,
    pub axis_scale: AxisScale,
    pub number_of_subbeams: i32,
    /// 1 if the log was truncated by the machine, 0 otherwise.
    pub is_truncated: i32,
    pub number_of_snapshots: i32,
    pub mlc_model: MlcModel,
    pub metadata: MetaData,
    pub subbeams: Vec<Subbeam>,
    pub axis_data: AxisSampleStore,
}

impl TrajectoryHeader {
    /// Declared sample count for a wire code, looked up through the axis
    /// enumeration.
    pub fn samples_for_code(&self, code: i32) -> Option<i32> {
        self.axis_enumeration
            .iter()
            .position(|&c| c == code)
            .and_then(|i| self.samples_per_axis.get(i).copied())
    }

    /// Subbeams ordered by their `seq` field.
    pub fn subbeams_by_seq(&self) -> Vec<&Subbeam> {
        self.subbeams.iter().sorted_by_key(|sb| sb.seq).collect()
    }
}
