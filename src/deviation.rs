//! # Expected/Actual deviation statistics
//!
//! RMS and peak-deviation analysis of any sampled axis channel of a decoded
//! log. Scalar channels are analyzed elementwise over their single sample
//! pair. The MLC channel aggregates differently: the two carriage pairs are
//! skipped, an RMS is computed per leaf, and the reported figure is the
//! **mean of the per-leaf RMS values** - an average-of-RMS metric, not a
//! combined RMS. That definition matches the vendor tooling and is kept
//! exactly.

use std::fmt;

use crate::axis::Axis;
use crate::axis_store::AxisPair;
use crate::log_decoder::TrajectoryLog;
use crate::trajlog_errors::TrajLogError;

/// Deviation summary for one axis channel.
///
/// Fields
/// -----------------
/// * `rms` - root-mean-square of Actual - Expected (for the MLC channel, the
///   mean of per-leaf RMS values).
/// * `max_deviation` - the signed difference of largest magnitude.
/// * `max_location` - where the peak occurred: the co-occurring Actual value
///   for scalar channels, the sample-array index for the MLC channel (leaf
///   numbering is a presentation concern and is not applied here).
///
/// Display
/// -----------------
/// * `format!("{}", stats)` - compact single-line summary, e.g.:
///   ```text
///   rms=0.012, max=0.051 at 179.823
///   ```
/// * `format!("{:#}", stats)` - pretty multi-line form:
///   ```text
///   Deviation summary
///   -----------------
///   rms          : 0.012
///   max deviation: 0.051
///   at           : 179.823
///   ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationStats {
    pub rms: f64,
    pub max_deviation: f64,
    pub max_location: f64,
}

impl fmt::Display for DeviationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Deviation summary")?;
            writeln!(f, "-----------------")?;
            writeln!(f, "rms          : {:.3}", self.rms)?;
            writeln!(f, "max deviation: {:.3}", self.max_deviation)?;
            write!(f, "at           : {:.3}", self.max_location)
        } else {
            write!(
                f,
                "rms={:.3}, max={:.3} at {:.3}",
                self.rms, self.max_deviation, self.max_location
            )
        }
    }
}

/// Deviation statistics for one sampled channel of a decoded log.
///
/// Return
/// ------
/// * the channel's [`DeviationStats`], or [`TrajLogError::AxisNotSampled`]
///   if the log does not carry it (for the MLC channel, also a fatal error
///   when no leaf pairs follow the two carriage slots).
pub fn deviation_stats(log: &TrajectoryLog, axis: Axis) -> Result<DeviationStats, TrajLogError> {
    let pairs = log
        .header
        .axis_data
        .pairs(axis)
        .ok_or(TrajLogError::AxisNotSampled(axis.label()))?;
    if axis.is_multi_sample() {
        mlc_deviation(pairs)
    } else {
        let pair = pairs
            .first()
            .ok_or(TrajLogError::AxisNotSampled(axis.label()))?;
        Ok(single_axis_deviation(pair))
    }
}

/// Elementwise deviation of one (Expected, Actual) sample pair.
///
/// RMS is `sqrt(mean((actual - expected)^2))`; the peak is the signed
/// difference of largest magnitude, located by the Actual value recorded at
/// the same snapshot. Empty traces yield all-zero statistics.
pub fn single_axis_deviation(pair: &AxisPair) -> DeviationStats {
    let diffs: Vec<(f64, f64)> = pair
        .actual
        .iter()
        .zip(&pair.expected)
        .map(|(&a, &e)| ((a - e) as f64, a as f64))
        .collect();
    if diffs.is_empty() {
        return DeviationStats {
            rms: 0.0,
            max_deviation: 0.0,
            max_location: 0.0,
        };
    }

    let sum_sq: f64 = diffs.iter().map(|(d, _)| d * d).sum();
    let (max_deviation, max_location) = peak_of(&diffs);
    DeviationStats {
        rms: (sum_sq / diffs.len() as f64).sqrt(),
        max_deviation,
        max_location,
    }
}

/// MLC-channel deviation: per-leaf RMS averaged over the bank, carriage
/// pairs at indices 0 and 1 skipped. The peak is located by sample-array
/// index, not physical leaf number.
fn mlc_deviation(pairs: &[AxisPair]) -> Result<DeviationStats, TrajLogError> {
    if pairs.len() <= 2 {
        return Err(TrajLogError::MlcBankTooSmall {
            needed: 3,
            found: pairs.len(),
        });
    }

    let mut leaf_rms = Vec::with_capacity(pairs.len() - 2);
    let mut diffs: Vec<(f64, f64)> = Vec::new();
    for (index, pair) in pairs.iter().enumerate().skip(2) {
        let mut sum_sq = 0.0f64;
        let mut count = 0usize;
        for (&a, &e) in pair.actual.iter().zip(&pair.expected) {
            let diff = (a - e) as f64;
            sum_sq += diff * diff;
            diffs.push((diff, index as f64));
            count += 1;
        }
        if count > 0 {
            leaf_rms.push((sum_sq / count as f64).sqrt());
        }
    }
    if leaf_rms.is_empty() {
        return Ok(DeviationStats {
            rms: 0.0,
            max_deviation: 0.0,
            max_location: 0.0,
        });
    }

    let (max_deviation, max_location) = peak_of(&diffs);
    Ok(DeviationStats {
        rms: leaf_rms.iter().sum::<f64>() / leaf_rms.len() as f64,
        max_deviation,
        max_location,
    })
}

/// Signed difference of largest magnitude and its location. The comparison
/// is strictly greater, so ties keep the earliest occurrence.
fn peak_of(diffs: &[(f64, f64)]) -> (f64, f64) {
    let mut best = (0.0f64, 0.0f64);
    for &(diff, location) in diffs {
        if diff.abs() > best.0.abs() {
            best = (diff, location);
        }
    }
    best
}
