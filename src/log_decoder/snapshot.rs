//! Snapshot-block decoding.
//!
//! The largest and most order-sensitive section of the log: for every
//! snapshot, in axis-enumeration order, each physical sample contributes one
//! Expected and one Actual little-endian f32. Field shapes all come from the
//! header, so the block can only be walked strictly forward.

use log::warn;

use crate::axis::Axis;
use crate::axis_store::AxisSampleStore;
use crate::log_decoder::read_f32;
use crate::trajlog_errors::TrajLogError;

/// Decode the snapshot block into `store`, consuming from `input`.
///
/// Arguments
/// ---------
/// * `input`: remaining bytes of the log, positioned at the snapshot block
/// * `axis_enumeration`: wire codes in stream order
/// * `samples_per_axis`: parallel sample counts
/// * `n_snapshots`: snapshot count declared by the header
/// * `store`: destination store, filled at `[sample][snapshot]`
///
/// Return
/// ------
/// * the unconsumed tail of `input` on success, a fatal
///   [`TrajLogError::TruncatedLog`] if the stream runs short.
///
/// Enumerated codes with no catalog entry are consumed positionally so the
/// byte cursor stays aligned, but store nothing; the drop is logged once per
/// code instead of silently falling through.
pub(crate) fn decode_snapshots<'a>(
    mut input: &'a [u8],
    axis_enumeration: &[i32],
    samples_per_axis: &[i32],
    n_snapshots: usize,
    store: &mut AxisSampleStore,
) -> Result<&'a [u8], TrajLogError> {
    // Pre-allocate one zeroed pair per declared physical sample.
    for (&code, &samples) in axis_enumeration.iter().zip(samples_per_axis) {
        if let Some(axis) = Axis::from_code(code) {
            store.allocate(axis, samples.max(0) as usize, n_snapshots);
        }
    }

    for snapshot in 0..n_snapshots {
        for (&code, &samples) in axis_enumeration.iter().zip(samples_per_axis) {
            let samples = samples.max(0) as usize;
            match Axis::from_code(code) {
                Some(axis) => {
                    let pairs = store
                        .pairs_mut(axis)
                        .expect("pair list allocated for every catalog axis");
                    for pair in pairs.iter_mut().take(samples) {
                        let (rest, expected) = read_f32(input, "snapshot block")?;
                        let (rest, actual) = read_f32(rest, "snapshot block")?;
                        pair.expected[snapshot] = expected;
                        pair.actual[snapshot] = actual;
                        input = rest;
                    }
                }
                None => {
                    // Unknown channel: advance past its samples to keep the
                    // cursor aligned, store nothing.
                    if snapshot == 0 {
                        warn!("dropping samples of unknown axis code {code}");
                    }
                    for _ in 0..samples {
                        let (rest, _) = read_f32(input, "snapshot block")?;
                        let (rest, _) = read_f32(rest, "snapshot block")?;
                        input = rest;
                    }
                }
            }
        }
    }
    Ok(input)
}
