//! # Per-axis sample storage
//!
//! Typed container for the snapshot block of a trajectory log. Each sampled
//! axis owns a list of (Expected, Actual) sample-array pairs, one pair per
//! physical sample (a single pair for scalar channels, one pair per carriage
//! and leaf for the MLC channel), each array holding one value per snapshot.
//!
//! The store is filled once by the decoder and is read-only afterwards; the
//! beam splitter, fluence builder, and deviation analyzer all consume it
//! without mutation.

use std::collections::HashMap;

use ahash::RandomState;
use smallvec::SmallVec;

use crate::axis::Axis;

/// One (Expected, Actual) trace pair for a single physical sample.
///
/// # Fields
///
/// * `expected` - planned axis positions, one `f32` per snapshot
/// * `actual` - delivered axis positions, one `f32` per snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisPair {
    pub expected: Vec<f32>,
    pub actual: Vec<f32>,
}

impl AxisPair {
    /// A zero-filled pair with both arrays sized for `n_snapshots`.
    pub(crate) fn zeroed(n_snapshots: usize) -> Self {
        AxisPair {
            expected: vec![0.0; n_snapshots],
            actual: vec![0.0; n_snapshots],
        }
    }
}

/// Sample-pair list for one axis. Scalar channels store exactly one pair, so
/// the common case stays inline.
pub type AxisPairs = SmallVec<[AxisPair; 2]>;

/// Mapping from axis channel to its sample-pair list.
///
/// Invariant: after a successful decode, the pair count for the axis at
/// enumeration index `i` equals `SamplesPerAxis[i]`, and every array has
/// exactly `NumberOfSnapshots` entries.
///
/// Uses [`ahash`](https://docs.rs/ahash) for fast hashing.
#[derive(Debug, Clone, Default)]
pub struct AxisSampleStore {
    data: HashMap<Axis, AxisPairs, RandomState>,
}

impl AxisSampleStore {
    pub fn new() -> Self {
        AxisSampleStore::default()
    }

    /// Pre-allocate `samples` zero-filled pairs for `axis`.
    pub(crate) fn allocate(&mut self, axis: Axis, samples: usize, n_snapshots: usize) {
        let pairs = self.data.entry(axis).or_default();
        for _ in 0..samples {
            pairs.push(AxisPair::zeroed(n_snapshots));
        }
    }

    pub(crate) fn insert(&mut self, axis: Axis, pairs: AxisPairs) {
        self.data.insert(axis, pairs);
    }

    pub(crate) fn pairs_mut(&mut self, axis: Axis) -> Option<&mut AxisPairs> {
        self.data.get_mut(&axis)
    }

    /// Sample-pair list for one axis, or `None` if the log did not sample it.
    pub fn pairs(&self, axis: Axis) -> Option<&[AxisPair]> {
        self.data.get(&axis).map(|p| p.as_slice())
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.data.contains_key(&axis)
    }

    /// Number of physical samples stored for `axis` (0 if absent).
    pub fn sample_count(&self, axis: Axis) -> usize {
        self.data.get(&axis).map_or(0, |p| p.len())
    }

    /// Number of sampled axes present in the store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, &[AxisPair])> {
        self.data.iter().map(|(axis, pairs)| (*axis, pairs.as_slice()))
    }
}
