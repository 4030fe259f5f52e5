//! # Constants and layout definitions for trajlog
//!
//! This module centralizes the **binary layout constants** of the Varian
//! trajectory-log file format and the **grid geometry constants** used by the
//! fluence reconstruction.
//!
//! ## Overview
//!
//! - Fixed byte sizes of the header fields (signature, version, subbeam records)
//! - The header reserve computation inputs (1024-byte header block, 64 fixed bytes)
//! - Fluence grid dimensions per MLC model and the cm → cell scale factors
//!
//! These definitions are used by the decoder, the fluence builder, and the
//! synthetic-log helpers in the integration tests.

// -------------------------------------------------------------------------------------------------
// Binary file layout
// -------------------------------------------------------------------------------------------------

/// Byte length of the ASCII signature field
pub const SIGNATURE_BYTES: usize = 16;

/// Byte length of the ASCII version field
pub const VERSION_BYTES: usize = 16;

/// Total size of the header block; the metadata region fills whatever the
/// fixed fields and the axis tables leave of it
pub const HEADER_BLOCK_BYTES: i32 = 1024;

/// Fixed header bytes preceding the metadata region, excluding the two
/// per-axis tables (signature + version + 8 little-endian i32 fields)
pub const HEADER_FIXED_BYTES: i32 = 64;

/// Size of one subbeam record: cp(4) + mu(4) + radtime(4) + seq(4) + name(512) + reserved(32)
pub const SUBBEAM_RECORD_BYTES: usize = 560;

/// Byte length of the NUL-padded subbeam name
pub const SUBBEAM_NAME_BYTES: usize = 512;

/// Reserved bytes trailing each subbeam record, read and discarded
pub const SUBBEAM_RESERVED_BYTES: usize = 32;

// -------------------------------------------------------------------------------------------------
// Fluence grid geometry
// -------------------------------------------------------------------------------------------------

/// SX2 (Halcyon) fluence grid edge, 1 mm cells over a 28 cm field
pub const SX2_GRID_EDGE: usize = 280;

/// Column count of the NDS fluence grids, half-millimeter cells over a 40 cm field
pub const NDS_GRID_COLS: usize = 800;

/// Row count of the NDS120 fluence grid (10 edge leaves x 20 rows, 40 center leaves x 10 rows, 10 edge leaves x 20 rows)
pub const NDS120_GRID_ROWS: usize = 800;

/// Row count of the NDS120HD fluence grid (14 edge leaves x 10 rows, 32 center leaves x 5 rows, 14 edge leaves x 10 rows)
pub const NDS120HD_GRID_ROWS: usize = 440;

/// Leaf position (cm) to SX2 grid cells (1 mm per cell)
pub const SX2_CELLS_PER_CM: f32 = 10.0;

/// Leaf position (cm) to NDS grid cells (0.5 mm per cell)
pub const NDS_CELLS_PER_CM: f32 = 20.0;
