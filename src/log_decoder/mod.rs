//! # Trajectory-log binary decoder
//!
//! Sequential decoder for the Varian trajectory-log binary format. A log is a
//! 1024-byte header block (fixed fields, two per-axis tables, and a text
//! metadata region filling the remainder), a table of 560-byte subbeam
//! records, and a snapshot block of little-endian f32 pairs.
//!
//! The stream is consumed **strictly forward, once**: each field's size or
//! presence depends on a field decoded earlier (the axis count sizes the two
//! axis tables *and* the metadata region, the axis tables and snapshot count
//! size the snapshot block). Decoding is driven by an explicit ordered
//! sequence of typed field descriptors, never by map iteration order.
//!
//! Two error tiers apply. Structural ordering violations and unrecognized
//! enum values accumulate as diagnostic strings on
//! [`TrajectoryLog::header_errors`] and decoding continues best-effort.
//! Stream truncation and a malformed metadata block are fatal: the decode
//! returns an error and no partial structure.
//!
//! ## See also
//! * [`header::TrajectoryHeader`] - the decoded record.
//! * [`crate::beam_splitter`], [`crate::fluence`], [`crate::deviation`] -
//!   the analysis passes consuming the decoded log.

pub mod header;
pub mod metadata;
mod snapshot;
pub mod subbeam;

use camino::Utf8Path;
use log::debug;
use nom::bytes::complete::take;
use nom::number::complete::{le_f32, le_i32};

use crate::constants::{HEADER_BLOCK_BYTES, HEADER_FIXED_BYTES, SIGNATURE_BYTES, VERSION_BYTES};
use crate::log_decoder::header::{AxisScale, MlcModel, TrajectoryHeader};
use crate::log_decoder::metadata::MetaData;
use crate::log_decoder::subbeam::Subbeam;
use crate::trajlog_errors::TrajLogError;

/// A fully decoded trajectory log.
///
/// # Fields
///
/// * `header` - every decoded field, including metadata, subbeams, and the
///   per-axis sample store
/// * `header_errors` - ordered soft diagnostics accumulated during decode;
///   callers must check this list before trusting the result
#[derive(Debug, Clone)]
pub struct TrajectoryLog {
    pub header: TrajectoryHeader,
    pub header_errors: Vec<String>,
}

/// The fixed decode sequence of the log format.
///
/// The file format defines these sections in exactly this order; they must
/// be decoded in sequence because each one's size may depend on an earlier
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    Signature,
    Version,
    HeaderSize,
    SampleInterval,
    NumberOfAxes,
    AxisEnumeration,
    SamplesPerAxis,
    AxisScale,
    NumberOfSubbeams,
    IsTruncated,
    NumberOfSnapshots,
    MlcModel,
    MetaData,
    Subbeams,
    Snapshots,
}

const DECODE_ORDER: [HeaderField; 15] = [
    HeaderField::Signature,
    HeaderField::Version,
    HeaderField::HeaderSize,
    HeaderField::SampleInterval,
    HeaderField::NumberOfAxes,
    HeaderField::AxisEnumeration,
    HeaderField::SamplesPerAxis,
    HeaderField::AxisScale,
    HeaderField::NumberOfSubbeams,
    HeaderField::IsTruncated,
    HeaderField::NumberOfSnapshots,
    HeaderField::MlcModel,
    HeaderField::MetaData,
    HeaderField::Subbeams,
    HeaderField::Snapshots,
];

/// Values computed mid-pass that later fields depend on. Threaded explicitly
/// through the decode instead of living in process-wide state.
#[derive(Debug, Default)]
struct DecodeCtx {
    /// `1024 - (64 + n_axes * 8)`: bytes left for the metadata region.
    /// Stays 0 until the axis count has been decoded.
    header_reserve_size: i32,
}

impl TrajectoryLog {
    /// Read and decode a trajectory log from a `.bin` file.
    pub fn read(path: &Utf8Path) -> Result<Self, TrajLogError> {
        let bytes = std::fs::read(path.as_std_path())?;
        Self::from_bytes(&bytes)
    }

    /// Decode a trajectory log from raw bytes.
    ///
    /// Return
    /// ------
    /// * the decoded log (possibly with soft diagnostics in
    ///   `header_errors`), or a fatal [`TrajLogError`] on truncation or a
    ///   malformed metadata block.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrajLogError> {
        let mut header = TrajectoryHeader::default();
        let mut errors: Vec<String> = Vec::new();
        let mut ctx = DecodeCtx::default();

        let mut input = bytes;
        for field in DECODE_ORDER {
            input = decode_field(field, input, &mut header, &mut errors, &mut ctx)?;
        }

        Ok(TrajectoryLog {
            header,
            header_errors: errors,
        })
    }
}

fn decode_field<'a>(
    field: HeaderField,
    input: &'a [u8],
    header: &mut TrajectoryHeader,
    errors: &mut Vec<String>,
    ctx: &mut DecodeCtx,
) -> Result<&'a [u8], TrajLogError> {
    match field {
        HeaderField::Signature => {
            let (input, raw) = take_bytes(input, SIGNATURE_BYTES, "signature")?;
            header.signature = String::from_utf8_lossy(raw).replace('\0', "");
            debug!("Signature: {}", header.signature);
            Ok(input)
        }
        HeaderField::Version => {
            let (input, raw) = take_bytes(input, VERSION_BYTES, "version")?;
            header.version = String::from_utf8_lossy(raw).to_string();
            debug!("Version: {}", header.version);
            Ok(input)
        }
        HeaderField::HeaderSize => {
            let (input, value) = read_i32(input, "header size")?;
            header.header_size = value;
            debug!("HeaderSize: {value}");
            Ok(input)
        }
        HeaderField::SampleInterval => {
            let (input, value) = read_i32(input, "sample interval")?;
            header.sample_interval_ms = value;
            debug!("SamplingIntervalMS: {value}");
            Ok(input)
        }
        HeaderField::NumberOfAxes => {
            let (input, value) = read_i32(input, "axis count")?;
            header.number_of_axes_sampled = value;
            // The metadata region fills whatever the fixed fields and the two
            // per-axis i32 tables leave of the 1024-byte header block.
            ctx.header_reserve_size = HEADER_BLOCK_BYTES - (HEADER_FIXED_BYTES + value * 8);
            debug!("NumberOfAxesSampled: {value}");
            Ok(input)
        }
        HeaderField::AxisEnumeration => {
            if header.number_of_axes_sampled == 0 {
                errors.push("Axis enumeration attempted without number of axes known.".to_string());
                return Ok(input);
            }
            let (input, codes) =
                read_i32_table(input, header.number_of_axes_sampled, "axis enumeration")?;
            debug!("AxisEnumeration: {codes:?}");
            header.axis_enumeration = codes;
            Ok(input)
        }
        HeaderField::SamplesPerAxis => {
            if header.number_of_axes_sampled == 0 {
                errors.push("Samples per axis attempted without number of axes known.".to_string());
                return Ok(input);
            }
            let (input, counts) =
                read_i32_table(input, header.number_of_axes_sampled, "samples per axis")?;
            debug!("SamplesPerAxis: {counts:?}");
            header.samples_per_axis = counts;
            Ok(input)
        }
        HeaderField::AxisScale => {
            let (input, raw) = read_i32(input, "axis scale")?;
            header.axis_scale = AxisScale::from_raw(raw);
            if let AxisScale::Unknown(raw) = header.axis_scale {
                errors.push(format!("Unknown axis scale value {raw}."));
            }
            debug!("AxisScale: {:?}", header.axis_scale);
            Ok(input)
        }
        HeaderField::NumberOfSubbeams => {
            let (input, value) = read_i32(input, "subbeam count")?;
            header.number_of_subbeams = value;
            debug!("NumberOfSubbeams: {value}");
            Ok(input)
        }
        HeaderField::IsTruncated => {
            let (input, value) = read_i32(input, "truncation flag")?;
            header.is_truncated = value;
            debug!("IsTruncated: {value}");
            Ok(input)
        }
        HeaderField::NumberOfSnapshots => {
            let (input, value) = read_i32(input, "snapshot count")?;
            header.number_of_snapshots = value;
            debug!("NumberOfSnapshots: {value}");
            Ok(input)
        }
        HeaderField::MlcModel => {
            let (input, raw) = read_i32(input, "MLC model")?;
            header.mlc_model = MlcModel::from_raw(raw);
            if let MlcModel::Unknown(raw) = header.mlc_model {
                errors.push(format!("Unknown MLC model code {raw}."));
            }
            debug!("MLCModel: {:?}", header.mlc_model);
            Ok(input)
        }
        HeaderField::MetaData => {
            let reserve = usize::try_from(ctx.header_reserve_size).map_err(|_| {
                TrajLogError::MalformedMetaData(format!(
                    "negative header reserve size {}",
                    ctx.header_reserve_size
                ))
            })?;
            let (input, raw) = take_bytes(input, reserve, "metadata block")?;
            header.metadata = MetaData::parse(raw)?;
            debug!("MetaData: {:?}", header.metadata);
            Ok(input)
        }
        HeaderField::Subbeams => {
            let mut input = input;
            for i in 0..header.number_of_subbeams.max(0) {
                let (rest, sb) = Subbeam::parse(input)
                    .map_err(|_| TrajLogError::TruncatedLog("subbeam record"))?;
                debug!("Subbeam {}: {sb:?}", i + 1);
                header.subbeams.push(sb);
                input = rest;
            }
            Ok(input)
        }
        HeaderField::Snapshots => snapshot::decode_snapshots(
            input,
            &header.axis_enumeration,
            &header.samples_per_axis,
            header.number_of_snapshots.max(0) as usize,
            &mut header.axis_data,
        ),
    }
}

// -------------------------------------------------------------------------------------------------
// Low-level readers: every short read is a fatal truncation, never a partial value
// -------------------------------------------------------------------------------------------------

pub(crate) fn take_bytes<'a>(
    input: &'a [u8],
    count: usize,
    field: &'static str,
) -> Result<(&'a [u8], &'a [u8]), TrajLogError> {
    take::<_, _, nom::error::Error<&[u8]>>(count)(input)
        .map_err(|_| TrajLogError::TruncatedLog(field))
}

pub(crate) fn read_i32<'a>(
    input: &'a [u8],
    field: &'static str,
) -> Result<(&'a [u8], i32), TrajLogError> {
    le_i32::<_, nom::error::Error<&[u8]>>(input).map_err(|_| TrajLogError::TruncatedLog(field))
}

pub(crate) fn read_f32<'a>(
    input: &'a [u8],
    field: &'static str,
) -> Result<(&'a [u8], f32), TrajLogError> {
    le_f32::<_, nom::error::Error<&[u8]>>(input).map_err(|_| TrajLogError::TruncatedLog(field))
}

fn read_i32_table<'a>(
    input: &'a [u8],
    count: i32,
    field: &'static str,
) -> Result<(&'a [u8], Vec<i32>), TrajLogError> {
    let mut values = Vec::with_capacity(count.max(0) as usize);
    let mut input = input;
    for _ in 0..count.max(0) {
        let (rest, value) = read_i32(input, field)?;
        values.push(value);
        input = rest;
    }
    Ok((input, values))
}
