use std::io::Write;

use camino::Utf8Path;
use trajlog::axis::Axis;
use trajlog::log_decoder::header::{AxisScale, MlcModel};
use trajlog::log_decoder::TrajectoryLog;
use trajlog::trajlog_errors::TrajLogError;

mod common;
use common::LogBuilder;

#[test]
fn test_decode_full_log() {
    // Gantry and MU carry one sample each, the MLC carries four.
    let bytes = LogBuilder::new()
        .axis(1, 1)
        .axis(40, 1)
        .axis(50, 4)
        .subbeam(0, 50.0, 10.0, 0, "Arc 1")
        .snapshot(&[
            (179.9, 180.0),
            (0.0, 0.1),
            (1.0, 1.1),
            (2.0, 2.1),
            (3.0, 3.1),
            (4.0, 4.1),
        ])
        .snapshot(&[
            (180.0, 180.2),
            (50.0, 49.8),
            (1.5, 1.6),
            (2.5, 2.6),
            (3.5, 3.6),
            (4.5, 4.6),
        ])
        .build();

    let log = TrajectoryLog::from_bytes(&bytes).unwrap();
    assert!(log.header_errors.is_empty());

    let header = &log.header;
    assert_eq!(header.signature, "VOSTL");
    assert!(header.version.starts_with("4.0"));
    assert_eq!(header.header_size, 1024);
    assert_eq!(header.sample_interval_ms, 20);
    assert_eq!(header.number_of_axes_sampled, 3);
    assert_eq!(header.axis_enumeration, vec![1, 40, 50]);
    assert_eq!(header.samples_per_axis, vec![1, 1, 4]);
    assert_eq!(header.axis_scale, AxisScale::Varian);
    assert_eq!(header.mlc_model, MlcModel::Nds120);
    assert_eq!(header.number_of_subbeams, 1);
    assert_eq!(header.is_truncated, 0);
    assert_eq!(header.number_of_snapshots, 2);

    assert_eq!(header.metadata.patient_id, "PAT-001");
    assert_eq!(header.metadata.plan_name, "Plan1");
    assert_eq!(header.metadata.mu_planned, 100.0);
    assert_eq!(header.metadata.mu_remaining, 0.0);
    assert_eq!(header.metadata.energy, "6X");
    assert_eq!(header.metadata.beam_name, "Field1");

    assert_eq!(header.subbeams.len(), 1);
    assert_eq!(header.subbeams[0].name, "Arc 1");
    assert_eq!(header.subbeams[0].mu, 50.0);

    // Snapshot pairs land [sample][snapshot], Expected before Actual.
    let gantry = header.axis_data.pairs(Axis::GantryRtn).unwrap();
    assert_eq!(gantry.len(), 1);
    assert_eq!(gantry[0].expected, vec![179.9, 180.0]);
    assert_eq!(gantry[0].actual, vec![180.0, 180.2]);

    let mu = header.axis_data.pairs(Axis::Mu).unwrap();
    assert_eq!(mu[0].expected, vec![0.0, 50.0]);
    assert_eq!(mu[0].actual, vec![0.1, 49.8]);

    let mlc = header.axis_data.pairs(Axis::Mlc).unwrap();
    assert_eq!(mlc.len(), 4);
    assert_eq!(mlc[0].expected, vec![1.0, 1.5]);
    assert_eq!(mlc[3].actual, vec![4.1, 4.6]);
}

#[test]
fn test_read_from_file() {
    let bytes = LogBuilder::new().axis(40, 1).snapshot(&[(0.0, 0.0)]).build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fraction.bin");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&bytes).unwrap();

    let log = TrajectoryLog::read(Utf8Path::from_path(&path).unwrap()).unwrap();
    assert_eq!(log.header.number_of_snapshots, 1);
    assert!(log.header.axis_data.contains(Axis::Mu));
}

#[test]
fn test_truncated_stream_is_fatal() {
    let bytes = LogBuilder::new()
        .axis(1, 1)
        .snapshot(&[(0.0, 0.0)])
        .snapshot(&[(1.0, 1.0)])
        .build();

    // Cut the stream mid-snapshot.
    let err = TrajectoryLog::from_bytes(&bytes[..bytes.len() - 6]).unwrap_err();
    assert!(matches!(err, TrajLogError::TruncatedLog(_)));

    // Cut it mid-header too.
    let err = TrajectoryLog::from_bytes(&bytes[..40]).unwrap_err();
    assert!(matches!(err, TrajLogError::TruncatedLog(_)));
}

#[test]
fn test_oversized_axis_catalog_is_fatal() {
    // 121 axes need 968 table bytes plus the 64 fixed bytes, overrunning
    // the 1024-byte header block: the metadata region would have negative
    // size. Built by hand since a well-formed stream cannot express it.
    let mut bytes = vec![0u8; 32];
    bytes.extend_from_slice(&1024i32.to_le_bytes());
    bytes.extend_from_slice(&20i32.to_le_bytes());
    bytes.extend_from_slice(&121i32.to_le_bytes());
    for code in 0..121i32 {
        bytes.extend_from_slice(&code.to_le_bytes());
    }
    for _ in 0..121 {
        bytes.extend_from_slice(&1i32.to_le_bytes());
    }
    for value in [1i32, 0, 0, 0, 2] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    let err = TrajectoryLog::from_bytes(&bytes).unwrap_err();
    assert_eq!(
        err,
        TrajLogError::MalformedMetaData("negative header reserve size -8".to_string())
    );
}

#[test]
fn test_short_metadata_is_fatal() {
    let bytes = LogBuilder::new()
        .axis(1, 1)
        .raw_metadata(b"PatientID:X\nPlanName:Y\n")
        .build();

    let err = TrajectoryLog::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, TrajLogError::MalformedMetaData(_)));
}

#[test]
fn test_unknown_axis_code_keeps_alignment() {
    // Code 99 does not exist; its two samples must still be consumed so the
    // MU samples that follow decode from the right offset.
    let bytes = LogBuilder::new()
        .axis(99, 2)
        .axis(40, 1)
        .snapshot(&[(7.0, 7.0), (8.0, 8.0), (1.0, 1.5)])
        .snapshot(&[(9.0, 9.0), (10.0, 10.0), (2.0, 2.5)])
        .build();

    let log = TrajectoryLog::from_bytes(&bytes).unwrap();
    assert_eq!(log.header.axis_data.len(), 1);

    let mu = log.header.axis_data.pairs(Axis::Mu).unwrap();
    assert_eq!(mu[0].expected, vec![1.0, 2.0]);
    assert_eq!(mu[0].actual, vec![1.5, 2.5]);
}

#[test]
fn test_empty_axis_catalog_accumulates_diagnostics() {
    let bytes = LogBuilder::new().build();

    let log = TrajectoryLog::from_bytes(&bytes).unwrap();
    assert_eq!(
        log.header_errors,
        vec![
            "Axis enumeration attempted without number of axes known.",
            "Samples per axis attempted without number of axes known.",
        ]
    );
    assert!(log.header.axis_data.is_empty());
}

#[test]
fn test_enum_field_mapping() {
    let bytes = LogBuilder::new().axis(1, 1).axis_scale(2).mlc_model(3).build();
    let log = TrajectoryLog::from_bytes(&bytes).unwrap();
    assert_eq!(log.header.axis_scale, AxisScale::Iec);
    assert_eq!(log.header.mlc_model, MlcModel::Nds120Hd);
    assert!(log.header_errors.is_empty());
}

#[test]
fn test_unknown_enum_values_are_soft() {
    let bytes = LogBuilder::new().axis(1, 1).axis_scale(7).mlc_model(9).build();
    let log = TrajectoryLog::from_bytes(&bytes).unwrap();
    assert_eq!(log.header.axis_scale, AxisScale::Unknown(7));
    assert_eq!(log.header.mlc_model, MlcModel::Unknown(9));
    assert_eq!(
        log.header_errors,
        vec!["Unknown axis scale value 7.", "Unknown MLC model code 9.",]
    );
}

#[test]
fn test_subbeams_ordered_by_sequence() {
    let bytes = LogBuilder::new()
        .subbeam(10, 30.0, 5.0, 1, "Second")
        .subbeam(0, 20.0, 3.0, 0, "First")
        .build();

    let log = TrajectoryLog::from_bytes(&bytes).unwrap();
    let ordered = log.header.subbeams_by_seq();
    assert_eq!(ordered[0].name, "First");
    assert_eq!(ordered[1].name, "Second");
}
