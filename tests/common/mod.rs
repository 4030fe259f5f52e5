//! Shared fixture for the integration tests: an in-memory builder that
//! assembles syntactically valid log byte streams field by field, so each
//! test can state its scenario instead of hand-counting offsets.

#![allow(dead_code)]

/// Incremental builder for a binary trajectory log.
///
/// Defaults produce a minimal well-formed stream: empty axis catalog, a
/// seven-line metadata block, no subbeams and no snapshots. Every call
/// returns `&mut self` so scenarios chain.
pub struct LogBuilder {
    signature: String,
    version: String,
    header_size: i32,
    sample_interval_ms: i32,
    axes: Vec<(i32, i32)>,
    axis_scale: i32,
    is_truncated: i32,
    mlc_model: i32,
    metadata: Option<Vec<u8>>,
    subbeams: Vec<(i32, f32, f32, i32, String)>,
    snapshots: Vec<Vec<(f32, f32)>>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self {
            signature: "VOSTL".to_string(),
            version: "4.0".to_string(),
            header_size: 1024,
            sample_interval_ms: 20,
            axes: Vec::new(),
            axis_scale: 1,
            is_truncated: 0,
            mlc_model: 2,
            metadata: None,
            subbeams: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Declares one sampled axis: wire code and samples per snapshot.
    pub fn axis(&mut self, code: i32, samples: i32) -> &mut Self {
        self.axes.push((code, samples));
        self
    }

    pub fn axis_scale(&mut self, raw: i32) -> &mut Self {
        self.axis_scale = raw;
        self
    }

    pub fn mlc_model(&mut self, raw: i32) -> &mut Self {
        self.mlc_model = raw;
        self
    }

    pub fn truncated(&mut self, flag: i32) -> &mut Self {
        self.is_truncated = flag;
        self
    }

    /// Replaces the metadata block verbatim (padded with NUL to the
    /// reserved size on build). Used to feed malformed blocks.
    pub fn raw_metadata(&mut self, bytes: &[u8]) -> &mut Self {
        self.metadata = Some(bytes.to_vec());
        self
    }

    pub fn subbeam(&mut self, cp: i32, mu: f32, rad_time: f32, seq: i32, name: &str) -> &mut Self {
        self.subbeams
            .push((cp, mu, rad_time, seq, name.to_string()));
        self
    }

    /// Appends one snapshot. `samples` holds one (expected, actual) tuple
    /// per sample, flattened in axis declaration order.
    pub fn snapshot(&mut self, samples: &[(f32, f32)]) -> &mut Self {
        assert_eq!(
            samples.len() as i32,
            self.axes.iter().map(|&(_, n)| n).sum::<i32>(),
            "snapshot sample count must match the declared axis catalog"
        );
        self.snapshots.push(samples.to_vec());
        self
    }

    fn default_metadata() -> Vec<u8> {
        b"PatientID:PAT-001\n\
          PlanName:Plan1\n\
          SOPInstanceUID:1.2.246.352.1\n\
          MUPlanned:100.0\n\
          MURemaining:0.0\n\
          Energy:6X\n\
          BeamName:Field1\n"
            .to_vec()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        push_padded(&mut bytes, self.signature.as_bytes(), 16);
        push_padded(&mut bytes, self.version.as_bytes(), 16);
        bytes.extend_from_slice(&self.header_size.to_le_bytes());
        bytes.extend_from_slice(&self.sample_interval_ms.to_le_bytes());
        bytes.extend_from_slice(&(self.axes.len() as i32).to_le_bytes());
        for &(code, _) in &self.axes {
            bytes.extend_from_slice(&code.to_le_bytes());
        }
        for &(_, samples) in &self.axes {
            bytes.extend_from_slice(&samples.to_le_bytes());
        }
        bytes.extend_from_slice(&self.axis_scale.to_le_bytes());
        bytes.extend_from_slice(&(self.subbeams.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&self.is_truncated.to_le_bytes());
        bytes.extend_from_slice(&(self.snapshots.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&self.mlc_model.to_le_bytes());

        let reserve = 1024usize
            .checked_sub(64 + self.axes.len() * 8)
            .expect("axis catalog overruns the 1024-byte header block");
        let metadata = self
            .metadata
            .clone()
            .unwrap_or_else(Self::default_metadata);
        assert!(
            metadata.len() <= reserve,
            "metadata block exceeds the reserved header space"
        );
        push_padded(&mut bytes, &metadata, reserve);

        for (cp, mu, rad_time, seq, name) in &self.subbeams {
            bytes.extend_from_slice(&cp.to_le_bytes());
            bytes.extend_from_slice(&mu.to_le_bytes());
            bytes.extend_from_slice(&rad_time.to_le_bytes());
            bytes.extend_from_slice(&seq.to_le_bytes());
            push_padded(&mut bytes, name.as_bytes(), 512);
            bytes.extend_from_slice(&[0u8; 32]);
        }

        for snapshot in &self.snapshots {
            for &(expected, actual) in snapshot {
                bytes.extend_from_slice(&expected.to_le_bytes());
                bytes.extend_from_slice(&actual.to_le_bytes());
            }
        }
        bytes
    }
}

fn push_padded(bytes: &mut Vec<u8>, content: &[u8], width: usize) {
    bytes.extend_from_slice(content);
    bytes.resize(bytes.len() + (width - content.len()), 0);
}
