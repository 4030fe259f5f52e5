use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrajLogError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Trajectory log truncated while decoding {0}")]
    TruncatedLog(&'static str),

    #[error("Malformed metadata block: {0}")]
    MalformedMetaData(String),

    #[error("Unsupported MLC model code {0}; refusing to guess a leaf geometry")]
    UnsupportedMlcModel(i32),

    #[error("Axis {0} is not sampled in this log")]
    AxisNotSampled(&'static str),

    #[error("MLC bank holds {found} sample pairs, {needed} required")]
    MlcBankTooSmall { needed: usize, found: usize },

    #[error("MU trace has no positive maximum; fluence cannot be normalized")]
    DegenerateMuTrace,
}

impl PartialEq for TrajLogError {
    fn eq(&self, other: &Self) -> bool {
        use TrajLogError::*;
        match (self, other) {
            // IO errors are not comparable: equality on variant only
            (IoError(_), IoError(_)) => true,

            (TruncatedLog(a), TruncatedLog(b)) => a == b,
            (MalformedMetaData(a), MalformedMetaData(b)) => a == b,
            (UnsupportedMlcModel(a), UnsupportedMlcModel(b)) => a == b,
            (AxisNotSampled(a), AxisNotSampled(b)) => a == b,
            (
                MlcBankTooSmall { needed: a, found: b },
                MlcBankTooSmall {
                    needed: c,
                    found: d,
                },
            ) => a == c && b == d,
            (DegenerateMuTrace, DegenerateMuTrace) => true,

            _ => false,
        }
    }
}
