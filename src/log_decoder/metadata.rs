use serde::Serialize;

use crate::trajlog_errors::TrajLogError;

/// Plan/beam metadata packed into the header's reserved text region.
///
/// Seven colon-delimited lines in fixed order: PatientID, PlanName,
/// SOPInstanceUID, MUPlanned, MURemaining, Energy, BeamName.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetaData {
    pub patient_id: String,
    pub plan_name: String,
    pub sop_instance_uid: String,
    pub mu_planned: f64,
    pub mu_remaining: f64,
    pub energy: String,
    pub beam_name: String,
}

impl MetaData {
    /// Decode the metadata text region.
    ///
    /// The raw bytes are read as UTF-8 (lossily), NUL/CR/TAB padding is
    /// stripped, and the text is split on newlines. Each line yields the
    /// token after its first `:`; lines are consumed positionally. Fewer
    /// than seven lines, a line without a `:`, or a non-numeric MU field is
    /// a fatal decode error.
    pub fn parse(raw: &[u8]) -> Result<MetaData, TrajLogError> {
        let text = String::from_utf8_lossy(raw)
            .replace('\0', "")
            .replace('\r', "")
            .replace('\t', "");
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < 7 {
            return Err(TrajLogError::MalformedMetaData(format!(
                "expected 7 metadata lines, found {}",
                lines.len()
            )));
        }

        Ok(MetaData {
            patient_id: field_value(lines[0])?.to_string(),
            plan_name: field_value(lines[1])?.to_string(),
            sop_instance_uid: field_value(lines[2])?.to_string(),
            mu_planned: numeric_field(lines[3])?,
            mu_remaining: numeric_field(lines[4])?,
            energy: field_value(lines[5])?.to_string(),
            beam_name: field_value(lines[6])?.to_string(),
        })
    }
}

/// Token between the first and second `:` of a metadata line.
fn field_value(line: &str) -> Result<&str, TrajLogError> {
    line.split(':').nth(1).ok_or_else(|| {
        TrajLogError::MalformedMetaData(format!("metadata line without a ':' separator: {line:?}"))
    })
}

fn numeric_field(line: &str) -> Result<f64, TrajLogError> {
    let value = field_value(line)?;
    value.trim().parse::<f64>().map_err(|_| {
        TrajLogError::MalformedMetaData(format!("non-numeric MU field: {value:?}"))
    })
}
