//! Audit Record - one CSV row per scored request
//!
//! Columns: `timestamp,V1,V2,V3,V4,Amount,Time,probability,label,V5..V28`.
//! Floats use shortest round-trip formatting so a row can be parsed back
//! into exactly the values that were scored.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::coerce::{ObservedInput, OBSERVED_FIELDS};
use crate::logic::features::impute::SynthesizedFeatures;
use crate::logic::features::layout::{synthesized_names, SYNTHESIZED_COUNT};
use crate::logic::model::{Decision, Verdict};
use super::AuditError;

/// timestamp + 6 observed + probability + label + 24 synthesized
pub const COLUMN_COUNT: usize = 1 + 6 + 2 + SYNTHESIZED_COUNT;

/// Header line, without trailing newline
pub fn header() -> String {
    let mut columns: Vec<&str> = Vec::with_capacity(COLUMN_COUNT);
    columns.push("timestamp");
    columns.extend(OBSERVED_FIELDS);
    columns.push("probability");
    columns.push("label");
    columns.extend(synthesized_names());
    columns.join(",")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub observed: ObservedInput,
    pub probability: f64,
    pub verdict: Verdict,
    pub synthesized: SynthesizedFeatures,
}

impl AuditRecord {
    /// Stamp a record with the current UTC time
    pub fn new(observed: ObservedInput, synthesized: SynthesizedFeatures, decision: &Decision) -> Self {
        Self {
            timestamp: Utc::now(),
            observed,
            probability: decision.probability,
            verdict: decision.verdict,
            synthesized,
        }
    }

    /// Row text, without trailing newline
    pub fn to_csv_row(&self) -> String {
        let mut fields: Vec<String> = Vec::with_capacity(COLUMN_COUNT);
        fields.push(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
        fields.extend(self.observed.as_array().iter().map(f64::to_string));
        fields.push(self.probability.to_string());
        fields.push(self.verdict.as_str().to_string());
        fields.extend(self.synthesized.values().iter().map(f64::to_string));
        fields.join(",")
    }

    /// Parse a row written by [`AuditRecord::to_csv_row`]
    pub fn from_csv_row(line: &str, line_no: usize) -> Result<Self, AuditError> {
        let malformed = |reason: String| AuditError::Malformed { line: line_no, reason };

        let fields: Vec<&str> = line.trim_end().split(',').collect();
        if fields.len() != COLUMN_COUNT {
            return Err(malformed(format!(
                "expected {} columns, got {}",
                COLUMN_COUNT,
                fields.len()
            )));
        }

        let number = |idx: usize| -> Result<f64, AuditError> {
            fields[idx]
                .parse::<f64>()
                .map_err(|e| malformed(format!("column {}: {}", idx, e)))
        };

        let timestamp = DateTime::parse_from_rfc3339(fields[0])
            .map_err(|e| malformed(format!("timestamp: {}", e)))?
            .with_timezone(&Utc);

        let mut observed = [0.0; 6];
        for (i, slot) in observed.iter_mut().enumerate() {
            *slot = number(1 + i)?;
        }

        let probability = number(7)?;
        let verdict = match fields[8] {
            "Fraud" => Verdict::Fraud,
            "Legit" => Verdict::Legit,
            other => return Err(malformed(format!("unknown label '{}'", other))),
        };

        let mut synthesized = [0.0; SYNTHESIZED_COUNT];
        for (i, slot) in synthesized.iter_mut().enumerate() {
            *slot = number(9 + i)?;
        }

        Ok(Self {
            timestamp,
            observed: ObservedInput::from_array(observed),
            probability,
            verdict,
            synthesized: SynthesizedFeatures(synthesized),
        })
    }
}
