//! Audit Replay - re-derive V5..V28 from logged inputs
//!
//! The synthesized values are a pure function of the observed columns, so
//! every row can be checked offline against a fresh imputation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::logic::features::impute::synthesize;
use super::record::{header, AuditRecord};
use super::AuditError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Non-blank rows after the header
    pub total: usize,
    pub verified: usize,
    /// 1-based line numbers whose synthesized values don't reproduce
    pub mismatched_lines: Vec<usize>,
    /// 1-based line numbers that don't parse as a row
    pub malformed_lines: Vec<usize>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched_lines.is_empty() && self.malformed_lines.is_empty()
    }
}

type ParsedRow = (usize, Result<AuditRecord, AuditError>);

/// Parse every row, keeping per-row failures. Only I/O errors and a foreign
/// header fail the whole file.
fn scan(path: &Path) -> Result<Vec<ParsedRow>, AuditError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let Some(first) = lines.next() else {
        return Ok(Vec::new());
    };
    if first?.trim_end() != header() {
        return Err(AuditError::HeaderMismatch(path.display().to_string()));
    }

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // header is line 1
        let line_no = idx + 2;
        rows.push((line_no, AuditRecord::from_csv_row(&line, line_no)));
    }

    Ok(rows)
}

/// Read every record from an audit file; the first malformed row is an error
pub fn read_records(path: &Path) -> Result<Vec<AuditRecord>, AuditError> {
    scan(path)?.into_iter().map(|(_, row)| row).collect()
}

/// True when the logged V5..V28 match a fresh imputation
pub fn verify_record(record: &AuditRecord) -> bool {
    synthesize(&record.observed) == record.synthesized
}

/// Verify a whole audit file. Malformed rows are reported, not fatal.
pub fn verify_file(path: &Path) -> Result<ReplayReport, AuditError> {
    let rows = scan(path)?;
    let mut report = ReplayReport { total: rows.len(), ..Default::default() };

    for (line_no, row) in rows {
        match row {
            Ok(record) if verify_record(&record) => report.verified += 1,
            Ok(_) => report.mismatched_lines.push(line_no),
            Err(e) => {
                log::warn!("Skipping unreadable audit row: {}", e);
                report.malformed_lines.push(line_no);
            }
        }
    }

    log::info!(
        "Audit replay of {}: {}/{} rows reproduce, {} malformed",
        path.display(),
        report.verified,
        report.total,
        report.malformed_lines.len()
    );
    Ok(report)
}
