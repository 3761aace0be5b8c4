//! Audit Module - append-only decision trail
//!
//! One CSV row per successfully scored request. Lỗi ghi log không làm
//! fail request, nhưng luôn được log và đếm.
//!
//! ## Structure
//! - `record.rs` - AuditRecord + CSV row format
//! - `writer.rs` - AuditLog, serialized appends
//! - `replay.rs` - read back and re-verify synthesized values

pub mod record;
pub mod writer;
pub mod replay;


pub use record::{header, AuditRecord, COLUMN_COUNT};
pub use replay::{read_records, verify_file, verify_record, ReplayReport};
pub use writer::{AuditLog, AuditStats, LOCK_TIMEOUT};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit writer busy for longer than {0:?}")]
    LockTimeout(std::time::Duration),

    #[error("audit file {0} has an unexpected header")]
    HeaderMismatch(String),

    #[error("malformed audit row at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
