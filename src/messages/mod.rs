pub mod condition;
pub mod format;
pub mod html;
pub mod pool;
pub mod recency;
pub mod selector;
pub mod tables;

use thiserror::Error;

/// Errors raised by the announcement message core.
///
/// `NoCandidates` and `InvalidPool` are configuration defects: the engine logs
/// them and skips the announcement. `MissingField` and the placeholder errors
/// are programming errors in a template or predicate and are never coerced
/// into a default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("pool '{pool}' is invalid: {reason}")]
    InvalidPool { pool: String, reason: String },
    #[error("pool '{pool}' has no entry applicable to this {kind} condition")]
    NoCandidates { pool: String, kind: &'static str },
    #[error("field '{field}' is not available on a {kind} condition")]
    MissingField { field: &'static str, kind: &'static str },
    #[error("template references unknown placeholder '{{{name}}}'")]
    UnknownPlaceholder { name: String },
    #[error("template has an unclosed placeholder starting at byte {offset}")]
    UnclosedPlaceholder { offset: usize },
    #[error("death has no killers")]
    NoKiller,
    #[error("unknown vocation '{0}'")]
    UnknownVocation(String),
}

pub type Result<T> = std::result::Result<T, MessageError>;
