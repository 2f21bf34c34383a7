use thiserror::Error;

/// Why a single raw record could not become a node.
///
/// These never abort a build; they are collected in the build report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no usable id")]
    MissingId,
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("record {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
}
