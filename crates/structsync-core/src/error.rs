//! Error types for reconciliation.

/// A document value that has no deterministic canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// NaN or an infinity.
    #[error("non-finite number at {path}")]
    NonFiniteNumber { path: String },

    /// A scalar kind outside the JSON data model (e.g. YAML binary).
    #[error("unsupported {kind} scalar at {path}")]
    UnsupportedScalar { kind: &'static str, path: String },
}

/// The identity block under `self` is missing or incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedDocumentError {
    #[error("document body has no `self` block")]
    MissingSelf,

    #[error("`self` must be a mapping")]
    SelfNotMapping,

    #[error("`self.{field}` is missing")]
    MissingField { field: &'static str },

    #[error("`self.{field}` must be a string")]
    NotAString { field: &'static str },

    #[error("`self.{field}` is empty")]
    EmptyField { field: &'static str },
}

/// Any failure while classifying one local entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("malformed document: {0}")]
    Malformed(#[from] MalformedDocumentError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// A reconciliation run aborted on one local entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{label}: {source}")]
pub struct ReconcileError {
    /// The caller-supplied label of the offending entity.
    pub label: String,
    #[source]
    pub source: SchemaError,
}
