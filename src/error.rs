//! Error types for criql.

use thiserror::Error;

/// The closed error taxonomy for criteria execution.
///
/// Native driver codes are translated into these categories exactly once, at
/// the adapter's execution boundary. [`Error::QuerySyntax`] is the exception:
/// the generator raises it directly, before any execution is attempted, when
/// a criteria asks for something the dialect cannot express.
#[derive(Debug, Error)]
pub enum Error {
    /// Data source not found, driver not loadable, or a bad connection
    /// descriptor.
    #[error("connection error: {0}")]
    Connection(String),

    /// The driver reports SQL syntax errors and access violations under one
    /// code, so this category covers both causes.
    #[error("syntax error or access violation: {0}")]
    Auth(String),

    /// Integrity constraint violation. Carries the native message verbatim.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Statement referenced a nonexistent table or view.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Statement referenced a nonexistent column.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The dialect cannot render the requested construct.
    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    /// Fallback for unrecognized native error codes.
    #[error("query error: {0}")]
    Query(String),
}

/// Result type alias for criql operations.
pub type Result<T> = std::result::Result<T, Error>;
