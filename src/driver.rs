//! The native driver seam.
//!
//! The adapter does not speak any wire protocol itself: it drives an
//! implementation of these traits, provided by a native connection library.
//! A conforming driver reports failures as SQLSTATE-style codes with a
//! message, describes result columns as `(name, native type code)` pairs,
//! and returns cells as native text — the adapter coerces from there.

use std::fmt;

/// A failure reported by the native driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    /// SQLSTATE-style code, e.g. `23000` or `IM002`.
    pub state: String,
    /// Human-readable native message.
    pub message: String,
}

impl DriverError {
    pub fn new(state: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.state, self.message)
    }
}

impl std::error::Error for DriverError {}

/// Column metadata as described by the driver for one result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Native type code, e.g. `COUNTER`, `BIT`, `VARCHAR`.
    pub type_code: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_code: type_code.into(),
        }
    }
}

/// One executed statement's results.
pub trait ResultSet {
    /// Per-column name and native type code, in result order.
    fn columns(&self) -> &[Column];

    /// Rows affected, for statements without a result set.
    fn rows_affected(&self) -> u64;

    /// Fetch the next row, until exhausted. Cells are the driver's native
    /// text; `None` is SQL NULL.
    fn fetch(&mut self) -> Option<Vec<Option<String>>>;
}

/// A live connection. Statement execution is synchronous: the call blocks
/// until the driver produces a result set or an error.
pub trait Connection {
    type Rows: ResultSet;

    fn execute(&mut self, sql: &str) -> Result<Self::Rows, DriverError>;
}

/// Connection factory.
pub trait Driver {
    type Conn: Connection;

    fn connect(&self, dsn: &str, user: &str, password: &str) -> Result<Self::Conn, DriverError>;
}
