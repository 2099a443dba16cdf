//! Statement execution over one live connection.
//!
//! [`MssqlDataSource`] owns the connection, asks the generator for SQL,
//! executes it through the driver, coerces result cells by the driver's
//! reported column types, and translates native error codes into the
//! [`Error`](crate::error::Error) taxonomy — once, here, and nowhere else.

use std::time::Instant;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::criteria::{Aggregate, Collection, Criteria, Value, Values};
use crate::driver::{Column, Connection, Driver, DriverError, ResultSet};
use crate::error::{Error, Result};
use crate::generator::{MssqlGenerator, SqlGenerator};

/// A result row: insertion-ordered mapping from column name to coerced
/// value. Produced fresh per query; rows share nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, value)| value)
    }

    /// The first cell, for single-scalar results such as counts.
    pub fn scalar(&self) -> Option<&Value> {
        self.columns.first().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn push(&mut self, name: String, value: Value) {
        self.columns.push((name, value));
    }
}

/// Data source adapter for MSSQL over ODBC.
///
/// Owns exactly one live connection and is not meant to be shared across
/// concurrent callers: every executing operation takes `&mut self`, and the
/// insert-then-identity sequence in [`save`](Self::save) relies on no other
/// statement interleaving on this connection. Use one adapter per
/// concurrent unit of work; pooling is the caller's concern.
///
/// Lifecycle: construction connects (or fails with a translated error),
/// [`begin_transaction`](Self::begin_transaction) /
/// [`commit`](Self::commit) / [`rollback`](Self::rollback) bracket a
/// single-level transaction. There is no client-side transaction-state
/// guard: misuse is reported by the driver.
#[derive(Debug)]
pub struct MssqlDataSource<C: Connection> {
    connection: C,
    generator: MssqlGenerator,
}

impl<C: Connection> MssqlDataSource<C> {
    /// Open a connection through `driver`. On failure the native error is
    /// translated and no adapter value exists.
    pub fn connect<D>(driver: &D, dsn: &str, user: &str, password: &str) -> Result<Self>
    where
        D: Driver<Conn = C>,
    {
        let connection = driver.connect(dsn, user, password).map_err(translate)?;
        Ok(Self {
            connection,
            generator: MssqlGenerator::new(),
        })
    }

    pub fn generator(&self) -> &MssqlGenerator {
        &self.generator
    }

    /// Execute `sql` and return coerced rows. Parameters, when present, are
    /// interpolated through the generator's escaping before execution.
    pub fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let sql = self.prepare(sql, params)?;
        let start = Instant::now();
        let mut result = self.connection.execute(&sql).map_err(translate)?;
        let columns = result.columns().to_vec();
        let mut rows = Vec::new();
        while let Some(cells) = result.fetch() {
            rows.push(coerce_row(&columns, cells)?);
        }
        debug!(
            sql = %sql,
            elapsed_ms = start.elapsed().as_millis() as u64,
            rows = rows.len(),
            "query"
        );
        Ok(rows)
    }

    /// Execute `sql` and return the affected-row count. Zero affected rows
    /// is a successful outcome, not an error.
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let sql = self.prepare(sql, params)?;
        let start = Instant::now();
        let result = self.connection.execute(&sql).map_err(translate)?;
        let affected = result.rows_affected();
        debug!(
            sql = %sql,
            elapsed_ms = start.elapsed().as_millis() as u64,
            affected,
            "execute"
        );
        Ok(affected)
    }

    pub fn find(&mut self, criteria: &Criteria) -> Result<Vec<Row>> {
        let sql = self.generator.generate_select(criteria)?;
        self.query(&sql, &[])
    }

    pub fn count(&mut self, criteria: &Criteria) -> Result<i64> {
        let sql = self.generator.generate_count(criteria)?;
        let rows = self.query(&sql, &[])?;
        match rows.first().and_then(Row::scalar) {
            Some(Value::Int(n)) => Ok(*n),
            other => Err(Error::Query(format!(
                "count did not return an integer scalar: {:?}",
                other
            ))),
        }
    }

    /// Run an aggregate and return its scalar cell, `Value::Null` when the
    /// result set is empty.
    pub fn aggregate(&mut self, aggregate: &Aggregate, criteria: &Criteria) -> Result<Value> {
        let sql = self.generator.generate_aggregate(aggregate, criteria)?;
        let rows = self.query(&sql, &[])?;
        Ok(rows
            .first()
            .and_then(Row::scalar)
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Insert `values`, then fetch the identity generated for the new row
    /// on the same connection. Returns `Some(id)` for a non-null, non-zero
    /// integer identity, `None` otherwise (e.g. the table has no identity
    /// column).
    ///
    /// The identity fetch is connection-scoped: no other statement may run
    /// on this connection between the insert and the fetch. `&mut self`
    /// enforces that within one adapter; sharing the underlying connection
    /// elsewhere breaks the contract.
    ///
    /// `sequence` exists for interface parity with sequence-based dialects
    /// and is ignored here.
    pub fn save(
        &mut self,
        values: &Values,
        collection: &Collection,
        sequence: Option<&str>,
    ) -> Result<Option<i64>> {
        let _ = sequence;
        let sql = self.generator.generate_insert(values, collection)?;
        self.execute(&sql, &[])?;
        let rows = self.query("SELECT @@IDENTITY AS ID", &[])?;
        match rows.first().and_then(Row::scalar) {
            Some(Value::Int(id)) if *id != 0 => Ok(Some(*id)),
            _ => Ok(None),
        }
    }

    /// Insert several rows in one statement. No identities are reported.
    pub fn save_multiple(&mut self, rows: &[Values], collection: &Collection) -> Result<()> {
        let sql = self.generator.generate_multiple_insert(rows, collection)?;
        self.execute(&sql, &[])?;
        Ok(())
    }

    pub fn update(&mut self, values: &Values, criteria: &Criteria) -> Result<u64> {
        let sql = self.generator.generate_update(values, criteria)?;
        self.execute(&sql, &[])
    }

    pub fn delete(&mut self, criteria: &Criteria) -> Result<u64> {
        let sql = self.generator.generate_delete(criteria)?;
        self.execute(&sql, &[])
    }

    pub fn begin_transaction(&mut self) -> Result<()> {
        self.execute("BEGIN TRANSACTION", &[]).map(|_| ())
    }

    pub fn commit(&mut self) -> Result<()> {
        self.execute("COMMIT TRANSACTION", &[]).map(|_| ())
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.execute("ROLLBACK TRANSACTION", &[]).map(|_| ())
    }

    fn prepare(&self, sql: &str, params: &[Value]) -> Result<String> {
        if params.is_empty() {
            Ok(sql.to_string())
        } else {
            self.generator.interpolate(sql, params)
        }
    }
}

/// Translate a native error into the taxonomy. Called exactly once per
/// failure, at this boundary; nothing above re-interprets native codes.
fn translate(err: DriverError) -> Error {
    match err.state.as_str() {
        "IM002" => Error::Connection(format!(
            "data source name not found and no default driver specified: {}",
            err.message
        )),
        "IM003" => Error::Connection(format!(
            "specified driver could not be loaded: {}",
            err.message
        )),
        "IM014" => Error::Connection(format!("invalid name of file DSN: {}", err.message)),
        "IM015" => Error::Connection(format!("corrupt file data source: {}", err.message)),
        // The driver reports syntax errors and access violations under the
        // same code; the ambiguity is preserved.
        "42000" => Error::Auth(err.message),
        "S1000" | "23000" => Error::Constraint(err.message),
        "S0002" => Error::UnknownCollection(err.message),
        "07001" => Error::UnknownField(err.message),
        _ => Error::Query(err.message),
    }
}

fn coerce_row(columns: &[Column], cells: Vec<Option<String>>) -> Result<Row> {
    let mut row = Row::default();
    for (column, cell) in columns.iter().zip(cells) {
        let value = match cell {
            None => Value::Null,
            Some(raw) => coerce(column, raw)?,
        };
        row.push(column.name.clone(), value);
    }
    Ok(row)
}

/// Apply the native-type coercion table to one non-null cell. The target
/// type is determined by the reported column type alone, never by
/// inspecting the value.
fn coerce(column: &Column, raw: String) -> Result<Value> {
    match column.type_code.as_str() {
        "BYTE" | "COUNTER" | "INTEGER" | "SMALLINT" => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| malformed(column, &raw)),
        "CURRENCY" | "DECIMAL" | "REAL" | "DOUBLE" => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| malformed(column, &raw)),
        "BIT" => Ok(Value::Bool(raw == "1")),
        "DATETIME" => parse_datetime(&raw)
            .map(Value::Timestamp)
            .ok_or_else(|| malformed(column, &raw)),
        _ => Ok(Value::String(raw)),
    }
}

/// The driver's textual DATETIME, read as a UTC instant.
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|dt| dt.and_utc())
}

fn malformed(column: &Column, raw: &str) -> Error {
    Error::Query(format!(
        "driver returned malformed {} value for column '{}': {:?}",
        column.type_code, column.name, raw
    ))
}
