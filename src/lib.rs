//! # criql — criteria in, SQL out, rows back.
//!
//! `criql` turns an engine-independent [`Criteria`](criteria::Criteria)
//! description of a query into dialect-correct SQL text, executes it over a
//! native driver connection, and maps result rows and native error codes
//! back into a normalized, engine-independent shape.
//!
//! ## Quick example
//!
//! ```rust,ignore
//! use criql::prelude::*;
//!
//! let mut db = MssqlDataSource::connect(&driver, "Sales", "app", "secret")?;
//!
//! let recent = Criteria::on("orders")
//!     .field("id")
//!     .field("total")
//!     .filter(Predicate::eq("status", "open"))
//!     .order_by("placed_at", SortOrder::Desc)
//!     .limit(10);
//!
//! for row in db.find(&recent)? {
//!     println!("{:?}", row.get("total"));
//! }
//! ```
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`criteria`] | Engine-independent query model: collections, fields, predicates, values |
//! | [`generator`] | Renders criteria as dialect-correct SQL; owns all escaping |
//! | [`driver`]    | Traits the native connection library implements |
//! | [`adapter`]   | Executes SQL, coerces rows, translates native errors |
//!
//! Every value that reaches generated SQL passes through the generator's
//! escaping; the adapter never interpolates caller data itself.

pub mod adapter;
pub mod criteria;
pub mod driver;
pub mod error;
pub mod generator;

pub mod prelude {
    pub use crate::adapter::{MssqlDataSource, Row};
    pub use crate::criteria::{
        Aggregate, AggregateOp, Collection, Criteria, Field, Join, JoinKind, Operator, Order,
        Predicate, SortOrder, Value, Values,
    };
    pub use crate::driver::{Column, Connection, Driver, DriverError, ResultSet};
    pub use crate::error::{Error, Result};
    pub use crate::generator::{MssqlGenerator, SqlGenerator};
}
