//! SQL generation.
//!
//! [`SqlGenerator`] is the clause-assembly contract. Filter, ordering,
//! limit, and statement shapes are implemented once as default methods; a
//! dialect implements the trait and overrides only the identifier quoting,
//! literal forms, and header formats it actually changes. Generation is a
//! pure transformation — no I/O, no connection state.
//!
//! Every caller-supplied value is rendered through [`SqlGenerator::escape_value`];
//! nothing else in the pipeline interpolates raw data into SQL text.

mod mssql;
#[cfg(test)]
mod tests;

pub use mssql::MssqlGenerator;

use crate::criteria::{
    Aggregate, Collection, Criteria, Field, Join, Order, Predicate, Value, Values,
};
use crate::error::{Error, Result};

pub trait SqlGenerator {
    /// Wrap a name in the dialect's identifier-quoting delimiters.
    fn escape_identifier(&self, name: &str) -> String;

    /// The dialect's boolean literal tokens.
    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// Render the row-paging tail.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    /// Explicit column list for the INSERT header, if the dialect requires
    /// one. `None` lets the engine infer columns positionally.
    fn insert_columns(&self, fields: &[&str]) -> Option<String> {
        let _ = fields;
        None
    }

    /// Render a regular-expression predicate. Dialects without a native
    /// regex operator override this to fail.
    fn render_regex(&self, field: &Field, pattern: &str) -> Result<String> {
        Ok(format!(
            "{} ~ {}",
            self.escape_field(field),
            self.escape_string(pattern)
        ))
    }

    /// Render a field reference, prefixed by its collection's alias or name
    /// when qualified.
    fn escape_field(&self, field: &Field) -> String {
        match &field.collection {
            Some(collection) => format!(
                "{}.{}",
                self.escape_identifier(collection.reference()),
                self.escape_identifier(&field.name)
            ),
            None => self.escape_identifier(&field.name),
        }
    }

    /// Single-quote a string literal, doubling embedded quotes. This is the
    /// only text transformation applied to string data.
    fn escape_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Render a literal value. One rule per variant: string-like values all
    /// pass through [`escape_string`], numerics render bare, timestamps are
    /// UTC by construction and render as `YYYY-MM-DD HH:MM:SS`.
    fn escape_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b).to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => self.escape_string(s),
            Value::Timestamp(ts) => {
                self.escape_string(&ts.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            Value::Uuid(u) => self.escape_string(&u.to_string()),
        }
    }

    /// Render a collection for a FROM or JOIN clause.
    fn escape_collection(&self, collection: &Collection) -> String {
        match &collection.alias {
            Some(alias) => format!(
                "{} AS {}",
                self.escape_identifier(&collection.name),
                self.escape_identifier(alias)
            ),
            None => self.escape_identifier(&collection.name),
        }
    }

    /// Render a predicate tree. AND joins bare (it binds tighter than OR);
    /// multi-term OR groups are parenthesized.
    fn where_clause(&self, predicate: &Predicate) -> Result<String> {
        match predicate {
            Predicate::Compare { field, op, value } => Ok(format!(
                "{} {} {}",
                self.escape_field(field),
                op.symbol(),
                self.escape_value(value)
            )),
            Predicate::Columns { left, right } => Ok(format!(
                "{} = {}",
                self.escape_field(left),
                self.escape_field(right)
            )),
            Predicate::In { field, values } => {
                let list: Vec<String> = values.iter().map(|v| self.escape_value(v)).collect();
                Ok(format!(
                    "{} IN ({})",
                    self.escape_field(field),
                    list.join(", ")
                ))
            }
            Predicate::IsNull(field) => Ok(format!("{} IS NULL", self.escape_field(field))),
            Predicate::IsNotNull(field) => {
                Ok(format!("{} IS NOT NULL", self.escape_field(field)))
            }
            Predicate::Regex { field, pattern } => self.render_regex(field, pattern),
            Predicate::And(items) => {
                let rendered = self.render_group(items)?;
                Ok(rendered.join(" AND "))
            }
            Predicate::Or(items) => {
                let rendered = self.render_group(items)?;
                if rendered.len() > 1 {
                    Ok(format!("({})", rendered.join(" OR ")))
                } else {
                    Ok(rendered.join(" OR "))
                }
            }
            Predicate::Not(inner) => Ok(format!("NOT ({})", self.where_clause(inner)?)),
        }
    }

    #[doc(hidden)]
    fn render_group(&self, items: &[Predicate]) -> Result<Vec<String>> {
        if items.is_empty() {
            return Err(Error::QuerySyntax("empty predicate group".to_string()));
        }
        items.iter().map(|p| self.where_clause(p)).collect()
    }

    /// Render the ORDER BY tail, empty when there is nothing to order by.
    fn order_clause(&self, order: &[Order]) -> String {
        if order.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = order
            .iter()
            .map(|o| format!("{} {}", self.escape_field(&o.field), o.direction.keyword()))
            .collect();
        format!(" ORDER BY {}", terms.join(", "))
    }

    /// Render the JOIN clauses.
    fn join_clause(&self, joins: &[Join]) -> Result<String> {
        let mut sql = String::new();
        for join in joins {
            sql.push_str(&format!(
                " {} {} ON {}",
                join.kind.keyword(),
                self.escape_collection(&join.collection),
                self.where_clause(&join.on)?
            ));
        }
        Ok(sql)
    }

    fn generate_select(&self, criteria: &Criteria) -> Result<String> {
        let mut sql = String::from("SELECT ");
        if criteria.fields.is_empty() {
            sql.push('*');
        } else {
            let fields: Vec<String> = criteria
                .fields
                .iter()
                .map(|f| self.escape_field(f))
                .collect();
            sql.push_str(&fields.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.escape_collection(&criteria.collection));
        sql.push_str(&self.join_clause(&criteria.joins)?);
        if let Some(predicate) = &criteria.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause(predicate)?);
        }
        sql.push_str(&self.order_clause(&criteria.order));
        sql.push_str(&self.limit_offset(criteria.limit, criteria.offset));
        Ok(sql)
    }

    /// COUNT keeps filters and joins; ordering and paging do not apply.
    fn generate_count(&self, criteria: &Criteria) -> Result<String> {
        let mut sql = String::from("SELECT COUNT(*) FROM ");
        sql.push_str(&self.escape_collection(&criteria.collection));
        sql.push_str(&self.join_clause(&criteria.joins)?);
        if let Some(predicate) = &criteria.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause(predicate)?);
        }
        Ok(sql)
    }

    fn generate_aggregate(&self, aggregate: &Aggregate, criteria: &Criteria) -> Result<String> {
        let mut sql = format!(
            "SELECT {}({}) FROM ",
            aggregate.op.function(),
            self.escape_field(&aggregate.field)
        );
        sql.push_str(&self.escape_collection(&criteria.collection));
        sql.push_str(&self.join_clause(&criteria.joins)?);
        if let Some(predicate) = &criteria.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause(predicate)?);
        }
        Ok(sql)
    }

    /// INSERT header: target name plus the dialect's column-list rendering.
    /// The target never carries an alias.
    #[doc(hidden)]
    fn insert_header(&self, fields: &[&str], collection: &Collection) -> String {
        let mut sql = format!("INSERT INTO {}", self.escape_identifier(&collection.name));
        if let Some(columns) = self.insert_columns(fields) {
            sql.push(' ');
            sql.push_str(&columns);
        }
        sql
    }

    fn generate_insert(&self, values: &Values, collection: &Collection) -> Result<String> {
        if values.is_empty() {
            return Err(Error::QuerySyntax("insert with no values".to_string()));
        }
        let fields: Vec<&str> = values.fields().collect();
        let mut sql = self.insert_header(&fields, collection);
        let rendered: Vec<String> = values.iter().map(|(_, v)| self.escape_value(v)).collect();
        sql.push_str(" VALUES (");
        sql.push_str(&rendered.join(", "));
        sql.push(')');
        Ok(sql)
    }

    /// Multi-row INSERT. Column order comes from the first row; later rows
    /// may omit a field (rendered NULL) but may not introduce new ones.
    fn generate_multiple_insert(&self, rows: &[Values], collection: &Collection) -> Result<String> {
        let first = rows
            .first()
            .ok_or_else(|| Error::QuerySyntax("multiple insert with no rows".to_string()))?;
        if first.is_empty() {
            return Err(Error::QuerySyntax("insert with no values".to_string()));
        }
        let fields: Vec<&str> = first.fields().collect();
        for (index, row) in rows.iter().enumerate() {
            for name in row.fields() {
                if !fields.contains(&name) {
                    return Err(Error::QuerySyntax(format!(
                        "row {} introduces field '{}' absent from the first row",
                        index, name
                    )));
                }
            }
        }
        let mut sql = self.insert_header(&fields, collection);
        sql.push_str(" VALUES ");
        let tuples: Vec<String> = rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = fields
                    .iter()
                    .map(|field| match row.get(field) {
                        Some(value) => self.escape_value(value),
                        None => "NULL".to_string(),
                    })
                    .collect();
                format!("({})", cells.join(", "))
            })
            .collect();
        sql.push_str(&tuples.join(", "));
        Ok(sql)
    }

    fn generate_update(&self, values: &Values, criteria: &Criteria) -> Result<String> {
        if values.is_empty() {
            return Err(Error::QuerySyntax("update with no values".to_string()));
        }
        let mut sql = format!(
            "UPDATE {} SET ",
            self.escape_identifier(&criteria.collection.name)
        );
        let assignments: Vec<String> = values
            .iter()
            .map(|(field, value)| {
                format!(
                    "{} = {}",
                    self.escape_identifier(field),
                    self.escape_value(value)
                )
            })
            .collect();
        sql.push_str(&assignments.join(", "));
        if let Some(predicate) = &criteria.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause(predicate)?);
        }
        Ok(sql)
    }

    fn generate_delete(&self, criteria: &Criteria) -> Result<String> {
        let mut sql = format!(
            "DELETE FROM {}",
            self.escape_identifier(&criteria.collection.name)
        );
        if let Some(predicate) = &criteria.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause(predicate)?);
        }
        Ok(sql)
    }

    /// Substitute positional `?` placeholders with escaped values. A `?`
    /// inside a single-quoted literal is text, not a placeholder; arity
    /// mismatch in either direction is an error.
    fn interpolate(&self, template: &str, params: &[Value]) -> Result<String> {
        let mut sql = String::with_capacity(template.len());
        let mut remaining = params.iter();
        let mut in_string = false;
        for ch in template.chars() {
            match ch {
                '\'' => {
                    in_string = !in_string;
                    sql.push(ch);
                }
                '?' if !in_string => {
                    let value = remaining.next().ok_or_else(|| {
                        Error::QuerySyntax(
                            "more placeholders than parameters".to_string(),
                        )
                    })?;
                    sql.push_str(&self.escape_value(value));
                }
                _ => sql.push(ch),
            }
        }
        if remaining.next().is_some() {
            return Err(Error::QuerySyntax(
                "more parameters than placeholders".to_string(),
            ));
        }
        Ok(sql)
    }
}
