use super::SqlGenerator;
use crate::criteria::Field;
use crate::error::{Error, Result};

/// SQL generator for MSSQL reached over ODBC.
///
/// Identifiers are wrapped in square brackets, INSERT headers carry an
/// explicit column list (the engine does not infer columns positionally),
/// and paging uses OFFSET/FETCH. The driver exposes no regex predicate, so
/// criteria containing one fail at render time, before execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlGenerator;

impl MssqlGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for MssqlGenerator {
    fn escape_identifier(&self, name: &str) -> String {
        format!("[{}]", name)
    }

    fn insert_columns(&self, fields: &[&str]) -> Option<String> {
        let columns: Vec<String> = fields.iter().map(|f| self.escape_identifier(f)).collect();
        Some(format!("({})", columns.join(", ")))
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        // OFFSET/FETCH instead of LIMIT; T-SQL expects an ORDER BY alongside.
        let mut sql = String::new();
        if limit.is_some() || offset.is_some() {
            sql.push_str(&format!(" OFFSET {} ROWS", offset.unwrap_or(0)));
            if let Some(n) = limit {
                sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", n));
            }
        }
        sql
    }

    fn render_regex(&self, _field: &Field, _pattern: &str) -> Result<String> {
        Err(Error::QuerySyntax(
            "regular expressions not supported in ODBC".to_string(),
        ))
    }
}
