use serde::{Deserialize, Serialize};

use super::{Field, Value};

/// Comparison operator between a field and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl Operator {
    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
        }
    }
}

/// A filter tree, rendered into the WHERE clause.
///
/// `And`/`Or` group subtrees; `Columns` compares two column references and
/// is the usual join-condition form. `Regex` is part of the model even
/// though not every dialect can render it — refusal happens in the
/// generator, at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Compare {
        field: Field,
        op: Operator,
        value: Value,
    },
    Columns {
        left: Field,
        right: Field,
    },
    In {
        field: Field,
        values: Vec<Value>,
    },
    IsNull(Field),
    IsNotNull(Field),
    Regex {
        field: Field,
        pattern: String,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<Field>, op: Operator, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Eq, value)
    }

    pub fn ne(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Ne, value)
    }

    pub fn gt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Gt, value)
    }

    pub fn gte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Gte, value)
    }

    pub fn lt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Lt, value)
    }

    pub fn lte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Lte, value)
    }

    pub fn like(field: impl Into<Field>, pattern: impl Into<String>) -> Self {
        Self::compare(field, Operator::Like, Value::String(pattern.into()))
    }

    /// Column-to-column equality, e.g. a join condition.
    pub fn columns(left: impl Into<Field>, right: impl Into<Field>) -> Self {
        Predicate::Columns {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn in_list(
        field: impl Into<Field>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Predicate::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(field: impl Into<Field>) -> Self {
        Predicate::IsNull(field.into())
    }

    pub fn is_not_null(field: impl Into<Field>) -> Self {
        Predicate::IsNotNull(field.into())
    }

    pub fn regex(field: impl Into<Field>, pattern: impl Into<String>) -> Self {
        Predicate::Regex {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Combine with another predicate under AND, flattening existing AND
    /// groups.
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut items) => {
                items.push(other);
                Predicate::And(items)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// Combine with another predicate under OR, flattening existing OR
    /// groups.
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut items) => {
                items.push(other);
                Predicate::Or(items)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }
}
