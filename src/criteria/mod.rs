//! Engine-independent query model.
//!
//! A [`Criteria`] describes what to fetch — target collection, predicate
//! tree, projected fields, ordering, paging, joins — without committing to
//! any dialect's SQL. Criteria are immutable once handed to a generator;
//! builders consume and return `self`.

mod predicate;
mod values;

pub use predicate::{Operator, Predicate};
pub use values::Value;

use serde::{Deserialize, Serialize};

/// A named source table or view, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub alias: Option<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// The identifier that qualified fields resolve against: the alias when
    /// set, the name otherwise.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl From<&str> for Collection {
    fn from(name: &str) -> Self {
        Collection::new(name)
    }
}

impl From<String> for Collection {
    fn from(name: String) -> Self {
        Collection::new(name)
    }
}

/// A column reference, optionally qualified by a collection for
/// disambiguation in joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub collection: Option<Collection>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
        }
    }

    pub fn qualified(name: impl Into<String>, collection: impl Into<Collection>) -> Self {
        Self {
            name: name.into(),
            collection: Some(collection.into()),
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

/// Aggregate function applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateOp {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateOp {
    pub fn function(&self) -> &'static str {
        match self {
            AggregateOp::Count => "COUNT",
            AggregateOp::Sum => "SUM",
            AggregateOp::Avg => "AVG",
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
        }
    }
}

/// An aggregate operation paired with its target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub op: AggregateOp,
    pub field: Field,
}

impl Aggregate {
    pub fn new(op: AggregateOp, field: impl Into<Field>) -> Self {
        Self {
            op,
            field: field.into(),
        }
    }

    pub fn sum(field: impl Into<Field>) -> Self {
        Self::new(AggregateOp::Sum, field)
    }

    pub fn avg(field: impl Into<Field>) -> Self {
        Self::new(AggregateOp::Avg, field)
    }

    pub fn min(field: impl Into<Field>) -> Self {
        Self::new(AggregateOp::Min, field)
    }

    pub fn max(field: impl Into<Field>) -> Self {
        Self::new(AggregateOp::Max, field)
    }

    pub fn count(field: impl Into<Field>) -> Self {
        Self::new(AggregateOp::Count, field)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub field: Field,
    pub direction: SortOrder,
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// A join onto another collection with an ON condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub collection: Collection,
    pub on: Predicate,
}

impl Join {
    pub fn new(kind: JoinKind, collection: impl Into<Collection>, on: Predicate) -> Self {
        Self {
            kind,
            collection: collection.into(),
            on,
        }
    }

    pub fn inner(collection: impl Into<Collection>, on: Predicate) -> Self {
        Self::new(JoinKind::Inner, collection, on)
    }

    pub fn left(collection: impl Into<Collection>, on: Predicate) -> Self {
        Self::new(JoinKind::Left, collection, on)
    }

    pub fn right(collection: impl Into<Collection>, on: Predicate) -> Self {
        Self::new(JoinKind::Right, collection, on)
    }
}

/// Ordered field → value payload for inserts and updates.
///
/// Keys are unique; setting an existing key replaces its value in place,
/// keeping the original position. Insertion order defines the column order
/// of generated inserts, including multi-row inserts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An engine-independent query description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub collection: Collection,
    /// Projected fields; empty means all columns.
    pub fields: Vec<Field>,
    #[serde(default)]
    pub joins: Vec<Join>,
    pub predicate: Option<Predicate>,
    #[serde(default)]
    pub order: Vec<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Criteria {
    /// Start a criteria against the given collection.
    pub fn on(collection: impl Into<Collection>) -> Self {
        Self {
            collection: collection.into(),
            fields: vec![],
            joins: vec![],
            predicate: None,
            order: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add a filter; successive calls combine under AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn order_by(mut self, field: impl Into<Field>, direction: SortOrder) -> Self {
        self.order.push(Order {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_keeps_insertion_order() {
        let values = Values::new().set("b", 1).set("a", 2).set("c", 3);
        let fields: Vec<&str> = values.fields().collect();
        assert_eq!(fields, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_values_replaces_without_reordering() {
        let values = Values::new().set("b", 1).set("a", 2).set("b", 9);
        let fields: Vec<&str> = values.fields().collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(values.get("b"), Some(&Value::Int(9)));
    }

    #[test]
    fn test_filter_merges_under_and() {
        let criteria = Criteria::on("users")
            .filter(Predicate::eq("active", true))
            .filter(Predicate::gt("age", 21));
        match criteria.predicate {
            Some(Predicate::And(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_collection_reference_prefers_alias() {
        assert_eq!(Collection::aliased("Orders", "o").reference(), "o");
        assert_eq!(Collection::new("Orders").reference(), "Orders");
    }
}
