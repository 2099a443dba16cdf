//! Generator tests: escaping rules and full-statement assembly for the
//! MSSQL dialect.

use chrono::{DateTime, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{MssqlGenerator, SqlGenerator};
use crate::criteria::{
    Aggregate, Collection, Criteria, Field, Join, Predicate, SortOrder, Value, Values,
};
use crate::error::Error;

fn generator() -> MssqlGenerator {
    MssqlGenerator::new()
}

// --- identifiers and fields ---

#[test]
fn test_escape_identifier_brackets() {
    assert_eq!(generator().escape_identifier("Orders"), "[Orders]");
}

#[test]
fn test_escape_field_unqualified() {
    assert_eq!(generator().escape_field(&Field::new("Orders")), "[Orders]");
}

#[test]
fn test_escape_field_qualified_by_alias() {
    let field = Field::qualified("Orders", Collection::aliased("Orders", "o"));
    assert_eq!(generator().escape_field(&field), "[o].[Orders]");
}

#[test]
fn test_escape_field_qualified_by_name_when_no_alias() {
    let field = Field::qualified("id", Collection::new("users"));
    assert_eq!(generator().escape_field(&field), "[users].[id]");
}

// --- value escaping ---

#[test]
fn test_escape_string_doubles_quotes() {
    let g = generator();
    assert_eq!(g.escape_value(&Value::from("it's")), "'it''s'");
    assert_eq!(g.escape_value(&Value::from("O'Brien's")), "'O''Brien''s'");
}

#[test]
fn test_string_literal_round_trips() {
    let g = generator();
    for original in ["plain", "it's", "''", "a'b'c", "trailing'"] {
        let literal = g.escape_value(&Value::from(original));
        assert!(literal.starts_with('\'') && literal.ends_with('\''));
        let reparsed = literal[1..literal.len() - 1].replace("''", "'");
        assert_eq!(reparsed, original);
    }
}

#[test]
fn test_escape_timestamp_renders_utc() {
    let g = generator();
    let aware = DateTime::parse_from_rfc3339("2024-03-01T10:30:00-05:00").unwrap();
    assert_eq!(g.escape_value(&aware.into()), "'2024-03-01 15:30:00'");
}

#[test]
fn test_naive_and_aware_same_instant_render_identically() {
    let g = generator();
    let aware = DateTime::parse_from_rfc3339("2024-03-01T10:30:00-05:00").unwrap();
    let naive =
        NaiveDateTime::parse_from_str("2024-03-01 15:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(g.escape_value(&aware.into()), g.escape_value(&naive.into()));
}

#[test]
fn test_escape_bool_null_and_numerics() {
    let g = generator();
    assert_eq!(g.escape_value(&Value::Bool(true)), "TRUE");
    assert_eq!(g.escape_value(&Value::Bool(false)), "FALSE");
    assert_eq!(g.escape_value(&Value::Null), "NULL");
    assert_eq!(g.escape_value(&Value::Int(-7)), "-7");
    assert_eq!(g.escape_value(&Value::Float(3.5)), "3.5");
    assert_eq!(g.escape_value(&Value::Decimal(Decimal::new(1999, 2))), "19.99");
}

#[test]
fn test_escape_uuid_goes_through_string_path() {
    let g = generator();
    assert_eq!(
        g.escape_value(&Value::Uuid(Uuid::nil())),
        "'00000000-0000-0000-0000-000000000000'"
    );
}

// --- SELECT / COUNT / aggregate ---

#[test]
fn test_select_all() {
    let sql = generator()
        .generate_select(&Criteria::on("users"))
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [users]");
}

#[test]
fn test_select_full_statement() {
    let criteria = Criteria::on("users")
        .field("id")
        .field("email")
        .filter(Predicate::eq("active", true))
        .order_by("created_at", SortOrder::Desc)
        .limit(10);
    let sql = generator().generate_select(&criteria).unwrap();
    assert_eq!(
        sql,
        "SELECT [id], [email] FROM [users] WHERE [active] = TRUE \
         ORDER BY [created_at] DESC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn test_select_offset_without_limit() {
    let criteria = Criteria::on("users")
        .order_by("id", SortOrder::Asc)
        .offset(20);
    let sql = generator().generate_select(&criteria).unwrap();
    assert_eq!(sql, "SELECT * FROM [users] ORDER BY [id] ASC OFFSET 20 ROWS");
}

#[test]
fn test_select_with_join() {
    let orders = Collection::aliased("orders", "o");
    let customers = Collection::aliased("customers", "c");
    let criteria = Criteria::on(orders.clone()).join(Join::left(
        customers.clone(),
        Predicate::columns(
            Field::qualified("customer_id", orders),
            Field::qualified("id", customers),
        ),
    ));
    let sql = generator().generate_select(&criteria).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM [orders] AS [o] LEFT JOIN [customers] AS [c] \
         ON [o].[customer_id] = [c].[id]"
    );
}

#[test]
fn test_or_group_is_parenthesized() {
    let criteria = Criteria::on("users")
        .filter(Predicate::eq("status", "active").or(Predicate::eq("status", "pending")))
        .filter(Predicate::is_not_null("email"));
    let sql = generator().generate_select(&criteria).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM [users] WHERE ([status] = 'active' OR [status] = 'pending') \
         AND [email] IS NOT NULL"
    );
}

#[test]
fn test_in_list_and_not() {
    let criteria = Criteria::on("users")
        .filter(Predicate::in_list("status", ["a", "b"]).not());
    let sql = generator().generate_select(&criteria).unwrap();
    assert_eq!(sql, "SELECT * FROM [users] WHERE NOT ([status] IN ('a', 'b'))");
}

#[test]
fn test_count_keeps_filter_drops_order() {
    let criteria = Criteria::on("users")
        .filter(Predicate::gt("age", 21))
        .order_by("age", SortOrder::Asc)
        .limit(5);
    let sql = generator().generate_count(&criteria).unwrap();
    assert_eq!(sql, "SELECT COUNT(*) FROM [users] WHERE [age] > 21");
}

#[test]
fn test_aggregate() {
    let criteria = Criteria::on("orders").filter(Predicate::gt("total", 100));
    let sql = generator()
        .generate_aggregate(&Aggregate::sum("total"), &criteria)
        .unwrap();
    assert_eq!(sql, "SELECT SUM([total]) FROM [orders] WHERE [total] > 100");
}

// --- INSERT / UPDATE / DELETE ---

#[test]
fn test_insert_has_explicit_column_list() {
    let values = Values::new().set("name", "Ada").set("age", 36);
    let sql = generator()
        .generate_insert(&values, &Collection::new("users"))
        .unwrap();
    assert_eq!(sql, "INSERT INTO [users] ([name], [age]) VALUES ('Ada', 36)");
}

#[test]
fn test_multiple_insert_pads_missing_fields_with_null() {
    let rows = vec![
        Values::new().set("name", "Ada").set("age", 36),
        Values::new().set("name", "Grace"),
    ];
    let sql = generator()
        .generate_multiple_insert(&rows, &Collection::new("users"))
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO [users] ([name], [age]) VALUES ('Ada', 36), ('Grace', NULL)"
    );
}

#[test]
fn test_multiple_insert_rejects_unknown_field() {
    let rows = vec![
        Values::new().set("name", "Ada"),
        Values::new().set("name", "Grace").set("email", "g@x"),
    ];
    let err = generator()
        .generate_multiple_insert(&rows, &Collection::new("users"))
        .unwrap_err();
    assert!(matches!(err, Error::QuerySyntax(_)));
}

#[test]
fn test_update() {
    let values = Values::new().set("active", false);
    let criteria = Criteria::on("users").filter(Predicate::eq("id", 7));
    let sql = generator().generate_update(&values, &criteria).unwrap();
    assert_eq!(sql, "UPDATE [users] SET [active] = FALSE WHERE [id] = 7");
}

#[test]
fn test_delete() {
    let criteria = Criteria::on("users").filter(Predicate::eq("id", 7));
    let sql = generator().generate_delete(&criteria).unwrap();
    assert_eq!(sql, "DELETE FROM [users] WHERE [id] = 7");
}

// --- regex refusal ---

#[test]
fn test_regex_fails_at_render_time() {
    let criteria = Criteria::on("users").filter(Predicate::regex("email", "@corp\\.com$"));
    let err = generator().generate_select(&criteria).unwrap_err();
    assert!(matches!(err, Error::QuerySyntax(_)));
    assert!(err.to_string().contains("not supported"));
}

#[test]
fn test_regex_nested_in_group_still_fails() {
    let criteria = Criteria::on("users").filter(
        Predicate::eq("active", true).and(Predicate::regex("email", ".*")),
    );
    assert!(generator().generate_select(&criteria).is_err());
    assert!(generator().generate_count(&criteria).is_err());
    assert!(generator().generate_delete(&criteria).is_err());
}

// --- parameter interpolation ---

#[test]
fn test_interpolate_positional() {
    let sql = generator()
        .interpolate(
            "SELECT * FROM [users] WHERE [name] = ? AND [age] > ?",
            &[Value::from("O'Brien"), Value::from(30)],
        )
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM [users] WHERE [name] = 'O''Brien' AND [age] > 30"
    );
}

#[test]
fn test_interpolate_ignores_placeholder_inside_literal() {
    let sql = generator()
        .interpolate(
            "SELECT * FROM [t] WHERE [a] = 'what?' AND [b] = ?",
            &[Value::from(1)],
        )
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [t] WHERE [a] = 'what?' AND [b] = 1");
}

#[test]
fn test_interpolate_arity_mismatch() {
    let g = generator();
    assert!(matches!(
        g.interpolate("SELECT ?", &[]).unwrap_err(),
        Error::QuerySyntax(_)
    ));
    assert!(matches!(
        g.interpolate("SELECT 1", &[Value::from(1)]).unwrap_err(),
        Error::QuerySyntax(_)
    ));
}
