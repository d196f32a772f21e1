//! Reading and writing row values, and the request/response round trip.

mod common;

use notiondb::{
    DateValue, NotionDbError, PropertyType, Row, Schema, SchemaProperty, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn tasks_schema() -> Arc<Schema> {
    Arc::new(
        Schema::from_properties([
            SchemaProperty::title("Task"),
            SchemaProperty::of_type("Done", PropertyType::Checkbox).unwrap(),
            SchemaProperty::of_type("Due", PropertyType::Date).unwrap(),
            SchemaProperty::multi_select("Tags", ["home", "work"]),
            SchemaProperty::formula("Score", "prop(\"Done\") ? 1 : 0"),
        ])
        .unwrap(),
    )
}

#[test]
fn test_failed_set_leaves_the_row_unchanged() {
    let mut row = Row::with_schema(tasks_schema());
    row.set("Done", true).unwrap();
    let before = row.clone();

    let err = row.set("Done", "yes").unwrap_err();
    match err {
        NotionDbError::TypeMismatch { column, expected, .. } => {
            assert_eq!(column.unwrap().as_str(), "Done");
            assert_eq!(expected, "checkbox");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
    assert_eq!(row, before);
}

#[test]
fn test_bound_rows_refuse_unknown_and_computed_columns() {
    let mut row = Row::with_schema(tasks_schema());
    assert!(row.set("Owner", "me").unwrap_err().is_not_found());
    assert!(matches!(
        row.set("Score", 3).unwrap_err(),
        NotionDbError::ReadOnlyProperty(name) if name.as_str() == "Score"
    ));
    assert!(row.is_empty());
}

#[test]
fn test_unbound_rows_infer_types() {
    let mut row = Row::new();
    row.set_as("Task", PropertyType::Title, "Write docs").unwrap();
    row.set("Notes", "draft first").unwrap();
    row.set("Tags", vec!["work"]).unwrap();
    row.set("Done", false).unwrap();
    row.set("Hours", 3).unwrap();
    row.set("Due", DateValue::parse("2024-05-01").unwrap()).unwrap();

    let types: Vec<_> = row
        .iter()
        .map(|(name, value)| (name.as_str(), value.type_tag()))
        .collect();
    assert_eq!(
        types,
        vec![
            ("Task", "title"),
            ("Notes", "rich_text"),
            ("Tags", "multi_select"),
            ("Done", "checkbox"),
            ("Hours", "number"),
            ("Due", "date"),
        ]
    );

    // An existing column keeps its type.
    row.set("Task", "Write more docs").unwrap();
    assert_eq!(row.get("Task").unwrap().type_tag(), "title");
    assert!(row.set("Hours", "three").is_err());
}

#[test]
fn test_payload_leaves_out_computed_values() {
    let response = json!({
        "object": "page",
        "id": common::ROW_ID_1,
        "properties": {
            "Task": { "id": "title", "type": "title", "title": [{ "type": "text", "text": { "content": "Ship" }, "plain_text": "Ship" }] },
            "Done": { "id": "d", "type": "checkbox", "checkbox": true },
            "Score": { "id": "s", "type": "formula", "formula": { "type": "number", "number": 1 } }
        }
    });
    let row = Row::from_api_response(&response, tasks_schema()).unwrap();
    assert_eq!(row.value("Score"), Some(Value::from(1)));

    let payload = row.to_api_payload();
    let properties = payload["properties"].as_object().unwrap();
    assert_eq!(
        properties.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["Task", "Done"]
    );
    assert_eq!(properties["Done"], json!({ "checkbox": true }));
}

#[test]
fn test_payload_then_response_rebuilds_the_row() {
    let schema = tasks_schema();
    let mut row = Row::with_schema(Arc::clone(&schema));
    row.set("Task", "Ship release").unwrap();
    row.set("Done", true).unwrap();
    row.set(
        "Due",
        DateValue::parse("2024-05-01T09:00:00.000+02:00").unwrap(),
    )
    .unwrap();
    row.set("Tags", vec!["work", "home"]).unwrap();

    // The API echoes the properties back on the created page.
    let mut page = row.to_api_payload();
    page["object"] = json!("page");
    page["id"] = json!(common::ROW_ID_2);

    let rebuilt = Row::from_api_response(&page, schema).unwrap();
    assert_eq!(rebuilt.id().unwrap().to_dashed(), common::ROW_ID_2);
    assert_eq!(rebuilt.values(), row.values());
}

#[test]
fn test_archived_flag_and_display() {
    let mut page = common::page_json(common::ROW_ID_1, "Ada", 36);
    page["archived"] = json!(true);
    let schema = Arc::new(Schema::from_api_response(&common::database_json()).unwrap());
    let row = Row::from_api_response(&page, schema).unwrap();
    assert!(row.is_archived());
    assert_eq!(row.value("Team"), Some(Value::from("Core")));

    let listing = row.to_string();
    assert!(listing.starts_with("Name   Ada\nAge    36\n"), "{}", listing);
}
