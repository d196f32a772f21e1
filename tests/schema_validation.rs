//! Validation of rows against schemas, including schemas read from the API.

mod common;

use notiondb::{
    ColumnError, NotionDbError, PropertyName, PropertyType, Row, Schema, SchemaProperty, Value,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn people_schema() -> Arc<Schema> {
    Arc::new(
        Schema::from_columns([("Name", PropertyType::Title), ("Age", PropertyType::Number)])
            .unwrap(),
    )
}

#[test]
fn test_complete_row_validates() {
    let row = Row::from_values(
        people_schema(),
        [("Name", Value::from("John")), ("Age", Value::from(20))],
    )
    .unwrap();
    assert!(row.validate().is_ok());
}

#[test]
fn test_wrong_type_and_missing_title_are_both_reported() {
    let schema = people_schema();
    let mut row = Row::new();
    row.set("Age", "twenty").unwrap();

    let err = schema.validate(&row).unwrap_err();
    assert!(matches!(err, NotionDbError::SchemaValidation(_)));
    assert_eq!(
        err.column_errors(),
        &[
            ColumnError::Missing {
                column: PropertyName::from("Name")
            },
            ColumnError::TypeMismatch {
                column: PropertyName::from("Age"),
                expected: "number".to_string(),
                found: "rich_text".to_string(),
            },
        ]
    );
}

#[test]
fn test_dropping_the_required_column_names_it() {
    let mut row = Row::from_values(
        people_schema(),
        [("Name", Value::from("John")), ("Age", Value::from(20))],
    )
    .unwrap();
    row.remove("Name");

    let errors = row.validate().unwrap_err();
    assert_eq!(errors.column_errors().len(), 1);
    assert_eq!(errors.column_errors()[0].column().as_str(), "Name");
}

#[test]
fn test_optional_columns_may_be_absent() {
    let row = Row::from_values(people_schema(), [("Name", "John")]).unwrap();
    assert!(row.validate().is_ok());
}

#[test]
fn test_options_outside_the_set_are_rejected() {
    let schema = Arc::new(
        Schema::from_properties([
            SchemaProperty::title("Name"),
            SchemaProperty::select("Team", ["Core", "Infra"]),
            SchemaProperty::multi_select("Tags", Vec::<&str>::new()),
        ])
        .unwrap(),
    );
    let mut row = Row::with_schema(Arc::clone(&schema));
    row.set("Name", "Ada").unwrap();
    row.set("Team", "Design").unwrap();
    row.set("Tags", vec!["anything", "goes"]).unwrap();

    assert_eq!(
        schema.check(&row),
        vec![ColumnError::InvalidOption {
            column: PropertyName::from("Team"),
            option: "Design".to_string(),
        }]
    );
}

#[test]
fn test_unknown_row_columns_are_reported() {
    let mut row = Row::new();
    row.set_as("Name", PropertyType::Title, "Ada").unwrap();
    row.set("Nickname", "A").unwrap();

    let errors = people_schema().check(&row);
    assert_eq!(
        errors,
        vec![ColumnError::UnknownColumn {
            column: PropertyName::from("Nickname")
        }]
    );
}

#[test]
fn test_unsupported_columns_are_kept_and_skipped() {
    let schema = Arc::new(Schema::from_api_response(&common::database_json()).unwrap());
    assert_eq!(
        schema.types().collect::<Vec<_>>(),
        vec!["title", "number", "select", "files"]
    );
    assert!(schema.get("Files").unwrap().is_opaque());

    let page = common::page_json(common::ROW_ID_1, "Ada", 36);
    let row = Row::from_api_response(&page, Arc::clone(&schema)).unwrap();
    assert!(row.get("Files").unwrap().is_opaque());
    assert!(row.validate().is_ok());

    let mut row = row;
    let err = row.set("Files", "report.pdf").unwrap_err();
    assert!(matches!(err, NotionDbError::UnsupportedPropertyType(tag) if tag == "files"));
}

#[test]
fn test_schema_edits() {
    let mut schema = Schema::from_api_response(&common::database_json()).unwrap();

    let err = schema.add_column("Age", PropertyType::Number).unwrap_err();
    assert!(matches!(err, NotionDbError::DuplicateColumn(name) if name.as_str() == "Age"));

    schema.rename("Age", "Years").unwrap();
    assert_eq!(
        schema.labels().map(PropertyName::as_str).collect::<Vec<_>>(),
        vec!["Name", "Years", "Team", "Files"]
    );
    assert_eq!(schema.get("Years").unwrap().key(), "%3DaGe");

    schema.remove("Team").unwrap();
    assert!(!schema.contains("Team"));
    assert!(schema.remove("Team").unwrap_err().is_not_found());
}
