//! The database handle keeps its row list in step with the API.

mod common;

use common::{
    connector, database_json, page_json, query_json, MockTransport, DATABASE_ID, PARENT_PAGE_ID,
    ROW_ID_1, ROW_ID_2,
};
use notiondb::{
    Database, DatabaseId, NotionDbError, PageId, PropertyType, Row, RowQuery, Schema,
    SchemaProperty, Value,
};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

fn open(transport: &MockTransport) -> Database {
    transport.respond(database_json());
    Database::open(&connector(transport), &DatabaseId::parse(DATABASE_ID).unwrap()).unwrap()
}

#[test]
fn test_rows_are_fetched_once() {
    let transport = MockTransport::new();
    let mut database = open(&transport);
    assert_eq!(database.title(), "People");
    assert!(database.cached_rows().is_none());

    transport.respond(query_json(
        vec![page_json(ROW_ID_1, "Ada", 36), page_json(ROW_ID_2, "Grace", 45)],
        None,
    ));
    let connector = connector(&transport);
    assert_eq!(database.rows(&connector).unwrap().len(), 2);
    assert_eq!(database.rows(&connector).unwrap().len(), 2);
    assert_eq!(transport.requests().len(), 2);

    // Every row shares the database schema.
    for row in database.cached_rows().unwrap() {
        assert!(Arc::ptr_eq(row.schema().unwrap(), database.schema()));
    }
}

#[test]
fn test_new_rows_are_bound_to_the_schema() {
    let transport = MockTransport::new();
    let database = open(&transport);
    let mut row = database.new_row();
    assert!(row.set("Nickname", "Ada").unwrap_err().is_not_found());
    row.set("Age", 36).unwrap();
    assert_eq!(row.get("Age").unwrap().property_type(), Some(PropertyType::Number));
}

#[test]
fn test_add_update_and_remove_keep_the_cache_in_step() {
    let transport = MockTransport::new();
    let mut database = open(&transport);
    let connector = connector(&transport);

    transport.respond(query_json(vec![page_json(ROW_ID_1, "Ada", 36)], None));
    database.rows(&connector).unwrap();

    // An unbound row is bound before it is sent.
    let mut row = Row::new();
    row.set_as("Name", PropertyType::Title, "Grace").unwrap();
    row.set("Age", 45).unwrap();
    transport.respond(page_json(ROW_ID_2, "Grace", 45));
    let added = database.add_row(&connector, row).unwrap();
    assert_eq!(added.id().unwrap().to_dashed(), ROW_ID_2);
    assert_eq!(database.cached_rows().unwrap().len(), 2);

    let mut changed = added.clone();
    changed.set("Age", 46).unwrap();
    transport.respond(page_json(ROW_ID_2, "Grace", 46));
    database.update_row(&connector, &changed).unwrap();
    assert_eq!(
        database.cached_rows().unwrap()[1].value("Age"),
        Some(Value::from(46))
    );

    transport.respond(json!({ "object": "page", "id": ROW_ID_1, "archived": true, "properties": {} }));
    let removed = database
        .remove_row(&connector, &PageId::parse(ROW_ID_1).unwrap())
        .unwrap()
        .unwrap();
    assert!(removed.is_archived());
    assert_eq!(database.cached_rows().unwrap().len(), 1);
    assert_eq!(transport.last_request().body, Some(json!({ "archived": true })));
}

#[test]
fn test_failed_add_leaves_the_cache_alone() {
    let transport = MockTransport::new();
    let mut database = open(&transport);
    let connector = connector(&transport);
    transport.respond(query_json(vec![], None));
    database.rows(&connector).unwrap();

    let mut row = database.new_row();
    row.set("Age", 1).unwrap();
    let err = database.add_row(&connector, row).unwrap_err();
    assert!(matches!(err, NotionDbError::SchemaValidation(_)));
    assert_eq!(database.cached_rows().unwrap().len(), 0);
}

#[test]
fn test_query_does_not_touch_the_cache() {
    let transport = MockTransport::new();
    let database = open(&transport);
    transport.respond(query_json(vec![page_json(ROW_ID_2, "Grace", 45)], None));

    let rows = database
        .query(
            &connector(&transport),
            &RowQuery::new().sort(json!({ "property": "Age", "direction": "descending" })),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(database.cached_rows().is_none());
}

#[test]
fn test_update_schema_sends_renames_and_removals() {
    let transport = MockTransport::new();
    let mut database = open(&transport);
    let connector = connector(&transport);

    let mut schema = Schema::clone(database.schema());
    schema.rename("Age", "Years").unwrap();
    schema.remove("Team").unwrap();
    schema.add(SchemaProperty::of_type("Email", PropertyType::Email).unwrap()).unwrap();

    let mut response = database_json();
    let properties = response["properties"].as_object_mut().unwrap();
    properties.shift_remove("Team");
    properties["Age"]["name"] = json!("Years");
    properties.insert(
        "Email".to_string(),
        json!({ "id": "em", "name": "Email", "type": "email", "email": {} }),
    );
    transport.respond(response);

    database.update_schema(&connector, schema, None).unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::PATCH);
    let sent = &request.body.unwrap()["properties"];
    assert_eq!(sent["%3DaGe"]["name"], "Years");
    assert_eq!(sent["t%5Ee"], json!(null));
    assert_eq!(sent["Email"], json!({ "name": "Email", "email": {} }));
    assert!(database.schema().contains("Email"));
    assert!(database.cached_rows().is_none());
}

#[test]
fn test_create_starts_with_an_empty_row_list() {
    let transport = MockTransport::new();
    transport.respond(database_json());
    let schema = Schema::from_properties([
        SchemaProperty::title("Name"),
        SchemaProperty::of_type("Age", PropertyType::Number).unwrap(),
    ])
    .unwrap();

    let database = Database::create(
        &connector(&transport),
        &PageId::parse(PARENT_PAGE_ID).unwrap(),
        "People",
        &schema,
        None,
    )
    .unwrap();
    assert_eq!(database.cached_rows(), Some(&[][..]));
    assert_eq!(transport.last_request().url, "https://api.notion.com/v1/databases");
}
