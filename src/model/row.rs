//! Rows: the property values of one database page.

use super::json::{expect_object, optional_str, required_str};
use super::property_type::PropertyType;
use super::property_value::{PropertyData, PropertyValue};
use super::schema::Schema;
use super::value::Value;
use crate::error::{NotionDbError, Result};
use crate::types::{PageId, PropertyName};
use indexmap::IndexMap;
use serde_json::{json, Map, Value as Json};
use std::fmt;
use std::sync::Arc;

/// An ordered mapping from column name to property value.
///
/// A row is either *bound* to a shared [`Schema`], in which case the schema
/// decides each column's type, or unbound, in which case types are inferred
/// from the values written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    id: Option<PageId>,
    url: Option<String>,
    archived: bool,
    schema: Option<Arc<Schema>>,
    values: IndexMap<PropertyName, PropertyValue>,
}

impl Row {
    /// An empty, unbound row.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty row bound to `schema`.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self {
            schema: Some(schema),
            ..Self::default()
        }
    }

    /// A row bound to `schema`, filled from native values and validated.
    ///
    /// ```
    /// use notiondb::{PropertyType, Row, Schema, Value};
    /// use std::sync::Arc;
    ///
    /// let schema = Arc::new(
    ///     Schema::from_columns([("Name", PropertyType::Title), ("Age", PropertyType::Number)])
    ///         .unwrap(),
    /// );
    /// let row = Row::from_values(schema, [("Name", Value::from("John")), ("Age", Value::from(20))]).unwrap();
    /// assert_eq!(row.value("Age").and_then(|v| v.as_i64()), Some(20));
    /// ```
    pub fn from_values<N, V>(
        schema: Arc<Schema>,
        values: impl IntoIterator<Item = (N, V)>,
    ) -> Result<Self>
    where
        N: Into<PropertyName>,
        V: Into<Value>,
    {
        let mut row = Self::with_schema(schema);
        for (name, value) in values {
            row.set(name, value)?;
        }
        row.validate()?;
        Ok(row)
    }

    /// The page id, once the row exists in Notion.
    pub fn id(&self) -> Option<&PageId> {
        self.id.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.schema.is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&PropertyValue> {
        self.values.get(column)
    }

    /// The native value of a column.
    pub fn value(&self, column: &str) -> Option<Value> {
        self.get(column).map(|v| v.data.to_native())
    }

    pub fn columns(&self) -> impl Iterator<Item = &PropertyName> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &PropertyValue)> {
        self.values.iter()
    }

    /// Native values of every column, in order.
    pub fn values(&self) -> IndexMap<PropertyName, Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.data.to_native()))
            .collect()
    }

    /// Writes a native value.
    ///
    /// On a bound row the schema decides the type. On an unbound row an
    /// existing column keeps its type and a new one gets the type inferred
    /// from the value. On failure the row is left unchanged.
    pub fn set(&mut self, column: impl Into<PropertyName>, value: impl Into<Value>) -> Result<()> {
        let column = column.into();
        let value = value.into();
        let kind = self.column_type(&column, &value)?;
        self.write(column, kind, &value)
    }

    /// Writes a native value as an explicit type.
    ///
    /// On a bound row `kind` must match the schema. On an unbound row this
    /// is how a column gets a type inference would not pick, such as the
    /// title.
    pub fn set_as(
        &mut self,
        column: impl Into<PropertyName>,
        kind: PropertyType,
        value: impl Into<Value>,
    ) -> Result<()> {
        let column = column.into();
        let value = value.into();
        if let Some(schema) = &self.schema {
            let expected = schema_type(schema, &column)?;
            if expected != kind {
                return Err(NotionDbError::TypeMismatch {
                    column: Some(column),
                    expected: expected.to_string(),
                    found: kind.to_string(),
                });
            }
        }
        self.write(column, kind, &value)
    }

    fn column_type(&self, column: &PropertyName, value: &Value) -> Result<PropertyType> {
        if let Some(schema) = &self.schema {
            return schema_type(schema, column);
        }
        if let Some(existing) = self.values.get(column) {
            return existing
                .property_type()
                .ok_or_else(|| NotionDbError::UnsupportedPropertyType(existing.type_tag().to_string()));
        }
        value.inferred_type().ok_or_else(|| NotionDbError::TypeMismatch {
            column: Some(column.clone()),
            expected: "a value to infer the column type from".to_string(),
            found: value.kind_name().to_string(),
        })
    }

    fn write(&mut self, column: PropertyName, kind: PropertyType, value: &Value) -> Result<()> {
        if kind.is_read_only() {
            return Err(NotionDbError::ReadOnlyProperty(column));
        }
        let data = PropertyData::from_native(kind, value).map_err(|e| e.on_column(&column))?;
        match self.values.get_mut(&column) {
            Some(existing) => existing.data = data,
            None => {
                self.values.insert(column, PropertyValue::new(data));
            }
        }
        Ok(())
    }

    /// Removes a column, keeping the order of the others.
    pub fn remove(&mut self, column: &str) -> Option<PropertyValue> {
        self.values.shift_remove(column)
    }

    /// Attaches a schema after checking the row against it.
    pub fn bind(&mut self, schema: Arc<Schema>) -> Result<()> {
        schema.validate(self)?;
        self.schema = Some(schema);
        Ok(())
    }

    /// Validates against the bound schema; unbound rows always pass.
    pub fn validate(&self) -> Result<()> {
        match &self.schema {
            Some(schema) => schema.validate(self),
            None => Ok(()),
        }
    }

    /// The body of a create/update page request: `{"properties": {...}}`.
    /// Read-only and opaque values are left out.
    pub fn to_api_payload(&self) -> Json {
        let properties: Map<String, Json> = self
            .values
            .iter()
            .filter_map(|(name, value)| {
                value
                    .data
                    .payload()
                    .map(|payload| (name.to_string(), payload))
            })
            .collect();
        json!({ "properties": properties })
    }

    /// Rebuilds a row from a page object, bound to `schema`. Values of
    /// unsupported types are kept opaque.
    pub fn from_api_response(response: &Json, schema: Arc<Schema>) -> Result<Self> {
        Self::from_page(response, Some(schema))
    }

    /// Like [`from_api_response`](Self::from_api_response); without a schema
    /// the row comes back unbound.
    pub(crate) fn from_page(response: &Json, schema: Option<Arc<Schema>>) -> Result<Self> {
        let object = expect_object(response, "page")?;
        if let Some(kind) = optional_str(object, "object") {
            if kind != "page" {
                return Err(NotionDbError::MalformedResponse(format!(
                    "expected a page object, found '{}'",
                    kind
                )));
            }
        }

        let id = PageId::parse(required_str(object, "id")?)?;
        let archived = ["archived", "in_trash"]
            .iter()
            .any(|key| object.get(*key).and_then(Json::as_bool).unwrap_or(false));
        let properties = expect_object(
            object.get("properties").unwrap_or(&Json::Null),
            "page properties",
        )?;

        let mut values = IndexMap::with_capacity(properties.len());
        for (name, value) in properties {
            if schema.as_ref().is_some_and(|schema| !schema.contains(name)) {
                log::debug!("Page {} has column '{}' outside the schema", id, name);
            }
            values.insert(PropertyName::from(name.as_str()), PropertyValue::from_json(value)?);
        }

        Ok(Self {
            id: Some(id),
            url: optional_str(object, "url").map(str::to_string),
            archived,
            schema,
            values,
        })
    }

    pub(crate) fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }
}

fn schema_type(schema: &Schema, column: &PropertyName) -> Result<PropertyType> {
    let property = schema
        .get(column.as_str())
        .ok_or_else(|| NotionDbError::NotFound {
            resource: "property",
            id: column.to_string(),
        })?;
    property
        .property_type()
        .ok_or_else(|| NotionDbError::UnsupportedPropertyType(property.type_tag().to_string()))
}

impl fmt::Display for Row {
    /// Two columns: names padded to the widest, then values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .values
            .keys()
            .map(|name| name.as_str().chars().count())
            .max()
            .unwrap_or(0);
        for (name, value) in &self.values {
            let rendered = match &value.data {
                PropertyData::Opaque { type_tag, .. } => format!("<{}>", type_tag),
                data => data.to_native().to_string(),
            };
            writeln!(f, "{:<width$}  {}", name.as_str(), rendered, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rich_text::RichText;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unbound_row_infers_types() {
        let mut row = Row::new();
        row.set("Age", 20).unwrap();
        row.set("Tags", vec!["a", "b"]).unwrap();
        row.set("Student", true).unwrap();
        row.set("Bio", "likes tea").unwrap();

        let tags: Vec<_> = row.iter().map(|(_, v)| v.type_tag().to_string()).collect();
        assert_eq!(tags, vec!["number", "multi_select", "checkbox", "rich_text"]);
    }

    #[test]
    fn test_existing_column_keeps_its_type() {
        let mut row = Row::new();
        row.set_as("Name", PropertyType::Title, "John").unwrap();
        row.set("Name", "Jane").unwrap();
        assert_eq!(row.get("Name").unwrap().property_type(), Some(PropertyType::Title));
        assert_eq!(row.value("Name").unwrap().as_text().as_deref(), Some("Jane"));

        let err = row.set("Name", 3).unwrap_err();
        assert!(matches!(err, NotionDbError::TypeMismatch { column: Some(ref c), .. } if c.as_str() == "Name"));
    }

    #[test]
    fn test_null_cannot_start_a_column() {
        let mut row = Row::new();
        assert!(row.set("Nothing", Value::Null).is_err());
        assert!(row.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut row = Row::new();
        row.set("A", 1).unwrap();
        row.set("B", 2).unwrap();
        row.set("C", 3).unwrap();
        assert!(row.remove("B").is_some());
        assert!(row.remove("B").is_none());
        assert_eq!(
            row.columns().map(|c| c.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
    }

    #[test]
    fn test_payload_of_unbound_row() {
        let mut row = Row::new();
        row.set_as("Name", PropertyType::Title, "John").unwrap();
        row.set("Age", 20).unwrap();
        assert_eq!(
            row.to_api_payload(),
            json!({
                "properties": {
                    "Name": { "title": [{ "type": "text", "text": { "content": "John" } }] },
                    "Age": { "number": 20 }
                }
            })
        );
    }

    #[test]
    fn test_display_lists_columns() {
        let mut row = Row::new();
        row.set_as("Name", PropertyType::Title, RichText::plain("John")).unwrap();
        row.set("Age", 20).unwrap();
        assert_eq!(row.to_string(), "Name  John\nAge   20\n");
    }
}
