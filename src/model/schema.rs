//! Database schemas: ordered, uniquely named column definitions.

use super::json::expect_object;
use super::property_type::PropertyType;
use super::row::Row;
use super::schema_property::SchemaProperty;
use crate::error::{ColumnError, NotionDbError, Result};
use crate::types::PropertyName;
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use std::fmt;

/// The columns of a database, in API order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    columns: IndexMap<PropertyName, SchemaProperty>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema from `(name, type)` pairs with default configuration.
    ///
    /// ```
    /// use notiondb::{PropertyType, Schema};
    ///
    /// let schema = Schema::from_columns([
    ///     ("Name", PropertyType::Title),
    ///     ("Age", PropertyType::Number),
    /// ])
    /// .unwrap();
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn from_columns<N: Into<PropertyName>>(
        columns: impl IntoIterator<Item = (N, PropertyType)>,
    ) -> Result<Self> {
        let mut schema = Self::new();
        for (name, kind) in columns {
            schema.add_column(name, kind)?;
        }
        Ok(schema)
    }

    pub fn from_properties(properties: impl IntoIterator<Item = SchemaProperty>) -> Result<Self> {
        let mut schema = Self::new();
        for property in properties {
            schema.add(property)?;
        }
        Ok(schema)
    }

    /// Adds a column; names must be unique and there is at most one title
    /// column.
    pub fn add(&mut self, property: SchemaProperty) -> Result<()> {
        if self.columns.contains_key(&property.name) {
            return Err(NotionDbError::DuplicateColumn(property.name));
        }
        self.check_single_title(&property)?;
        self.columns.insert(property.name.clone(), property);
        Ok(())
    }

    pub fn add_column(&mut self, name: impl Into<PropertyName>, kind: PropertyType) -> Result<()> {
        self.add(SchemaProperty::of_type(name, kind)?)
    }

    /// Swaps the definition of an existing column, keeping its position and
    /// its API id. Returns the previous definition.
    pub fn replace(&mut self, mut property: SchemaProperty) -> Result<SchemaProperty> {
        self.check_single_title(&property)?;
        let slot = self
            .columns
            .get_mut(&property.name)
            .ok_or_else(|| missing_column(&property.name))?;
        if property.id.is_none() {
            property.id = slot.id.clone();
        }
        Ok(std::mem::replace(slot, property))
    }

    /// Renames a column in place. The API id is kept, so an update keyed by
    /// it renames the column remotely.
    pub fn rename(&mut self, from: &str, to: impl Into<PropertyName>) -> Result<()> {
        let to = to.into();
        if self.columns.contains_key(&to) {
            return Err(NotionDbError::DuplicateColumn(to));
        }
        let index = self
            .columns
            .get_index_of(from)
            .ok_or_else(|| missing_column(from))?;
        let (_, mut property) = self
            .columns
            .shift_remove_index(index)
            .ok_or_else(|| missing_column(from))?;
        property.name = to.clone();
        self.columns.shift_insert(index, to, property);
        Ok(())
    }

    fn check_single_title(&self, property: &SchemaProperty) -> Result<()> {
        if property.property_type() != Some(PropertyType::Title) {
            return Ok(());
        }
        match self.title_column() {
            Some(title) if title.name != property.name => Err(NotionDbError::InvalidRequest(
                format!(
                    "cannot add title column '{}': '{}' is already the title",
                    property.name, title.name
                ),
            )),
            _ => Ok(()),
        }
    }

    pub fn remove(&mut self, name: &str) -> Result<SchemaProperty> {
        self.columns
            .shift_remove(name)
            .ok_or_else(|| missing_column(name))
    }

    pub fn get(&self, name: &str) -> Option<&SchemaProperty> {
        self.columns.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SchemaProperty> {
        self.columns.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in order.
    pub fn labels(&self) -> impl Iterator<Item = &PropertyName> {
        self.columns.keys()
    }

    /// Column type tags in order, opaque ones included.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.columns.values().map(SchemaProperty::type_tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaProperty> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn title_column(&self) -> Option<&SchemaProperty> {
        self.columns
            .values()
            .find(|p| p.property_type() == Some(PropertyType::Title))
    }

    /// Checks a row against the schema, reporting every problem at once.
    pub fn validate(&self, row: &Row) -> Result<()> {
        let errors = self.check(row);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(NotionDbError::SchemaValidation(errors))
        }
    }

    /// The problems [`validate`](Self::validate) would report. Opaque
    /// columns are skipped; option sets are only enforced when non-empty.
    pub fn check(&self, row: &Row) -> Vec<ColumnError> {
        let mut errors = Vec::new();

        for property in self.columns.values() {
            let Some(value) = row.get(property.name.as_str()) else {
                if property.required {
                    errors.push(ColumnError::Missing {
                        column: property.name.clone(),
                    });
                }
                continue;
            };
            if property.is_opaque() {
                continue;
            }
            if value.type_tag() != property.type_tag() {
                errors.push(ColumnError::TypeMismatch {
                    column: property.name.clone(),
                    expected: property.type_tag().to_string(),
                    found: value.type_tag().to_string(),
                });
                continue;
            }
            if let Some(options) = property.allowed_options().filter(|o| !o.is_empty()) {
                for selected in value.data.selected_options() {
                    if !options.iter().any(|o| o.name == selected) {
                        errors.push(ColumnError::InvalidOption {
                            column: property.name.clone(),
                            option: selected.to_string(),
                        });
                    }
                }
            }
        }

        for column in row.columns() {
            if !self.columns.contains_key(column) {
                errors.push(ColumnError::UnknownColumn {
                    column: column.clone(),
                });
            }
        }

        errors
    }

    /// Reconstructs the schema of a database object (or of any object with
    /// a `properties` map of column definitions).
    pub fn from_api_response(response: &Json) -> Result<Self> {
        let object = expect_object(response, "database")?;
        let properties = expect_object(
            object.get("properties").unwrap_or(&Json::Null),
            "database properties",
        )?;

        let mut schema = Self::new();
        for (key, value) in properties {
            schema.add(SchemaProperty::from_api_json(key, value)?)?;
        }
        Ok(schema)
    }

    /// The `properties` body of a create-database request, keyed by name.
    /// Opaque columns cannot be recreated and are left out.
    pub fn to_api_properties(&self) -> Json {
        let mut properties = Map::new();
        for property in self.writable_columns() {
            properties.insert(property.name.to_string(), property.to_request_json(false));
        }
        Json::Object(properties)
    }

    /// The `properties` body of an update-database request, keyed by column
    /// id where known so renames apply. Columns of `previous` that are gone
    /// from this schema are sent as `null`, which deletes them.
    pub fn to_update_properties(&self, previous: Option<&Schema>) -> Json {
        let mut properties = Map::new();
        for property in self.writable_columns() {
            properties.insert(property.key().to_string(), property.to_request_json(true));
        }
        if let Some(previous) = previous {
            for property in previous.iter() {
                let kept = self
                    .iter()
                    .any(|p| p.key() == property.key() || p.name == property.name);
                if !kept {
                    properties.insert(property.key().to_string(), Json::Null);
                }
            }
        }
        Json::Object(properties)
    }

    fn writable_columns(&self) -> impl Iterator<Item = &SchemaProperty> {
        self.columns.values().filter(|property| {
            if property.is_opaque() {
                log::warn!(
                    "Leaving column '{}' of unsupported type '{}' out of the request",
                    property.name,
                    property.type_tag()
                );
                false
            } else {
                true
            }
        })
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for property in self.columns.values() {
            writeln!(f, "{}", property)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SchemaProperty;
    type IntoIter = indexmap::map::Values<'a, PropertyName, SchemaProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.values()
    }
}

fn missing_column(name: impl fmt::Display) -> NotionDbError {
    NotionDbError::NotFound {
        resource: "property",
        id: name.to_string(),
    }
}
