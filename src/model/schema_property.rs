//! Column definitions: a name, a type and the type's configuration.

use super::json::{expect_array, expect_object, optional_str, required_str};
use super::property_type::PropertyType;
use super::property_value::SelectOption;
use crate::error::{NotionDbError, Result};
use crate::types::{DatabaseId, PropertyId, PropertyName};
use serde_json::{json, Map, Value as Json};
use std::fmt;

macro_rules! number_formats {
    ($($variant:ident => $tag:literal),* $(,)?) => {
        /// Display format of a number column.
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub enum NumberFormat {
            #[default]
            $($variant,)*
            /// A format this client does not list yet, passed through.
            Other(String),
        }

        impl NumberFormat {
            pub fn as_str(&self) -> &str {
                match self {
                    $(NumberFormat::$variant => $tag,)*
                    NumberFormat::Other(tag) => tag,
                }
            }

            pub fn parse(tag: &str) -> Self {
                match tag {
                    $($tag => NumberFormat::$variant,)*
                    other => NumberFormat::Other(other.to_string()),
                }
            }
        }
    };
}

number_formats! {
    Number => "number",
    NumberWithCommas => "number_with_commas",
    Percent => "percent",
    Dollar => "dollar",
    CanadianDollar => "canadian_dollar",
    Euro => "euro",
    Pound => "pound",
    Yen => "yen",
    Ruble => "ruble",
    Rupee => "rupee",
    Won => "won",
    Yuan => "yuan",
    Real => "real",
    Lira => "lira",
    Rupiah => "rupiah",
    Franc => "franc",
    HongKongDollar => "hong_kong_dollar",
    NewZealandDollar => "new_zealand_dollar",
    Krona => "krona",
    NorwegianKrone => "norwegian_krone",
    MexicanPeso => "mexican_peso",
    Rand => "rand",
    NewTaiwanDollar => "new_taiwan_dollar",
    DanishKrone => "danish_krone",
    Zloty => "zloty",
    Baht => "baht",
    Forint => "forint",
    Koruna => "koruna",
    Shekel => "shekel",
    ChileanPeso => "chilean_peso",
    PhilippinePeso => "philippine_peso",
    Dirham => "dirham",
    ColombianPeso => "colombian_peso",
    Riyal => "riyal",
    Ringgit => "ringgit",
    Leu => "leu",
    ArgentinePeso => "argentine_peso",
    UruguayanPeso => "uruguayan_peso",
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a relation is mirrored by a property on the target database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RelationKind {
    #[default]
    SingleProperty,
    DualProperty {
        synced_property_name: Option<String>,
        synced_property_id: Option<String>,
    },
}

/// Per-type configuration of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyConfig {
    Title,
    RichText,
    Number { format: NumberFormat },
    Select { options: Vec<SelectOption> },
    MultiSelect { options: Vec<SelectOption> },
    /// Status groups are managed by Notion and kept as received.
    Status {
        options: Vec<SelectOption>,
        groups: Option<Json>,
    },
    Date,
    People,
    Relation {
        database_id: DatabaseId,
        kind: RelationKind,
    },
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula { expression: String },
    CreatedTime,
    LastEditedTime,
    /// A column type this client does not model, kept verbatim.
    Opaque { type_tag: String, config: Json },
}

impl PropertyConfig {
    /// Default configuration for `kind`. Relation and formula columns need
    /// a target database or an expression and cannot be defaulted.
    pub fn for_type(kind: PropertyType) -> Result<Self> {
        let config = match kind {
            PropertyType::Title => PropertyConfig::Title,
            PropertyType::RichText => PropertyConfig::RichText,
            PropertyType::Number => PropertyConfig::Number {
                format: NumberFormat::default(),
            },
            PropertyType::Select => PropertyConfig::Select {
                options: Vec::new(),
            },
            PropertyType::MultiSelect => PropertyConfig::MultiSelect {
                options: Vec::new(),
            },
            PropertyType::Status => PropertyConfig::Status {
                options: Vec::new(),
                groups: None,
            },
            PropertyType::Date => PropertyConfig::Date,
            PropertyType::People => PropertyConfig::People,
            PropertyType::Checkbox => PropertyConfig::Checkbox,
            PropertyType::Url => PropertyConfig::Url,
            PropertyType::Email => PropertyConfig::Email,
            PropertyType::PhoneNumber => PropertyConfig::PhoneNumber,
            PropertyType::CreatedTime => PropertyConfig::CreatedTime,
            PropertyType::LastEditedTime => PropertyConfig::LastEditedTime,
            PropertyType::Relation => {
                return Err(NotionDbError::InvalidRequest(
                    "a relation column needs a target database id".to_string(),
                ))
            }
            PropertyType::Formula => {
                return Err(NotionDbError::InvalidRequest(
                    "a formula column needs an expression".to_string(),
                ))
            }
        };
        Ok(config)
    }

    /// `None` for opaque columns.
    pub fn property_type(&self) -> Option<PropertyType> {
        let kind = match self {
            PropertyConfig::Title => PropertyType::Title,
            PropertyConfig::RichText => PropertyType::RichText,
            PropertyConfig::Number { .. } => PropertyType::Number,
            PropertyConfig::Select { .. } => PropertyType::Select,
            PropertyConfig::MultiSelect { .. } => PropertyType::MultiSelect,
            PropertyConfig::Status { .. } => PropertyType::Status,
            PropertyConfig::Date => PropertyType::Date,
            PropertyConfig::People => PropertyType::People,
            PropertyConfig::Relation { .. } => PropertyType::Relation,
            PropertyConfig::Checkbox => PropertyType::Checkbox,
            PropertyConfig::Url => PropertyType::Url,
            PropertyConfig::Email => PropertyType::Email,
            PropertyConfig::PhoneNumber => PropertyType::PhoneNumber,
            PropertyConfig::Formula { .. } => PropertyType::Formula,
            PropertyConfig::CreatedTime => PropertyType::CreatedTime,
            PropertyConfig::LastEditedTime => PropertyType::LastEditedTime,
            PropertyConfig::Opaque { .. } => return None,
        };
        Some(kind)
    }

    pub fn type_tag(&self) -> &str {
        match self {
            PropertyConfig::Opaque { type_tag, .. } => type_tag.as_str(),
            other => other.property_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    /// The object stored under the type tag, e.g. `{"format": "dollar"}`.
    pub fn config_json(&self) -> Json {
        match self {
            PropertyConfig::Number { format } => json!({ "format": format.as_str() }),
            PropertyConfig::Select { options } | PropertyConfig::MultiSelect { options } => {
                json!({ "options": options_json(options) })
            }
            PropertyConfig::Status { options, groups } => {
                let mut object = Map::new();
                object.insert("options".into(), options_json(options));
                if let Some(groups) = groups {
                    object.insert("groups".into(), groups.clone());
                }
                Json::Object(object)
            }
            PropertyConfig::Relation { database_id, kind } => {
                let mut object = Map::new();
                object.insert("database_id".into(), json!(database_id.to_dashed()));
                match kind {
                    RelationKind::SingleProperty => {
                        object.insert("type".into(), json!("single_property"));
                        object.insert("single_property".into(), json!({}));
                    }
                    RelationKind::DualProperty {
                        synced_property_name,
                        synced_property_id,
                    } => {
                        let mut dual = Map::new();
                        if let Some(name) = synced_property_name {
                            dual.insert("synced_property_name".into(), json!(name));
                        }
                        if let Some(id) = synced_property_id {
                            dual.insert("synced_property_id".into(), json!(id));
                        }
                        object.insert("type".into(), json!("dual_property"));
                        object.insert("dual_property".into(), Json::Object(dual));
                    }
                }
                Json::Object(object)
            }
            PropertyConfig::Formula { expression } => json!({ "expression": expression }),
            PropertyConfig::Opaque { config, .. } => config.clone(),
            _ => json!({}),
        }
    }

    /// Parses the configuration object stored under `kind`'s tag.
    pub fn from_json(kind: PropertyType, config: &Json) -> Result<Self> {
        let empty = Map::new();
        let object = match config {
            Json::Null => &empty,
            other => expect_object(other, kind.as_str())?,
        };

        let parsed = match kind {
            PropertyType::Number => PropertyConfig::Number {
                format: optional_str(object, "format")
                    .map(NumberFormat::parse)
                    .unwrap_or_default(),
            },
            PropertyType::Select => PropertyConfig::Select {
                options: parse_options(object)?,
            },
            PropertyType::MultiSelect => PropertyConfig::MultiSelect {
                options: parse_options(object)?,
            },
            PropertyType::Status => PropertyConfig::Status {
                options: parse_options(object)?,
                groups: object.get("groups").cloned(),
            },
            PropertyType::Relation => {
                let database_id = DatabaseId::parse(required_str(object, "database_id")?)?;
                let kind = match optional_str(object, "type") {
                    Some("dual_property") => {
                        let dual = object
                            .get("dual_property")
                            .and_then(Json::as_object)
                            .unwrap_or(&empty);
                        RelationKind::DualProperty {
                            synced_property_name: optional_str(dual, "synced_property_name")
                                .map(str::to_string),
                            synced_property_id: optional_str(dual, "synced_property_id")
                                .map(str::to_string),
                        }
                    }
                    _ => RelationKind::SingleProperty,
                };
                PropertyConfig::Relation { database_id, kind }
            }
            PropertyType::Formula => PropertyConfig::Formula {
                expression: optional_str(object, "expression")
                    .unwrap_or_default()
                    .to_string(),
            },
            other => PropertyConfig::for_type(other)?,
        };
        Ok(parsed)
    }
}

fn options_json(options: &[SelectOption]) -> Json {
    Json::Array(options.iter().map(SelectOption::to_json).collect())
}

fn parse_options(object: &Map<String, Json>) -> Result<Vec<SelectOption>> {
    match object.get("options") {
        None | Some(Json::Null) => Ok(Vec::new()),
        Some(options) => expect_array(options, "options")?
            .iter()
            .map(SelectOption::from_json)
            .collect(),
    }
}

/// One column of a database schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaProperty {
    pub id: Option<PropertyId>,
    pub name: PropertyName,
    pub config: PropertyConfig,
    /// Rows must carry a value for required columns. Title columns are
    /// required by default.
    pub required: bool,
}

impl SchemaProperty {
    pub fn new(name: impl Into<PropertyName>, config: PropertyConfig) -> Self {
        let required = matches!(config, PropertyConfig::Title);
        Self {
            id: None,
            name: name.into(),
            config,
            required,
        }
    }

    /// A column of `kind` with default configuration.
    pub fn of_type(name: impl Into<PropertyName>, kind: PropertyType) -> Result<Self> {
        Ok(Self::new(name, PropertyConfig::for_type(kind)?))
    }

    pub fn title(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::Title)
    }

    pub fn rich_text(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::RichText)
    }

    pub fn number(name: impl Into<PropertyName>, format: NumberFormat) -> Self {
        Self::new(name, PropertyConfig::Number { format })
    }

    pub fn select<O: Into<SelectOption>>(
        name: impl Into<PropertyName>,
        options: impl IntoIterator<Item = O>,
    ) -> Self {
        Self::new(
            name,
            PropertyConfig::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn multi_select<O: Into<SelectOption>>(
        name: impl Into<PropertyName>,
        options: impl IntoIterator<Item = O>,
    ) -> Self {
        Self::new(
            name,
            PropertyConfig::MultiSelect {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn status<O: Into<SelectOption>>(
        name: impl Into<PropertyName>,
        options: impl IntoIterator<Item = O>,
    ) -> Self {
        Self::new(
            name,
            PropertyConfig::Status {
                options: options.into_iter().map(Into::into).collect(),
                groups: None,
            },
        )
    }

    pub fn date(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::Date)
    }

    pub fn people(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::People)
    }

    pub fn relation(name: impl Into<PropertyName>, database_id: DatabaseId, kind: RelationKind) -> Self {
        Self::new(name, PropertyConfig::Relation { database_id, kind })
    }

    pub fn checkbox(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::Checkbox)
    }

    pub fn url(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::Url)
    }

    pub fn email(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::Email)
    }

    pub fn phone_number(name: impl Into<PropertyName>) -> Self {
        Self::new(name, PropertyConfig::PhoneNumber)
    }

    pub fn formula(name: impl Into<PropertyName>, expression: impl Into<String>) -> Self {
        Self::new(
            name,
            PropertyConfig::Formula {
                expression: expression.into(),
            },
        )
    }

    /// Marks the column as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        self.config.property_type()
    }

    pub fn type_tag(&self) -> &str {
        self.config.type_tag()
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self.config, PropertyConfig::Opaque { .. })
    }

    /// The id when Notion assigned one, otherwise the name. Ids survive
    /// renames, so updates are keyed by this.
    pub fn key(&self) -> &str {
        self.id
            .as_ref()
            .map(PropertyId::as_str)
            .unwrap_or_else(|| self.name.as_str())
    }

    /// The option set of select, multi-select and status columns.
    pub fn allowed_options(&self) -> Option<&[SelectOption]> {
        match &self.config {
            PropertyConfig::Select { options }
            | PropertyConfig::MultiSelect { options }
            | PropertyConfig::Status { options, .. } => Some(options),
            _ => None,
        }
    }

    /// The full response form: `{"id", "name", "type", tag: config}`.
    pub fn to_api_json(&self) -> Json {
        let mut object = Map::new();
        if let Some(id) = &self.id {
            object.insert("id".into(), json!(id.as_str()));
        }
        object.insert("name".into(), json!(self.name.as_str()));
        object.insert("type".into(), json!(self.type_tag()));
        object.insert(self.type_tag().to_string(), self.config.config_json());
        Json::Object(object)
    }

    /// The request form used when creating or updating a database.
    pub(crate) fn to_request_json(&self, include_name: bool) -> Json {
        let mut object = Map::new();
        if include_name {
            object.insert("name".into(), json!(self.name.as_str()));
        }
        object.insert(self.type_tag().to_string(), self.config.config_json());
        Json::Object(object)
    }

    /// Parses a column of a database response. `key` is the key the column
    /// was found under, used when the object carries no `name`.
    pub fn from_api_json(key: &str, value: &Json) -> Result<Self> {
        let object = expect_object(value, "schema property")?;
        let type_tag = required_str(object, "type")?;
        let name = optional_str(object, "name").unwrap_or(key);
        let config_value = object.get(type_tag).unwrap_or(&Json::Null);

        let config = match type_tag.parse::<PropertyType>() {
            Ok(kind) => PropertyConfig::from_json(kind, config_value)?,
            Err(_) => {
                log::warn!(
                    "Column '{}' has unsupported type '{}'; keeping it opaque",
                    name,
                    type_tag
                );
                PropertyConfig::Opaque {
                    type_tag: type_tag.to_string(),
                    config: config_value.clone(),
                }
            }
        };

        let mut property = Self::new(name, config);
        property.id = optional_str(object, "id").map(PropertyId::new);
        Ok(property)
    }
}

impl fmt::Display for SchemaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.type_tag())?;
        if self.required {
            write!(f, " required")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_checkbox_column_round_trips() {
        let response = json!({ "id": "fk%5EY", "name": "In stock", "type": "checkbox", "checkbox": {} });
        let property = SchemaProperty::from_api_json("In stock", &response).unwrap();
        assert_eq!(property.property_type(), Some(PropertyType::Checkbox));
        assert_eq!(property.key(), "fk%5EY");
        assert!(!property.is_required());
        assert_eq!(property.to_api_json(), response);
    }

    #[test]
    fn test_select_options_and_colors() {
        let response = json!({
            "id": "flsb",
            "name": "Food group",
            "type": "select",
            "select": {
                "options": [
                    { "id": "e28f74fc", "name": "Vegetable", "color": "green" },
                    { "id": "6132d771", "name": "Fruit", "color": "red" }
                ]
            }
        });
        let property = SchemaProperty::from_api_json("Food group", &response).unwrap();
        let options = property.allowed_options().unwrap();
        assert_eq!(options[1].color, Some(Color::Red));
        assert_eq!(property.to_api_json(), response);
    }

    #[test]
    fn test_relation_and_number_config() {
        let response = json!({
            "id": "rel",
            "name": "Projects",
            "type": "relation",
            "relation": {
                "database_id": "668d797c-76fa-4934-9b05-ad288df2d136",
                "type": "dual_property",
                "dual_property": { "synced_property_name": "Tasks", "synced_property_id": "fy:{" }
            }
        });
        let property = SchemaProperty::from_api_json("Projects", &response).unwrap();
        assert!(matches!(
            &property.config,
            PropertyConfig::Relation { kind: RelationKind::DualProperty { .. }, .. }
        ));
        assert_eq!(property.to_api_json(), response);

        let price = SchemaProperty::number("Price", NumberFormat::Dollar);
        assert_eq!(
            price.to_request_json(false),
            json!({ "number": { "format": "dollar" } })
        );
        assert_eq!(NumberFormat::parse("bitcoin"), NumberFormat::Other("bitcoin".to_string()));
    }

    #[test]
    fn test_unknown_type_is_opaque() {
        let response = json!({
            "id": "ro",
            "name": "Total",
            "type": "rollup",
            "rollup": { "function": "sum", "relation_property_name": "Items" }
        });
        let property = SchemaProperty::from_api_json("Total", &response).unwrap();
        assert!(property.is_opaque());
        assert_eq!(property.type_tag(), "rollup");
        assert_eq!(property.to_api_json(), response);
    }

    #[test]
    fn test_defaults_need_extra_information_for_relation_and_formula() {
        assert!(SchemaProperty::of_type("X", PropertyType::Relation).is_err());
        assert!(SchemaProperty::of_type("X", PropertyType::Formula).is_err());
        let title = SchemaProperty::of_type("Name", PropertyType::Title).unwrap();
        assert!(title.is_required());
        assert_eq!(title.to_request_json(false), json!({ "title": {} }));
    }
}
