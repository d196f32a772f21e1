//! Typed model of Notion databases: values, columns, schemas and rows.

mod date;
mod json;
mod property_type;
mod property_value;
mod registry;
mod rich_text;
mod row;
mod schema;
mod schema_property;
mod value;

pub(crate) use json::{expect_object, optional_str, required_str};

pub use date::{DateLiteral, DateValue};
pub use property_type::PropertyType;
pub use property_value::{FormulaResult, PropertyData, PropertyValue, SelectOption, UserRef};
pub use registry::PropertyTypeRegistry;
pub use rich_text::{Annotations, RichText, RichTextSpan, SpanContent};
pub use row::Row;
pub use schema::Schema;
pub use schema_property::{NumberFormat, PropertyConfig, RelationKind, SchemaProperty};
pub use value::Value;
