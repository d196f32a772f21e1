use crate::error::NotionDbError;
use std::fmt;

/// The property types this client can encode and decode.
///
/// Tags outside this list (rollup, files, created_by, unique_id, …) are
/// unsupported: parsing them fails, and schemas and rows keep such columns
/// as opaque JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Status,
    Date,
    People,
    Relation,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula,
    CreatedTime,
    LastEditedTime,
}

impl PropertyType {
    pub const ALL: [PropertyType; 16] = [
        PropertyType::Title,
        PropertyType::RichText,
        PropertyType::Number,
        PropertyType::Select,
        PropertyType::MultiSelect,
        PropertyType::Status,
        PropertyType::Date,
        PropertyType::People,
        PropertyType::Relation,
        PropertyType::Checkbox,
        PropertyType::Url,
        PropertyType::Email,
        PropertyType::PhoneNumber,
        PropertyType::Formula,
        PropertyType::CreatedTime,
        PropertyType::LastEditedTime,
    ];

    /// The Notion API type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Title => "title",
            PropertyType::RichText => "rich_text",
            PropertyType::Number => "number",
            PropertyType::Select => "select",
            PropertyType::MultiSelect => "multi_select",
            PropertyType::Status => "status",
            PropertyType::Date => "date",
            PropertyType::People => "people",
            PropertyType::Relation => "relation",
            PropertyType::Checkbox => "checkbox",
            PropertyType::Url => "url",
            PropertyType::Email => "email",
            PropertyType::PhoneNumber => "phone_number",
            PropertyType::Formula => "formula",
            PropertyType::CreatedTime => "created_time",
            PropertyType::LastEditedTime => "last_edited_time",
        }
    }

    /// Computed by Notion; never part of a create/update payload.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            PropertyType::Formula | PropertyType::CreatedTime | PropertyType::LastEditedTime
        )
    }

    /// Holds a choice from a configured option set.
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            PropertyType::Select | PropertyType::MultiSelect | PropertyType::Status
        )
    }
}

impl std::str::FromStr for PropertyType {
    type Err = NotionDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(PropertyType::Title),
            "rich_text" | "text" => Ok(PropertyType::RichText),
            "number" => Ok(PropertyType::Number),
            "select" => Ok(PropertyType::Select),
            "multi_select" => Ok(PropertyType::MultiSelect),
            "status" => Ok(PropertyType::Status),
            "date" => Ok(PropertyType::Date),
            "people" => Ok(PropertyType::People),
            "relation" => Ok(PropertyType::Relation),
            "checkbox" => Ok(PropertyType::Checkbox),
            "url" => Ok(PropertyType::Url),
            "email" => Ok(PropertyType::Email),
            "phone_number" => Ok(PropertyType::PhoneNumber),
            "formula" => Ok(PropertyType::Formula),
            "created_time" => Ok(PropertyType::CreatedTime),
            "last_edited_time" => Ok(PropertyType::LastEditedTime),
            other => Err(NotionDbError::UnsupportedPropertyType(other.to_string())),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in PropertyType::ALL {
            assert_eq!(kind.as_str().parse::<PropertyType>().unwrap(), kind);
        }
        assert_eq!("text".parse::<PropertyType>().unwrap(), PropertyType::RichText);
    }

    #[test]
    fn test_unknown_tags_are_unsupported() {
        for tag in ["rollup", "files", "created_by", "button", "hologram"] {
            match tag.parse::<PropertyType>() {
                Err(NotionDbError::UnsupportedPropertyType(found)) => assert_eq!(found, tag),
                other => panic!("expected UnsupportedPropertyType, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_read_only_set() {
        assert!(PropertyType::Formula.is_read_only());
        assert!(PropertyType::CreatedTime.is_read_only());
        assert!(!PropertyType::Title.is_read_only());
    }
}
