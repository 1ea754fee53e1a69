//! Editable site copy.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient, Entity, EntityKind, VisibilityFlag};
use crate::defaults;

/// Flattened `field_name → field_value` lookup consumed by pages.
pub type ContentMap = BTreeMap<String, String>;

/// How the admin editor presents a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Single line of text.
    #[default]
    Text,
    /// Multi-line text.
    Textarea,
    /// Image URL.
    Image,
    /// Numeric value.
    Number,
    /// On/off value.
    Boolean,
}

impl FieldType {
    /// Parse a field type name; unknown names read as [`FieldType::Text`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "textarea" => Self::Textarea,
            "image" => Self::Image,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => Self::Text,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Textarea => write!(f, "textarea"),
            Self::Image => write!(f, "image"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().map_or(Self::Text, Self::parse))
    }
}

/// A single named piece of site copy.
///
/// `field_name` is unique across the whole table and is the key in the
/// flattened [`ContentMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentField {
    /// Backend id; empty for rows the backend never numbered.
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    /// Page section the field belongs to (`hero`, `footer`, ...).
    #[serde(default, deserialize_with = "lenient::text")]
    pub section: String,

    /// Unique lookup key.
    pub field_name: String,

    /// Current value.
    #[serde(default, deserialize_with = "lenient::text")]
    pub field_value: String,

    /// Editor presentation.
    #[serde(default)]
    pub field_type: FieldType,

    /// Position within the section.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub display_order: i64,

    /// Whether the field is exposed to pages.
    #[serde(default, skip_serializing_if = "VisibilityFlag::is_unset")]
    pub is_active: VisibilityFlag,

    /// Last modification time, when the backend tracks it.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

impl ContentField {
    /// Create an active field.
    #[must_use]
    pub fn new(
        section: &str,
        field_name: &str,
        field_value: &str,
        field_type: FieldType,
        display_order: i64,
    ) -> Self {
        Self {
            id: String::new(),
            section: section.to_string(),
            field_name: field_name.to_string(),
            field_value: field_value.to_string(),
            field_type,
            display_order,
            is_active: VisibilityFlag::shown(),
            updated_at: None,
        }
    }
}

impl Entity for ContentField {
    const KIND: EntityKind = EntityKind::Content;

    fn id(&self) -> &str {
        &self.id
    }

    fn visibility(&self) -> &VisibilityFlag {
        &self.is_active
    }

    fn fallback() -> Vec<Self> {
        defaults::content_fields()
    }
}

/// Flatten the active fields into a lookup table. Later duplicates win.
#[must_use]
pub fn flatten(fields: &[ContentField]) -> ContentMap {
    fields
        .iter()
        .filter(|field| field.is_visible())
        .map(|field| (field.field_name.clone(), field.field_value.clone()))
        .collect()
}

/// Sort fields by section, then display order.
pub fn sort_fields(fields: &mut [ContentField]) {
    fields.sort_by(|a, b| {
        a.section
            .cmp(&b.section)
            .then(a.display_order.cmp(&b.display_order))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("textarea"), FieldType::Textarea);
        assert_eq!(FieldType::parse("Image"), FieldType::Image);
        assert_eq!(FieldType::parse("mystery"), FieldType::Text);
        assert_eq!(FieldType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_deserialize_rest_row() {
        let field: ContentField = serde_json::from_value(json!({
            "id": 3,
            "section": "hero",
            "field_name": "hero_text",
            "field_value": "Breathe.",
            "field_type": "text",
            "display_order": 1,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(field.id, "3");
        assert_eq!(field.display_order, 1);
        assert!(field.is_visible());
    }

    #[test]
    fn test_deserialize_sheet_row() {
        let field: ContentField = serde_json::from_value(json!({
            "section": "hero",
            "field_name": "hero_text",
            "field_value": "Breathe.",
            "field_type": "",
            "display_order": "2",
            "is_active": "FALSE"
        }))
        .unwrap();
        assert!(field.id.is_empty());
        assert_eq!(field.field_type, FieldType::Text);
        assert_eq!(field.display_order, 2);
        assert!(!field.is_visible());
    }

    #[test]
    fn test_flatten_keeps_active_fields() {
        let mut hidden = ContentField::new("hero", "hero_trust_1", "x", FieldType::Text, 2);
        hidden.is_active = VisibilityFlag::hidden();
        let fields = vec![
            ContentField::new("hero", "hero_text", "Breathe.", FieldType::Text, 1),
            hidden,
        ];
        let map = flatten(&fields);
        assert_eq!(map.len(), 1);
        assert_eq!(map["hero_text"], "Breathe.");
    }

    #[test]
    fn test_flatten_shows_unflagged_fields() {
        let rows = json!([
            {"field_name": "hero_text", "field_value": "a", "is_active": ""},
            {"field_name": "main_quote", "field_value": "b"},
            {"field_name": "hero_subtext", "field_value": "c", "is_active": null},
            {"field_name": "footer_note", "field_value": "d", "is_active": "False"}
        ]);
        let fields: Vec<ContentField> = serde_json::from_value(rows).unwrap();

        let map = flatten(&fields);
        assert_eq!(map.len(), 3);
        assert_eq!(map["main_quote"], "b");
        assert!(!map.contains_key("footer_note"));
    }

    #[test]
    fn test_flatten_later_duplicate_wins() {
        let fields = vec![
            ContentField::new("footer", "contact_email", "old@example.com", FieldType::Text, 5),
            ContentField::new("contact", "contact_email", "new@example.com", FieldType::Text, 5),
        ];
        assert_eq!(flatten(&fields)["contact_email"], "new@example.com");
    }

    #[test]
    fn test_sort_fields() {
        let mut fields = vec![
            ContentField::new("hero", "b", "", FieldType::Text, 2),
            ContentField::new("about_me", "c", "", FieldType::Text, 1),
            ContentField::new("hero", "a", "", FieldType::Text, 1),
        ];
        sort_fields(&mut fields);
        let names: Vec<_> = fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }
}
