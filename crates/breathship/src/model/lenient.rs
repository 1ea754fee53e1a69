//! Forgiving deserializers for columns whose type varies by backend.
//!
//! The REST backend sends typed JSON while the sheet backend sends every cell
//! as a string, so numeric and boolean columns accept both.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Ids arrive as numbers from the REST backend and as strings elsewhere.
pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Unparseable cells read as zero.
pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::id")]
        id: String,
        #[serde(default, deserialize_with = "super::text")]
        price: String,
        #[serde(default, deserialize_with = "super::integer")]
        order: i64,
        #[serde(default, deserialize_with = "super::boolean")]
        featured: bool,
        #[serde(default, deserialize_with = "super::optional_text")]
        created_at: Option<String>,
    }

    #[test]
    fn test_typed_json_row() {
        let row: Row = serde_json::from_value(json!({
            "id": 12, "price": 45, "order": 3, "featured": true, "created_at": "2024-01-15"
        }))
        .unwrap();
        assert_eq!(row.id, "12");
        assert_eq!(row.price, "45");
        assert_eq!(row.order, 3);
        assert!(row.featured);
        assert_eq!(row.created_at.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_sheet_string_row() {
        let row: Row = serde_json::from_value(json!({
            "id": "12", "price": "$45", "order": " 4 ", "featured": "TRUE", "created_at": ""
        }))
        .unwrap();
        assert_eq!(row.id, "12");
        assert_eq!(row.price, "$45");
        assert_eq!(row.order, 4);
        assert!(row.featured);
        assert!(row.created_at.is_none());
    }

    #[test]
    fn test_missing_and_garbage_values() {
        let row: Row = serde_json::from_value(json!({"order": "n/a", "featured": "nope"})).unwrap();
        assert_eq!(row.id, "");
        assert_eq!(row.price, "");
        assert_eq!(row.order, 0);
        assert!(!row.featured);
    }
}
