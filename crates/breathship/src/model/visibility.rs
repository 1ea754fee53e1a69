//! The three-state visibility flag carried by every record.
//!
//! Backends disagree on how they spell the flag: the REST backend sends a
//! boolean, the sheet sends `TRUE`, `FALSE` or an empty cell, and older rows
//! have no flag at all. A record is shown unless the flag reads `false` in
//! any letter case. Missing and empty flags count as shown.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Raw `is_active` / `is_published` value as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VisibilityFlag(Option<String>);

impl VisibilityFlag {
    /// An explicit `true` flag.
    #[must_use]
    pub fn shown() -> Self {
        Self(Some("true".to_string()))
    }

    /// An explicit `false` flag.
    #[must_use]
    pub fn hidden() -> Self {
        Self(Some("false".to_string()))
    }

    /// A flag holding exactly the given cell text.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(Some(raw.into()))
    }

    /// The stored text, if any.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether no flag was stored at all.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    /// Visible unless the flag is `false`, ignoring case.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self
            .0
            .as_deref()
            .is_some_and(|raw| raw.eq_ignore_ascii_case("false"))
    }
}

impl From<bool> for VisibilityFlag {
    fn from(value: bool) -> Self {
        if value {
            Self::shown()
        } else {
            Self::hidden()
        }
    }
}

impl Serialize for VisibilityFlag {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.0.as_deref() {
            None => s.serialize_none(),
            Some(raw) if raw.eq_ignore_ascii_case("true") => s.serialize_bool(true),
            Some(raw) if raw.eq_ignore_ascii_case("false") => s.serialize_bool(false),
            Some(raw) => s.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for VisibilityFlag {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => Self(None),
            Value::Bool(b) => Self::from(b),
            Value::String(s) => Self(Some(s)),
            other => Self(Some(other.to_string())),
        })
    }
}
