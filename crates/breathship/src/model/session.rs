//! Bookable breathwork sessions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{lenient, Entity, EntityKind, VisibilityFlag};
use crate::defaults;

/// Category label shown on a session card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionTag {
    /// Introductory sessions.
    Beginner,
    /// Sessions for experienced practitioners.
    Advanced,
    /// Workplace programmes.
    Corporate,
    /// Private sessions.
    OneOnOne,
    /// Group sessions.
    Group,
    /// Workshops.
    Workshop,
    /// Any label outside the known set, kept verbatim.
    Other(String),
}

impl SessionTag {
    /// Parse a tag label, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            "corporate" => Self::Corporate,
            "one-on-one" => Self::OneOnOne,
            "group" => Self::Group,
            "workshop" => Self::Workshop,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Display label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Beginner => "Beginner",
            Self::Advanced => "Advanced",
            Self::Corporate => "Corporate",
            Self::OneOnOne => "One-on-One",
            Self::Group => "Group",
            Self::Workshop => "Workshop",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for SessionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SessionTag {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionTag {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(Self::parse(&raw))
    }
}

fn deserialize_tag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SessionTag>, D::Error> {
    let raw = lenient::text(d)?;
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(SessionTag::parse(&raw)))
    }
}

/// A scheduled session with its booking link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend id; empty for drafts.
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    /// Title.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,

    /// Description.
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,

    /// Date as entered (`2024-02-15`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,

    /// Start time as entered (`10:00 AM`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: String,

    /// Free-form duration (`90 minutes`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: String,

    /// Free-form price (`$45`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub price: String,

    /// Card image URL.
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_link: String,

    /// Category label; older rows call the column `tag`.
    #[serde(
        default,
        alias = "tag",
        deserialize_with = "deserialize_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_tag: Option<SessionTag>,

    /// External booking/payment link.
    #[serde(default, deserialize_with = "lenient::text")]
    pub payment_link: String,

    /// Visibility flag.
    #[serde(default, skip_serializing_if = "VisibilityFlag::is_unset")]
    pub is_active: VisibilityFlag,

    /// Creation time, when the backend tracks it.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Session {
    /// Whether the session carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &SessionTag) -> bool {
        self.session_tag.as_ref() == Some(tag)
    }
}

impl Entity for Session {
    const KIND: EntityKind = EntityKind::Sessions;

    fn id(&self) -> &str {
        &self.id
    }

    fn visibility(&self) -> &VisibilityFlag {
        &self.is_active
    }

    fn fallback() -> Vec<Self> {
        defaults::sessions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_parse_round_trip() {
        assert_eq!(SessionTag::parse("one-on-one"), SessionTag::OneOnOne);
        assert_eq!(SessionTag::OneOnOne.to_string(), "One-on-One");
        assert_eq!(
            SessionTag::parse("Retreat"),
            SessionTag::Other("Retreat".to_string())
        );
        assert_eq!(SessionTag::parse("Retreat").as_str(), "Retreat");
    }

    #[test]
    fn test_legacy_tag_column() {
        let session: Session = serde_json::from_value(json!({
            "id": "1",
            "title": "Intro",
            "tag": "Group"
        }))
        .unwrap();
        assert_eq!(session.session_tag, Some(SessionTag::Group));
    }

    #[test]
    fn test_empty_tag_is_none() {
        let session: Session =
            serde_json::from_value(json!({"id": "1", "session_tag": ""})).unwrap();
        assert!(session.session_tag.is_none());
    }

    #[test]
    fn test_serialize_draft_omits_id() {
        let draft = Session {
            title: "Intro".to_string(),
            session_tag: Some(SessionTag::Workshop),
            ..Session::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["session_tag"], "Workshop");
    }

    #[test]
    fn test_has_tag() {
        let session = Session {
            session_tag: Some(SessionTag::Corporate),
            ..Session::default()
        };
        assert!(session.has_tag(&SessionTag::Corporate));
        assert!(!session.has_tag(&SessionTag::Group));
    }
}
