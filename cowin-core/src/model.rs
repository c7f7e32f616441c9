//! Domain data structures for vaccination centers, their sessions, and lookup keys.
//!
//! Records keep the JSON the API sent untouched; typed accessors read the fields the merge and
//! filter rules need and return `None` when a field is missing or has an unexpected type.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fee types a center can charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeType {
    /// Government-funded, no charge.
    Free,
    /// Paid vaccination.
    Paid,
}

impl FeeType {
    /// Parse a fee type ignoring case, returning `None` for anything unrecognized.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "FREE" => Some(FeeType::Free),
            "PAID" => Some(FeeType::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FeeType::Free => "Free",
            FeeType::Paid => "Paid",
        };
        write!(formatter, "{label}")
    }
}

/// Session identifier as sent by the API.
///
/// The public API sends UUID strings, older payloads used integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier, usually a UUID.
    Text(String),
}

impl fmt::Display for SessionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Number(id) => write!(formatter, "{id}"),
            SessionId::Text(id) => write!(formatter, "{id}"),
        }
    }
}

/// A single vaccination session offered by a center on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRecord(Value);

impl SessionRecord {
    /// Wrap a raw session entry.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The entry as the API sent it.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Identifier, unique within the owning center.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        match self.0.get("session_id")? {
            Value::Number(number) => number.as_i64().map(SessionId::Number),
            Value::String(text) => Some(SessionId::Text(text.clone())),
            _ => None,
        }
    }

    /// Doses still bookable; zero or negative means fully booked.
    #[must_use]
    pub fn available_capacity(&self) -> Option<f64> {
        self.0.get("available_capacity").and_then(Value::as_f64)
    }

    /// Minimum age of eligible recipients.
    #[must_use]
    pub fn min_age_limit(&self) -> Option<f64> {
        self.0.get("min_age_limit").and_then(Value::as_f64)
    }

    /// Vaccine brand name.
    #[must_use]
    pub fn vaccine(&self) -> Option<&str> {
        self.0.get("vaccine").and_then(Value::as_str)
    }
}

/// The `sessions` field of a center, as the API sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sessions {
    /// A list of session entries.
    List(Vec<SessionRecord>),
    /// Any other JSON value, written back unchanged.
    Malformed(Value),
}

/// A vaccination center together with its sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CenterRecord {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    sessions: Option<Sessions>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl CenterRecord {
    /// Any field other than `sessions`, as the API sent it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Identifier of the center.
    #[must_use]
    pub fn center_id(&self) -> Option<i64> {
        self.get("center_id").and_then(Value::as_i64)
    }

    /// Raw fee type string, normally `Free` or `Paid`.
    #[must_use]
    pub fn fee_type(&self) -> Option<&str> {
        self.get("fee_type").and_then(Value::as_str)
    }

    /// Fee type of the center, if present and recognized.
    #[must_use]
    pub fn fee(&self) -> Option<FeeType> {
        self.fee_type().and_then(FeeType::parse)
    }

    /// Sessions in the order the API listed them, if the center has a session list.
    #[must_use]
    pub fn sessions(&self) -> Option<&[SessionRecord]> {
        match self.sessions.as_ref()? {
            Sessions::List(sessions) => Some(sessions),
            Sessions::Malformed(_) => None,
        }
    }

    /// Mutable access to the session list, if the center has one.
    pub fn sessions_mut(&mut self) -> Option<&mut Vec<SessionRecord>> {
        match self.sessions.as_mut()? {
            Sessions::List(sessions) => Some(sessions),
            Sessions::Malformed(_) => None,
        }
    }

    /// A copy of the center with its session list replaced.
    #[must_use]
    pub fn with_sessions(&self, sessions: Vec<SessionRecord>) -> Self {
        Self {
            sessions: Some(Sessions::List(sessions)),
            fields: self.fields.clone(),
        }
    }

    /// Whether a session with the given identifier is already listed.
    #[must_use]
    pub fn has_session(&self, id: &SessionId) -> bool {
        self.sessions().is_some_and(|sessions| {
            sessions
                .iter()
                .any(|session| session.session_id().as_ref() == Some(id))
        })
    }
}

/// Centers keyed by center identifier; the accumulator across all queries and weeks.
pub type CenterMap = BTreeMap<i64, CenterRecord>;

/// One configured lookup against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// Postal index number.
    Pincode(String),
    /// District identifier.
    District(i64),
    /// Single center identifier.
    Center(i64),
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Pincode(pincode) => write!(formatter, "PIN code '{pincode}'"),
            LocationQuery::District(id) => write!(formatter, "district ID {id}"),
            LocationQuery::Center(id) => write!(formatter, "center ID {id}"),
        }
    }
}

// A present `sessions` key, `null` included, is kept; only a missing key becomes `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Sessions>, D::Error>
where
    D: Deserializer<'de>,
{
    Sessions::deserialize(deserializer).map(Some)
}
