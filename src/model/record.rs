//! The persisted shape of the subscriber list.
//!
//! ```json
//! { "subscribers": [ { "email": "a@b.io", "subscribedAt": "2024-05-01T10:20:30.123Z" } ] }
//! ```
//!
//! Fields this service doesn't know about are carried along untouched, so rewriting
//! the file after a subscribe never drops data someone else put there.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::web::types::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// One persisted entry mapping an email to its subscription timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRecord {
    pub email: String,
    pub subscribed_at: SubscribedAt,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// All subscribers in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberList {
    pub subscribers: Vec<SubscriberRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Written like JavaScript's `Date.toISOString` (millisecond precision, `Z`).
/// Values that don't parse as a timestamp are kept verbatim instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribedAt {
    Time(DateTime<Utc>),
    Unparsed(Value),
}

// ###################################
// ->   IMPLs
// ###################################
impl SubscriberRecord {
    pub fn new(email: &ValidEmail) -> Self {
        Self {
            email: email.as_ref().to_owned(),
            subscribed_at: SubscribedAt::now(),
            extra: Map::new(),
        }
    }
}

impl SubscriberList {
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn contains(&self, email: &ValidEmail) -> bool {
        let needle = email.normalized();
        self.subscribers
            .iter()
            .any(|sub| sub.email.to_lowercase() == needle)
    }

    pub fn push(&mut self, record: SubscriberRecord) {
        self.subscribers.push(record);
    }
}

impl SubscribedAt {
    /// Truncated to what the file keeps, so a saved record loads back equal.
    pub fn now() -> Self {
        SubscribedAt::Time(Utc::now().trunc_subsecs(3))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            // Offsets without a colon, e.g. `+0000`.
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

impl Serialize for SubscribedAt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SubscribedAt::Time(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            SubscribedAt::Unparsed(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SubscribedAt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let parsed = value.as_str().and_then(SubscribedAt::parse);

        Ok(match parsed {
            Some(dt) => SubscribedAt::Time(dt),
            None => SubscribedAt::Unparsed(value),
        })
    }
}
