//! Message records exchanged with the message service

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned message identifier.
///
/// The service is free to hand out numeric or textual ids, so both are accepted
/// and written back in the form they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{}", n),
            MessageId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        MessageId::Number(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        id.parse().unwrap_or_else(|_| MessageId::Text(id.to_string()))
    }
}

impl FromStr for MessageId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => MessageId::Number(n),
            Err(_) => MessageId::Text(s.trim().to_string()),
        })
    }
}

/// Creation timestamp as sent by the server.
///
/// Calendar fields serialized by the service arrive as epoch milliseconds;
/// hand-written fixtures tend to use ISO strings. Both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Created {
    Millis(i64),
    Text(String),
}

impl Created {
    /// Interpret the timestamp as UTC, if it is in a recognised format
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Created::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Created::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|naive| naive.and_utc())
                }),
        }
    }
}

impl fmt::Display for Created {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.to_datetime()) {
            (Created::Text(s), _) => write!(f, "{}", s),
            (Created::Millis(_), Some(dt)) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            (Created::Millis(ms), None) => write!(f, "{}", ms),
        }
    }
}

/// A single message, either as returned by the server or as a compose draft.
///
/// Every field is optional: a fresh draft has none of them and serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Created>,
}

impl Message {
    /// An empty message used as the compose draft
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Creation time in UTC, when the server sent one we can read
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.as_ref().and_then(Created::to_datetime)
    }

    /// True when no field has been filled in
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.text.is_none() && self.summary.is_none() && self.created.is_none()
    }
}
