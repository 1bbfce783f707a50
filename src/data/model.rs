//! Wire types returned by the VoIP backend.
//!
//! These match the JSON produced by the backend's `/calls` and `/qos`
//! endpoints. Unknown fields are ignored so the backend can grow without
//! breaking the dashboard.

use serde::{Deserialize, Deserializer, Serialize};

/// A single call log entry from `GET /calls`.
///
/// `caller`, `callee` and `call_id` are optional on the wire. An entry
/// missing either party still shows up in the call table but contributes
/// nothing to the call graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogEntry {
    /// Backend-assigned call identifier (e.g. `"call-1234"`).
    ///
    /// Numeric ids are accepted and kept in their decimal form. `0`, like
    /// `null`, counts as no id.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub call_id: Option<String>,

    /// Calling party, usually a SIP URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,

    /// Called party, usually a SIP URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callee: Option<String>,

    /// Call state as reported by the backend (`"Active"`, `"Ended"`, ...).
    #[serde(default)]
    pub status: String,

    /// Wall-clock start time, preformatted by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// Call duration, preformatted by the backend (e.g. `"42s"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl CallLogEntry {
    /// The call id, treating an empty string as absent.
    pub fn call_id(&self) -> Option<&str> {
        non_empty(self.call_id.as_deref())
    }

    /// The caller, treating an empty string as absent.
    pub fn caller(&self) -> Option<&str> {
        non_empty(self.caller.as_deref())
    }

    /// The callee, treating an empty string as absent.
    pub fn callee(&self) -> Option<&str> {
        non_empty(self.callee.as_deref())
    }

    /// Whether the backend reports this call as currently active.
    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
        Float(f64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => Some(s),
        Some(Id::Int(0)) | Some(Id::Uint(0)) => None,
        Some(Id::Int(n)) => Some(n.to_string()),
        Some(Id::Uint(n)) => Some(n.to_string()),
        Some(Id::Float(f)) if f == 0.0 || f.is_nan() => None,
        Some(Id::Float(f)) => Some(f.to_string()),
        None => None,
    })
}

/// A single QoS measurement from `GET /qos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QosMetric {
    /// Metric name including its unit, e.g. `"Jitter (ms)"`.
    pub metric: String,
    pub value: f64,
}
