//! Persisted share item.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ShareEvent;

/// Owner of every record until authentication exists.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Status of a freshly stored share; a later summarizer would move it on.
pub const STATUS_PENDING: &str = "pending";

/// One stored share, keyed by `user_id` + `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub user_id: String,
    /// ISO-8601, also the sort key
    pub timestamp: String,
    pub url: String,
    pub title: String,
    pub text: String,
    pub created_at: String,
    pub status: String,
}

impl ShareRecord {
    /// Builds the record for `event` stored at `now`.
    pub fn from_event(event: &ShareEvent, now: DateTime<Utc>) -> Self {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        Self {
            user_id: ANONYMOUS_USER.to_string(),
            timestamp: timestamp.clone(),
            url: event.url.clone(),
            title: event.title.clone().unwrap_or_default(),
            text: event.text.clone().unwrap_or_default(),
            created_at: timestamp,
            status: STATUS_PENDING.to_string(),
        }
    }
}
