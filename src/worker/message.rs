//! Cross-context messages between the worker and its pages.

use serde::{Deserialize, Serialize};

use crate::models::ShareParams;

/// Diagnostic copy of what the worker saw when it detected a share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub url: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    /// Raw query string (with leading `?`) or form body
    pub raw: String,
}

impl DebugInfo {
    pub fn new(params: ShareParams, raw: impl Into<String>) -> Self {
        Self {
            url: params.url,
            title: params.title,
            text: params.text,
            raw: raw.into(),
        }
    }
}

/// Messages exchanged over `postMessage`, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Worker -> page: a share is in progress
    #[serde(rename = "SET_SHARE_FLAG")]
    SetShareFlag {
        value: bool,
        #[serde(rename = "debugInfo", default, skip_serializing_if = "Option::is_none")]
        debug_info: Option<DebugInfo>,
    },

    /// Page -> worker: activate the waiting update now
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}

impl ClientMessage {
    pub fn share_started(debug_info: DebugInfo) -> Self {
        ClientMessage::SetShareFlag {
            value: true,
            debug_info: Some(debug_info),
        }
    }
}
