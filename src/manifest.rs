//! Web App Manifest
//!
//! The `share_target` member is what lists the app in the OS share sheet.

use std::str::FromStr;

use serde::Serialize;

use crate::worker::{SHARED_PATH, SHARE_TARGET_PATH};

/// How the share sheet hands data over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShareMethod {
    /// Navigate to the landing page with query parameters
    Get,
    /// Submit a form to the worker-intercepted share target
    Post,
}

impl FromStr for ShareMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(ShareMethod::Get),
            "POST" => Ok(ShareMethod::Post),
            other => Err(format!("unknown share method: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Icon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime: String,
}

impl Icon {
    fn png(size: u32) -> Self {
        Self {
            src: format!("/icon-{0}x{0}.png", size),
            sizes: format!("{0}x{0}", size),
            mime: "image/png".to_string(),
        }
    }
}

/// Form field names the share sheet fills in.
#[derive(Debug, Clone, Serialize)]
pub struct ShareTargetParams {
    pub url: String,
    pub title: String,
    pub text: String,
}

impl Default for ShareTargetParams {
    fn default() -> Self {
        Self {
            url: "url".to_string(),
            title: "title".to_string(),
            text: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareTarget {
    pub action: String,
    pub method: ShareMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enctype: Option<String>,
    pub params: ShareTargetParams,
}

impl ShareTarget {
    pub fn new(method: ShareMethod) -> Self {
        match method {
            ShareMethod::Get => Self {
                action: SHARED_PATH.to_string(),
                method,
                enctype: None,
                params: ShareTargetParams::default(),
            },
            ShareMethod::Post => Self {
                action: SHARE_TARGET_PATH.to_string(),
                method,
                enctype: Some("application/x-www-form-urlencoded".to_string()),
                params: ShareTargetParams::default(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<Icon>,
    pub share_target: ShareTarget,
}

impl WebManifest {
    pub fn new(method: ShareMethod) -> Self {
        Self {
            name: "Share Target".to_string(),
            short_name: "Share".to_string(),
            start_url: "/".to_string(),
            display: "standalone".to_string(),
            background_color: "#ffffff".to_string(),
            theme_color: "#2563eb".to_string(),
            icons: vec![Icon::png(192), Icon::png(512)],
            share_target: ShareTarget::new(method),
        }
    }
}
