//! Share payloads
//!
//! A [`ShareEvent`] is the transient `{url, title?, text?}` triple handed over
//! by the OS share sheet. It is never persisted by the interceptor; it is only
//! forwarded to the storage endpoint.

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// Payload sent to `POST /api/share`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEvent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ShareEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            text: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builds an event from an `application/x-www-form-urlencoded` body.
    ///
    /// Missing fields become empty strings, so the forwarded JSON always
    /// carries all three keys.
    pub fn from_form(body: &[u8]) -> Self {
        let params = ShareParams::from_pairs(form_urlencoded::parse(body));
        Self {
            url: params.url.unwrap_or_default(),
            title: Some(params.title.unwrap_or_default()),
            text: Some(params.text.unwrap_or_default()),
        }
    }
}

/// Raw share parameters as they appear in a query string or form.
///
/// Each field is `None` when the parameter is absent. The first
/// occurrence of a repeated parameter wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareParams {
    pub url: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

impl ShareParams {
    /// Reads `url`, `title` and `text` from the query of `url`.
    pub fn from_query(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs())
    }

    fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            // First occurrence wins, like `get`.
            let slot = match key.as_ref() {
                "url" => &mut params.url,
                "title" => &mut params.title,
                "text" => &mut params.text,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// True when any share parameter is present.
    pub fn any(&self) -> bool {
        self.url.is_some() || self.title.is_some() || self.text.is_some()
    }

    /// The value to store: the url, or the text when some apps put the link there.
    pub fn target(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.text.as_deref().filter(|t| !t.is_empty()))
    }
}
