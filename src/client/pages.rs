//! Page logic for the share routes
//!
//! The landing page (`/shared`) stores the share itself and shows the result
//! dialog. The success page (`/share-success`) only confirms a share the
//! worker already sent. Both refuse direct visits that carry no sign of a
//! share and send them to the not-found page.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use super::countdown::{Countdown, AUTO_CLOSE_SECONDS};
use super::session::{SessionStore, ShareFlag};
use super::ShareApi;
use crate::models::{ShareEvent, ShareParams, ShareResponse};
use crate::worker::{ClientMessage, DebugInfo};

/// Where illegitimate visits are sent.
pub const NOT_FOUND_PATH: &str = "/not-found";

/// How long the success page stays up.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

const MISSING_URL: &str = "No URL was provided. A URL is required when sharing.";

/// What a page decides to do on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(String),
}

// == Page Context ==
/// Everything a page sees when it loads.
#[derive(Clone)]
pub struct PageContext {
    pub url: Url,
    pub referrer: Option<Url>,
    session: Arc<dyn SessionStore>,
}

impl PageContext {
    pub fn new(url: Url, session: Arc<dyn SessionStore>) -> Self {
        Self {
            url,
            referrer: None,
            session,
        }
    }

    pub fn with_referrer(mut self, referrer: Url) -> Self {
        self.referrer = Some(referrer);
        self
    }

    pub fn flag(&self) -> ShareFlag<'_> {
        ShareFlag::new(self.session.as_ref())
    }

    pub fn params(&self) -> ShareParams {
        ShareParams::from_query(&self.url)
    }

    /// A share parameter in the query, or arrival from another site.
    pub fn has_share_signals(&self) -> bool {
        let foreign_referrer = self
            .referrer
            .as_ref()
            .map(|r| r.origin() != self.url.origin())
            .unwrap_or(false);

        self.params().any() || foreign_referrer
    }

    /// Applies a message from the worker.
    pub fn on_message(&self, message: &ClientMessage) {
        if let ClientMessage::SetShareFlag { value, .. } = message {
            if *value {
                self.flag().set();
            } else {
                self.flag().clear();
            }
        }
    }

    /// Lets legitimate share visits through and records them in the flag.
    pub fn guard(&self) -> Navigation {
        if self.has_share_signals() {
            self.flag().set();
        }

        if self.flag().is_set() {
            Navigation::Stay
        } else {
            info!(url = %self.url, "Invalid access to share route");
            Navigation::Redirect(NOT_FOUND_PATH.to_string())
        }
    }
}

// == Success Page ==
pub struct SuccessPage;

impl SuccessPage {
    /// Only the flag counts here: the worker redirected with no query.
    pub fn enter(ctx: &PageContext) -> Navigation {
        if ctx.flag().is_set() {
            Navigation::Stay
        } else {
            info!("Invalid access to share success route");
            Navigation::Redirect(NOT_FOUND_PATH.to_string())
        }
    }

    /// Shows the confirmation for `display`, then clears the flag.
    pub async fn display(ctx: &PageContext, display: Duration) {
        tokio::time::sleep(display).await;
        ctx.flag().clear();
    }
}

// == Share Dialog ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Loading,
    Success(ShareResponse),
    Error(String),
}

/// Result of handling a share on the landing page.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub state: DialogState,
    pub debug: DebugInfo,
    /// Running on success, paused on error so the message can be read
    pub countdown: Countdown,
}

// == Shared Page ==
/// The GET landing page: reads the query and calls the storage endpoint.
pub struct SharedPage {
    api: Arc<dyn ShareApi>,
}

impl SharedPage {
    pub fn new(api: Arc<dyn ShareApi>) -> Self {
        Self { api }
    }

    /// Loads the page for `ctx`, or tells the caller where to go instead.
    pub async fn load(&self, ctx: &PageContext) -> Result<ShareOutcome, Navigation> {
        match ctx.guard() {
            Navigation::Stay => {}
            redirect => return Err(redirect),
        }

        let raw = ctx.url.query().map(|q| format!("?{}", q)).unwrap_or_default();
        Ok(self.handle_share(&ctx.params(), raw).await)
    }

    /// Stores one share. Called once per page load; a failure is shown, not
    /// retried.
    ///
    /// The stored `url` is the shared url, or the shared text when no url was
    /// given. Apps that put the link in `text` are stored instead of being
    /// rejected by the endpoint's url check.
    pub async fn handle_share(&self, params: &ShareParams, raw: String) -> ShareOutcome {
        let debug = DebugInfo::new(params.clone(), raw);

        let Some(target) = params.target() else {
            return ShareOutcome {
                state: DialogState::Error(MISSING_URL.to_string()),
                debug,
                countdown: Countdown::paused(AUTO_CLOSE_SECONDS),
            };
        };

        let event = ShareEvent {
            url: target.to_string(),
            title: non_empty(&params.title),
            text: non_empty(&params.text),
        };

        match self.api.share(&event).await {
            Ok(response) => ShareOutcome {
                state: DialogState::Success(response),
                debug,
                countdown: Countdown::new(AUTO_CLOSE_SECONDS),
            },
            Err(err) => {
                warn!(url = %event.url, "Share failed: {}", err);
                ShareOutcome {
                    state: DialogState::Error(err.to_string()),
                    debug,
                    countdown: Countdown::paused(AUTO_CLOSE_SECONDS),
                }
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemorySession;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        fail_with: Option<u16>,
        calls: Mutex<Vec<ShareEvent>>,
    }

    #[async_trait]
    impl ShareApi for RecordingApi {
        async fn share(&self, event: &ShareEvent) -> Result<ShareResponse, ClientError> {
            self.calls.lock().unwrap().push(event.clone());
            match self.fail_with {
                Some(status) => Err(ClientError::Status(status)),
                None => Ok(ShareResponse::new(event.url.clone())),
            }
        }
    }

    fn context(path: &str) -> PageContext {
        let url = Url::parse("https://app.example").unwrap().join(path).unwrap();
        PageContext::new(url, Arc::new(MemorySession::new()))
    }

    #[test]
    fn test_direct_success_visit_redirects() {
        let ctx = context("/share-success");
        assert_eq!(
            SuccessPage::enter(&ctx),
            Navigation::Redirect("/not-found".to_string())
        );
    }

    #[test]
    fn test_flagged_success_visit_stays() {
        let ctx = context("/share-success");
        ctx.on_message(&ClientMessage::SetShareFlag {
            value: true,
            debug_info: None,
        });
        assert_eq!(SuccessPage::enter(&ctx), Navigation::Stay);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_display_clears_flag() {
        let ctx = context("/share-success");
        ctx.flag().set();

        SuccessPage::display(&ctx, SUCCESS_DISPLAY).await;

        assert!(!ctx.flag().is_set());
        assert_eq!(
            SuccessPage::enter(&ctx),
            Navigation::Redirect(NOT_FOUND_PATH.to_string())
        );
    }

    #[test]
    fn test_query_params_are_a_share_signal() {
        let ctx = context("/shared?url=https://x.example");
        assert_eq!(ctx.guard(), Navigation::Stay);
        assert!(ctx.flag().is_set());
    }

    #[test]
    fn test_foreign_referrer_is_a_share_signal() {
        let ctx = context("/shared").with_referrer(Url::parse("https://news.example/a").unwrap());
        assert_eq!(ctx.guard(), Navigation::Stay);
    }

    #[test]
    fn test_self_referrer_is_not_a_signal() {
        let ctx = context("/shared").with_referrer(Url::parse("https://app.example/").unwrap());
        assert_eq!(ctx.guard(), Navigation::Redirect("/not-found".to_string()));
    }

    #[tokio::test]
    async fn test_landing_page_reads_query() {
        let api = Arc::new(RecordingApi::default());
        let page = SharedPage::new(api.clone());
        let ctx = context("/shared?url=https://x.example&title=Hi");

        let params = ctx.params();
        assert_eq!(params.url.as_deref(), Some("https://x.example"));
        assert_eq!(params.title.as_deref(), Some("Hi"));
        assert_eq!(params.text.unwrap_or_default(), "");

        let outcome = page.load(&ctx).await.unwrap();

        assert_eq!(
            outcome.state,
            DialogState::Success(ShareResponse::new("https://x.example"))
        );
        assert!(!outcome.countdown.is_paused());
        assert_eq!(outcome.countdown.remaining(), 5);
        assert_eq!(outcome.debug.raw, "?url=https://x.example&title=Hi");

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ShareEvent::new("https://x.example").with_title("Hi"));
    }

    #[tokio::test]
    async fn test_api_failure_pauses_countdown() {
        let api = Arc::new(RecordingApi {
            fail_with: Some(500),
            ..Default::default()
        });
        let page = SharedPage::new(api.clone());

        let outcome = page
            .handle_share(
                &ShareParams {
                    url: Some("https://x.example".to_string()),
                    ..Default::default()
                },
                String::new(),
            )
            .await;

        assert_eq!(
            outcome.state,
            DialogState::Error("API status code: 500".to_string())
        );
        assert!(outcome.countdown.is_paused());
        // Attempted once, no retry.
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_url_never_calls_api() {
        let api = Arc::new(RecordingApi::default());
        let page = SharedPage::new(api.clone());

        let outcome = page
            .handle_share(
                &ShareParams {
                    title: Some("only a title".to_string()),
                    ..Default::default()
                },
                String::new(),
            )
            .await;

        assert!(matches!(outcome.state, DialogState::Error(_)));
        assert!(outcome.countdown.is_paused());
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_text_only_share_uses_text_as_url() {
        let api = Arc::new(RecordingApi::default());
        let page = SharedPage::new(api.clone());

        page.handle_share(
            &ShareParams {
                text: Some("https://in-text.example".to_string()),
                ..Default::default()
            },
            String::new(),
        )
        .await;

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls[0].url, "https://in-text.example");
        assert_eq!(calls[0].text.as_deref(), Some("https://in-text.example"));
    }

    #[tokio::test]
    async fn test_unflagged_landing_visit_redirects() {
        let page = SharedPage::new(Arc::new(RecordingApi::default()));
        let result = page.load(&context("/shared")).await;
        assert_eq!(result.unwrap_err(), Navigation::Redirect("/not-found".to_string()));
    }
}
