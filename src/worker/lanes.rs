//! Share Interceptor
//!
//! Classifies every request passing through the worker into one lane and
//! plans the lane's effects. Planning is pure; [`super::ServiceWorker`]
//! carries the effects out.

use axum::http::{Method, StatusCode};

use super::{ClientMessage, DebugInfo, Effect, Responder, Task, WorkerConfig};
use crate::fetch::FetchRequest;
use crate::models::{ShareEvent, ShareParams};

// == Lane ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Form POST from the share sheet
    SharePost,
    /// GET navigation to the shared landing page
    ShareNavigation,
    /// Any other page load
    Navigation,
    /// Everything else: scripts, styles, images, API calls...
    Asset,
}

struct LaneRule {
    lane: Lane,
    matches: fn(&FetchRequest, &WorkerConfig) -> bool,
    plan: fn(&FetchRequest, &WorkerConfig) -> Vec<Effect>,
}

/// Evaluated top to bottom, first match wins.
///
/// The POST share comes first so a POST to a path that also looks like the
/// landing page is still stored. The landing page comes before the generic
/// navigation lane, which would otherwise swallow it. Assets are last and
/// match everything.
static LANES: [LaneRule; 4] = [
    LaneRule {
        lane: Lane::SharePost,
        matches: is_share_post,
        plan: plan_share_post,
    },
    LaneRule {
        lane: Lane::ShareNavigation,
        matches: is_share_navigation,
        plan: plan_share_navigation,
    },
    LaneRule {
        lane: Lane::Navigation,
        matches: is_navigation,
        plan: plan_navigation,
    },
    LaneRule {
        lane: Lane::Asset,
        matches: is_anything,
        plan: plan_asset,
    },
];

impl Lane {
    /// Returns the first lane whose predicate accepts `request`.
    pub fn classify(request: &FetchRequest, config: &WorkerConfig) -> Lane {
        LANES
            .iter()
            .find(|rule| (rule.matches)(request, config))
            .map(|rule| rule.lane)
            .unwrap_or(Lane::Asset)
    }

    fn rule(self) -> &'static LaneRule {
        LANES
            .iter()
            .find(|rule| rule.lane == self)
            .unwrap_or(&LANES[LANES.len() - 1])
    }
}

// == Planning ==
/// Classifies `request` and plans its effects.
pub fn plan(request: &FetchRequest, config: &WorkerConfig) -> (Lane, Vec<Effect>) {
    let lane = Lane::classify(request, config);
    (lane, (lane.rule().plan)(request, config))
}

/// Plans the effects of a page -> worker message.
pub fn plan_message(message: &ClientMessage) -> Vec<Effect> {
    match message {
        ClientMessage::SkipWaiting => vec![Effect::SkipWaiting],
        // Pages are the ones that act on the flag.
        ClientMessage::SetShareFlag { .. } => Vec::new(),
    }
}

// == Predicates ==
fn is_share_post(request: &FetchRequest, config: &WorkerConfig) -> bool {
    request.method == Method::POST && request.url.path() == config.share_target_path
}

fn is_share_navigation(request: &FetchRequest, config: &WorkerConfig) -> bool {
    request.is_navigate() && request.url.path() == config.shared_path
}

fn is_navigation(request: &FetchRequest, _: &WorkerConfig) -> bool {
    request.is_navigate()
}

fn is_anything(_: &FetchRequest, _: &WorkerConfig) -> bool {
    true
}

// == Lane Plans ==
fn plan_share_post(request: &FetchRequest, config: &WorkerConfig) -> Vec<Effect> {
    let event = ShareEvent::from_form(&request.body);
    let debug_info = DebugInfo {
        url: Some(event.url.clone()),
        title: event.title.clone(),
        text: event.text.clone(),
        raw: String::from_utf8_lossy(&request.body).into_owned(),
    };

    // The redirect does not wait for the store: a failed background write
    // still shows the success page.
    vec![
        Effect::PostMessage(ClientMessage::share_started(debug_info)),
        Effect::WaitUntil(Task::StoreShare(event)),
        Effect::RespondWith(Responder::Redirect {
            status: StatusCode::SEE_OTHER,
            location: config.success_path.clone(),
        }),
    ]
}

fn plan_share_navigation(request: &FetchRequest, _: &WorkerConfig) -> Vec<Effect> {
    let params = ShareParams::from_query(&request.url);
    let raw = request
        .url
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();

    vec![Effect::PostMessage(ClientMessage::share_started(
        DebugInfo::new(params, raw),
    ))]
}

fn plan_navigation(_: &FetchRequest, _: &WorkerConfig) -> Vec<Effect> {
    vec![Effect::RespondWith(Responder::NetworkOrShell)]
}

fn plan_asset(_: &FetchRequest, _: &WorkerConfig) -> Vec<Effect> {
    vec![Effect::RespondWith(Responder::CacheFirst)]
}
