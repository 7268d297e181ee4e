//! What the interceptor asks the host to do for one event.

use axum::http::StatusCode;

use super::ClientMessage;
use crate::models::ShareEvent;

/// How to answer an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Responder {
    /// Answer immediately with a redirect
    Redirect {
        status: StatusCode,
        location: String,
    },
    /// Network first, cached shell document when offline
    NetworkOrShell,
    /// Cache first, network second, synthesized fallback last
    CacheFirst,
}

/// Work that must outlive the handler's return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// POST the share to the storage endpoint, once, without retry
    StoreShare(ShareEvent),
}

/// A single side effect requested by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RespondWith(Responder),
    WaitUntil(Task),
    PostMessage(ClientMessage),
    SkipWaiting,
}

/// Returns the responder among `effects`, if any.
///
/// No responder means the request continues to the network untouched.
pub fn responder(effects: &[Effect]) -> Option<&Responder> {
    effects.iter().find_map(|effect| match effect {
        Effect::RespondWith(responder) => Some(responder),
        _ => None,
    })
}
