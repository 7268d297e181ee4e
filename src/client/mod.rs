//! Client Module
//!
//! Page-side logic of the share target: calling the storage endpoint, the
//! per-tab share flag, the auto-close countdown and the route guards.

mod api;
pub mod countdown;
mod pages;
mod session;

pub use api::{HttpShareApi, ShareApi};
pub use countdown::{Countdown, CountdownTimer, Tick, AUTO_CLOSE_SECONDS};
pub use pages::{
    DialogState, Navigation, PageContext, ShareOutcome, SharedPage, SuccessPage, NOT_FOUND_PATH,
    SUCCESS_DISPLAY,
};
pub use session::{MemorySession, SessionStore, ShareFlag, SHARE_FLAG_KEY};
