//! Background Tasks Module
//!
//! Work that must outlive the request that started it.
//!
//! # Tasks
//! - Wait-until: background share stores registered by the worker, drained
//!   on shutdown so they are not silently dropped

mod wait_until;

pub use wait_until::PendingTasks;
