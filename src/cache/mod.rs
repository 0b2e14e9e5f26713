//! Cache module for storing API responses in memory
//!
//! This module provides a response store keyed by query identity with a
//! configurable TTL. Expiry is lazy: stale entries read as absent but are only
//! removed by an explicit clear. Time is read through a pluggable clock so
//! expiry can be simulated in tests.

mod clock;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::QueryKey;
pub use store::{CacheEntry, ResponseCache, DEFAULT_TTL_SECS};
