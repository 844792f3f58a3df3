//! Lifecycle event trail for content views.
//!
//! This module provides:
//! - `ViewEvent`: a structured record of one lifecycle step
//! - `EventTrail`: an in-memory, ordered, bounded recorder
//!
//! Events only carry counts, byte lengths and attribute names. Raw markup is
//! never recorded.

mod event;
mod recorder;

pub use event::{Outcome, ViewEvent, ViewEventKind};
pub use recorder::{EventTrail, DEFAULT_TRAIL_CAPACITY};
