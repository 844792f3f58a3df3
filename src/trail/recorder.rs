use std::cell::RefCell;
use std::collections::VecDeque;

use super::ViewEvent;

/// Events a trail keeps unless configured otherwise.
pub const DEFAULT_TRAIL_CAPACITY: usize = 256;

/// In-memory, ordered recorder for [`ViewEvent`]s.
///
/// Recording takes `&self` so handlers holding a shared borrow of the view
/// can still append. The trail is bounded: once `capacity` events are held,
/// each new event evicts the oldest one. A capacity of 0 records nothing.
///
/// # Example
///
/// ```
/// use content_view::trail::{EventTrail, Outcome, ViewEvent, ViewEventKind};
///
/// let trail = EventTrail::new();
/// trail.record(ViewEvent::new("view-1", ViewEventKind::Connected, Outcome::Success));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug)]
pub struct EventTrail {
    events: RefCell<VecDeque<ViewEvent>>,
    capacity: usize,
}

impl EventTrail {
    /// Creates a trail holding at most [`DEFAULT_TRAIL_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TRAIL_CAPACITY)
    }

    /// Creates a trail holding at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: RefCell::new(VecDeque::with_capacity(capacity.min(DEFAULT_TRAIL_CAPACITY))),
            capacity,
        }
    }

    /// Appends `event`, evicting the oldest event when the trail is full.
    pub fn record(&self, event: ViewEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.borrow_mut();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Returns a snapshot of all retained events, oldest first.
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().iter().cloned().collect()
    }

    /// The most recently recorded event.
    pub fn last(&self) -> Option<ViewEvent> {
        self.events.borrow().back().cloned()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Maximum number of events retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every retained event.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for EventTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::{Outcome, ViewEventKind};

    #[test]
    fn starts_empty() {
        let trail = EventTrail::default();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn records_in_order() {
        let trail = EventTrail::new();
        trail.record(ViewEvent::new("view-1", ViewEventKind::Connected, Outcome::Success));
        trail.record(ViewEvent::new(
            "view-1",
            ViewEventKind::ContentIngested,
            Outcome::Failed,
        ));

        let kinds: Vec<_> = trail.events().iter().map(ViewEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![ViewEventKind::Connected, ViewEventKind::ContentIngested]
        );
    }

    #[test]
    fn clear_empties_trail() {
        let trail = EventTrail::new();
        trail.record(ViewEvent::new("view-1", ViewEventKind::ImagesBlocked, Outcome::Success));

        trail.clear();

        assert!(trail.is_empty());
    }

    #[test]
    fn full_trail_evicts_oldest() {
        let trail = EventTrail::with_capacity(2);
        trail.record(ViewEvent::new("view-1", ViewEventKind::Connected, Outcome::Success));
        trail.record(ViewEvent::new("view-1", ViewEventKind::ImagesBlocked, Outcome::Success));
        trail.record(ViewEvent::new("view-1", ViewEventKind::ImagesUnblocked, Outcome::Success));

        let kinds: Vec<_> = trail.events().iter().map(ViewEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![ViewEventKind::ImagesBlocked, ViewEventKind::ImagesUnblocked]
        );
        assert_eq!(trail.last().map(|event| event.kind()), Some(ViewEventKind::ImagesUnblocked));
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let trail = EventTrail::with_capacity(0);
        trail.record(ViewEvent::new("view-1", ViewEventKind::Connected, Outcome::Success));

        assert!(trail.is_empty());
        assert_eq!(trail.last(), None);
    }

    #[test]
    fn default_capacity_bounds_long_runs() {
        let trail = EventTrail::new();
        for _ in 0..10 * DEFAULT_TRAIL_CAPACITY {
            trail.record(ViewEvent::new("view-1", ViewEventKind::AttributeChanged, Outcome::Success));
        }

        assert_eq!(trail.len(), DEFAULT_TRAIL_CAPACITY);
        assert_eq!(trail.capacity(), DEFAULT_TRAIL_CAPACITY);
    }
}
