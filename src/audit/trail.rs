//! In-memory audit trail.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::AuditEvent;

/// Thread-safe, bounded recorder for audit events.
///
/// Every recorded event is also emitted through `tracing` under the
/// `task_guard::audit` target. Only the most recent `capacity` events are
/// retained; older ones are evicted first.
///
/// # Example
///
/// ```
/// use task_guard::audit::{AuditTrail, AuditEvent, AuditEventKind, AuditOutcome};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new("req-1", Some("alice"), AuditEventKind::TaskCreate, AuditOutcome::Success));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: usize,
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl AuditTrail {
    /// Events retained by [`AuditTrail::new`].
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates an empty trail with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trail retaining at most `capacity` events.
    ///
    /// A capacity of zero keeps nothing; events are still emitted.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY))),
            capacity,
        }
    }

    /// Maximum number of retained events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Emits and stores an event.
    pub fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "task_guard::audit",
            request_id = %event.request_id(),
            principal = ?event.principal(),
            kind = %event.kind(),
            outcome = %event.outcome(),
            reason = ?event.reason(),
            resource_id = ?event.resource_id(),
            "audit event"
        );
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.lock();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Snapshot of retained events in recording order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEventKind, AuditOutcome};

    #[test]
    fn starts_empty() {
        let trail = AuditTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn records_in_order() {
        let trail = AuditTrail::new();
        trail.record(AuditEvent::new(
            "req-1",
            Some("alice"),
            AuditEventKind::Registration,
            AuditOutcome::Success,
        ));
        trail.record(AuditEvent::new(
            "req-2",
            Some("bob"),
            AuditEventKind::TaskRead,
            AuditOutcome::Denied,
        ));

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].request_id(), "req-1");
        assert_eq!(events[1].outcome(), AuditOutcome::Denied);
    }

    fn rejected(request_id: String) -> AuditEvent {
        AuditEvent::new(
            request_id,
            None::<String>,
            AuditEventKind::Registration,
            AuditOutcome::Rejected,
        )
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let trail = AuditTrail::with_capacity(3);
        assert_eq!(trail.capacity(), 3);
        for i in 0..10 {
            trail.record(rejected(format!("req-{i}")));
        }

        let events = trail.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].request_id(), "req-7");
        assert_eq!(events[2].request_id(), "req-9");
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let trail = AuditTrail::with_capacity(0);
        trail.record(rejected("req-1".to_string()));
        assert!(trail.is_empty());
    }

    #[test]
    fn can_be_cleared() {
        let trail = AuditTrail::new();
        trail.record(AuditEvent::new(
            "req-1",
            None::<String>,
            AuditEventKind::Registration,
            AuditOutcome::Rejected,
        ));

        trail.clear();

        assert!(trail.is_empty());
    }
}
