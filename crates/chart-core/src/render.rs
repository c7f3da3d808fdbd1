// File: crates/chart-core/src/render.rs
// Summary: Coalescing queue of render requests, drained at each paint opportunity.
// Notes:
// - Requests are keyed by instance identity, so a request for a destroyed (or rebuilt)
//   chart can never paint its successor.
// - The scheduler is a cheap clonable handle; tab-bus handlers hold clones.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::InstanceId;

/// One pending "recompute pixels for this instance".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub instance: InstanceId,
    /// At least one coalesced request came from a resize; `update-width` follows the paint.
    pub resized: bool,
}

#[derive(Default)]
struct Queue {
    order: Vec<InstanceId>,
    pending: HashMap<InstanceId, RenderRequest>,
    issued: u64,
}

#[derive(Clone, Default)]
pub struct RenderScheduler {
    inner: Rc<RefCell<Queue>>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a repaint of `instance` at the next paint opportunity.
    pub fn request(&self, instance: InstanceId) {
        self.enqueue(instance, false);
    }

    /// Same as `request`, flagged as resize-triggered.
    pub fn request_resize(&self, instance: InstanceId) {
        self.enqueue(instance, true);
    }

    fn enqueue(&self, instance: InstanceId, resized: bool) {
        let mut q = self.inner.borrow_mut();
        q.issued += 1;
        if let Some(existing) = q.pending.get_mut(&instance) {
            existing.resized |= resized;
            tracing::trace!(%instance, "render request coalesced");
            return;
        }
        q.order.push(instance);
        q.pending.insert(instance, RenderRequest { instance, resized });
    }

    /// Forget any pending request for `instance`.
    pub fn cancel(&self, instance: InstanceId) {
        let mut q = self.inner.borrow_mut();
        if q.pending.remove(&instance).is_some() {
            q.order.retain(|id| *id != instance);
        }
    }

    /// Drain pending requests in first-requested order.
    pub fn take(&self) -> Vec<RenderRequest> {
        let mut q = self.inner.borrow_mut();
        let order = std::mem::take(&mut q.order);
        let mut pending = std::mem::take(&mut q.pending);
        order.into_iter().filter_map(|id| pending.remove(&id)).collect()
    }

    pub fn is_pending(&self, instance: InstanceId) -> bool {
        self.inner.borrow().pending.contains_key(&instance)
    }

    /// Number of distinct instances waiting for a paint.
    pub fn len(&self) -> usize {
        self.inner.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total requests issued since creation, coalesced or not.
    pub fn issued(&self) -> u64 {
        self.inner.borrow().issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_requests_coalesce_and_keep_the_resize_flag() {
        let s = RenderScheduler::new();
        s.request(InstanceId(1));
        s.request_resize(InstanceId(1));
        s.request(InstanceId(1));
        assert_eq!(s.len(), 1);
        assert_eq!(s.issued(), 3);
        assert_eq!(s.take(), vec![RenderRequest { instance: InstanceId(1), resized: true }]);
        assert!(s.is_empty());
    }

    #[test]
    fn drain_preserves_first_request_order() {
        let s = RenderScheduler::new();
        s.request(InstanceId(2));
        s.request(InstanceId(1));
        s.request(InstanceId(2));
        let ids: Vec<_> = s.take().into_iter().map(|r| r.instance).collect();
        assert_eq!(ids, vec![InstanceId(2), InstanceId(1)]);
    }

    #[test]
    fn cancel_removes_only_the_named_instance() {
        let s = RenderScheduler::new();
        s.request(InstanceId(1));
        s.request(InstanceId(2));
        s.cancel(InstanceId(1));
        s.cancel(InstanceId(1));
        assert!(!s.is_pending(InstanceId(1)));
        assert!(s.is_pending(InstanceId(2)));
    }

    #[test]
    fn clones_share_one_queue() {
        let s = RenderScheduler::new();
        let handler_side = s.clone();
        handler_side.request(InstanceId(7));
        assert!(s.is_pending(InstanceId(7)));
    }
}
