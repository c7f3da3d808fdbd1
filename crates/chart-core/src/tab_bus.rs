// File: crates/chart-core/src/tab_bus.rs
// Summary: Broadcast of "the owning tab became active" to subscribed chart widgets.
// Notes:
// - Explicit context object: the page creates one bus and hands clones to its widgets.
// - `Subscription` is a scoped guard. Dropping it unsubscribes, so a widget torn down on
//   any path (including a panic unwinding through its owner) leaves no dangling handler.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler = Rc<RefCell<dyn FnMut()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<SubscriptionId, Handler>,
}

#[derive(Clone, Default)]
pub struct TabVisibilityBus {
    registry: Rc<RefCell<Registry>>,
}

impl TabVisibilityBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`; it runs once per `publish` until the returned guard is released.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, handler: impl FnMut() + 'static) -> Subscription {
        let mut reg = self.registry.borrow_mut();
        reg.next_id += 1;
        let id = SubscriptionId(reg.next_id);
        reg.handlers.insert(id, Rc::new(RefCell::new(handler)));
        tracing::trace!(subscription = %id, "tab subscriber added");
        Subscription { id, registry: Rc::downgrade(&self.registry), active: true }
    }

    /// Remove a subscriber. Returns false (and does nothing) if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove(&self.registry, id)
    }

    /// Deliver the event to every current subscriber; returns how many ran.
    /// Handlers may subscribe or unsubscribe while the event is delivered.
    pub fn publish(&self) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler)> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(id, h)| (*id, Rc::clone(h)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.registry.borrow().handlers.contains_key(&id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)();
                    delivered += 1;
                }
                Err(_) => tracing::trace!(subscription = %id, "handler already running; skipped nested publish"),
            }
        }
        tracing::debug!(delivered, "tab visibility published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

fn remove(registry: &Rc<RefCell<Registry>>, id: SubscriptionId) -> bool {
    let removed = registry.borrow_mut().handlers.remove(&id).is_some();
    if removed {
        tracing::trace!(subscription = %id, "tab subscriber removed");
    }
    removed
}

/// Scoped subscription guard.
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Registry>>,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active && self.registry.upgrade().map_or(false, |r| r.borrow().handlers.contains_key(&self.id))
    }

    /// Unsubscribe now. Safe to call more than once.
    pub fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            remove(&registry, self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).field("active", &self.active).finish()
    }
}
