// File: crates/chart-core/tests/tab_bus.rs
// Purpose: Tab-visibility broadcast: delivery, scoped unsubscription, idempotent release.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chart_core::TabVisibilityBus;

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    (hits, move || h.set(h.get() + 1))
}

#[test]
fn publish_without_subscribers_is_harmless() {
    let bus = TabVisibilityBus::new();
    assert_eq!(bus.publish(), 0);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn every_subscriber_sees_each_publish() {
    let bus = TabVisibilityBus::new();
    let (a, fa) = counter();
    let (b, fb) = counter();
    let _sa = bus.subscribe(fa);
    let _sb = bus.subscribe(fb);

    assert_eq!(bus.publish(), 2);
    bus.publish();
    assert_eq!((a.get(), b.get()), (2, 2));
}

#[test]
fn dropping_the_guard_unsubscribes() {
    let bus = TabVisibilityBus::new();
    let (hits, f) = counter();
    {
        let _guard = bus.subscribe(f);
        bus.publish();
    }
    bus.publish();
    assert_eq!(hits.get(), 1);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn double_unsubscribe_is_a_no_op() {
    let bus = TabVisibilityBus::new();
    let (_, f) = counter();
    let (_, g) = counter();
    let mut sub = bus.subscribe(f);
    let _other = bus.subscribe(g);

    sub.release();
    sub.release();
    assert!(!sub.is_active());
    assert!(!bus.unsubscribe(sub.id()));
    assert_eq!(bus.subscriber_count(), 1);
    drop(sub);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn guard_outliving_the_bus_releases_quietly() {
    let (_, f) = counter();
    let sub = {
        let bus = TabVisibilityBus::new();
        bus.subscribe(f)
    };
    assert!(!sub.is_active());
    drop(sub);
}

#[test]
fn handler_may_unsubscribe_a_peer_during_delivery() {
    let bus = TabVisibilityBus::new();
    let (late_hits, late) = counter();
    let victim: Rc<RefCell<Option<chart_core::Subscription>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&victim);
    let _killer = bus.subscribe(move || {
        if let Some(mut s) = slot.borrow_mut().take() {
            s.release();
        }
    });
    *victim.borrow_mut() = Some(bus.subscribe(late));

    bus.publish();
    bus.publish();
    // Delivery order is unspecified: the victim may run at most once, before it is removed.
    assert!(late_hits.get() <= 1);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn clones_share_one_registry() {
    let bus = TabVisibilityBus::new();
    let page_side = bus.clone();
    let (hits, f) = counter();
    let _s = bus.subscribe(f);
    assert_eq!(page_side.publish(), 1);
    assert_eq!(hits.get(), 1);
}
