// File: crates/chart-core/src/widget.rs
// Summary: Page-level chart widget: props in, lifecycle calls out, tab activation handled.
// Notes:
// - The widget owns one tab-bus subscription for its whole lifetime. A kind change rebuilds
//   the chart underneath, but the subscription stays and follows the new instance.
// - The tab handler only enqueues a render request; the page's next `flush` paints.
// - Dropping a widget without `teardown` releases its subscription only. The widget holds no
//   manager, so its chart stays live and bound until `destroy_all` or a later mount on the surface.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::ChartResult;
use crate::lifecycle::{ChartLifecycleManager, InstanceHandle};
use crate::options::ChartOptions;
use crate::series::ChartData;
use crate::surface::Surface;
use crate::tab_bus::{Subscription, TabVisibilityBus};
use crate::types::{ChartKind, InstanceId};

/// Everything the page passes to a chart widget on each update.
#[derive(Clone, Debug)]
pub struct WidgetProps {
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
    /// Per-series visibility; `None` or empty leaves visibility alone.
    pub display_legends: Option<Vec<bool>>,
}

impl WidgetProps {
    pub fn new(kind: ChartKind, data: ChartData) -> Self {
        Self { kind, data, options: ChartOptions::default(), display_legends: None }
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_legends(mut self, legends: Vec<bool>) -> Self {
        self.display_legends = Some(legends);
        self
    }
}

pub struct ChartWidget {
    surface: Surface,
    bus: TabVisibilityBus,
    handle: Option<InstanceHandle>,
    current: Rc<Cell<Option<InstanceId>>>,
    subscription: Option<Subscription>,
}

impl ChartWidget {
    pub fn new(surface: Surface, bus: &TabVisibilityBus) -> Self {
        Self {
            surface,
            bus: bus.clone(),
            handle: None,
            current: Rc::new(Cell::new(None)),
            subscription: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn handle(&self) -> Option<InstanceHandle> {
        self.handle
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Mount on first call, update afterwards, then apply `display_legends`.
    pub fn set_props(&mut self, manager: &mut ChartLifecycleManager, props: WidgetProps) -> ChartResult<InstanceHandle> {
        let WidgetProps { kind, data, options, display_legends } = props;
        let handle = match self.handle.filter(|h| manager.is_live(*h)) {
            Some(live) => manager.update(live, kind, data, options),
            None => manager.mount(&self.surface, kind, data, options)?,
        };
        self.handle = Some(handle);
        self.current.set(Some(handle.id()));

        if self.subscription.is_none() {
            let current = Rc::clone(&self.current);
            let scheduler = manager.scheduler().clone();
            self.subscription = Some(self.bus.subscribe(move || {
                if let Some(id) = current.get() {
                    scheduler.request(id);
                }
            }));
            tracing::debug!(surface = %self.surface.id(), "widget subscribed to tab visibility");
        }

        manager.apply_legends(handle, display_legends.as_deref());
        Ok(handle)
    }

    /// Apply a new visibility vector without touching data or options.
    pub fn set_display_legends(&mut self, manager: &mut ChartLifecycleManager, legends: Option<&[bool]>) -> bool {
        match self.handle {
            Some(handle) => manager.apply_legends(handle, legends),
            None => false,
        }
    }

    /// The page changed this widget's layout.
    pub fn on_resize(&mut self, manager: &mut ChartLifecycleManager) {
        if let Some(handle) = self.handle {
            manager.resize(handle);
        }
    }

    /// Destroy the chart and drop the tab subscription.
    pub fn teardown(&mut self, manager: &mut ChartLifecycleManager) {
        if let Some(handle) = self.handle.take() {
            manager.destroy(handle);
        }
        self.current.set(None);
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        tracing::debug!(surface = %self.surface.id(), "widget torn down");
    }
}
