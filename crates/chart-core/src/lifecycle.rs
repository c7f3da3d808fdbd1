// File: crates/chart-core/src/lifecycle.rs
// Summary: Create/update/resize/destroy protocol for chart instances, and the paint pass.
// Notes:
// - At most one instance is bound to a surface. Mounting on an occupied surface destroys
//   the previous instance first.
// - Every call on a destroyed or replaced handle is a no-op. Only `mount` can fail, and
//   only for surfaces that cannot provide a drawing context.
// - Nothing paints synchronously: calls enqueue render requests, `flush` paints.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;

use crate::chart::ChartInstance;
use crate::date_adapter::{ChronoDateAdapter, DateAdapter};
use crate::error::ChartResult;
use crate::legend;
use crate::options::ChartOptions;
use crate::render::RenderScheduler;
use crate::series::ChartData;
use crate::surface::{Surface, SurfaceId};
use crate::types::{ChartKind, InstanceId, Size};

/// Page-held reference to a mounted chart. Stale once the chart is destroyed or rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle(InstanceId);

impl InstanceHandle {
    pub fn id(&self) -> InstanceId {
        self.0
    }
}

/// Journal of lifecycle transitions, drained by the page. `WidthUpdated` is the
/// `update-width` notification for sibling widgets sharing layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Mounted { instance: InstanceId, surface: SurfaceId, kind: ChartKind },
    Updated { instance: InstanceId },
    Resized { instance: InstanceId, size: Size },
    Destroyed { instance: InstanceId, surface: SurfaceId },
    Painted { instance: InstanceId },
    WidthUpdated { instance: InstanceId, width: u32 },
    RequestDropped { instance: InstanceId },
}

pub struct ChartLifecycleManager {
    instances: HashMap<InstanceId, ChartInstance>,
    bindings: HashMap<SurfaceId, InstanceId>,
    scheduler: RenderScheduler,
    date_adapter: Option<Rc<dyn DateAdapter>>,
    next_id: u64,
    events: Vec<LifecycleEvent>,
}

impl Default for ChartLifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartLifecycleManager {
    pub fn new() -> Self {
        Self::with_scheduler(RenderScheduler::new())
    }

    pub fn with_scheduler(scheduler: RenderScheduler) -> Self {
        Self {
            instances: HashMap::new(),
            bindings: HashMap::new(),
            scheduler,
            date_adapter: None,
            next_id: 0,
            events: Vec::new(),
        }
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Install the date adapter used by time-scaled charts mounted from now on.
    /// Already-mounted charts keep the adapter they were mounted with.
    pub fn register_date_adapter(&mut self, adapter: impl DateAdapter + 'static) {
        let adapter: Rc<dyn DateAdapter> = Rc::new(adapter);
        tracing::debug!(adapter = adapter.id(), "date adapter registered");
        self.date_adapter = Some(adapter);
    }

    pub fn date_adapter_id(&self) -> Option<&'static str> {
        self.date_adapter.as_ref().map(|a| a.id())
    }

    fn adapter_for(&mut self, options: &ChartOptions) -> Option<Rc<dyn DateAdapter>> {
        if !options.is_time_scaled() {
            return None;
        }
        let adapter = self.date_adapter.get_or_insert_with(|| {
            tracing::warn!("time-scaled chart mounted before a date adapter was registered; using UTC chrono adapter");
            Rc::new(ChronoDateAdapter::utc())
        });
        Some(Rc::clone(adapter))
    }

    /// Bind a new chart to `surface`, replacing (and destroying) any chart already bound there.
    pub fn mount(
        &mut self,
        surface: &Surface,
        kind: ChartKind,
        data: ChartData,
        options: ChartOptions,
    ) -> ChartResult<InstanceHandle> {
        surface.validate()?;

        if let Some(previous) = self.bindings.get(surface.id()).copied() {
            tracing::debug!(surface = %surface.id(), instance = %previous, "surface occupied; destroying previous chart");
            self.destroy(InstanceHandle(previous));
        }

        let adapter = self.adapter_for(&options);
        self.next_id += 1;
        let id = InstanceId(self.next_id);
        let instance = ChartInstance::new(id, kind, surface.clone(), data, options, adapter);

        self.instances.insert(id, instance);
        self.bindings.insert(surface.id().clone(), id);
        self.events.push(LifecycleEvent::Mounted { instance: id, surface: surface.id().clone(), kind });
        tracing::debug!(instance = %id, surface = %surface.id(), %kind, "chart mounted");

        self.scheduler.request(id);
        Ok(InstanceHandle(id))
    }

    /// Update data and options. Same kind: in place, same handle. Different kind: the
    /// chart is destroyed and a new one is mounted on the same surface; the new handle
    /// is returned. Stale handles are ignored and returned unchanged.
    pub fn update(
        &mut self,
        handle: InstanceHandle,
        kind: ChartKind,
        data: ChartData,
        options: ChartOptions,
    ) -> InstanceHandle {
        let Some(current) = self.instances.get(&handle.0) else {
            tracing::debug!(instance = %handle.0, "update on a destroyed chart ignored");
            return handle;
        };

        if current.kind() != kind {
            let surface = current.surface().clone();
            tracing::debug!(instance = %handle.0, from = %current.kind(), to = %kind, "chart kind changed; rebuilding");
            self.destroy(handle);
            return match self.mount(&surface, kind, data, options) {
                Ok(rebuilt) => rebuilt,
                Err(err) => {
                    tracing::warn!(error = %err, "rebuild after kind change failed");
                    handle
                }
            };
        }

        let adapter = self.adapter_for(&options);
        if let Some(instance) = self.instances.get_mut(&handle.0) {
            instance.replace(data, options, adapter);
            self.events.push(LifecycleEvent::Updated { instance: handle.0 });
            tracing::debug!(instance = %handle.0, "chart updated in place");
            self.scheduler.request(handle.0);
        }
        handle
    }

    /// Re-measure against the surface's current layout and schedule a repaint.
    /// Never mounts or destroys.
    pub fn resize(&mut self, handle: InstanceHandle) {
        let Some(instance) = self.instances.get_mut(&handle.0) else {
            tracing::trace!(instance = %handle.0, "resize on a destroyed chart ignored");
            return;
        };
        instance.remeasure();
        let size = instance.size();
        self.events.push(LifecycleEvent::Resized { instance: handle.0, size });
        tracing::debug!(instance = %handle.0, width = size.width, height = size.height, "chart resized");
        self.scheduler.request_resize(handle.0);
    }

    /// Apply a legend visibility vector; see [`legend::apply`].
    pub fn apply_legends(&mut self, handle: InstanceHandle, vector: Option<&[bool]>) -> bool {
        match self.instances.get_mut(&handle.0) {
            Some(instance) => legend::apply(instance, vector, &self.scheduler),
            None => false,
        }
    }

    /// Release the chart's drawing context and state. Safe to call any number of times.
    pub fn destroy(&mut self, handle: InstanceHandle) {
        let Some(mut instance) = self.instances.remove(&handle.0) else {
            tracing::trace!(instance = %handle.0, "destroy on an absent chart ignored");
            return;
        };
        let surface = instance.surface_id().clone();
        if self.bindings.get(&surface) == Some(&handle.0) {
            self.bindings.remove(&surface);
        }
        self.scheduler.cancel(handle.0);
        instance.release();
        self.events.push(LifecycleEvent::Destroyed { instance: handle.0, surface: surface.clone() });
        tracing::debug!(instance = %handle.0, %surface, "chart destroyed");
    }

    /// Destroy every live chart (page teardown).
    pub fn destroy_all(&mut self) {
        let mut ids: Vec<InstanceId> = self.instances.keys().copied().collect();
        ids.sort();
        for id in ids {
            self.destroy(InstanceHandle(id));
        }
    }

    /// Paint opportunity: paint every chart with a pending request exactly once.
    /// Requests whose chart is gone are dropped. Returns the number of charts painted.
    pub fn flush(&mut self) -> usize {
        let mut painted = 0;
        for request in self.scheduler.take() {
            let Some(instance) = self.instances.get_mut(&request.instance) else {
                tracing::trace!(instance = %request.instance, "render request for a destroyed chart dropped");
                self.events.push(LifecycleEvent::RequestDropped { instance: request.instance });
                continue;
            };

            // Responsive charts pick up layout changes (e.g. a tab becoming visible) here.
            let remeasured = instance.remeasure();
            if remeasured {
                self.events.push(LifecycleEvent::Resized { instance: request.instance, size: instance.size() });
            }

            if !instance.paint() {
                continue;
            }
            painted += 1;
            self.events.push(LifecycleEvent::Painted { instance: request.instance });
            if request.resized || remeasured {
                let width = instance.size().width;
                self.events.push(LifecycleEvent::WidthUpdated { instance: request.instance, width });
            }
        }
        if painted > 0 {
            tracing::trace!(painted, "paint pass complete");
        }
        painted
    }

    pub fn instance(&self, handle: InstanceHandle) -> Option<&ChartInstance> {
        self.instances.get(&handle.0)
    }

    pub fn is_live(&self, handle: InstanceHandle) -> bool {
        self.instances.contains_key(&handle.0)
    }

    /// The chart currently bound to `surface`, if any.
    pub fn bound_instance(&self, surface: &SurfaceId) -> Option<InstanceHandle> {
        self.bindings.get(surface).copied().map(InstanceHandle)
    }

    /// Live charts whose surface is `surface`. Never more than one.
    pub fn instances_on(&self, surface: &SurfaceId) -> usize {
        self.instances.values().filter(|i| i.surface_id() == surface).count()
    }

    pub fn live_count(&self) -> usize {
        self.instances.len()
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    /// PNG encoding of the chart's last paint.
    pub fn png_bytes(&mut self, handle: InstanceHandle) -> Option<Vec<u8>> {
        self.instances.get_mut(&handle.0)?.encode_png()
    }

    /// Write the chart's last paint to `path` as PNG.
    pub fn export_png(&mut self, handle: InstanceHandle, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let bytes = self
            .png_bytes(handle)
            .ok_or_else(|| anyhow::anyhow!("chart {} has not been painted", handle.0))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
