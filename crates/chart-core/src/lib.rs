// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the chart lifecycle engine and its collaborators.

pub mod types;
pub mod geometry;
pub mod error;
pub mod series;
pub mod surface;
pub mod date_adapter;
pub mod options;
pub mod axis;
pub mod render;
pub mod tab_bus;
pub mod plugin;
pub mod chart;
pub mod legend;
pub mod lifecycle;
pub mod widget;

pub use types::{ChartKind, InstanceId, Insets, Size, HEIGHT, WIDTH};
pub use error::{ChartError, ChartResult};
pub use series::{ChartData, Series};
pub use surface::{Surface, SurfaceElement, SurfaceId};
pub use date_adapter::{ChronoDateAdapter, DateAdapter, DisplayFormats, TimeUnit, Timestamp};
pub use options::{AxisPosition, AxisType, ChartOptions, OverlayMask, TimeAxisOptions};
pub use axis::{TimeAxis, TimeTick, ValueAxis};
pub use render::{RenderRequest, RenderScheduler};
pub use tab_bus::{Subscription, SubscriptionId, TabVisibilityBus};
pub use plugin::{DrawHook, LeftAxisMask, MaskFill, MaskRegion, RightAxisMask};
pub use chart::ChartInstance;
pub use lifecycle::{ChartLifecycleManager, InstanceHandle, LifecycleEvent};
pub use widget::{ChartWidget, WidgetProps};
