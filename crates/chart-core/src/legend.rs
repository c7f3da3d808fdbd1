// File: crates/chart-core/src/legend.rs
// Summary: Legend visibility synchronization: apply a page-supplied visibility vector in place.

use crate::chart::ChartInstance;
use crate::render::RenderScheduler;

/// Apply `vector` to the instance's series and request one lightweight redraw of the
/// same instance. Absent or empty vectors mean "no opinion": nothing changes and no
/// redraw is requested (an empty vector never hides every series). Indices beyond the
/// shorter of the two sequences are left untouched.
///
/// Returns whether a redraw was requested.
pub fn apply(instance: &mut ChartInstance, vector: Option<&[bool]>, scheduler: &RenderScheduler) -> bool {
    let Some(vector) = vector.filter(|v| !v.is_empty()) else {
        tracing::trace!(instance = %instance.id(), "no legend vector; visibility unchanged");
        return false;
    };
    for (series, &show) in instance.series_mut().iter_mut().zip(vector) {
        series.visible = show;
    }
    scheduler.request(instance.id());
    true
}
