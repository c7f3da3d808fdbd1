// File: crates/chart-core/src/surface.rs
// Summary: Page-side drawing targets and the raster drawing context bound to them.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use skia_safe as skia;

use crate::error::{ChartError, ChartResult};
use crate::types::Size;

/// Stable name of a drawing target on the page (e.g. the element id of a canvas).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for SurfaceId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for SurfaceId {
    fn from(s: String) -> Self { Self(s) }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the page element bound to a surface actually is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceElement {
    /// A bare canvas-equivalent element; a drawing context can be obtained.
    Canvas,
    /// The canvas is still wrapped in non-drawing markup (e.g. `<template>` tags).
    Wrapped { markup: String },
    /// The element is not attached to the document.
    Detached,
}

/// A drawing target on the page. Cloning shares the layout cell, so the page can keep
/// one clone and update its size when layout changes (tab switch, window resize).
#[derive(Clone, Debug)]
pub struct Surface {
    id: SurfaceId,
    element: SurfaceElement,
    layout: Rc<Cell<Size>>,
}

impl Surface {
    pub fn canvas(id: impl Into<SurfaceId>, size: Size) -> Self {
        Self::with_element(id, SurfaceElement::Canvas, size)
    }

    pub fn with_element(id: impl Into<SurfaceId>, element: SurfaceElement, size: Size) -> Self {
        Self { id: id.into(), element, layout: Rc::new(Cell::new(size)) }
    }

    pub fn id(&self) -> &SurfaceId { &self.id }

    pub fn element(&self) -> &SurfaceElement { &self.element }

    /// Current laid-out size.
    pub fn size(&self) -> Size { self.layout.get() }

    /// Called by the page after layout; visible to every clone of this surface.
    pub fn set_size(&self, size: Size) { self.layout.set(size) }

    /// Reject surfaces that cannot provide a drawing context, eagerly.
    pub fn validate(&self) -> ChartResult<()> {
        match &self.element {
            SurfaceElement::Canvas => Ok(()),
            SurfaceElement::Wrapped { markup } => Err(ChartError::InvalidSurface {
                surface: self.id.clone(),
                reason: format!("canvas is wrapped in {markup} markup; remove the wrapper tags"),
            }),
            SurfaceElement::Detached => Err(ChartError::InvalidSurface {
                surface: self.id.clone(),
                reason: "element is not attached to the document".to_string(),
            }),
        }
    }
}

/// Raster drawing context owned by one chart instance. The backing Skia surface is
/// allocated lazily at paint time and reallocated when the rendered size changes.
pub struct DrawingContext {
    raster: Option<skia::Surface>,
    size: Size,
}

impl DrawingContext {
    pub(crate) fn new() -> Self {
        Self { raster: None, size: Size::default() }
    }

    /// Return a raster of exactly `size`, reallocating if needed. `None` for empty sizes
    /// or when Skia refuses the allocation.
    pub(crate) fn raster_for(&mut self, size: Size) -> Option<&mut skia::Surface> {
        if size.is_empty() {
            return None;
        }
        if self.raster.is_none() || self.size != size {
            self.raster = skia::surfaces::raster_n32_premul((size.width as i32, size.height as i32));
            self.size = size;
            if self.raster.is_none() {
                tracing::warn!(width = size.width, height = size.height, "failed to allocate raster surface");
            }
        }
        self.raster.as_mut()
    }

    /// The last painted raster, if any.
    pub(crate) fn raster(&mut self) -> Option<&mut skia::Surface> {
        self.raster.as_mut()
    }

    pub(crate) fn is_allocated(&self) -> bool {
        self.raster.is_some()
    }

    /// Drop the backing raster.
    pub(crate) fn release(&mut self) {
        self.raster = None;
        self.size = Size::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_canvas_is_rejected() {
        let s = Surface::with_element(
            "cases",
            SurfaceElement::Wrapped { markup: "<template>".into() },
            Size::new(100, 100),
        );
        assert!(matches!(s.validate(), Err(ChartError::InvalidSurface { .. })));
    }

    #[test]
    fn layout_is_shared_between_clones() {
        let page_side = Surface::canvas("cases", Size::new(0, 0));
        let engine_side = page_side.clone();
        page_side.set_size(Size::new(320, 200));
        assert_eq!(engine_side.size(), Size::new(320, 200));
    }

    #[test]
    fn empty_size_never_allocates() {
        let mut ctx = DrawingContext::new();
        assert!(ctx.raster_for(Size::new(0, 50)).is_none());
        assert!(!ctx.is_allocated());
    }
}
