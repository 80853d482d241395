use crate::geom::{ScreenPoint, SurfaceSize};
use crate::render::{ApproxTextMeasurer, RenderList, Surface, TextMeasurer};

/// Surface backed by a GPUI canvas element.
///
/// The canvas reports its bounds on every layout pass. Frames are painted
/// from the chart during the canvas paint phase, so presenting only counts
/// them.
#[derive(Debug, Clone)]
pub struct GpuiSurface {
    origin: ScreenPoint,
    size: SurfaceSize,
    presented: u64,
}

impl GpuiSurface {
    /// Create a surface with an initial size; the first layout replaces it.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin: ScreenPoint::default(),
            size: SurfaceSize::new(width, height),
            presented: 0,
        }
    }

    /// Window position of the surface's top-left corner.
    pub fn origin(&self) -> ScreenPoint {
        self.origin
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Record new layout bounds. Returns true when the size changed.
    pub(crate) fn place(&mut self, origin: ScreenPoint, size: SurfaceSize) -> bool {
        self.origin = origin;
        if self.size == size {
            return false;
        }
        self.size = size;
        true
    }

    /// Convert a window position into surface coordinates.
    pub(crate) fn to_local(&self, position: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(position.x - self.origin.x, position.y - self.origin.y)
    }
}

impl TextMeasurer for GpuiSurface {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        ApproxTextMeasurer.text_width(text, size)
    }
}

impl Surface for GpuiSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn present(&mut self, _frame: &RenderList) {
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_reports_size_changes_only() {
        let mut surface = GpuiSurface::new(100.0, 100.0);
        assert!(!surface.place(ScreenPoint::new(5.0, 5.0), SurfaceSize::new(100.0, 100.0)));
        assert!(surface.place(ScreenPoint::new(5.0, 5.0), SurfaceSize::new(120.0, 100.0)));
        assert_eq!(
            surface.to_local(ScreenPoint::new(15.0, 25.0)),
            ScreenPoint::new(10.0, 20.0)
        );
    }
}
