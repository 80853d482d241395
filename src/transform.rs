//! Coordinate transforms between data and surface space.

use crate::geom::{Margins, Point, ScreenPoint, ScreenRect, SurfaceSize};
use crate::view::{Range, Viewport};

/// Affine transform from data coordinates into surface coordinates.
///
/// The plot area is the surface minus the fixed margins. Surface Y grows
/// downward while data Y grows upward, so the Y axis is flipped.
#[derive(Debug, Clone)]
pub struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
    x_axis: Range,
    y_axis: Range,
}

impl Transform {
    /// Create a transform for the given viewport, surface and margins.
    ///
    /// Returns `None` when the margins leave no plot area or the viewport
    /// is not finite. Zero-width axis ranges are widened around their center
    /// by the smallest span that stays distinct at their magnitude.
    pub fn new(viewport: Viewport, size: SurfaceSize, margins: Margins) -> Option<Self> {
        Self::with_rect(viewport, margins.plot_rect(size))
    }

    /// Create a transform mapping the viewport onto an explicit plot rectangle.
    pub fn with_rect(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        let x_axis = viewport.x.widened();
        let y_axis = viewport.y.widened();
        if !x_axis.is_valid() || !y_axis.is_valid() {
            return None;
        }
        Some(Self {
            viewport,
            screen,
            x_axis,
            y_axis,
        })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the plot rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data point into surface space.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !point.is_finite() {
            return None;
        }
        let x_norm = (point.x - self.x_axis.min) / self.x_axis.span();
        let y_norm = (point.y - self.y_axis.min) / self.y_axis.span();
        let sx = self.screen.min.x as f64 + x_norm * self.screen.width() as f64;
        let sy = self.screen.max.y as f64 - y_norm * self.screen.height() as f64;
        Some(ScreenPoint::new(sx as f32, sy as f32))
    }

    /// Map a surface point into data space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Option<Point> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let (x_norm, y_norm) = self.plot_fraction(point);
        Some(Point::new(
            self.x_axis.lerp(x_norm),
            self.y_axis.lerp(y_norm),
        ))
    }

    /// Position of a surface point inside the plot area as data-oriented
    /// fractions: `(0, 0)` is the bottom-left corner, `(1, 1)` the top-right.
    pub fn plot_fraction(&self, point: ScreenPoint) -> (f64, f64) {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        (x_norm, y_norm)
    }

    /// Convert a pixel delta into a data-space delta (Y flipped).
    pub fn pixel_delta_to_data(&self, dx: f32, dy: f32) -> (f64, f64) {
        let x = dx as f64 / self.screen.width() as f64 * self.viewport.x.span();
        let y = -(dy as f64) / self.screen.height() as f64 * self.viewport.y.span();
        (x, y)
    }
}
