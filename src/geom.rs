//! Geometric primitives used by the charting pipeline.
//!
//! [`Point`] lives in data space. [`ScreenPoint`], [`ScreenRect`] and
//! [`SurfaceSize`] live in surface space, where Y grows downward.

use serde::{Deserialize, Serialize};

/// A point in data space.
///
/// Use this when providing explicit X/Y values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A point in surface space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// X value in surface pixels.
    pub x: f32,
    /// Y value in surface pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Midpoint between two screen points.
    pub fn midpoint(self, other: ScreenPoint) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Euclidean distance to another screen point.
    pub fn distance(self, other: ScreenPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A rectangle in surface space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(origin: ScreenPoint, width: f32, height: f32) -> Self {
        Self::new(origin, ScreenPoint::new(origin.x + width, origin.y + height))
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether the point lies inside the rectangle (edges included).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceSize {
    /// Create a new surface size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The full surface as a rectangle anchored at the origin.
    pub fn rect(&self) -> ScreenRect {
        ScreenRect::new(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(self.width, self.height),
        )
    }
}

/// Fixed margins between the surface edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin in pixels.
    pub top: f32,
    /// Right margin in pixels.
    pub right: f32,
    /// Bottom margin in pixels.
    pub bottom: f32,
    /// Left margin in pixels.
    pub left: f32,
}

impl Margins {
    /// Create margins from explicit values.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Plot rectangle left over once the margins are removed from a surface.
    pub fn plot_rect(&self, size: SurfaceSize) -> ScreenRect {
        ScreenRect::new(
            ScreenPoint::new(self.left, self.top),
            ScreenPoint::new(size.width - self.right, size.height - self.bottom),
        )
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(50.0, 30.0, 50.0, 70.0)
    }
}
