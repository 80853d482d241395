//! Viewport models and data ranges.

use crate::geom::Point;

/// Fraction of the data span added on each side when auto-fitting.
pub const AUTO_FIT_PADDING: f64 = 0.1;

/// Smallest axis span near zero.
pub const MIN_SPAN: f64 = 1e-12;

/// Smallest span that still resolves into distinct bounds around `center`.
pub fn min_span_at(center: f64) -> f64 {
    MIN_SPAN.max(center.abs() * f64::EPSILON * 16.0)
}

fn zero_span_padding(value: f64) -> f64 {
    (value.abs() * AUTO_FIT_PADDING).max(1.0)
}

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Smallest range covering every finite value, if any.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut range: Option<Range> = None;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            match range.as_mut() {
                None => range = Some(Self { min: value, max: value }),
                Some(existing) => existing.expand_to_include(value),
            }
        }
        range
    }

    /// Pad data bounds for display.
    ///
    /// Both sides grow by `AUTO_FIT_PADDING` of the span, except that the
    /// lower bound sits at zero when the data never goes negative. A zero-span
    /// range is padded by a tenth of its magnitude (at least 1) instead.
    pub fn auto_fit(&self) -> Self {
        let span = self.span();
        let padding = if span > 0.0 {
            span * AUTO_FIT_PADDING
        } else {
            zero_span_padding(self.max)
        };
        let min = if self.min < 0.0 {
            self.min - padding
        } else {
            0.0
        };
        Self {
            min,
            max: self.max + padding,
        }
    }

    /// Ensure the range has at least the given span.
    pub fn with_min_span(&self, min_span: f64) -> Self {
        let span = self.span();
        if span >= min_span {
            return *self;
        }
        let center = self.center();
        let half = min_span * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Widen the range to the smallest span representable at its center.
    pub fn widened(&self) -> Self {
        self.with_min_span(min_span_at(self.center()))
    }

    /// Replace a collapsed range with one padded around its center, the way
    /// auto-fit pads zero-span data. Wide enough ranges are returned as is.
    pub fn normalized(&self) -> Self {
        let center = self.center();
        if !self.is_finite() || self.span() >= min_span_at(center) {
            return *self;
        }
        let padding = zero_span_padding(center);
        Self {
            min: center - padding,
            max: center + padding,
        }
    }

    /// Linear interpolation: `0.0` maps to `min`, `1.0` to `max`.
    pub fn lerp(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Bounds of a point set, ignoring non-finite coordinates.
    pub fn bounds_of(points: &[Point]) -> Option<Self> {
        let x = Range::from_values(points.iter().map(|point| point.x))?;
        let y = Range::from_values(points.iter().map(|point| point.y))?;
        Some(Self::new(x, y))
    }

    /// Auto-fit both axes.
    pub fn auto_fit(&self) -> Self {
        Self::new(self.x.auto_fit(), self.y.auto_fit())
    }

    /// Center of the viewport in data space.
    pub fn center(&self) -> Point {
        Point::new(self.x.center(), self.y.center())
    }
}
