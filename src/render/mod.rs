//! Rendering primitives and drawing surfaces.
//!
//! The renderer never touches a platform canvas directly. It produces a
//! [`RenderList`] of backend-agnostic commands which a [`Surface`] (such as
//! the GPUI backend or the [`HeadlessSurface`]) then presents.

mod frame;

pub use frame::{FrameOverlay, build_frame};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, ScreenPoint, ScreenRect, SurfaceSize};
use crate::transform::Transform;

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range. Colors serialize
/// as `#rrggbb` (or `#rrggbbaa` when translucent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                let short = |index: usize| {
                    u8::from_str_radix(&hex[index..index + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::from_rgb8(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => {
                let mut color = Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?);
                color.a = f32::from(channel(6..8)?) / 255.0;
                Some(color)
            }
            _ => None,
        }
    }

    /// Format as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        let byte = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color `{}`", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or(InvalidColor(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Filled circle styling for scatter markers and highlights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker color.
    pub color: Color,
    /// Circle radius in pixels.
    pub radius: f32,
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width; zero disables the outline.
    pub stroke_width: f32,
}

impl RectStyle {
    /// A filled rectangle without outline.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill,
            stroke: fill,
            stroke_width: 0.0,
        }
    }
}

/// Horizontal alignment of text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Position marks the start of the text.
    #[default]
    Start,
    /// Position marks the middle of the text.
    Middle,
    /// Position marks the end of the text.
    End,
}

/// Text styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Rotation around the anchor point in radians (clockwise, surface space).
    pub rotation: f32,
}

impl TextStyle {
    /// Unrotated text anchored at its start.
    pub fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            size,
            anchor: TextAnchor::Start,
            rotation: 0.0,
        }
    }

    /// Set the horizontal anchor.
    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the rotation.
    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A line segment in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// Render command list.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Clear the whole surface.
    Clear,
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw independent line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw a connected polyline through the points in order.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<ScreenPoint>,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Draw filled circles.
    Points {
        /// Circle centers.
        points: Vec<ScreenPoint>,
        /// Marker styling.
        style: MarkerStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text; the position is the baseline anchor.
    Text {
        /// Text position.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Aggregated render commands for one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Check whether the list holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn in the frame, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Measures rendered text for layout.
pub trait TextMeasurer {
    /// Width of `text` at `size` pixels.
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Width estimate assuming an average glyph advance of 0.6 em.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.6
    }
}

/// A drawing surface mounted in a host container.
pub trait Surface: TextMeasurer {
    /// Current pixel size of the surface.
    fn size(&self) -> SurfaceSize;

    /// Present a freshly built frame, replacing whatever was shown before.
    fn present(&mut self, frame: &RenderList);
}

/// In-memory surface that records the frames it is given.
///
/// Useful for tests and for hosts that rasterize the render list themselves.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    last_frame: RenderList,
    presented: u64,
}

impl HeadlessSurface {
    /// Create a surface of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            last_frame: RenderList::new(),
            presented: 0,
        }
    }

    /// The most recently presented frame.
    pub fn last_frame(&self) -> &RenderList {
        &self.last_frame
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Change the reported size (the chart picks it up on `resize`).
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = SurfaceSize::new(width, height);
    }
}

impl TextMeasurer for HeadlessSurface {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        ApproxTextMeasurer.text_width(text, size)
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn present(&mut self, frame: &RenderList) {
        self.last_frame = frame.clone();
        self.presented += 1;
    }
}

/// Map data points to one polyline per run of finite points.
///
/// Points keep their sequence order; a non-mappable point splits the line.
pub(crate) fn build_polylines(points: &[Point], transform: &Transform) -> Vec<Vec<ScreenPoint>> {
    let mut lines = Vec::new();
    let mut current = Vec::with_capacity(points.len());
    for point in points {
        match transform.data_to_screen(*point) {
            Some(screen) => current.push(screen),
            None => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Map data points to scatter marker centers, skipping non-mappable points.
pub(crate) fn build_scatter_points(points: &[Point], transform: &Transform) -> Vec<ScreenPoint> {
    points
        .iter()
        .filter_map(|point| transform.data_to_screen(*point))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Margins;
    use crate::view::{Range, Viewport};

    fn unit_transform() -> Transform {
        let viewport = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
        Transform::new(viewport, SurfaceSize::new(200.0, 200.0), Margins::default())
            .expect("valid transform")
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#f00"), Some(Color::RED));
        assert_eq!(Color::from_hex("#00000080").map(|c| c.a), Some(128.0 / 255.0));
        assert_eq!(Color::from_hex("red"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn hex_colors_format() {
        assert_eq!(Color::from_rgb8(0x12, 0xab, 0xff).to_hex(), "#12abff");
        assert_eq!(Color::new(0.0, 0.0, 0.0, 0.0).to_hex(), "#00000000");
    }

    #[test]
    fn polyline_keeps_sequence_order() {
        let points = [
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.5, 1.0),
        ];
        let lines = build_polylines(&points, &unit_transform());
        assert_eq!(lines.len(), 1);
        assert!(lines[0][0].x > lines[0][1].x);
    }

    #[test]
    fn polyline_breaks_on_non_finite_points() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.2),
            Point::new(f64::NAN, 0.5),
            Point::new(0.8, 0.8),
        ];
        let lines = build_polylines(&points, &unit_transform());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[1].len(), 1);
    }

    #[test]
    fn headless_surface_counts_presents() {
        let mut surface = HeadlessSurface::new(10.0, 10.0);
        let mut frame = RenderList::new();
        frame.push(RenderCommand::Clear);
        surface.present(&frame);
        surface.present(&frame);
        assert_eq!(surface.presented(), 2);
        assert_eq!(surface.last_frame(), &frame);
    }
}
