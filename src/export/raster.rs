//! Software rasterizer for render lists.
//!
//! Shapes are filled by pixel-center coverage without anti-aliasing. Text
//! uses the bitmap glyphs with the same 0.6 em advance the approximate
//! measurer assumes, so layout computed for the frame still lines up.

use image::{Rgba, RgbaImage};

use super::glyphs::{GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH, glyph, is_set};
use crate::geom::{ScreenPoint, ScreenRect, SurfaceSize};
use crate::render::{Color, RenderCommand, RenderList, TextAnchor, TextStyle};

/// Glyph cell size as a fraction of the font size.
const CELL_PER_EM: f32 = 0.1;

/// Rasterize a frame into an RGBA image of the given size.
pub fn rasterize(frame: &RenderList, size: SurfaceSize) -> RgbaImage {
    let mut canvas = Canvas::new(size);
    for command in frame.commands() {
        match command {
            RenderCommand::Clear => canvas.clear(),
            RenderCommand::ClipRect(rect) => canvas.clips.push(*rect),
            RenderCommand::ClipEnd => {
                canvas.clips.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                for segment in segments {
                    canvas.stroke(segment.start, segment.end, style.width, style.color);
                }
            }
            RenderCommand::Polyline { points, style } => {
                for pair in points.windows(2) {
                    canvas.stroke(pair[0], pair[1], style.width, style.color);
                }
            }
            RenderCommand::Points { points, style } => {
                for point in points {
                    canvas.fill_circle(*point, style.radius, style.color);
                }
            }
            RenderCommand::Rect { rect, style } => {
                canvas.fill_rect(*rect, style.fill);
                if style.stroke_width > 0.0 {
                    let corners = [
                        rect.min,
                        ScreenPoint::new(rect.max.x, rect.min.y),
                        rect.max,
                        ScreenPoint::new(rect.min.x, rect.max.y),
                    ];
                    for index in 0..corners.len() {
                        let next = corners[(index + 1) % corners.len()];
                        canvas.stroke(corners[index], next, style.stroke_width, style.stroke);
                    }
                }
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => canvas.text(*position, text, style),
        }
    }
    canvas.image
}

struct Canvas {
    image: RgbaImage,
    clips: Vec<ScreenRect>,
}

impl Canvas {
    fn new(size: SurfaceSize) -> Self {
        let dimension = |value: f32| {
            if value.is_finite() && value > 0.0 {
                value.round() as u32
            } else {
                0
            }
        };
        Self {
            image: RgbaImage::new(dimension(size.width), dimension(size.height)),
            clips: Vec::new(),
        }
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Pixel indices whose centers fall in `[min, max)` on one axis.
    fn span(min: f32, max: f32, limit: u32) -> std::ops::Range<u32> {
        let clamp = |value: f32| (value - 0.5).ceil().clamp(0.0, limit as f32) as u32;
        if !min.is_finite() || !max.is_finite() || max <= min {
            return 0..0;
        }
        clamp(min)..clamp(max)
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let center = ScreenPoint::new(x as f32 + 0.5, y as f32 + 0.5);
        if !self.clips.iter().all(|clip| clip.contains(center)) {
            return;
        }
        let alpha = color.a.clamp(0.0, 1.0);
        let pixel = self.image.get_pixel_mut(x, y);
        let [r, g, b, a] = pixel.0;
        let mix = |source: f32, target: u8| {
            let value = source.clamp(0.0, 1.0) * alpha + f32::from(target) / 255.0 * (1.0 - alpha);
            (value * 255.0).round() as u8
        };
        let out_alpha = alpha + f32::from(a) / 255.0 * (1.0 - alpha);
        *pixel = Rgba([
            mix(color.r, r),
            mix(color.g, g),
            mix(color.b, b),
            (out_alpha * 255.0).round() as u8,
        ]);
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        let (width, height) = self.image.dimensions();
        for y in Self::span(rect.min.y, rect.max.y, height) {
            for x in Self::span(rect.min.x, rect.max.x, width) {
                self.blend(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        let (width, height) = self.image.dimensions();
        let radius = radius.max(0.5);
        for y in Self::span(center.y - radius, center.y + radius, height) {
            for x in Self::span(center.x - radius, center.x + radius, width) {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Cover every pixel whose center lies within half the stroke width of
    /// the segment.
    fn stroke(&mut self, start: ScreenPoint, end: ScreenPoint, width: f32, color: Color) {
        let (image_width, image_height) = self.image.dimensions();
        let half = (width * 0.5).max(0.5);
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length_sq = dx * dx + dy * dy;
        for y in Self::span(start.y.min(end.y) - half, start.y.max(end.y) + half, image_height) {
            for x in Self::span(start.x.min(end.x) - half, start.x.max(end.x) + half, image_width) {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let t = if length_sq > 0.0 {
                    (((px - start.x) * dx + (py - start.y) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = px - (start.x + t * dx);
                let ey = py - (start.y + t * dy);
                if ex * ex + ey * ey <= half * half {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Draw text with its baseline at `position`, rotated around it.
    fn text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        let cell = (style.size * CELL_PER_EM).max(1.0);
        let glyph_count = text.chars().count();
        let advance = GLYPH_ADVANCE as f32 * cell;
        let width = glyph_count as f32 * advance;
        let start = match style.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -width * 0.5,
            TextAnchor::End => -width,
        };
        let (sin, cos) = style.rotation.sin_cos();
        let top = -(GLYPH_HEIGHT as f32) * cell;

        for (index, ch) in text.chars().enumerate() {
            let rows = glyph(ch);
            let left = start + index as f32 * advance;
            for row in 0..GLYPH_HEIGHT {
                for column in 0..GLYPH_WIDTH {
                    if !is_set(&rows, column, row) {
                        continue;
                    }
                    // Cell center relative to the anchor, then rotated.
                    let ox = left + (column as f32 + 0.5) * cell;
                    let oy = top + (row as f32 + 0.5) * cell;
                    let center = ScreenPoint::new(
                        position.x + ox * cos - oy * sin,
                        position.y + ox * sin + oy * cos,
                    );
                    let half = cell * 0.5;
                    self.fill_rect(
                        ScreenRect::new(
                            ScreenPoint::new(center.x - half, center.y - half),
                            ScreenPoint::new(center.x + half, center.y + half),
                        ),
                        style.color,
                    );
                }
            }
        }
    }
}
