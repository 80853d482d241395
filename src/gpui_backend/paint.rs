use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, ShapedLine,
    TextRun, Window, font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, LineSegment, LineStyle, MarkerStyle, RectStyle, RenderCommand, RenderList, TextAnchor,
    TextStyle,
};

/// Paint a frame whose coordinates are relative to `origin`.
pub(crate) fn paint_frame(frame: &RenderList, origin: ScreenPoint, window: &mut Window, cx: &mut App) {
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in frame.commands() {
        match command {
            // The background rect that follows covers the whole surface.
            RenderCommand::Clear => {}
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: to_bounds(*rect, origin),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, segments, *style, origin);
                });
            }
            RenderCommand::Polyline { points, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_polyline(window, points, *style, origin);
                });
            }
            RenderCommand::Points { points, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_points(window, points, *style, origin);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rect(window, *rect, *style, origin);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_text(window, cx, offset(*position, origin), text, style);
                });
            }
        }
    }
}

fn offset(position: ScreenPoint, origin: ScreenPoint) -> ScreenPoint {
    ScreenPoint::new(position.x + origin.x, position.y + origin.y)
}

fn to_point(position: ScreenPoint, origin: ScreenPoint) -> gpui::Point<Pixels> {
    let position = offset(position, origin);
    point(px(position.x), px(position.y))
}

fn paint_lines(window: &mut Window, segments: &[LineSegment], style: LineStyle, origin: ScreenPoint) {
    if segments.is_empty() {
        return;
    }
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    for segment in segments {
        builder.move_to(to_point(segment.start, origin));
        builder.line_to(to_point(segment.end, origin));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_polyline(
    window: &mut Window,
    points: &[ScreenPoint],
    style: LineStyle,
    origin: ScreenPoint,
) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    builder.move_to(to_point(*first, origin));
    for point in rest {
        builder.line_to(to_point(*point, origin));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_points(window: &mut Window, points: &[ScreenPoint], style: MarkerStyle, origin: ScreenPoint) {
    let radius = style.radius.max(1.0);
    for center in points {
        let center = offset(*center, origin);
        let bounds = Bounds::from_corners(
            point(px(center.x - radius), px(center.y - radius)),
            point(px(center.x + radius), px(center.y + radius)),
        );
        window.paint_quad(quad(
            bounds,
            Corners::all(px(radius)),
            to_rgba(style.color),
            Edges::all(px(0.0)),
            to_rgba(style.color),
            BorderStyle::default(),
        ));
    }
}

fn paint_rect(window: &mut Window, rect: ScreenRect, style: RectStyle, origin: ScreenPoint) {
    window.paint_quad(quad(
        to_bounds(rect, origin),
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn shape(window: &Window, text: &str, style: &TextStyle) -> ShapedLine {
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    window
        .text_system()
        .shape_line(text.to_string().into(), px(style.size), &[run], None)
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    if style.rotation.abs() > f32::EPSILON {
        paint_stacked_text(window, cx, position, text, style);
        return;
    }
    let shaped = shape(window, text, style);
    let width = f32::from(shaped.width);
    let x = match style.anchor {
        TextAnchor::Start => position.x,
        TextAnchor::Middle => position.x - width * 0.5,
        TextAnchor::End => position.x - width,
    };
    let line_height = shaped.ascent + shaped.descent;
    let top = position.y - f32::from(shaped.ascent);
    let _ = shaped.paint(point(px(x), px(top)), line_height, window, cx);
}

/// GPUI cannot rotate text runs, so rotated labels are drawn one glyph per
/// line, centered on the anchor.
fn paint_stacked_text(
    window: &mut Window,
    cx: &mut App,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    let step = style.size * 1.1;
    let count = text.chars().count() as f32;
    let mut y = position.y - step * count * 0.5 + style.size;
    let mut buffer = [0u8; 4];
    for glyph in text.chars() {
        let glyph = glyph.encode_utf8(&mut buffer);
        let shaped = shape(window, glyph, style);
        let x = position.x - f32::from(shaped.width) * 0.5;
        let line_height = shaped.ascent + shaped.descent;
        let top = y - f32::from(shaped.ascent);
        let _ = shaped.paint(point(px(x), px(top)), line_height, window, cx);
        y += step;
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(rect: ScreenRect, origin: ScreenPoint) -> Bounds<Pixels> {
    Bounds::from_corners(to_point(rect.min, origin), to_point(rect.max, origin))
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
