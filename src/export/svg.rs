//! SVG rendition of a frame.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::geom::{ScreenPoint, SurfaceSize};
use crate::render::{Color, RenderCommand, RenderList, TextAnchor};

/// Write a frame as a standalone SVG document of the given size.
///
/// Clip rectangles become nested `clipPath` groups, so clipped series stay
/// inside the plot area exactly as on screen.
pub fn render_svg(frame: &RenderList, size: SurfaceSize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.width,
        h = size.height
    );

    let mut clip_id = 0usize;
    let mut open_groups = 0usize;
    for command in frame.commands() {
        match command {
            RenderCommand::Clear => {}
            RenderCommand::ClipRect(rect) => {
                clip_id += 1;
                let _ = writeln!(
                    out,
                    r#"<clipPath id="clip{clip_id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    rect.min.x,
                    rect.min.y,
                    rect.width(),
                    rect.height()
                );
                let _ = writeln!(out, r#"<g clip-path="url(#clip{clip_id})">"#);
                open_groups += 1;
            }
            RenderCommand::ClipEnd => {
                if open_groups > 0 {
                    open_groups -= 1;
                    let _ = writeln!(out, "</g>");
                }
            }
            RenderCommand::LineSegments { segments, style } => {
                if segments.is_empty() {
                    continue;
                }
                let mut path = String::new();
                for segment in segments {
                    let _ = write!(
                        path,
                        "M{} {} L{} {} ",
                        segment.start.x, segment.start.y, segment.end.x, segment.end.y
                    );
                }
                let _ = writeln!(
                    out,
                    r#"<path d="{}" fill="none" {} stroke-width="{}"/>"#,
                    path.trim_end(),
                    paint("stroke", style.color),
                    style.width
                );
            }
            RenderCommand::Polyline { points, style } => {
                if points.len() < 2 {
                    continue;
                }
                let _ = writeln!(
                    out,
                    r#"<polyline points="{}" fill="none" {} stroke-width="{}" stroke-linejoin="round"/>"#,
                    point_list(points),
                    paint("stroke", style.color),
                    style.width
                );
            }
            RenderCommand::Points { points, style } => {
                for point in points {
                    let _ = writeln!(
                        out,
                        r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
                        point.x,
                        point.y,
                        style.radius,
                        paint("fill", style.color)
                    );
                }
            }
            RenderCommand::Rect { rect, style } => {
                let stroke = if style.stroke_width > 0.0 {
                    format!(
                        r#" {} stroke-width="{}""#,
                        paint("stroke", style.stroke),
                        style.stroke_width
                    )
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" {}{stroke}/>"#,
                    rect.min.x,
                    rect.min.y,
                    rect.width(),
                    rect.height(),
                    paint("fill", style.fill)
                );
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                let anchor = match style.anchor {
                    TextAnchor::Start => "start",
                    TextAnchor::Middle => "middle",
                    TextAnchor::End => "end",
                };
                let rotate = if style.rotation != 0.0 {
                    let degrees = (style.rotation.to_degrees() * 1000.0).round() / 1000.0;
                    format!(
                        r#" transform="rotate({degrees} {} {})""#,
                        position.x,
                        position.y
                    )
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" text-anchor="{anchor}" {}{rotate}>{}</text>"#,
                    position.x,
                    position.y,
                    style.size,
                    paint("fill", style.color),
                    escape(text.as_str())
                );
            }
        }
    }

    for _ in 0..open_groups {
        let _ = writeln!(out, "</g>");
    }
    let _ = writeln!(out, "</svg>");
    out
}

fn point_list(points: &[ScreenPoint]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.x, point.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint(attribute: &str, color: Color) -> String {
    let opaque = Color { a: 1.0, ..color };
    if color.a >= 1.0 {
        format!(r#"{attribute}="{}""#, opaque.to_hex())
    } else {
        format!(
            r#"{attribute}="{}" {attribute}-opacity="{}""#,
            opaque.to_hex(),
            color.a.clamp(0.0, 1.0)
        )
    }
}
