use std::f32::consts::FRAC_PI_2;

use crate::config::Configuration;
use crate::geom::{Point, ScreenPoint, ScreenRect, SurfaceSize};
use crate::style::GraphType;
use crate::transform::Transform;
use crate::view::Viewport;

use super::{
    LineSegment, LineStyle, MarkerStyle, RectStyle, RenderCommand, RenderList, TextAnchor,
    TextMeasurer, TextStyle, build_polylines, build_scatter_points,
};

const AXIS_TITLE_SIZE: f32 = 16.0;
const TICK_LABEL_SIZE: f32 = 12.0;
const LEGEND_TEXT_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 20.0;
const TOOLTIP_TEXT_SIZE: f32 = 12.0;

const TICK_LENGTH: f32 = 5.0;
const TICK_LABEL_GAP: f32 = 3.0;
const SCATTER_RADIUS: f32 = 3.0;
const HIGHLIGHT_RADIUS: f32 = 5.0;
const LEGEND_SWATCH: f32 = 10.0;
const TOOLTIP_PADDING: f32 = 4.0;

/// Transient decoration drawn on top of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOverlay {
    /// Data point to highlight.
    pub highlight: Point,
    /// Tooltip text.
    pub label: String,
    /// Top-left corner of the tooltip box.
    pub anchor: ScreenPoint,
}

/// Build the complete frame for one chart.
///
/// The result depends only on the arguments, so calling this twice with the
/// same inputs yields identical lists.
pub fn build_frame(
    data: &[Point],
    config: &Configuration,
    size: SurfaceSize,
    measurer: &dyn TextMeasurer,
    overlay: Option<&FrameOverlay>,
) -> RenderList {
    let mut render = RenderList::new();
    render.push(RenderCommand::Clear);
    render.push(RenderCommand::Rect {
        rect: size.rect(),
        style: RectStyle::filled(config.color_scheme.background),
    });

    let style = &config.graph_style;
    let viewport = Viewport::new(style.x_axis.range(), style.y_axis.range());
    let transform = Transform::new(viewport, size, config.margins);

    if let Some(transform) = transform.as_ref() {
        build_axes(&mut render, config, transform);
        build_axis_titles(&mut render, config, size);
        build_ticks(&mut render, config, transform);
        build_series(&mut render, data, config, transform);
    }
    if style.legend_visible {
        build_legend(&mut render, config, size);
    }
    build_title(&mut render, config, size, measurer);

    if let (Some(transform), Some(overlay)) = (transform.as_ref(), overlay) {
        build_overlay(&mut render, config, transform, overlay, measurer);
    }
    render
}

fn axis_stroke(config: &Configuration) -> LineStyle {
    LineStyle {
        color: config.color_scheme.axis_color,
        width: 1.0,
    }
}

fn build_axes(render: &mut RenderList, config: &Configuration, transform: &Transform) {
    let plot = transform.screen();
    let origin = ScreenPoint::new(plot.min.x, plot.max.y);
    let mut segments = Vec::with_capacity(2);
    if config.graph_style.y_axis.show_line {
        segments.push(LineSegment::new(ScreenPoint::new(plot.min.x, plot.min.y), origin));
    }
    if config.graph_style.x_axis.show_line {
        segments.push(LineSegment::new(origin, ScreenPoint::new(plot.max.x, plot.max.y)));
    }
    if !segments.is_empty() {
        render.push(RenderCommand::LineSegments {
            segments,
            style: axis_stroke(config),
        });
    }
}

fn build_axis_titles(render: &mut RenderList, config: &Configuration, size: SurfaceSize) {
    let style = &config.graph_style;
    let text_style =
        TextStyle::new(config.color_scheme.axis_color, AXIS_TITLE_SIZE).anchored(TextAnchor::Middle);
    if !style.x_axis.title.is_empty() {
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(size.width * 0.5, size.height - 10.0),
            text: style.x_axis.title.clone(),
            style: text_style.clone(),
        });
    }
    if !style.y_axis.title.is_empty() {
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(20.0, size.height * 0.5),
            text: style.y_axis.title.clone(),
            style: text_style.rotated(-FRAC_PI_2),
        });
    }
}

fn build_ticks(render: &mut RenderList, config: &Configuration, transform: &Transform) {
    let style = &config.graph_style;
    let plot = transform.screen();
    let color = config.color_scheme.axis_color;
    let mut segments = Vec::new();

    let below = TextStyle::new(color, TICK_LABEL_SIZE).anchored(TextAnchor::Middle);
    for tick in style.x_axis.ticks() {
        let Some(screen) = transform.data_to_screen(Point::new(tick.value, style.y_axis.min))
        else {
            continue;
        };
        let base = ScreenPoint::new(screen.x, plot.max.y);
        segments.push(LineSegment::new(
            base,
            ScreenPoint::new(base.x, base.y + TICK_LENGTH),
        ));
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                base.x,
                base.y + TICK_LENGTH + TICK_LABEL_GAP + TICK_LABEL_SIZE,
            ),
            text: tick.label,
            style: below.clone(),
        });
    }

    let left = TextStyle::new(color, TICK_LABEL_SIZE).anchored(TextAnchor::End);
    for tick in style.y_axis.ticks() {
        let Some(screen) = transform.data_to_screen(Point::new(style.x_axis.min, tick.value))
        else {
            continue;
        };
        let base = ScreenPoint::new(plot.min.x, screen.y);
        segments.push(LineSegment::new(
            ScreenPoint::new(base.x - TICK_LENGTH, base.y),
            base,
        ));
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                base.x - TICK_LENGTH - TICK_LABEL_GAP,
                base.y + TICK_LABEL_SIZE * 0.35,
            ),
            text: tick.label,
            style: left.clone(),
        });
    }

    if !segments.is_empty() {
        render.push(RenderCommand::LineSegments {
            segments,
            style: axis_stroke(config),
        });
    }
}

fn build_series(
    render: &mut RenderList,
    data: &[Point],
    config: &Configuration,
    transform: &Transform,
) {
    if data.is_empty() {
        return;
    }
    let color = config.color_scheme.series_color;
    render.push(RenderCommand::ClipRect(transform.screen()));
    match config.graph_style.graph_type {
        GraphType::Line => {
            let style = LineStyle { color, width: 2.0 };
            for points in build_polylines(data, transform) {
                render.push(RenderCommand::Polyline { points, style });
            }
        }
        GraphType::Scatter => {
            let points = build_scatter_points(data, transform);
            if !points.is_empty() {
                render.push(RenderCommand::Points {
                    points,
                    style: MarkerStyle {
                        color,
                        radius: SCATTER_RADIUS,
                    },
                });
            }
        }
    }
    render.push(RenderCommand::ClipEnd);
}

fn build_legend(render: &mut RenderList, config: &Configuration, size: SurfaceSize) {
    let swatch = ScreenRect::from_origin_size(
        ScreenPoint::new(size.width - 150.0, 10.0),
        LEGEND_SWATCH,
        LEGEND_SWATCH,
    );
    render.push(RenderCommand::Rect {
        rect: swatch,
        style: RectStyle::filled(config.color_scheme.series_color),
    });
    render.push(RenderCommand::Text {
        position: ScreenPoint::new(size.width - 130.0, 20.0),
        text: config.graph_style.series_name.clone(),
        style: TextStyle::new(config.color_scheme.axis_color, LEGEND_TEXT_SIZE),
    });
}

fn build_title(
    render: &mut RenderList,
    config: &Configuration,
    size: SurfaceSize,
    measurer: &dyn TextMeasurer,
) {
    let title = &config.graph_style.title;
    if title.is_empty() {
        return;
    }
    let width = measurer.text_width(title, TITLE_SIZE);
    render.push(RenderCommand::Text {
        position: ScreenPoint::new(size.width * 0.5 - width * 0.5, 30.0),
        text: title.clone(),
        style: TextStyle::new(config.color_scheme.axis_color, TITLE_SIZE),
    });
}

fn build_overlay(
    render: &mut RenderList,
    config: &Configuration,
    transform: &Transform,
    overlay: &FrameOverlay,
    measurer: &dyn TextMeasurer,
) {
    let colors = &config.color_scheme;
    if let Some(center) = transform.data_to_screen(overlay.highlight) {
        render.push(RenderCommand::Points {
            points: vec![center],
            style: MarkerStyle {
                color: colors.series_color,
                radius: HIGHLIGHT_RADIUS,
            },
        });
    }

    let width = measurer.text_width(&overlay.label, TOOLTIP_TEXT_SIZE) + TOOLTIP_PADDING * 2.0;
    let height = TOOLTIP_TEXT_SIZE + TOOLTIP_PADDING * 2.0;
    render.push(RenderCommand::Rect {
        rect: ScreenRect::from_origin_size(overlay.anchor, width, height),
        style: RectStyle {
            fill: colors.background,
            stroke: colors.axis_color,
            stroke_width: 1.0,
        },
    });
    render.push(RenderCommand::Text {
        position: ScreenPoint::new(
            overlay.anchor.x + TOOLTIP_PADDING,
            overlay.anchor.y + TOOLTIP_PADDING + TOOLTIP_TEXT_SIZE,
        ),
        text: overlay.label.clone(),
        style: TextStyle::new(colors.axis_color, TOOLTIP_TEXT_SIZE),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ApproxTextMeasurer;
    use crate::view::Range;

    fn config_0_10() -> Configuration {
        let mut config = Configuration::default();
        config.graph_style.x_axis.set_range(Range::new(0.0, 10.0));
        config.graph_style.y_axis.set_range(Range::new(0.0, 10.0));
        config
    }

    fn frame(data: &[Point], config: &Configuration, overlay: Option<&FrameOverlay>) -> RenderList {
        build_frame(
            data,
            config,
            SurfaceSize::new(800.0, 600.0),
            &ApproxTextMeasurer,
            overlay,
        )
    }

    fn has_series(render: &RenderList) -> bool {
        render.commands().iter().any(|command| {
            matches!(
                command,
                RenderCommand::Polyline { .. } | RenderCommand::Points { .. }
            )
        })
    }

    #[test]
    fn empty_dataset_draws_background_and_axes_only() {
        let render = frame(&[], &config_0_10(), None);
        let commands = render.commands();
        assert_eq!(commands[0], RenderCommand::Clear);
        assert!(matches!(commands[1], RenderCommand::Rect { .. }));
        assert!(!has_series(&render));
        assert!(
            !commands
                .iter()
                .any(|command| matches!(command, RenderCommand::ClipRect(_)))
        );
        assert!(render.texts().any(|text| text == "X Axis"));
    }

    #[test]
    fn line_series_is_clipped_to_plot_area() {
        let data = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let render = frame(&data, &config_0_10(), None);
        let commands = render.commands();
        let clip = commands
            .iter()
            .position(|command| matches!(command, RenderCommand::ClipRect(_)))
            .expect("series clip");
        match &commands[clip] {
            RenderCommand::ClipRect(rect) => {
                assert_eq!(rect.min, ScreenPoint::new(70.0, 50.0));
                assert_eq!(rect.max, ScreenPoint::new(770.0, 550.0));
            }
            _ => unreachable!(),
        }
        match &commands[clip + 1] {
            RenderCommand::Polyline { points, .. } => {
                assert_eq!(
                    points,
                    &vec![ScreenPoint::new(70.0, 550.0), ScreenPoint::new(770.0, 50.0)]
                );
            }
            other => panic!("expected polyline, got {other:?}"),
        }
        assert_eq!(commands[clip + 2], RenderCommand::ClipEnd);
    }

    #[test]
    fn scatter_draws_one_marker_per_point() {
        let mut config = config_0_10();
        config.graph_style.graph_type = GraphType::Scatter;
        let data = [
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        let render = frame(&data, &config, None);
        let markers = render.commands().iter().find_map(|command| match command {
            RenderCommand::Points { points, style } => Some((points.len(), style.radius)),
            _ => None,
        });
        assert_eq!(markers, Some((3, SCATTER_RADIUS)));
    }

    #[test]
    fn ticks_are_labelled() {
        let render = frame(&[], &config_0_10(), None);
        let labels: Vec<&str> = render.texts().collect();
        // Both axes run 0..10 with ten intervals.
        assert_eq!(labels.iter().filter(|text| **text == "5").count(), 2);
        assert_eq!(labels.iter().filter(|text| **text == "10").count(), 2);
    }

    #[test]
    fn hidden_axis_lines_are_not_drawn() {
        let mut config = config_0_10();
        config.graph_style.x_axis.show_line = false;
        config.graph_style.y_axis.show_line = false;
        config.graph_style.x_axis.tick_count = 0;
        let render = frame(&[], &config, None);
        let axis_segments = render
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::LineSegments { segments, .. } => Some(segments.len()),
                _ => None,
            })
            .collect::<Vec<_>>();
        // Only the tick marks remain: 2 on X, 11 on Y.
        assert_eq!(axis_segments, vec![13]);
    }

    #[test]
    fn legend_and_title_follow_config() {
        let mut config = config_0_10();
        config.graph_style.title = "Revenue".to_string();
        config.graph_style.series_name = "2024".to_string();
        let render = frame(&[], &config, None);
        assert!(render.texts().any(|text| text == "Revenue"));
        assert!(render.texts().any(|text| text == "2024"));

        config.graph_style.legend_visible = false;
        let render = frame(&[], &config, None);
        assert!(!render.texts().any(|text| text == "2024"));
    }

    #[test]
    fn title_is_centered_by_measured_width() {
        let mut config = config_0_10();
        config.graph_style.title = "abcd".to_string();
        let render = frame(&[], &config, None);
        let position = render.commands().iter().find_map(|command| match command {
            RenderCommand::Text { text, position, .. } if text == "abcd" => Some(*position),
            _ => None,
        });
        let width = ApproxTextMeasurer.text_width("abcd", TITLE_SIZE);
        assert_eq!(position, Some(ScreenPoint::new(400.0 - width * 0.5, 30.0)));
    }

    #[test]
    fn overlay_is_drawn_last() {
        let overlay = FrameOverlay {
            highlight: Point::new(5.0, 5.0),
            label: "x: 5, y: 5".to_string(),
            anchor: ScreenPoint::new(430.0, 310.0),
        };
        let render = frame(&[Point::new(5.0, 5.0)], &config_0_10(), Some(&overlay));
        let commands = render.commands();
        match commands.last() {
            Some(RenderCommand::Text { text, .. }) => assert_eq!(text, "x: 5, y: 5"),
            other => panic!("expected tooltip text, got {other:?}"),
        }
        let highlight = commands.iter().rev().find_map(|command| match command {
            RenderCommand::Points { points, style } if style.radius == HIGHLIGHT_RADIUS => {
                Some(points[0])
            }
            _ => None,
        });
        assert_eq!(highlight, Some(ScreenPoint::new(420.0, 300.0)));
    }

    #[test]
    fn frames_are_idempotent() {
        let data = [Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let config = config_0_10();
        assert_eq!(frame(&data, &config, None), frame(&data, &config, None));
    }

    #[test]
    fn tiny_surface_skips_plot_area() {
        let render = build_frame(
            &[Point::new(1.0, 1.0)],
            &config_0_10(),
            SurfaceSize::new(50.0, 50.0),
            &ApproxTextMeasurer,
            None,
        );
        assert!(!has_series(&render));
    }
}
