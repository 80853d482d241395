//! XML form of the chart configuration.
//!
//! Every element and attribute is optional; whatever is present ends up in a
//! [`ConfigPatch`]. Booleans must be spelled `true` or `false`, numbers must
//! parse, colors must be hex. Anything else is rejected rather than guessed.

use std::fmt::Write as _;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use super::{AxisPatch, ConfigPatch, Configuration};
use crate::axis::AxisConfig;
use crate::error::LoadError;
use crate::geom::Margins;
use crate::render::Color;
use crate::style::GraphType;

/// Parse a configuration document into a patch.
pub fn parse_config_xml(text: &str) -> Result<ConfigPatch, LoadError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut patch = ConfigPatch::default();
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                saw_root = true;
                let name = local_name(&element);
                apply_attributes(&mut patch, &path, &name, &element)?;
                path.push(name);
            }
            Event::Empty(element) => {
                saw_root = true;
                let name = local_name(&element);
                apply_attributes(&mut patch, &path, &name, &element)?;
            }
            Event::Text(content) => {
                let value = content.unescape()?;
                apply_text(&mut patch, &path, value.trim())?;
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(LoadError::MissingField("chartConfig"));
    }
    Ok(patch)
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn apply_attributes(
    patch: &mut ConfigPatch,
    path: &[String],
    name: &str,
    element: &BytesStart<'_>,
) -> Result<(), LoadError> {
    let parent = path.last().map(String::as_str);
    let mut margins: Option<Margins> = None;

    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let raw = attr.unescape_value()?;
        let value = raw.trim();
        let field = format!("{name}.{key}");

        match (parent, name, key.as_str()) {
            (_, "graphStyle", "title") => patch.title = Some(value.to_string()),
            (_, "graphStyle", "seriesName") => patch.series_name = Some(value.to_string()),
            (_, "legend", "visible") => patch.legend_visible = Some(parse_bool(&field, value)?),
            (_, "xAxis", _) => apply_axis_attribute(&mut patch.x_axis, &field, &key, value)?,
            (_, "yAxis", _) => apply_axis_attribute(&mut patch.y_axis, &field, &key, value)?,
            (Some("eventListeners"), control, "enabled") => {
                let enabled = Some(parse_bool(&field, value)?);
                match control {
                    "zoom" => patch.zoom = enabled,
                    "pan" => patch.pan = enabled,
                    "tooltip" => patch.tooltip = enabled,
                    "locked" => patch.locked = enabled,
                    "lockedMouse" => patch.locked_mouse = enabled,
                    "lockedWheel" => patch.locked_wheel = enabled,
                    "lockedTouch" => patch.locked_touch = enabled,
                    "lockedKeyboard" => patch.locked_keyboard = enabled,
                    other => log::debug!("ignoring unknown control `{other}`"),
                }
            }
            (_, "margins", side) => {
                let margins = margins.get_or_insert_with(Margins::default);
                let pixels = parse_margin(&field, value)?;
                match side {
                    "top" => margins.top = pixels,
                    "right" => margins.right = pixels,
                    "bottom" => margins.bottom = pixels,
                    "left" => margins.left = pixels,
                    other => log::debug!("ignoring unknown margin `{other}`"),
                }
            }
            _ => {}
        }
    }

    if margins.is_some() {
        patch.margins = margins;
    }
    Ok(())
}

fn apply_axis_attribute(
    axis: &mut AxisPatch,
    field: &str,
    key: &str,
    value: &str,
) -> Result<(), LoadError> {
    match key {
        "title" => axis.title = Some(value.to_string()),
        "tickCount" | "tickInterval" => axis.tick_count = Some(parse_number(field, value)?),
        "showLine" => axis.show_line = Some(parse_bool(field, value)?),
        "min" => axis.min = Some(parse_finite(field, value)?),
        "max" => axis.max = Some(parse_finite(field, value)?),
        _ => {}
    }
    Ok(())
}

fn apply_text(patch: &mut ConfigPatch, path: &[String], value: &str) -> Result<(), LoadError> {
    let Some(current) = path.last() else {
        return Ok(());
    };
    let parent = path.len().checked_sub(2).map(|index| path[index].as_str());

    match (parent, current.as_str()) {
        (Some("graphStyle"), "title") => patch.title = Some(value.to_string()),
        (_, "graphType") => {
            let graph_type =
                GraphType::parse(value).ok_or_else(|| LoadError::invalid("graphType", value))?;
            patch.graph_type = Some(graph_type);
        }
        (_, "background") => patch.background = Some(parse_color("background", value)?),
        (_, "axisColor") => patch.axis_color = Some(parse_color("axisColor", value)?),
        (_, "seriesColor") => patch.series_color = Some(parse_color("seriesColor", value)?),
        (Some("seriesColors"), "color") => {
            // One series only: later colors are ignored.
            if patch.series_color.is_none() {
                patch.series_color = Some(parse_color("seriesColors.color", value)?);
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_bool(field: &str, value: &str) -> Result<bool, LoadError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(LoadError::invalid(field, value)),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, LoadError> {
    value.parse().map_err(|_| LoadError::invalid(field, value))
}

fn parse_finite(field: &str, value: &str) -> Result<f64, LoadError> {
    let number: f64 = parse_number(field, value)?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(LoadError::invalid(field, value))
    }
}

fn parse_margin(field: &str, value: &str) -> Result<f32, LoadError> {
    let pixels: f32 = parse_number(field, value)?;
    if pixels.is_finite() && pixels >= 0.0 {
        Ok(pixels)
    } else {
        Err(LoadError::invalid(field, value))
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, LoadError> {
    Color::from_hex(value).ok_or_else(|| LoadError::invalid(field, value))
}

/// Serialize a configuration in the format [`parse_config_xml`] reads.
pub fn write_config_xml(config: &Configuration) -> String {
    let style = &config.graph_style;
    let controls = &config.controls;
    let colors = &config.color_scheme;
    let margins = &config.margins;

    let mut out = String::new();
    let _ = writeln!(out, "<chartConfig>");
    let _ = writeln!(
        out,
        "  <graphStyle title=\"{}\" seriesName=\"{}\">",
        escape(style.title.as_str()),
        escape(style.series_name.as_str())
    );
    let _ = writeln!(out, "    <legend visible=\"{}\"/>", style.legend_visible);
    write_axis(&mut out, "xAxis", &style.x_axis);
    write_axis(&mut out, "yAxis", &style.y_axis);
    let _ = writeln!(out, "    <graphType>{}</graphType>", style.graph_type.as_str());
    let _ = writeln!(out, "  </graphStyle>");

    let _ = writeln!(out, "  <eventListeners>");
    for (name, enabled) in [
        ("zoom", controls.zoom),
        ("pan", controls.pan),
        ("tooltip", controls.tooltip),
        ("locked", controls.locked),
        ("lockedKeyboard", controls.locked_keyboard),
        ("lockedMouse", controls.locked_mouse),
        ("lockedWheel", controls.locked_wheel),
        ("lockedTouch", controls.locked_touch),
    ] {
        let _ = writeln!(out, "    <{name} enabled=\"{enabled}\"/>");
    }
    let _ = writeln!(out, "  </eventListeners>");

    let _ = writeln!(out, "  <colorScheme>");
    let _ = writeln!(out, "    <background>{}</background>", colors.background.to_hex());
    let _ = writeln!(out, "    <axisColor>{}</axisColor>", colors.axis_color.to_hex());
    let _ = writeln!(out, "    <seriesColors>");
    let _ = writeln!(out, "      <color>{}</color>", colors.series_color.to_hex());
    let _ = writeln!(out, "    </seriesColors>");
    let _ = writeln!(out, "  </colorScheme>");

    let _ = writeln!(
        out,
        "  <margins top=\"{}\" right=\"{}\" bottom=\"{}\" left=\"{}\"/>",
        margins.top, margins.right, margins.bottom, margins.left
    );
    let _ = writeln!(out, "</chartConfig>");
    out
}

fn write_axis(out: &mut String, name: &str, axis: &AxisConfig) {
    let _ = writeln!(
        out,
        "    <{name} title=\"{}\" tickCount=\"{}\" showLine=\"{}\" min=\"{}\" max=\"{}\"/>",
        escape(axis.title.as_str()),
        axis.tick_count,
        axis.show_line,
        axis.min,
        axis.max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        <chartConfig>
          <graphStyle title="Sales &amp; Costs">
            <legend visible="false"/>
            <xAxis title="Month" tickInterval="12" showLine="true"/>
            <yAxis title="EUR" tickCount="5" showLine="false" min="-1.5" max="9"/>
            <graphType>scatter</graphType>
          </graphStyle>
          <eventListeners>
            <zoom enabled="true"/>
            <pan enabled="false"/>
            <locked enabled="false"/>
            <lockedMouse enabled="true"/>
            <lockedWheel enabled="false"/>
          </eventListeners>
          <colorScheme>
            <background>#101010</background>
            <axisColor>#eeeeee</axisColor>
            <seriesColors><color>#00ff00</color><color>#0000ff</color></seriesColors>
          </colorScheme>
        </chartConfig>
    "##;

    #[test]
    fn parses_every_section() {
        let patch = parse_config_xml(SAMPLE).expect("valid config");
        assert_eq!(patch.title.as_deref(), Some("Sales & Costs"));
        assert_eq!(patch.legend_visible, Some(false));
        assert_eq!(patch.x_axis.title.as_deref(), Some("Month"));
        assert_eq!(patch.x_axis.tick_count, Some(12));
        assert_eq!(patch.y_axis.show_line, Some(false));
        assert_eq!(patch.y_axis.min, Some(-1.5));
        assert_eq!(patch.y_axis.max, Some(9.0));
        assert_eq!(patch.graph_type, Some(GraphType::Scatter));
        assert_eq!(patch.zoom, Some(true));
        assert_eq!(patch.pan, Some(false));
        assert_eq!(patch.tooltip, None);
        assert_eq!(patch.background, Color::from_hex("#101010"));
        assert_eq!(patch.series_color, Color::from_hex("#00ff00"));
        assert_eq!(patch.margins, None);
    }

    #[test]
    fn lock_flags_follow_enabled_literally() {
        let patch = parse_config_xml(SAMPLE).expect("valid config");
        // `enabled="true"` on a lock means locked, never the inverse.
        assert_eq!(patch.locked_mouse, Some(true));
        assert_eq!(patch.locked_wheel, Some(false));
        assert_eq!(patch.locked, Some(false));
    }

    #[test]
    fn rejects_non_boolean_flags() {
        let err = parse_config_xml(
            r#"<chartConfig><eventListeners><zoom enabled="yes"/></eventListeners></chartConfig>"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { ref field, .. } if field == "zoom.enabled"));
    }

    #[test]
    fn rejects_bad_numbers_and_colors() {
        assert!(parse_config_xml(r#"<c><xAxis tickCount="ten"/></c>"#).is_err());
        assert!(parse_config_xml(r#"<c><xAxis tickCount="-1"/></c>"#).is_err());
        assert!(
            parse_config_xml("<c><colorScheme><background>blue</background></colorScheme></c>")
                .is_err()
        );
        assert!(parse_config_xml("<c><graphType>pie</graphType></c>").is_err());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            parse_config_xml("<a><b></a>"),
            Err(LoadError::Xml(_))
        ));
        assert!(matches!(
            parse_config_xml("just text"),
            Err(LoadError::MissingField(_))
        ));
    }

    #[test]
    fn non_finite_axis_bounds_are_rejected() {
        for doc in [
            r#"<c><xAxis min="NaN"/></c>"#,
            r#"<c><xAxis max="inf"/></c>"#,
            r#"<c><yAxis min="-infinity"/></c>"#,
        ] {
            assert!(
                matches!(parse_config_xml(doc), Err(LoadError::InvalidValue { .. })),
                "{doc}"
            );
        }
    }

    #[test]
    fn bad_margins_are_rejected() {
        for doc in [
            r#"<c><margins left="NaN"/></c>"#,
            r#"<c><margins top="inf"/></c>"#,
            r#"<c><margins right="-5"/></c>"#,
        ] {
            assert!(
                matches!(parse_config_xml(doc), Err(LoadError::InvalidValue { .. })),
                "{doc}"
            );
        }
        let patch = parse_config_xml(r#"<c><margins bottom="0"/></c>"#).expect("zero is fine");
        assert_eq!(patch.margins.map(|margins| margins.bottom), Some(0.0));
    }

    #[test]
    fn partial_margins_fall_back_to_defaults() {
        let patch = parse_config_xml(r#"<c><margins left="90"/></c>"#).expect("valid config");
        let margins = patch.margins.expect("margins present");
        assert_eq!(margins.left, 90.0);
        assert_eq!(margins.bottom, Margins::default().bottom);
    }

    #[test]
    fn written_config_parses_back() {
        let mut config = Configuration::default();
        config.graph_style.title = "A \"quoted\" <title>".to_string();
        config.graph_style.x_axis.set_range(crate::view::Range::new(0.25, 10.0));
        config.controls.locked_touch = true;
        config.margins.left = 80.0;

        let patch = parse_config_xml(&write_config_xml(&config)).expect("round trip");
        let mut restored = Configuration::default();
        restored.apply(&patch);
        assert_eq!(restored, config);
    }
}
