//! Graph styling and color schemes.

use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::render::Color;

/// How the single series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    /// One polyline through the points in sequence order.
    #[default]
    Line,
    /// One filled circle per point.
    Scatter,
}

impl GraphType {
    /// Parse `line` or `scatter` (case-insensitive, surrounding space ignored).
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "line" => Some(Self::Line),
            "scatter" => Some(Self::Scatter),
            _ => None,
        }
    }

    /// Name used in serialized configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Scatter => "scatter",
        }
    }
}

/// Titles, axes and series presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphStyle {
    /// Chart title drawn centered at the top.
    pub title: String,
    /// Show the legend swatch and series name.
    pub legend_visible: bool,
    /// X axis.
    pub x_axis: AxisConfig,
    /// Y axis.
    pub y_axis: AxisConfig,
    /// Series drawing mode.
    pub graph_type: GraphType,
    /// Name shown in the legend.
    pub series_name: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            title: String::new(),
            legend_visible: true,
            x_axis: AxisConfig::new("X Axis"),
            y_axis: AxisConfig::new("Y Axis"),
            graph_type: GraphType::Line,
            series_name: "Series 1".to_string(),
        }
    }
}

/// Chart colors. There is exactly one series color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorScheme {
    /// Surface background.
    pub background: Color,
    /// Axis lines, ticks and text.
    pub axis_color: Color,
    /// Series stroke, markers and legend swatch.
    pub series_color: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            axis_color: Color::BLACK,
            series_color: Color::RED,
        }
    }
}

impl ColorScheme {
    /// Dark background with light axes.
    pub fn dark() -> Self {
        Self {
            background: Color::from_rgb8(0x12, 0x14, 0x18),
            axis_color: Color::from_rgb8(0xc8, 0xcc, 0xd2),
            series_color: Color::from_rgb8(0x33, 0xbf, 0xf2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_type_parses_loosely() {
        assert_eq!(GraphType::parse(" Scatter "), Some(GraphType::Scatter));
        assert_eq!(GraphType::parse("line"), Some(GraphType::Line));
        assert_eq!(GraphType::parse("bar"), None);
    }

    #[test]
    fn color_scheme_serializes_as_hex() {
        let json = serde_json::to_value(ColorScheme::default()).expect("serialize");
        assert_eq!(json["background"], "#ffffff");
        assert_eq!(json["axisColor"], "#000000");
        assert_eq!(json["seriesColor"], "#ff0000");
    }
}
