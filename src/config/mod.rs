//! Chart configuration: style, interaction controls, colors and margins.
//!
//! A [`Configuration`] is owned by exactly one chart. Loaders produce a
//! [`ConfigPatch`] where every field is optional; applying a patch only
//! touches the fields it carries.

mod xml;

pub use xml::{parse_config_xml, write_config_xml};

use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::geom::Margins;
use crate::render::Color;
use crate::style::{ColorScheme, GraphStyle, GraphType};

/// Interactive feature gated by [`ControlFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Wheel, pinch and keyboard zoom.
    Zoom,
    /// Mouse, touch and keyboard pan.
    Pan,
    /// Nearest-point tooltip.
    Tooltip,
}

/// Input device an interaction arrives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDevice {
    /// Mouse buttons and pointer motion.
    Mouse,
    /// Scroll wheel or trackpad scroll.
    Wheel,
    /// Touch screen.
    Touch,
    /// Keyboard.
    Keyboard,
}

/// Feature toggles and locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlFlags {
    /// Allow zooming.
    pub zoom: bool,
    /// Allow panning.
    pub pan: bool,
    /// Allow the tooltip.
    pub tooltip: bool,
    /// Master lock: blocks every interaction.
    pub locked: bool,
    /// Block mouse input.
    pub locked_mouse: bool,
    /// Block wheel input.
    pub locked_wheel: bool,
    /// Block touch input.
    pub locked_touch: bool,
    /// Block keyboard input.
    pub locked_keyboard: bool,
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self {
            zoom: true,
            pan: true,
            tooltip: true,
            locked: false,
            locked_mouse: false,
            locked_wheel: false,
            locked_touch: false,
            locked_keyboard: false,
        }
    }
}

impl ControlFlags {
    /// Whether `feature` may run for input from `device`.
    pub fn allows(&self, feature: Feature, device: InputDevice) -> bool {
        let enabled = match feature {
            Feature::Zoom => self.zoom,
            Feature::Pan => self.pan,
            Feature::Tooltip => self.tooltip,
        };
        let device_locked = match device {
            InputDevice::Mouse => self.locked_mouse,
            InputDevice::Wheel => self.locked_wheel,
            InputDevice::Touch => self.locked_touch,
            InputDevice::Keyboard => self.locked_keyboard,
        };
        enabled && !self.locked && !device_locked
    }
}

/// Complete chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Titles, axes and series presentation.
    pub graph_style: GraphStyle,
    /// Interaction toggles and locks.
    pub controls: ControlFlags,
    /// Colors.
    pub color_scheme: ColorScheme,
    /// Plot area margins.
    pub margins: Margins,
}

impl Configuration {
    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        let style = &mut self.graph_style;
        set(&mut style.title, &patch.title);
        set(&mut style.legend_visible, &patch.legend_visible);
        set(&mut style.graph_type, &patch.graph_type);
        set(&mut style.series_name, &patch.series_name);
        patch.x_axis.apply(&mut style.x_axis);
        patch.y_axis.apply(&mut style.y_axis);

        let controls = &mut self.controls;
        set(&mut controls.zoom, &patch.zoom);
        set(&mut controls.pan, &patch.pan);
        set(&mut controls.tooltip, &patch.tooltip);
        set(&mut controls.locked, &patch.locked);
        set(&mut controls.locked_mouse, &patch.locked_mouse);
        set(&mut controls.locked_wheel, &patch.locked_wheel);
        set(&mut controls.locked_touch, &patch.locked_touch);
        set(&mut controls.locked_keyboard, &patch.locked_keyboard);

        let colors = &mut self.color_scheme;
        set(&mut colors.background, &patch.background);
        set(&mut colors.axis_color, &patch.axis_color);
        set(&mut colors.series_color, &patch.series_color);

        set(&mut self.margins, &patch.margins);
    }
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Partial update of one axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisPatch {
    /// New title.
    pub title: Option<String>,
    /// New tick interval count.
    pub tick_count: Option<u32>,
    /// New axis line visibility.
    pub show_line: Option<bool>,
    /// New lower bound.
    pub min: Option<f64>,
    /// New upper bound.
    pub max: Option<f64>,
}

impl AxisPatch {
    fn apply(&self, axis: &mut AxisConfig) {
        set(&mut axis.title, &self.title);
        set(&mut axis.tick_count, &self.tick_count);
        set(&mut axis.show_line, &self.show_line);
        set(&mut axis.min, &self.min);
        set(&mut axis.max, &self.max);
    }
}

/// Partial configuration update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    /// Chart title.
    pub title: Option<String>,
    /// Legend visibility.
    pub legend_visible: Option<bool>,
    /// X axis changes.
    pub x_axis: AxisPatch,
    /// Y axis changes.
    pub y_axis: AxisPatch,
    /// Series drawing mode.
    pub graph_type: Option<GraphType>,
    /// Legend series name.
    pub series_name: Option<String>,
    /// Zoom toggle.
    pub zoom: Option<bool>,
    /// Pan toggle.
    pub pan: Option<bool>,
    /// Tooltip toggle.
    pub tooltip: Option<bool>,
    /// Master lock.
    pub locked: Option<bool>,
    /// Mouse lock.
    pub locked_mouse: Option<bool>,
    /// Wheel lock.
    pub locked_wheel: Option<bool>,
    /// Touch lock.
    pub locked_touch: Option<bool>,
    /// Keyboard lock.
    pub locked_keyboard: Option<bool>,
    /// Background color.
    pub background: Option<Color>,
    /// Axis color.
    pub axis_color: Option<Color>,
    /// Series color.
    pub series_color: Option<Color>,
    /// Plot margins.
    pub margins: Option<Margins>,
}

impl ConfigPatch {
    /// Whether the patch changes any axis bound.
    pub fn touches_range(&self) -> bool {
        self.x_axis.min.is_some()
            || self.x_axis.max.is_some()
            || self.y_axis.min.is_some()
            || self.y_axis.max.is_some()
    }
}
