//! gpui_datachart is an embeddable line/scatter chart with zoom, pan and
//! nearest-point tooltips.
//!
//! A [`Chart`] owns its data and configuration, renders them into a
//! backend-agnostic [`RenderList`], and presents each frame to a [`Surface`].
//! Data loads from CSV, JSON or XML; configuration loads from XML or JSON.
//! Frames export as SVG, PNG or JPEG.
//! Enable the `gpui` feature for a ready-made GPUI view.

#![forbid(unsafe_code)]

pub mod axis;
pub mod chart;
pub mod config;
pub mod datasource;
pub mod error;
pub mod export;
pub mod geom;
pub mod hover;
pub mod interaction;
pub mod render;
pub mod style;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{AxisConfig, MAX_TICK_INTERVALS, Tick, format_tick, generate_ticks};
pub use chart::{Chart, Host};
pub use config::{
    AxisPatch, ConfigPatch, Configuration, ControlFlags, Feature, InputDevice, parse_config_xml,
    write_config_xml,
};
pub use datasource::{DataFormat, Dataset, parse_points, write_points};
pub use error::{ChartError, LoadError};
pub use export::{ImageFormat, encode_frame, rasterize, render_svg};
pub use geom::{Margins, Point, ScreenPoint, ScreenRect, SurfaceSize};
pub use hover::{Tooltip, nearest_point};
pub use interaction::{ChartEvent, GestureState, Key, PointerEvent, TouchEvent, WheelEvent};
pub use render::{
    ApproxTextMeasurer, Color, HeadlessSurface, LineSegment, LineStyle, MarkerStyle, RectStyle,
    RenderCommand, RenderList, Surface, TextAnchor, TextMeasurer, TextStyle, build_frame,
};
pub use style::{ColorScheme, GraphStyle, GraphType};
pub use transform::Transform;
pub use view::{Range, Viewport};

#[cfg(feature = "gpui")]
pub use gpui_backend::{ChartHandle, GpuiChartView, GpuiSurface};
