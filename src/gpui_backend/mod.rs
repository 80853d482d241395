//! GPUI integration for gpui_datachart.
//!
//! This module provides a GPUI view that draws a [`Chart`](crate::chart::Chart)
//! and forwards mouse, wheel and keyboard input to it. GPUI has no touch
//! events, so touch gestures are only reachable through
//! [`Chart::handle_event`](crate::chart::Chart::handle_event).

mod paint;
mod surface;
mod view;

pub use surface::GpuiSurface;
pub use view::{ChartHandle, GpuiChartView};
