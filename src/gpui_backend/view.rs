use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    App, FocusHandle, KeyDownEvent, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent,
    Pixels, Point, ScrollWheelEvent, Window, canvas, div, px,
};

use crate::chart::Chart;
use crate::geom::{ScreenPoint, SurfaceSize};
use crate::interaction::{ChartEvent, Key, PointerEvent, WheelEvent};

use super::paint::{paint_frame, to_hsla};
use super::surface::GpuiSurface;

/// A GPUI view that draws a [`Chart`] and feeds it mouse, wheel and keyboard
/// input.
#[derive(Clone)]
pub struct GpuiChartView {
    chart: Arc<RwLock<Chart<GpuiSurface>>>,
    focus_handle: FocusHandle,
}

impl GpuiChartView {
    /// Wrap a chart in a view.
    pub fn new(chart: Chart<GpuiSurface>, cx: &mut App) -> Self {
        Self {
            chart: Arc::new(RwLock::new(chart)),
            focus_handle: cx.focus_handle(),
        }
    }

    /// Get a handle for mutating the chart.
    ///
    /// This is useful for loading data from async tasks.
    pub fn chart_handle(&self) -> ChartHandle {
        ChartHandle {
            chart: Arc::clone(&self.chart),
        }
    }

    fn dispatch(&self, event: impl FnOnce(&GpuiSurface) -> ChartEvent, cx: &mut Context<Self>) {
        let mut chart = self.chart.write().expect("chart lock");
        let event = event(chart.surface());
        if chart.handle_event(event) {
            cx.notify();
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
        let position = screen_point(ev.position);
        self.dispatch(
            |surface| {
                ChartEvent::MouseDown(PointerEvent {
                    position: surface.to_local(position),
                })
            },
            cx,
        );
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let position = screen_point(ev.position);
        self.dispatch(
            |surface| {
                ChartEvent::MouseMove(PointerEvent {
                    position: surface.to_local(position),
                })
            },
            cx,
        );
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let position = screen_point(ev.position);
        self.dispatch(
            |surface| {
                ChartEvent::MouseUp(PointerEvent {
                    position: surface.to_local(position),
                })
            },
            cx,
        );
    }

    fn on_hover(&mut self, hovered: bool, cx: &mut Context<Self>) {
        if !hovered {
            self.dispatch(|_| ChartEvent::MouseLeave, cx);
        }
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let position = screen_point(ev.position);
        let delta = ev.delta.pixel_delta(px(16.0));
        let delta_y = f32::from(delta.y);
        self.dispatch(
            |surface| {
                ChartEvent::Wheel(WheelEvent {
                    position: surface.to_local(position),
                    delta_y,
                })
            },
            cx,
        );
    }

    fn on_key_down(&mut self, ev: &KeyDownEvent, cx: &mut Context<Self>) {
        let key = match ev.keystroke.key.as_str() {
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "+" | "=" => Key::ZoomIn,
            "-" => Key::ZoomOut,
            _ => return,
        };
        self.dispatch(|_| ChartEvent::Key(key), cx);
    }
}

impl Render for GpuiChartView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let chart = Arc::clone(&self.chart);
        let background = chart
            .read()
            .expect("chart lock")
            .current_config()
            .color_scheme
            .background;

        div()
            .id("gpui-datachart")
            .size_full()
            .bg(to_hsla(background))
            .track_focus(&self.focus_handle)
            .child(
                canvas(
                    move |bounds, _, _| {
                        let mut chart = chart.write().expect("chart lock");
                        let origin = screen_point(bounds.origin);
                        let size = SurfaceSize::new(
                            f32::from(bounds.size.width),
                            f32::from(bounds.size.height),
                        );
                        if chart.surface_mut().place(origin, size) {
                            chart.resize();
                        }
                        (origin, chart.frame().clone())
                    },
                    move |_, (origin, frame), window, cx| {
                        paint_frame(&frame, origin, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_hover(cx.listener(|this, hovered: &bool, _, cx| {
                this.on_hover(*hovered, cx);
            }))
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
            .on_key_down(cx.listener(|this, ev, _, cx| {
                this.on_key_down(ev, cx);
            }))
    }
}

/// A handle for mutating a [`Chart`] held inside a `GpuiChartView`.
///
/// The handle clones cheaply and can be moved into async tasks. Call
/// `notify` on the view's entity after writing so the window repaints.
#[derive(Clone)]
pub struct ChartHandle {
    chart: Arc<RwLock<Chart<GpuiSurface>>>,
}

impl ChartHandle {
    /// Read the chart.
    ///
    /// The chart is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Chart<GpuiSurface>) -> R) -> R {
        let chart = self.chart.read().expect("chart lock");
        f(&chart)
    }

    /// Mutate the chart.
    ///
    /// The chart is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut Chart<GpuiSurface>) -> R) -> R {
        let mut chart = self.chart.write().expect("chart lock");
        f(&mut chart)
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}
