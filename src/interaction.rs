//! Input events and the viewport gestures they drive.
//!
//! Gestures are pure functions from the current viewport to a new one. The
//! only state kept between events is the small [`GestureState`] each chart
//! owns: where a pan started and the last pinch distance.

use crate::config::{ControlFlags, Feature, InputDevice};
use crate::geom::ScreenPoint;
use crate::transform::Transform;
use crate::view::{Range, Viewport, min_span_at};

/// Scale applied per wheel notch or zoom key press.
pub const ZOOM_STEP: f64 = 1.1;

/// Share of the visible range moved per arrow key press.
pub const KEYBOARD_PAN_FRACTION: f64 = 0.1;

/// Scroll wheel input; positions are relative to the surface origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Pointer position.
    pub position: ScreenPoint,
    /// Vertical scroll amount; positive scrolls down and zooms out.
    pub delta_y: f32,
}

/// Mouse pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position.
    pub position: ScreenPoint,
}

/// Touch input carrying every active touch, first touch first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchEvent {
    /// Active touch positions.
    pub touches: Vec<ScreenPoint>,
}

/// Keys the chart reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Pan toward smaller X.
    Left,
    /// Pan toward larger X.
    Right,
    /// Pan toward larger Y.
    Up,
    /// Pan toward smaller Y.
    Down,
    /// Zoom in around the viewport center.
    ZoomIn,
    /// Zoom out around the viewport center.
    ZoomOut,
}

/// Input delivered to a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Scroll wheel.
    Wheel(WheelEvent),
    /// Mouse button pressed.
    MouseDown(PointerEvent),
    /// Mouse moved.
    MouseMove(PointerEvent),
    /// Mouse button released.
    MouseUp(PointerEvent),
    /// Pointer left the surface.
    MouseLeave,
    /// Touch began.
    TouchStart(TouchEvent),
    /// Touch moved.
    TouchMove(TouchEvent),
    /// Touch ended; carries the touches still down.
    TouchEnd(TouchEvent),
    /// Key pressed.
    Key(Key),
}

impl ChartEvent {
    /// Device the event came from.
    pub fn device(&self) -> InputDevice {
        match self {
            Self::Wheel(_) => InputDevice::Wheel,
            Self::MouseDown(_) | Self::MouseMove(_) | Self::MouseUp(_) | Self::MouseLeave => {
                InputDevice::Mouse
            }
            Self::TouchStart(_) | Self::TouchMove(_) | Self::TouchEnd(_) => InputDevice::Touch,
            Self::Key(_) => InputDevice::Keyboard,
        }
    }
}

/// Gesture progress carried between events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    /// Last position of an active mouse or single-touch pan.
    pub pan_anchor: Option<ScreenPoint>,
    /// Distance between two touches at the previous pinch sample.
    pub pinch_distance: Option<f32>,
}

impl GestureState {
    /// Forget any gesture in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Wheel scale for a scroll amount; zero scroll does nothing.
pub fn wheel_scale(delta_y: f32) -> Option<f64> {
    if delta_y > 0.0 {
        Some(ZOOM_STEP)
    } else if delta_y < 0.0 {
        Some(1.0 / ZOOM_STEP)
    } else {
        None
    }
}

/// Scale both axes by `scale`, keeping the point at fractions `(fx, fy)` of
/// the viewport fixed.
///
/// Fractions are measured from the minimum of each axis. A scale above one
/// widens the viewport. An axis that would shrink below the smallest
/// resolvable span at its position keeps its current range.
pub fn zoom_anchored(viewport: Viewport, scale: f64, fx: f64, fy: f64) -> Viewport {
    let axis = |range: Range, fraction: f64| {
        let shrink = range.span() * (1.0 - scale);
        let zoomed = Range::new(
            range.min + shrink * fraction,
            range.max - shrink * (1.0 - fraction),
        );
        if zoomed.span() < min_span_at(zoomed.center()) {
            range
        } else {
            zoomed
        }
    };
    Viewport::new(axis(viewport.x, fx), axis(viewport.y, fy))
}

/// Zoom around a surface position.
pub fn zoom_at(transform: &Transform, position: ScreenPoint, scale: f64) -> Viewport {
    let (fx, fy) = transform.plot_fraction(position);
    zoom_anchored(transform.viewport(), scale, fx, fy)
}

/// Drag the viewport by a pixel delta so the content follows the pointer.
pub fn pan_by_pixels(transform: &Transform, dx: f32, dy: f32) -> Viewport {
    let viewport = transform.viewport();
    let (shift_x, shift_y) = transform.pixel_delta_to_data(dx, dy);
    Viewport::new(
        Range::new(viewport.x.min - shift_x, viewport.x.max - shift_x),
        Range::new(viewport.y.min - shift_y, viewport.y.max - shift_y),
    )
}

/// Viewport after a key press.
pub fn key_viewport(viewport: Viewport, key: Key) -> Viewport {
    let shift = |range: Range, direction: f64| {
        let delta = range.span() * KEYBOARD_PAN_FRACTION * direction;
        Range::new(range.min + delta, range.max + delta)
    };
    match key {
        Key::Left => Viewport::new(shift(viewport.x, -1.0), viewport.y),
        Key::Right => Viewport::new(shift(viewport.x, 1.0), viewport.y),
        Key::Up => Viewport::new(viewport.x, shift(viewport.y, 1.0)),
        Key::Down => Viewport::new(viewport.x, shift(viewport.y, -1.0)),
        Key::ZoomIn => zoom_anchored(viewport, 1.0 / ZOOM_STEP, 0.5, 0.5),
        Key::ZoomOut => zoom_anchored(viewport, ZOOM_STEP, 0.5, 0.5),
    }
}

/// Run the viewport gestures for one event.
///
/// Returns the new viewport when the event moved it. Gesture bookkeeping is
/// updated even when the event is gated off, so a pan never resumes from a
/// stale anchor.
pub(crate) fn viewport_for_event(
    gestures: &mut GestureState,
    flags: &ControlFlags,
    transform: &Transform,
    event: &ChartEvent,
) -> Option<Viewport> {
    let device = event.device();
    let can_pan = flags.allows(Feature::Pan, device);
    let can_zoom = flags.allows(Feature::Zoom, device);

    match event {
        ChartEvent::Wheel(wheel) => {
            if !can_zoom {
                return None;
            }
            let scale = wheel_scale(wheel.delta_y)?;
            Some(zoom_at(transform, wheel.position, scale))
        }
        ChartEvent::MouseDown(pointer) => {
            gestures.pan_anchor = can_pan.then_some(pointer.position);
            None
        }
        ChartEvent::MouseMove(pointer) => drag(gestures, can_pan, transform, pointer.position),
        ChartEvent::MouseUp(_) | ChartEvent::MouseLeave => {
            gestures.pan_anchor = None;
            None
        }
        ChartEvent::TouchStart(touch) => {
            match touch.touches.as_slice() {
                [first] => {
                    gestures.pan_anchor = can_pan.then_some(*first);
                    gestures.pinch_distance = None;
                }
                [first, second] => {
                    gestures.pan_anchor = None;
                    gestures.pinch_distance = can_zoom.then(|| first.distance(*second));
                }
                _ => gestures.reset(),
            }
            None
        }
        ChartEvent::TouchMove(touch) => match touch.touches.as_slice() {
            [only] => drag(gestures, can_pan, transform, *only),
            [first, second] => pinch(gestures, can_zoom, transform, *first, *second),
            _ => None,
        },
        ChartEvent::TouchEnd(touch) => {
            gestures.pinch_distance = None;
            gestures.pan_anchor = match touch.touches.as_slice() {
                [only] if can_pan => Some(*only),
                _ => None,
            };
            None
        }
        ChartEvent::Key(key) => {
            let allowed = match key {
                Key::ZoomIn | Key::ZoomOut => can_zoom,
                Key::Left | Key::Right | Key::Up | Key::Down => can_pan,
            };
            allowed.then(|| key_viewport(transform.viewport(), *key))
        }
    }
}

fn drag(
    gestures: &mut GestureState,
    can_pan: bool,
    transform: &Transform,
    position: ScreenPoint,
) -> Option<Viewport> {
    if !can_pan {
        gestures.pan_anchor = None;
        return None;
    }
    let anchor = gestures.pan_anchor?;
    gestures.pan_anchor = Some(position);
    Some(pan_by_pixels(
        transform,
        position.x - anchor.x,
        position.y - anchor.y,
    ))
}

fn pinch(
    gestures: &mut GestureState,
    can_zoom: bool,
    transform: &Transform,
    first: ScreenPoint,
    second: ScreenPoint,
) -> Option<Viewport> {
    gestures.pan_anchor = None;
    if !can_zoom {
        gestures.pinch_distance = None;
        return None;
    }
    let current = first.distance(second);
    let previous = gestures.pinch_distance.replace(current)?;
    if current <= f32::EPSILON || previous <= f32::EPSILON {
        return None;
    }
    let scale = f64::from(previous) / f64::from(current);
    Some(zoom_at(transform, first.midpoint(second), scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Margins, SurfaceSize};
    use proptest::prelude::*;

    fn transform(viewport: Viewport) -> Transform {
        Transform::new(viewport, SurfaceSize::new(800.0, 600.0), Margins::default())
            .expect("valid transform")
    }

    fn unit_square() -> Viewport {
        Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0))
    }

    fn assert_viewport_close(a: Viewport, b: Viewport) {
        for (left, right) in [
            (a.x.min, b.x.min),
            (a.x.max, b.x.max),
            (a.y.min, b.y.min),
            (a.y.max, b.y.max),
        ] {
            assert!((left - right).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn wheel_direction_picks_scale() {
        assert_eq!(wheel_scale(3.0), Some(ZOOM_STEP));
        assert_eq!(wheel_scale(-0.5), Some(1.0 / ZOOM_STEP));
        assert_eq!(wheel_scale(0.0), None);
    }

    #[test]
    fn zoom_keeps_pointer_data_fixed() {
        let original = transform(unit_square());
        let pointer = ScreenPoint::new(245.0, 175.0);
        let before = original.screen_to_data(pointer).expect("finite");

        let zoomed = zoom_at(&original, pointer, 1.0 / ZOOM_STEP);
        let after = transform(zoomed).screen_to_data(pointer).expect("finite");

        assert!((before.x - after.x).abs() < 1e-4);
        assert!((before.y - after.y).abs() < 1e-4);
        assert!(zoomed.x.span() < 10.0);
    }

    #[test]
    fn zoom_at_lower_left_corner_keeps_minimum() {
        let zoomed = zoom_anchored(unit_square(), 0.5, 0.0, 0.0);
        assert_eq!(zoomed.x, Range::new(0.0, 5.0));
        assert_eq!(zoomed.y, Range::new(0.0, 5.0));
    }

    #[test]
    fn zoom_in_stops_at_resolvable_span() {
        let mut viewport = Viewport::new(Range::new(1e6, 1e6 + 1.0), Range::new(0.0, 1.0));
        for _ in 0..1000 {
            viewport = zoom_anchored(viewport, 1.0 / ZOOM_STEP, 0.5, 0.5);
        }
        assert!(viewport.x.span() >= min_span_at(viewport.x.center()));
        assert!(viewport.y.span() > 0.0);
        assert!(transform(viewport).data_to_screen(viewport.center()).is_some());
    }

    #[test]
    fn drag_right_moves_view_left() {
        let panned = pan_by_pixels(&transform(unit_square()), 70.0, 50.0);
        // 70px is a tenth of the 700px wide plot, 50px a tenth of its height.
        assert_viewport_close(
            panned,
            Viewport::new(Range::new(-1.0, 9.0), Range::new(1.0, 11.0)),
        );
    }

    #[test]
    fn pan_then_reverse_restores_viewport() {
        let start = unit_square();
        let there = pan_by_pixels(&transform(start), 123.0, -45.0);
        let back = pan_by_pixels(&transform(there), -123.0, 45.0);
        assert_viewport_close(back, start);
    }

    #[test]
    fn keyboard_pans_a_tenth() {
        let moved = key_viewport(unit_square(), Key::Right);
        assert_viewport_close(
            moved,
            Viewport::new(Range::new(1.0, 11.0), Range::new(0.0, 10.0)),
        );
        let zoomed = key_viewport(unit_square(), Key::ZoomOut);
        assert!((zoomed.x.span() - 11.0).abs() < 1e-9);
        assert!((zoomed.x.center() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn mouse_pan_requires_press() {
        let transform = transform(unit_square());
        let flags = ControlFlags::default();
        let mut gestures = GestureState::default();
        let moved = ChartEvent::MouseMove(PointerEvent {
            position: ScreenPoint::new(100.0, 100.0),
        });

        assert!(viewport_for_event(&mut gestures, &flags, &transform, &moved).is_none());

        let down = ChartEvent::MouseDown(PointerEvent {
            position: ScreenPoint::new(30.0, 100.0),
        });
        viewport_for_event(&mut gestures, &flags, &transform, &down);
        let panned = viewport_for_event(&mut gestures, &flags, &transform, &moved)
            .expect("pan in progress");
        assert_viewport_close(
            panned,
            Viewport::new(Range::new(-1.0, 9.0), Range::new(0.0, 10.0)),
        );
        assert_eq!(gestures.pan_anchor, Some(ScreenPoint::new(100.0, 100.0)));

        viewport_for_event(&mut gestures, &flags, &transform, &ChartEvent::MouseLeave);
        assert!(viewport_for_event(&mut gestures, &flags, &transform, &moved).is_none());
    }

    #[test]
    fn locks_block_their_device_only() {
        let transform = transform(unit_square());
        let mut gestures = GestureState::default();
        let wheel = ChartEvent::Wheel(WheelEvent {
            position: ScreenPoint::new(400.0, 300.0),
            delta_y: 1.0,
        });

        let flags = ControlFlags {
            locked_mouse: true,
            ..ControlFlags::default()
        };
        assert!(viewport_for_event(&mut gestures, &flags, &transform, &wheel).is_some());

        let flags = ControlFlags {
            locked_wheel: true,
            ..ControlFlags::default()
        };
        assert!(viewport_for_event(&mut gestures, &flags, &transform, &wheel).is_none());

        let flags = ControlFlags {
            locked: true,
            ..ControlFlags::default()
        };
        assert!(viewport_for_event(&mut gestures, &flags, &transform, &wheel).is_none());

        let flags = ControlFlags {
            zoom: false,
            ..ControlFlags::default()
        };
        assert!(viewport_for_event(&mut gestures, &flags, &transform, &wheel).is_none());
        assert!(
            viewport_for_event(&mut gestures, &flags, &transform, &ChartEvent::Key(Key::Up))
                .is_some()
        );
    }

    #[test]
    fn pinch_sets_baseline_before_zooming() {
        let transform = transform(unit_square());
        let flags = ControlFlags::default();
        let mut gestures = GestureState::default();
        let touches = |spread: f32| TouchEvent {
            touches: vec![
                ScreenPoint::new(420.0 - spread, 300.0),
                ScreenPoint::new(420.0 + spread, 300.0),
            ],
        };

        let first = ChartEvent::TouchMove(touches(50.0));
        assert!(viewport_for_event(&mut gestures, &flags, &transform, &first).is_none());
        assert_eq!(gestures.pinch_distance, Some(100.0));

        let spread = ChartEvent::TouchMove(touches(100.0));
        let zoomed = viewport_for_event(&mut gestures, &flags, &transform, &spread)
            .expect("pinch zoom");
        // Fingers twice as far apart halve the visible range around the midpoint.
        assert_viewport_close(
            zoomed,
            Viewport::new(Range::new(2.5, 7.5), Range::new(2.5, 7.5)),
        );

        let end = ChartEvent::TouchEnd(TouchEvent {
            touches: vec![ScreenPoint::new(320.0, 300.0)],
        });
        viewport_for_event(&mut gestures, &flags, &transform, &end);
        assert_eq!(gestures.pinch_distance, None);
        assert_eq!(gestures.pan_anchor, Some(ScreenPoint::new(320.0, 300.0)));
    }

    #[test]
    fn touch_pan_follows_single_finger() {
        let transform = transform(unit_square());
        let flags = ControlFlags::default();
        let mut gestures = GestureState::default();
        let start = ChartEvent::TouchStart(TouchEvent {
            touches: vec![ScreenPoint::new(400.0, 300.0)],
        });
        let moved = ChartEvent::TouchMove(TouchEvent {
            touches: vec![ScreenPoint::new(400.0, 350.0)],
        });
        viewport_for_event(&mut gestures, &flags, &transform, &start);
        let panned = viewport_for_event(&mut gestures, &flags, &transform, &moved)
            .expect("touch pan");
        assert_viewport_close(
            panned,
            Viewport::new(Range::new(0.0, 10.0), Range::new(1.0, 11.0)),
        );

        let locked = ControlFlags {
            locked_touch: true,
            ..ControlFlags::default()
        };
        assert!(viewport_for_event(&mut gestures, &locked, &transform, &moved).is_none());
    }

    proptest! {
        #[test]
        fn prop_zoom_anchor_is_invariant(
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
            scale in 0.2f64..5.0,
        ) {
            let viewport = unit_square();
            let zoomed = zoom_anchored(viewport, scale, fx, fy);
            prop_assert!((viewport.x.lerp(fx) - zoomed.x.lerp(fx)).abs() < 1e-9);
            prop_assert!((viewport.y.lerp(fy) - zoomed.y.lerp(fy)).abs() < 1e-9);
            prop_assert!((zoomed.x.span() - 10.0 * scale).abs() < 1e-9);
        }
    }
}
