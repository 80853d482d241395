//! Axis configuration, tick generation, and label formatting.

use serde::{Deserialize, Serialize};

use crate::view::Range;

/// Number of significant digits shown on tick labels.
const TICK_LABEL_DIGITS: i32 = 3;

/// Most tick intervals drawn on one axis, whatever the configured count.
pub const MAX_TICK_INTERVALS: u32 = 100;

/// Configuration of one axis.
///
/// `min` and `max` hold the current viewport on this axis, not the extent of
/// the data. Zoom and pan rewrite them continuously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisConfig {
    /// Axis title.
    pub title: String,
    /// Number of tick intervals between `min` and `max`.
    pub tick_count: u32,
    /// Draw the axis line.
    pub show_line: bool,
    /// Lower viewport bound.
    pub min: f64,
    /// Upper viewport bound.
    pub max: f64,
}

impl AxisConfig {
    /// Create an axis with the given title and default settings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the number of tick intervals.
    pub fn with_tick_count(mut self, tick_count: u32) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Set the visible range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.set_range(Range::new(min, max));
        self
    }

    /// Access the visible range.
    pub fn range(&self) -> Range {
        Range {
            min: self.min,
            max: self.max,
        }
    }

    /// Replace the visible range.
    pub fn set_range(&mut self, range: Range) {
        self.min = range.min;
        self.max = range.max;
    }

    /// Ticks for the current range.
    pub fn ticks(&self) -> Vec<Tick> {
        generate_ticks(self.range(), self.tick_count)
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            tick_count: 10,
            show_line: true,
            min: 0.0,
            max: 1.0,
        }
    }
}

/// One tick mark with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Tick value in data coordinates.
    pub value: f64,
    /// Formatted label.
    pub label: String,
}

/// Evenly spaced ticks from `range.min` to `range.max`, both ends included.
///
/// A tick count of zero is treated as one interval, and counts above
/// [`MAX_TICK_INTERVALS`] are capped. Values within rounding noise of zero
/// snap to zero.
pub fn generate_ticks(range: Range, tick_count: u32) -> Vec<Tick> {
    if !range.is_finite() {
        return Vec::new();
    }
    let intervals = tick_count.clamp(1, MAX_TICK_INTERVALS);
    let step = range.span() / intervals as f64;
    (0..=intervals)
        .map(|index| {
            let mut value = range.min + step * index as f64;
            if value.abs() < step * 1e-9 {
                value = 0.0;
            }
            Tick {
                value,
                label: format_tick(value),
            }
        })
        .collect()
}

/// Format a value rounded to three significant digits.
///
/// Trailing zeros after the decimal point are dropped.
pub fn format_tick(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (TICK_LABEL_DIGITS - 1 - magnitude).max(0) as usize;
    let scale = 10_f64.powi(TICK_LABEL_DIGITS - 1 - magnitude);
    let rounded = (value * scale).round() / scale;
    let text = format!("{rounded:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_intervals_give_eleven_ticks() {
        let ticks = generate_ticks(Range::new(0.0, 100.0), 10);
        assert_eq!(ticks.len(), 11);
        for (index, tick) in ticks.iter().enumerate() {
            assert!((tick.value - index as f64 * 10.0).abs() < 1e-9);
        }
        assert_eq!(ticks[0].label, "0");
        assert_eq!(ticks[10].label, "100");
    }

    #[test]
    fn zero_tick_count_draws_both_ends() {
        let ticks = generate_ticks(Range::new(-1.0, 1.0), 0);
        let values: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![-1.0, 1.0]);
    }

    #[test]
    fn huge_tick_count_is_capped() {
        let ticks = generate_ticks(Range::new(0.0, 1.0), u32::MAX);
        assert_eq!(ticks.len(), MAX_TICK_INTERVALS as usize + 1);
        assert_eq!(ticks.last().map(|tick| tick.label.as_str()), Some("1"));
    }

    #[test]
    fn ticks_near_zero_snap_to_zero() {
        let ticks = generate_ticks(Range::new(-0.3, 0.7), 10);
        assert_eq!(ticks[3].value, 0.0);
        assert_eq!(ticks[3].label, "0");
    }

    #[test]
    fn non_finite_range_has_no_ticks() {
        assert!(generate_ticks(Range::new(0.0, f64::INFINITY), 4).is_empty());
    }

    #[test]
    fn labels_use_three_significant_digits() {
        assert_eq!(format_tick(12345.0), "12300");
        assert_eq!(format_tick(0.012345), "0.0123");
        assert_eq!(format_tick(4.56789), "4.57");
        assert_eq!(format_tick(-7.5), "-7.5");
        assert_eq!(format_tick(22.5), "22.5");
        assert_eq!(format_tick(10.0), "10");
        assert_eq!(format_tick(-0.00001), "-0.00001");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_tick(-0.0), "0");
    }
}
