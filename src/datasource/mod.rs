//! Chart data and its text formats.
//!
//! A [`Dataset`] is an ordered list of points, replaced wholesale on every
//! load. Points keep the order they were read in; duplicates and unsorted X
//! values are allowed.

mod csv;
mod xml;

pub use csv::{parse_csv, write_csv};
pub use xml::{parse_xml, write_xml};

use std::path::Path;

use crate::error::LoadError;
use crate::geom::Point;
use crate::view::{Range, Viewport};

/// Ordered points with cached bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<Point>,
    bounds: Option<Viewport>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from points, keeping their order.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut data = Self::new();
        data.replace(points);
        data
    }

    /// Replace every point.
    pub fn replace(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.clear();
        self.bounds = None;
        for point in points {
            self.points.push(point);
            self.update_bounds(point);
        }
    }

    /// Access all points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the dataset has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounds of the finite points, if any.
    pub fn bounds(&self) -> Option<Viewport> {
        self.bounds
    }

    fn update_bounds(&mut self, point: Point) {
        if !point.is_finite() {
            return;
        }
        match self.bounds.as_mut() {
            None => {
                self.bounds = Some(Viewport::new(
                    Range::new(point.x, point.x),
                    Range::new(point.y, point.y),
                ));
            }
            Some(bounds) => {
                bounds.x.expand_to_include(point.x);
                bounds.y.expand_to_include(point.y);
            }
        }
    }
}

/// Text format of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// `x,y` lines with an optional header.
    Csv,
    /// Array of `{"x": .., "y": ..}` objects.
    Json,
    /// `<data><entry><xValue/><yValue/></entry></data>`.
    Xml,
}

impl DataFormat {
    /// Format for a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Format implied by a file name.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LoadError::UnknownFormat(path.display().to_string()))
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// Parse points from text in the given format.
pub fn parse_points(format: DataFormat, text: &str) -> Result<Vec<Point>, LoadError> {
    match format {
        DataFormat::Csv => parse_csv(text),
        DataFormat::Json => Ok(serde_json::from_str(text)?),
        DataFormat::Xml => parse_xml(text),
    }
}

/// Serialize points in the given format.
pub fn write_points(format: DataFormat, points: &[Point]) -> Result<String, LoadError> {
    match format {
        DataFormat::Csv => Ok(write_csv(points)),
        DataFormat::Json => Ok(serde_json::to_string_pretty(points)?),
        DataFormat::Xml => Ok(write_xml(points)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_track_replacements() {
        let mut data = Dataset::from_points([Point::new(1.0, -5.0), Point::new(3.0, 20.0)]);
        let bounds = data.bounds().expect("bounds");
        assert_eq!(bounds.x, Range::new(1.0, 3.0));
        assert_eq!(bounds.y, Range::new(-5.0, 20.0));

        data.replace([Point::new(7.0, 7.0)]);
        assert_eq!(data.len(), 1);
        assert_eq!(data.bounds().map(|b| b.x), Some(Range::new(7.0, 7.0)));

        data.replace([]);
        assert!(data.is_empty());
        assert_eq!(data.bounds(), None);
    }

    #[test]
    fn keeps_insertion_order() {
        let data = Dataset::from_points([
            Point::new(3.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
        ]);
        let xs: Vec<f64> = data.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 3.0]);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DataFormat::from_path(Path::new("sales.CSV")).ok(),
            Some(DataFormat::Csv)
        );
        assert_eq!(
            DataFormat::from_path(Path::new("dir/points.json")).ok(),
            Some(DataFormat::Json)
        );
        assert!(matches!(
            DataFormat::from_path(Path::new("notes.txt")),
            Err(LoadError::UnknownFormat(_))
        ));
        assert!(DataFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn json_points_load_in_order() {
        let points = parse_points(
            DataFormat::Json,
            r#"[{"x": 2, "y": 4.5}, {"x": -1, "y": 0}]"#,
        )
        .expect("valid json");
        assert_eq!(points, vec![Point::new(2.0, 4.5), Point::new(-1.0, 0.0)]);
    }

    #[test]
    fn json_rejects_missing_fields() {
        assert!(matches!(
            parse_points(DataFormat::Json, r#"[{"x": 2}]"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn every_format_reads_what_it_writes() {
        let points = vec![Point::new(0.5, -2.0), Point::new(10.0, 1e-3)];
        for format in [DataFormat::Csv, DataFormat::Json, DataFormat::Xml] {
            let text = write_points(format, &points).expect("serialize");
            let parsed = parse_points(format, &text).expect("parse");
            assert_eq!(parsed, points, "{format:?}");
        }
    }
}
