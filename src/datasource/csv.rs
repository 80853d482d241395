use std::fmt::Write as _;

use crate::error::LoadError;
use crate::geom::Point;

/// Parse `x,y` lines.
///
/// Blank lines are skipped. The first non-blank line is treated as a header
/// when it does not start with two numbers. Columns past the second are
/// ignored.
pub fn parse_csv(text: &str) -> Result<Vec<Point>, LoadError> {
    let mut points = Vec::new();
    let mut first = true;
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = parse_line(line);
        if first {
            first = false;
            if parsed.is_err() {
                log::debug!("skipping CSV header `{line}`");
                continue;
            }
        }
        let point = parsed.map_err(|message| LoadError::Csv {
            line: index + 1,
            message,
        })?;
        points.push(point);
    }
    Ok(points)
}

fn parse_line(line: &str) -> Result<Point, String> {
    let mut fields = line.split(',').map(str::trim);
    let mut next = |name: &str| -> Result<f64, String> {
        let field = fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or_else(|| format!("missing {name} value"))?;
        field
            .parse()
            .map_err(|_| format!("{name} value `{field}` is not a number"))
    };
    let x = next("x")?;
    let y = next("y")?;
    Ok(Point::new(x, y))
}

/// Write points as `x,y` lines under an `x,y` header.
pub fn write_csv(points: &[Point]) -> String {
    let mut out = String::from("x,y\n");
    for point in points {
        let _ = writeln!(out, "{},{}", point.x, point.y);
    }
    out
}
