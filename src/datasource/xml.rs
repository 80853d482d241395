use std::fmt::Write as _;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::LoadError;
use crate::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    X,
    Y,
}

/// Parse `<entry>` elements holding `<xValue>` and `<yValue>`.
///
/// The root element name is not checked. Each entry must carry both values.
pub fn parse_xml(text: &str) -> Result<Vec<Point>, LoadError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut points = Vec::new();
    let mut entry: Option<(Option<f64>, Option<f64>)> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"entry" => entry = Some((None, None)),
                b"xValue" if entry.is_some() => field = Some(Field::X),
                b"yValue" if entry.is_some() => field = Some(Field::Y),
                _ => {}
            },
            Event::Text(content) => {
                let (Some(field), Some((x, y))) = (field, entry.as_mut()) else {
                    continue;
                };
                let raw = content.unescape()?;
                let value = raw.trim();
                let (slot, name) = match field {
                    Field::X => (x, "xValue"),
                    Field::Y => (y, "yValue"),
                };
                *slot = Some(value.parse().map_err(|_| LoadError::invalid(name, value))?);
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"xValue" | b"yValue" => field = None,
                b"entry" => {
                    let Some((x, y)) = entry.take() else {
                        continue;
                    };
                    let x = x.ok_or(LoadError::MissingField("xValue"))?;
                    let y = y.ok_or(LoadError::MissingField("yValue"))?;
                    points.push(Point::new(x, y));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(points)
}

/// Write points as a `<data>` document.
pub fn write_xml(points: &[Point]) -> String {
    let mut out = String::from("<data>\n");
    for point in points {
        let _ = writeln!(out, "  <entry>");
        let _ = writeln!(out, "    <xValue>{}</xValue>", point.x);
        let _ = writeln!(out, "    <yValue>{}</yValue>", point.y);
        let _ = writeln!(out, "  </entry>");
    }
    out.push_str("</data>\n");
    out
}
