//! Ingestion boundary: coerces the accepted external point encodings into
//! [`Point`]. Everything downstream works on the canonical type only.
//!
//! Accepted encodings:
//! - `{"x": 1.0, "y": 2.0}` (extra keys ignored)
//! - `[1.0, 2.0]` (extra elements ignored)
//! - `"1.0,2.0"` or `"1.0 2.0"`
//!
//! Coordinates may be JSON numbers or numeric strings.

use serde_json::Value;

use crate::{
    error::{PerfectError, Result},
    types::Point,
};

/// Outcome of parsing a raw stroke
#[derive(Debug, Default)]
pub struct ParsedStroke {
    pub points: Vec<Point>,
    /// Elements that were skipped, with the reason
    pub rejected: Vec<PerfectError>,
}

impl Point {
    /// Coerce one external encoding into a point.
    ///
    /// `index` only feeds the error message.
    pub fn from_value(index: usize, value: &Value) -> Result<Point> {
        let malformed = |reason: &str| PerfectError::MalformedPoint {
            index,
            reason: reason.to_string(),
        };

        let (x, y) = match value {
            Value::Object(map) => {
                let x = map.get("x").ok_or_else(|| malformed("missing x coordinate"))?;
                let y = map.get("y").ok_or_else(|| malformed("missing y coordinate"))?;
                (coordinate(x), coordinate(y))
            }
            Value::Array(items) => {
                if items.len() < 2 {
                    return Err(malformed("pair needs two coordinates"));
                }
                (coordinate(&items[0]), coordinate(&items[1]))
            }
            Value::String(text) => {
                let mut parts = text
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|part| !part.is_empty());
                let x = parts.next().and_then(|p| p.parse::<f64>().ok());
                let y = parts.next().and_then(|p| p.parse::<f64>().ok());
                (x, y)
            }
            _ => return Err(malformed("unsupported point encoding")),
        };

        match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Point::new(x, y)),
            (Some(_), Some(_)) => Err(malformed("non-finite coordinate")),
            _ => Err(malformed("non-numeric coordinate")),
        }
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse every element, skipping the ones that cannot be coerced
pub fn parse_stroke(values: &[Value]) -> ParsedStroke {
    let mut parsed = ParsedStroke {
        points: Vec::with_capacity(values.len()),
        rejected: Vec::new(),
    };

    for (index, value) in values.iter().enumerate() {
        match Point::from_value(index, value) {
            Ok(point) => parsed.points.push(point),
            Err(e) => parsed.rejected.push(e),
        }
    }

    parsed
}
