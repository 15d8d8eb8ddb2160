//! Pure geometric helpers shared by the smoother, simplifier, classifier
//! and synthesizer.

use geo::{BoundingRect, Centroid};
use geo_types::MultiPoint;

use crate::{
    error::{PerfectError, Result},
    types::{BoundingBox, Point},
};

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn to_multi_point(points: &[Point]) -> MultiPoint<f64> {
    points
        .iter()
        .map(|&p| geo_types::Point::new(p.x, p.y))
        .collect()
}

/// Arithmetic mean of the points
pub fn centroid(points: &[Point]) -> Result<Point> {
    to_multi_point(points)
        .centroid()
        .map(|c| Point::new(c.x(), c.y()))
        .ok_or(PerfectError::EmptyInput)
}

/// Componentwise min/max of the points
pub fn bounding_box(points: &[Point]) -> Result<BoundingBox> {
    let rect = to_multi_point(points)
        .bounding_rect()
        .ok_or(PerfectError::EmptyInput)?;

    Ok(BoundingBox {
        min_x: rect.min().x,
        min_y: rect.min().y,
        max_x: rect.max().x,
        max_y: rect.max().y,
    })
}

/// Distance from `point` to the infinite line through `start` and `end`.
///
/// A degenerate line (coincident endpoints) falls back to the plain
/// distance from `point` to `start`.
pub fn perpendicular_distance(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return distance(point, start);
    }

    (dy * point.x - dx * point.y + end.x * start.y - end.y * start.x).abs() / length
}

/// Angle in degrees at `at`, subtended by `prev` and `next`.
///
/// Returns `None` when either side adjacent to `at` has zero length. The
/// cosine is clamped so near-collinear triples cannot push `acos` out of
/// its domain.
pub fn interior_angle(prev: Point, at: Point, next: Point) -> Option<f64> {
    let a = distance(prev, at);
    let b = distance(at, next);
    let c = distance(prev, next);

    if a * b == 0.0 {
        return None;
    }

    let cos = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_centroid_is_mean() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.x - 2.0).abs() < 1e-12);
        assert!((c.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_errors() {
        assert!(matches!(centroid(&[]), Err(PerfectError::EmptyInput)));
        assert!(matches!(bounding_box(&[]), Err(PerfectError::EmptyInput)));
    }

    #[test]
    fn test_bounding_box() {
        let points = vec![
            Point::new(3.0, -1.0),
            Point::new(-2.0, 5.0),
            Point::new(7.0, 2.0),
        ];
        let bbox = bounding_box(&points).unwrap();
        assert_eq!(bbox.min_x, -2.0);
        assert_eq!(bbox.min_y, -1.0);
        assert_eq!(bbox.max_x, 7.0);
        assert_eq!(bbox.max_y, 5.0);
        assert_eq!(bbox.width(), 9.0);
        assert_eq!(bbox.height(), 6.0);
    }

    #[test]
    fn test_perpendicular_distance() {
        let d = perpendicular_distance(
            Point::new(5.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-12);

        // Beyond the segment the infinite line is still used
        let d = perpendicular_distance(
            Point::new(20.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular_distance_degenerate_line() {
        let anchor = Point::new(1.0, 1.0);
        let d = perpendicular_distance(Point::new(4.0, 5.0), anchor, anchor);
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_interior_angle() {
        let right = interior_angle(
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )
        .unwrap();
        assert!((right - 90.0).abs() < 1e-9);

        let straight = interior_angle(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
        )
        .unwrap();
        assert!((straight - 180.0).abs() < 1e-9);

        let p = Point::new(2.0, 2.0);
        assert_eq!(interior_angle(p, p, Point::new(3.0, 3.0)), None);
    }
}
