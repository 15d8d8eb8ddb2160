use crate::{traits::StrokeSmoother, types::Point};

/// Windowed moving-average smoother.
///
/// Each output point is the mean of the input points within `window`
/// indices on either side. The window is clamped at the ends of the stroke,
/// so endpoints are averaged over fewer neighbours instead of being padded.
#[derive(Debug, Clone, Default)]
pub struct MovingAverageSmoother;

impl StrokeSmoother for MovingAverageSmoother {
    fn smooth(&self, points: &[Point], window: usize) -> Vec<Point> {
        if points.len() < 3 {
            return points.to_vec();
        }

        let n = points.len();
        (0..n)
            .map(|i| {
                let start = i.saturating_sub(window);
                let end = i.saturating_add(window).saturating_add(1).min(n);
                let neighbours = &points[start..end];

                let (sum_x, sum_y) = neighbours
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
                let count = neighbours.len() as f64;
                Point::new(sum_x / count, sum_y / count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point::new(i as f64 * 10.0, if i % 2 == 0 { 0.0 } else { 6.0 }))
            .collect()
    }

    #[test]
    fn test_preserves_length() {
        let points = zigzag(25);
        for window in [1, 2, 3, 10, 100] {
            assert_eq!(MovingAverageSmoother.smooth(&points, window).len(), points.len());
        }
    }

    #[test]
    fn test_zero_window_is_identity() {
        let points = zigzag(12);
        assert_eq!(MovingAverageSmoother.smooth(&points, 0), points);
    }

    #[test]
    fn test_short_strokes_pass_through() {
        let points = vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)];
        assert_eq!(MovingAverageSmoother.smooth(&points, 3), points);
        assert!(MovingAverageSmoother.smooth(&[], 3).is_empty());
    }

    #[test]
    fn test_asymmetric_window_at_ends() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(6.0, 3.0),
            Point::new(9.0, 0.0),
        ];
        let smoothed = MovingAverageSmoother.smooth(&points, 1);

        // First point only averages itself and its right neighbour
        assert_eq!(smoothed[0], Point::new(1.5, 0.0));
        assert_eq!(smoothed[1], Point::new(3.0, 1.0));
        assert_eq!(smoothed[2], Point::new(6.0, 1.0));
        assert_eq!(smoothed[3], Point::new(7.5, 1.5));
    }

    #[test]
    fn test_huge_window_averages_whole_stroke() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(8.0, 4.0),
            Point::new(12.0, 6.0),
            Point::new(16.0, 8.0),
        ];
        let smoothed = MovingAverageSmoother.smooth(&points, usize::MAX);
        assert_eq!(smoothed, vec![Point::new(8.0, 4.0); 5]);
    }

    #[test]
    fn test_reduces_jitter() {
        let points = zigzag(20);
        let smoothed = MovingAverageSmoother.smooth(&points, 2);

        let spread = |pts: &[Point]| {
            pts[3..17]
                .iter()
                .map(|p| p.y)
                .fold(f64::NEG_INFINITY, f64::max)
                - pts[3..17].iter().map(|p| p.y).fold(f64::INFINITY, f64::min)
        };
        assert!(spread(&smoothed) < spread(&points));
    }
}
