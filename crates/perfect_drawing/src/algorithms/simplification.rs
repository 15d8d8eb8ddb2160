use crate::{geometry::perpendicular_distance, traits::StrokeSimplifier, types::Point};

/// Ramer-Douglas-Peucker simplifier.
///
/// Distances are measured to the infinite line through the chord endpoints.
/// Recursion depth is bounded by the stroke length.
#[derive(Debug, Clone, Default)]
pub struct RamerDouglasPeuckerSimplifier;

impl StrokeSimplifier for RamerDouglasPeuckerSimplifier {
    fn simplify(&self, points: &[Point], epsilon: f64) -> Vec<Point> {
        if points.len() < 3 {
            return points.to_vec();
        }

        let last = points.len() - 1;
        let mut kept = vec![false; points.len()];
        kept[0] = true;
        kept[last] = true;

        rdp_recurse(points, 0, last, epsilon, &mut kept);

        points
            .iter()
            .zip(&kept)
            .filter(|&(_, keep)| *keep)
            .map(|(&p, _)| p)
            .collect()
    }
}

/// Marks the farthest point between `start` and `end` when it lies beyond
/// `epsilon`, then splits there. Sub-ranges share their junction index.
fn rdp_recurse(points: &[Point], start: usize, end: usize, epsilon: f64, kept: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = start;

    for i in (start + 1)..end {
        let d = perpendicular_distance(points[i], points[start], points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        kept[max_idx] = true;
        rdp_recurse(points, start, max_idx, epsilon, kept);
        rdp_recurse(points, max_idx, end, epsilon, kept);
    }
}
