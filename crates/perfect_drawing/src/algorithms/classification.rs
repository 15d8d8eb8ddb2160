use crate::{
    geometry::{bounding_box, centroid, distance, interior_angle},
    traits::ShapeClassifier,
    types::{BoundingBox, Classification, Point, ShapeLabel},
};

/// Strokes shorter than this are reported as `unknown` with zero confidence
pub const MIN_CLASSIFY_POINTS: usize = 6;

/// Angles sharper than this (degrees) count as corners
const CORNER_ANGLE_DEGREES: f64 = 95.0;

/// Index offset of the neighbours used to measure the angle at a sample
const CORNER_SPAN: usize = 2;

/// Measurements shared by every rule, computed once per stroke
#[derive(Debug, Clone)]
pub struct StrokeFeatures {
    pub point_count: usize,
    pub bounds: BoundingBox,
    pub centroid: Point,
    /// Mean distance from the centroid
    pub mean_radius: f64,
    /// Mean squared deviation of the radii from `mean_radius`
    pub radius_variance: f64,
    /// Distance between the first and last sample
    pub closing_distance: f64,
    /// Samples whose local angle is sharper than the corner threshold
    pub corners: usize,
    /// Largest deviation of any sample from the first-last chord
    pub max_chord_deviation: f64,
}

impl StrokeFeatures {
    /// Returns `None` for an empty stroke
    pub fn measure(points: &[Point]) -> Option<Self> {
        let bounds = bounding_box(points).ok()?;
        let center = centroid(points).ok()?;
        let first = *points.first()?;
        let last = *points.last()?;

        let radii: Vec<f64> = points.iter().map(|&p| distance(p, center)).collect();
        let count = radii.len() as f64;
        let mean_radius = radii.iter().sum::<f64>() / count;
        let radius_variance = radii
            .iter()
            .map(|r| (r - mean_radius).powi(2))
            .sum::<f64>()
            / count;

        let corners = (CORNER_SPAN..points.len().saturating_sub(CORNER_SPAN))
            .filter_map(|i| {
                interior_angle(points[i - CORNER_SPAN], points[i], points[i + CORNER_SPAN])
            })
            .filter(|&angle| angle < CORNER_ANGLE_DEGREES)
            .count();

        let chord = distance(first, last).max(1.0);
        let max_chord_deviation = points
            .iter()
            .map(|&p| chord_deviation(p, first, last, chord))
            .fold(0.0, f64::max);

        Some(Self {
            point_count: points.len(),
            bounds,
            centroid: center,
            mean_radius,
            radius_variance,
            closing_distance: distance(first, last),
            corners,
            max_chord_deviation,
        })
    }
}

/// Cross-product deviation of `p` from the line through `start`/`end`,
/// divided by a chord length that is never below one unit.
fn chord_deviation(p: Point, start: Point, end: Point, chord: f64) -> f64 {
    let cross = (end.y - start.y) * p.x - (end.x - start.x) * p.y + end.x * start.y
        - end.y * start.x;
    cross.abs() / chord
}

/// One entry of the ordered decision table.
///
/// `score` returns the confidence when the rule matches.
#[derive(Clone, Copy)]
pub struct ShapeRule {
    pub name: &'static str,
    pub label: ShapeLabel,
    pub score: fn(&StrokeFeatures) -> Option<f64>,
}

impl std::fmt::Debug for ShapeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRule")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish()
    }
}

fn circle_score(f: &StrokeFeatures) -> Option<f64> {
    let ratio = f.bounds.aspect_ratio()?;
    let matches = f.radius_variance < f.mean_radius * 0.35
        && f.closing_distance < f.mean_radius * 0.6
        && (0.7..=1.3).contains(&ratio);

    matches.then(|| (0.7 + (1.0 - f.radius_variance / f.mean_radius)).min(0.98))
}

fn triangle_score(f: &StrokeFeatures) -> Option<f64> {
    (2..=4).contains(&f.corners).then_some(0.9)
}

fn square_score(f: &StrokeFeatures) -> Option<f64> {
    let ratio = f.bounds.aspect_ratio()?;
    (0.85..=1.15).contains(&ratio).then_some(0.92)
}

fn rectangle_score(f: &StrokeFeatures) -> Option<f64> {
    f.bounds.aspect_ratio().map(|_| 0.88)
}

fn line_score(f: &StrokeFeatures) -> Option<f64> {
    (f.point_count >= 5 && f.max_chord_deviation < 8.0).then_some(0.95)
}

fn unresolved_score(f: &StrokeFeatures) -> Option<f64> {
    (f.point_count >= 5).then_some(0.4)
}

/// The built-in decision table. Order is the tie-break policy: a stroke
/// satisfying both the circle and square tests is a circle.
pub const DEFAULT_RULES: [ShapeRule; 6] = [
    ShapeRule { name: "circle", label: ShapeLabel::Circle, score: circle_score },
    ShapeRule { name: "triangle", label: ShapeLabel::Triangle, score: triangle_score },
    ShapeRule { name: "square", label: ShapeLabel::Square, score: square_score },
    ShapeRule { name: "rectangle", label: ShapeLabel::Rectangle, score: rectangle_score },
    ShapeRule { name: "line", label: ShapeLabel::Line, score: line_score },
    ShapeRule { name: "unresolved", label: ShapeLabel::Unknown, score: unresolved_score },
];

/// Rule-table classifier; the first matching rule wins
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    pub rules: Vec<ShapeRule>,
    pub min_points: usize,
}

impl HeuristicClassifier {
    pub fn with_rules(rules: Vec<ShapeRule>) -> Self {
        Self { rules, ..Self::default() }
    }

    /// The first matching rule, if any
    pub fn matching_rule(&self, features: &StrokeFeatures) -> Option<(&ShapeRule, f64)> {
        self.rules
            .iter()
            .find_map(|rule| (rule.score)(features).map(|confidence| (rule, confidence)))
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
            min_points: MIN_CLASSIFY_POINTS,
        }
    }
}

impl ShapeClassifier for HeuristicClassifier {
    fn classify(&self, points: &[Point]) -> Classification {
        if points.len() < self.min_points {
            return Classification::unknown();
        }
        let Some(features) = StrokeFeatures::measure(points) else {
            return Classification::unknown();
        };

        match self.matching_rule(&features) {
            Some((rule, confidence)) => Classification::new(rule.label, confidence.clamp(0.0, 1.0)),
            None => Classification::unknown(),
        }
    }
}
