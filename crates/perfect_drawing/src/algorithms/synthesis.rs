use crate::{
    geometry::{bounding_box, centroid},
    traits::ShapeSynthesizer,
    types::{Point, ShapeLabel},
};

/// Angular step between synthesized circle samples, in degrees
const CIRCLE_STEP_DEGREES: usize = 6;

/// Regenerates canonical outlines sized to the stroke's bounding box
#[derive(Debug, Clone, Default)]
pub struct IdealShapeSynthesizer;

impl ShapeSynthesizer for IdealShapeSynthesizer {
    fn synthesize(&self, label: ShapeLabel, points: &[Point]) -> Vec<Point> {
        let (Ok(bounds), Ok(center)) = (bounding_box(points), centroid(points)) else {
            return points.to_vec();
        };
        let (min_x, min_y, max_x, max_y) = (bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y);

        match label {
            ShapeLabel::Circle => {
                let radius = bounds.width().min(bounds.height()) / 2.0;
                (0..360)
                    .step_by(CIRCLE_STEP_DEGREES)
                    .map(|degrees| {
                        let rad = (degrees as f64).to_radians();
                        Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
                    })
                    .collect()
            }
            ShapeLabel::Square => {
                let size = bounds.width().min(bounds.height());
                vec![
                    Point::new(min_x, min_y),
                    Point::new(min_x + size, min_y),
                    Point::new(min_x + size, min_y + size),
                    Point::new(min_x, min_y + size),
                    Point::new(min_x, min_y),
                ]
            }
            ShapeLabel::Rectangle => vec![
                Point::new(min_x, min_y),
                Point::new(max_x, min_y),
                Point::new(max_x, max_y),
                Point::new(min_x, max_y),
                Point::new(min_x, min_y),
            ],
            ShapeLabel::Triangle => vec![
                Point::new(center.x, min_y),
                Point::new(min_x, max_y),
                Point::new(max_x, max_y),
                Point::new(center.x, min_y),
            ],
            ShapeLabel::Line | ShapeLabel::Unknown => points.to_vec(),
        }
    }
}
