//! Contour geometry over a binary edge map.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;

/// Geometry of one external contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourShape {
    /// Enclosed area (shoelace formula over the border points).
    pub area: f64,
    /// Closed perimeter length.
    pub perimeter: f64,
    /// Area of the convex hull of the border points.
    pub hull_area: f64,
}

impl ContourShape {
    /// Measures a closed polygon.
    #[must_use]
    pub fn from_points(points: &[Point<i32>]) -> Self {
        let hull = if points.len() >= 3 {
            convex_hull(points)
        } else {
            points.to_vec()
        };
        Self {
            area: polygon_area(points),
            perimeter: closed_arc_length(points),
            hull_area: polygon_area(&hull),
        }
    }

    /// Contour area over hull area; `None` for a degenerate hull.
    #[must_use]
    pub fn solidity(&self) -> Option<f64> {
        (self.hull_area > 0.0).then(|| self.area / self.hull_area)
    }

    /// Perimeter over the square root of the area; `None` when the area is zero.
    #[must_use]
    pub fn complexity(&self) -> Option<f64> {
        (self.area > 0.0).then(|| self.perimeter / self.area.sqrt())
    }
}

/// External contours of an edge map, largest area first.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    shapes: Vec<ContourShape>,
}

impl ContourSet {
    /// Traces the outermost borders of the non-zero regions of `edges`.
    ///
    /// Holes and borders nested inside another region are ignored. Ties in
    /// area keep tracing order.
    #[must_use]
    pub fn from_edges(edges: &GrayImage) -> Self {
        let mut shapes: Vec<ContourShape> = find_contours::<i32>(edges)
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| ContourShape::from_points(&c.points))
            .collect();
        shapes.sort_by(|a, b| b.area.total_cmp(&a.area));
        Self { shapes }
    }

    /// Builds a set from already measured shapes.
    #[must_use]
    pub fn from_shapes(mut shapes: Vec<ContourShape>) -> Self {
        shapes.sort_by(|a, b| b.area.total_cmp(&a.area));
        Self { shapes }
    }

    /// Number of external contours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true when the edge map had no contours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The contour with the largest area.
    #[must_use]
    pub fn largest(&self) -> Option<&ContourShape> {
        self.shapes.first()
    }

    /// The `n` largest contours.
    #[must_use]
    pub fn largest_n(&self, n: usize) -> &[ContourShape] {
        &self.shapes[..n.min(self.shapes.len())]
    }

    /// Sum of all contour areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.shapes.iter().map(|s| s.area).sum()
    }
}

/// Absolute polygon area by the shoelace formula.
#[allow(clippy::cast_precision_loss)]
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y))
        .sum();
    twice.unsigned_abs() as f64 / 2.0
}

/// Length of the polygon including the closing segment.
fn closed_arc_length(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| {
            let dx = f64::from(q.x - p.x);
            let dy = f64::from(q.y - p.y);
            dx.hypot(dy)
        })
        .sum()
}
