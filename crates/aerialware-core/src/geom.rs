use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Straight segment between two points (pixel or geographic).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
}

impl Segment {
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.a, &self.b)
    }

    /// Same segment traversed from `b` to `a`.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Intersection of the infinite lines through `self` and `other`.
    #[inline]
    pub fn line_intersection(&self, other: &Segment) -> Option<Point2<f64>> {
        intersect_lines(self.a, self.b, other.a, other.b)
    }
}

/// Intersection of the line through `p1, p2` with the line through `p3, p4`.
///
/// Returns `None` for parallel (or coincident) lines and for non-finite results.
pub fn intersect_lines(
    p1: Point2<f64>,
    p2: Point2<f64>,
    p3: Point2<f64>,
    p4: Point2<f64>,
) -> Option<Point2<f64>> {
    let divider = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if divider == 0.0 || !divider.is_finite() {
        return None;
    }
    let d12 = p1.x * p2.y - p1.y * p2.x;
    let d34 = p3.x * p4.y - p3.y * p4.x;
    let x = (d12 * (p3.x - p4.x) - (p1.x - p2.x) * d34) / divider;
    let y = (d12 * (p3.y - p4.y) - (p1.y - p2.y) * d34) / divider;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Point2::new(x, y))
}

#[inline]
fn orient(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True if the two segments cross at a single interior point.
///
/// Touching endpoints and collinear overlaps do not count.
pub fn segments_cross(s: &Segment, t: &Segment) -> bool {
    let d1 = orient(t.a, t.b, s.a);
    let d2 = orient(t.a, t.b, s.b);
    let d3 = orient(s.a, s.b, t.a);
    let d4 = orient(s.a, s.b, t.b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
