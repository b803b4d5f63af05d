//! Pixel -> geographic mapping and degree -> pixel step conversion.

use crate::corners::{Corners, Delimiter, GeoSides, ImageSize};
use crate::geom::intersect_lines;
use crate::grid::GridError;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Image edge, used to report which pair of corners is at fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        f.write_str(s)
    }
}

/// A pixel position the transform could not map (parallel probe lines).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("pixel ({x}, {y}) cannot be projected to geographic coordinates")]
pub struct UnprojectablePoint {
    pub x: f64,
    pub y: f64,
}

/// Degree spans of the four edges, checked for degeneracy in TL/TR, BL/BR,
/// TL/BL, TR/BR order.
fn edge_spans(corners: &Corners) -> [(Edge, f64); 4] {
    [
        (Edge::Top, (corners.top_left.x - corners.top_right.x).abs()),
        (
            Edge::Bottom,
            (corners.bottom_left.x - corners.bottom_right.x).abs(),
        ),
        (Edge::Left, (corners.top_left.y - corners.bottom_left.y).abs()),
        (
            Edge::Right,
            (corners.top_right.y - corners.bottom_right.y).abs(),
        ),
    ]
}

fn check_spans(corners: &Corners) -> Result<(), GridError> {
    if !corners.is_finite() {
        return Err(GridError::NonFiniteCorners);
    }
    for (edge, span) in edge_spans(corners) {
        if span == 0.0 {
            return Err(GridError::DegenerateCorners { edge });
        }
    }
    Ok(())
}

/// Grid spacing converted from degrees to pixels, per image edge.
///
/// A line crossed by `n` evenly pixel-spaced parallels is split into `n`
/// equal geographic segments, so a single step per edge is enough to lay
/// out the whole grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelSteps {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl PixelSteps {
    /// Compute and validate pixel steps.
    ///
    /// Fails with [`GridError::DegenerateCorners`] when an edge spans zero
    /// degrees and with [`GridError::DelimiterTooCoarse`] when a step does
    /// not fit inside the image on that edge.
    pub fn new(
        corners: &Corners,
        delimiter: &Delimiter,
        image: ImageSize,
    ) -> Result<Self, GridError> {
        image.validate()?;
        delimiter.validate()?;
        check_spans(corners)?;

        let w = image.width_f64();
        let h = image.height_f64();
        let [top, bottom, left, right] = edge_spans(corners);
        let steps = Self {
            top: w / top.1 * delimiter.longitude,
            bottom: w / bottom.1 * delimiter.longitude,
            left: h / left.1 * delimiter.latitude,
            right: h / right.1 * delimiter.latitude,
        };

        for (edge, step_px, extent_px) in [
            (Edge::Top, steps.top, w),
            (Edge::Bottom, steps.bottom, w),
            (Edge::Left, steps.left, h),
            (Edge::Right, steps.right, h),
        ] {
            if !step_px.is_finite() {
                return Err(GridError::DegenerateCorners { edge });
            }
            if step_px > extent_px {
                return Err(GridError::DelimiterTooCoarse {
                    edge,
                    step_px,
                    extent_px,
                });
            }
        }
        Ok(steps)
    }
}

/// Maps pixel positions of the image onto the geographic quadrilateral
/// spanned by its corners.
///
/// The mapping interpolates along each image edge separately and then
/// intersects the two resulting geographic lines, which keeps skewed and
/// non-rectangular quadrilaterals consistent with the grid built on them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoTransform {
    corners: Corners,
    sides: GeoSides,
    image: ImageSize,
    top_x: f64,
    bottom_x: f64,
    left_y: f64,
    right_y: f64,
}

impl GeoTransform {
    pub fn new(corners: Corners, image: ImageSize) -> Result<Self, GridError> {
        image.validate()?;
        check_spans(&corners)?;
        let w = image.width_f64();
        let h = image.height_f64();
        Ok(Self {
            sides: corners.sides(),
            top_x: (corners.top_right.x - corners.top_left.x) / w,
            bottom_x: (corners.bottom_right.x - corners.bottom_left.x) / w,
            left_y: (corners.top_left.y - corners.bottom_left.y) / h,
            right_y: (corners.top_right.y - corners.bottom_right.y) / h,
            corners,
            image,
        })
    }

    #[inline]
    pub fn corners(&self) -> &Corners {
        &self.corners
    }

    #[inline]
    pub fn image(&self) -> ImageSize {
        self.image
    }

    /// Geographic `(longitude, latitude)` of a pixel position.
    ///
    /// Returns `None` when any of the probe/side line pairs is parallel.
    pub fn px_to_deg(&self, p: Point2<f64>) -> Option<Point2<f64>> {
        let c = &self.corners;
        let s = &self.sides;

        let top_lon = c.top_left.x + self.top_x * p.x;
        let bottom_lon = c.bottom_left.x + self.bottom_x * p.x;
        let left_lat = c.top_left.y - self.left_y * p.y;
        let right_lat = c.top_right.y - self.right_y * p.y;

        let top = meridian_hit(top_lon, s.top.a, s.top.b)?;
        let bottom = meridian_hit(bottom_lon, s.bottom.a, s.bottom.b)?;
        let left = parallel_hit(left_lat, s.left.a, s.left.b)?;
        let right = parallel_hit(right_lat, s.right.a, s.right.b)?;

        intersect_lines(top, bottom, left, right)
    }

    /// Fallible form of [`GeoTransform::px_to_deg`].
    pub fn project(&self, p: Point2<f64>) -> Result<Point2<f64>, UnprojectablePoint> {
        self.px_to_deg(p)
            .ok_or(UnprojectablePoint { x: p.x, y: p.y })
    }
}

// Probe at constant longitude against a side.
#[inline]
fn meridian_hit(lon: f64, a: Point2<f64>, b: Point2<f64>) -> Option<Point2<f64>> {
    intersect_lines(Point2::new(lon, 0.0), Point2::new(lon, 1.0), a, b)
}

// Probe at constant latitude against a side.
#[inline]
fn parallel_hit(lat: f64, a: Point2<f64>, b: Point2<f64>) -> Option<Point2<f64>> {
    intersect_lines(Point2::new(0.0, lat), Point2::new(1.0, lat), a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = tol);
        assert_abs_diff_eq!(a.y, b.y, epsilon = tol);
    }

    fn skewed() -> Corners {
        Corners::from_lon_lat(
            [10.0, 50.0],
            [10.6, 50.1],
            [9.9, 49.5],
            [10.55, 49.45],
        )
    }

    #[test]
    fn image_corners_map_to_geographic_corners() {
        let image = ImageSize::new(1200, 800);
        for corners in [
            skewed(),
            Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]),
            Corners::from_lon_lat([-71.2, 42.4], [-71.0, 42.35], [-71.25, 42.3], [-70.98, 42.2]),
        ] {
            let t = GeoTransform::new(corners, image).expect("transform");
            let w = image.width_f64();
            let h = image.height_f64();
            let tol = 1e-9;
            assert_close(t.px_to_deg(Point2::new(0.0, 0.0)).unwrap(), corners.top_left, tol);
            assert_close(t.px_to_deg(Point2::new(w, 0.0)).unwrap(), corners.top_right, tol);
            assert_close(t.px_to_deg(Point2::new(0.0, h)).unwrap(), corners.bottom_left, tol);
            assert_close(t.px_to_deg(Point2::new(w, h)).unwrap(), corners.bottom_right, tol);
        }
    }

    #[test]
    fn axis_aligned_square_is_linear() {
        let corners = Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]);
        let t = GeoTransform::new(corners, ImageSize::new(1000, 1000)).expect("transform");
        let p = t.px_to_deg(Point2::new(250.0, 100.0)).expect("projected");
        assert_close(p, Point2::new(0.25, 0.9), 1e-12);
    }

    #[test]
    fn parallelogram_center_maps_to_geographic_center() {
        let corners = Corners::from_lon_lat([0.2, 2.0], [2.2, 2.0], [0.0, 1.0], [2.0, 1.0]);
        let t = GeoTransform::new(corners, ImageSize::new(400, 200)).expect("transform");
        let p = t.px_to_deg(Point2::new(200.0, 100.0)).expect("projected");
        assert_close(p, Point2::new(1.1, 1.5), 1e-12);
    }

    #[test]
    fn pixel_steps_follow_degree_ratio() {
        let corners = Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [2.0, 0.0]);
        let steps = PixelSteps::new(&corners, &Delimiter::new(0.1, 0.25), ImageSize::new(1000, 400))
            .expect("steps");
        assert_abs_diff_eq!(steps.top, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(steps.bottom, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(steps.left, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(steps.right, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn coincident_longitudes_are_degenerate() {
        let corners = Corners::from_lon_lat([5.0, 1.0], [5.0, 1.0], [5.0, 0.0], [5.0, 0.0]);
        let err = PixelSteps::new(&corners, &Delimiter::new(0.1, 0.1), ImageSize::new(100, 100))
            .unwrap_err();
        assert!(matches!(err, GridError::DegenerateCorners { edge: Edge::Top }));
        assert!(GeoTransform::new(corners, ImageSize::new(100, 100)).is_err());
    }

    #[test]
    fn step_larger_than_image_is_too_coarse() {
        let corners = Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]);
        let err = PixelSteps::new(&corners, &Delimiter::new(1.01, 0.1), ImageSize::new(1000, 1000))
            .unwrap_err();
        match err {
            GridError::DelimiterTooCoarse {
                edge,
                step_px,
                extent_px,
            } => {
                assert_eq!(edge, Edge::Top);
                assert!(step_px > extent_px);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn project_reports_the_failing_pixel() {
        // Figure eight: left and right sides cross at (0.5, 0.5), so the
        // left/right probe line collapses to a point in the image center.
        let corners = Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]);
        let t = GeoTransform::new(corners, ImageSize::new(10, 10)).expect("transform");
        let err = t.project(Point2::new(5.0, 5.0)).unwrap_err();
        assert_eq!(err, UnprojectablePoint { x: 5.0, y: 5.0 });
        assert!(t.project(Point2::new(2.0, 3.0)).is_ok());
    }
}
