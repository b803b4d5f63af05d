//! Great-circle lengths and camera parameters derived from the selection.

use crate::grid::Grid;
use crate::path::selected_cells;
use crate::selection::Selection;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`great_circle_length`], in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two `(longitude, latitude)` points
/// given in degrees.
pub fn great_circle_length(p1: Point2<f64>, p2: Point2<f64>) -> f64 {
    let phi1 = p1.y.to_radians();
    let phi2 = p2.y.to_radians();
    let d_phi = (p2.y - p1.y).to_radians();
    let d_lambda = (p2.x - p1.x).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Largest ground extent covered by a single selected cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageExtent {
    /// Longest top edge of a cell bounding box, in meters.
    pub max_horizontal_m: f64,
    /// Longest right edge of a cell bounding box, in meters.
    pub max_vertical_m: f64,
}

/// For each selected cell, project its corners, take the geographic bounding
/// box and measure its top and right edges. Maxima are tracked independently.
///
/// Corners that cannot be projected (self-intersecting corner layouts) are
/// left out of their cell's box; a cell with no projectable corner is skipped.
pub fn coverage_extent(grid: &Grid, selection: &Selection) -> CoverageExtent {
    let transform = grid.transform();
    let mut extent = CoverageExtent::default();
    for cell in selected_cells(grid, selection) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut projected = 0;
        for &corner in &cell.corners {
            let g = match transform.project(corner) {
                Ok(g) => g,
                Err(err) => {
                    log::warn!(
                        "cell ({}, {}): {err}, corner left out of the extent",
                        cell.index.row,
                        cell.index.col
                    );
                    continue;
                }
            };
            projected += 1;
            min.x = min.x.min(g.x);
            min.y = min.y.min(g.y);
            max.x = max.x.max(g.x);
            max.y = max.y.max(g.y);
        }
        if projected == 0 {
            continue;
        }
        let top_left = Point2::new(min.x, max.y);
        let top_right = Point2::new(max.x, max.y);
        let bottom_right = Point2::new(max.x, min.y);
        extent.max_horizontal_m = extent
            .max_horizontal_m
            .max(great_circle_length(top_left, top_right));
        extent.max_vertical_m = extent
            .max_vertical_m
            .max(great_circle_length(top_right, bottom_right));
    }
    extent
}

/// Camera sensor size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraResolution {
    pub width_px: u64,
    pub height_px: u64,
}

/// Sensor resolution needed to cover the extent at `m_per_px`.
///
/// A non-positive ground resolution yields `0 x 0`.
pub fn camera_resolution(max_horizontal_m: f64, max_vertical_m: f64, m_per_px: f64) -> CameraResolution {
    if !(m_per_px > 0.0) {
        return CameraResolution::default();
    }
    CameraResolution {
        width_px: (max_horizontal_m / m_per_px).floor() as u64,
        height_px: (max_vertical_m / m_per_px).floor() as u64,
    }
}

/// Focal length in millimeters for the given flight height and ground
/// resolution. A non-positive ground resolution yields `0`.
pub fn focal_length(flight_height_m: f64, m_per_px: f64) -> f64 {
    if !(m_per_px > 0.0) {
        return 0.0;
    }
    flight_height_m / (m_per_px * 1000.0)
}

/// Camera inputs entered by the user.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraInputs {
    /// Desired ground resolution, meters per pixel.
    pub ground_resolution_m_per_px: f64,
    pub flight_height_m: f64,
}

/// Derived camera and flight parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub max_width_m: f64,
    pub max_height_m: f64,
    pub ground_resolution_m_per_px: f64,
    pub camera: CameraResolution,
    pub flight_height_m: f64,
    pub focal_length_mm: f64,
}

pub fn compute_camera_params(
    grid: &Grid,
    selection: &Selection,
    inputs: CameraInputs,
) -> CameraParams {
    let extent = coverage_extent(grid, selection);
    let res = inputs.ground_resolution_m_per_px;
    CameraParams {
        max_width_m: extent.max_horizontal_m,
        max_height_m: extent.max_vertical_m,
        ground_resolution_m_per_px: res,
        camera: camera_resolution(extent.max_horizontal_m, extent.max_vertical_m, res),
        flight_height_m: inputs.flight_height_m,
        focal_length_mm: focal_length(inputs.flight_height_m, res),
    }
}
