//! Core geometry for planning aerial photography over a georeferenced image.
//!
//! This crate is intentionally small and purely computational. It does *not*
//! load images, render anything or keep mutable session state: every
//! operation takes explicit inputs and returns new values.
//!
//! Pipeline:
//! - [`Corners`] + [`Delimiter`] + [`ImageSize`] -> [`build_grid`] -> [`Grid`]
//! - user picks cells -> [`Selection`]
//! - [`compute_paths`] -> meridian and horizontal [`FlightPath`]s
//! - [`compute_camera_params`] -> [`CameraParams`]
//!
//! Geographic points are `Point2<f64>` with longitude in `x` and latitude in
//! `y`. Pixel points use the image convention (`y` grows downwards).

mod corners;
mod geom;
mod grid;
mod logger;
mod metrics;
mod path;
mod selection;
mod transform;

pub use corners::{CornerAdvisory, Corners, Delimiter, DelimiterAxis, GeoSides, ImageSize};
pub use geom::{intersect_lines, segments_cross, Segment};
pub use grid::{build_grid, Cell, CellIndex, CellSides, Grid, GridError, GridLine, GridLines};
pub use metrics::{
    camera_resolution, compute_camera_params, coverage_extent, focal_length, great_circle_length,
    CameraInputs, CameraParams, CameraResolution, CoverageExtent, EARTH_RADIUS_M,
};
pub use path::{
    compute_paths, plan_path, Axis, FlightPath, FlightPaths, PathSegment, SegmentKind, Waypoint,
};
pub use selection::Selection;
pub use transform::{Edge, GeoTransform, PixelSteps, UnprojectablePoint};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, verbosity_level};
