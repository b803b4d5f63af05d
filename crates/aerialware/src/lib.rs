//! Aerial photography mission planning over a georeferenced image.
//!
//! This crate provides:
//! - re-exports of the pure geometry in `aerialware-core`
//! - a [`Session`] that enforces the workflow order and discards derived
//!   results whenever an input changes
//! - parsing of raw text fields ([`CornerFields`], [`CameraFields`])
//! - JSON mission configs and reports ([`MissionConfig`], [`MissionReport`])
//!
//! ## Quickstart
//!
//! ```
//! use aerialware::core::{CameraInputs, CellIndex, Corners, Delimiter, ImageSize};
//! use aerialware::Session;
//!
//! # fn main() -> Result<(), aerialware::SessionError> {
//! let corners = Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]);
//! let mut session = Session::new(ImageSize::new(1000, 1000))?;
//! session.set_inputs(corners, Delimiter::new(0.1, 0.1))?;
//! session.build_grid()?;
//! session.toggle_cell(CellIndex::new(0, 0))?;
//! let paths = session.compute_paths()?;
//! assert_eq!(paths.horizontal.leg_count(), 1);
//! session.compute_metrics(CameraInputs {
//!     ground_resolution_m_per_px: 0.5,
//!     flight_height_m: 1000.0,
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `aerialware::core`: corners, grid, selection, paths and metrics.
//! - [`session`]: the stateful workflow.
//! - [`input`]: form-field parsing.
//! - [`io`]: JSON config/report and the one-shot [`plan_mission`].

pub use aerialware_core as core;

pub use aerialware_core::{
    Axis, CameraInputs, CameraParams, CellIndex, Corners, Delimiter, FlightPath, FlightPaths,
    Grid, GridError, ImageSize, Selection,
};

pub mod input;
pub mod io;
pub mod session;

pub use input::{CameraFields, CornerFields, InputError};
pub use io::{
    plan_mission, GridSummary, MissionConfig, MissionIoError, MissionReport, PathReport,
    SelectionKeyword, SelectionSpec,
};
pub use session::{Session, SessionError, Stage};
