//! JSON mission config and report helpers.

use crate::session::{Session, SessionError, Stage};
use aerialware_core::{
    CameraInputs, CameraParams, CellIndex, CornerAdvisory, Corners, Delimiter, FlightPath,
    ImageSize, PixelSteps, Waypoint,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum MissionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKeyword {
    All,
    None,
}

/// Which cells to fly over: `"all"`, `"none"` or a list of `[row, col]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionSpec {
    Keyword(SelectionKeyword),
    Cells(Vec<[usize; 2]>),
}

impl Default for SelectionSpec {
    fn default() -> Self {
        Self::Keyword(SelectionKeyword::All)
    }
}

/// Mission description read by the command-line front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionConfig {
    pub image: ImageSize,
    pub corners: Corners,
    pub delimiter: Delimiter,
    #[serde(default)]
    pub selection: SelectionSpec,
    #[serde(default)]
    pub camera: Option<CameraInputs>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl MissionConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MissionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), MissionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("aerialware_report.json"))
    }
}

/// Run the whole workflow for a config.
///
/// With an empty selection the returned session stops at
/// [`Stage::GridBuilt`]. Camera parameters are computed only when the config
/// has a `camera` section.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg)))]
pub fn plan_mission(cfg: &MissionConfig) -> Result<Session, SessionError> {
    let mut session = Session::new(cfg.image)?;
    for advisory in session.set_inputs(cfg.corners, cfg.delimiter)? {
        log::warn!("corner advisory: {advisory:?}");
    }
    session.build_grid()?;

    match &cfg.selection {
        SelectionSpec::Keyword(SelectionKeyword::All) => session.select_all()?,
        SelectionSpec::Keyword(SelectionKeyword::None) => {}
        SelectionSpec::Cells(cells) => {
            for &[row, col] in cells {
                session.select_cell(CellIndex::new(row, col))?;
            }
        }
    }
    if session.stage() < Stage::CellsSelected {
        log::info!("no cells selected, stopping after the grid");
        return Ok(session);
    }

    session.compute_paths()?;
    if let Some(camera) = cfg.camera {
        session.compute_metrics(camera)?;
    }
    Ok(session)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSummary {
    pub rows: usize,
    pub cols: usize,
    pub cells: usize,
    pub selected: Vec<CellIndex>,
    pub advisories: Vec<CornerAdvisory>,
    pub steps: PixelSteps,
}

/// A flight path together with its leg endpoints in flight order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathReport {
    #[serde(flatten)]
    pub path: FlightPath,
    pub waypoints: Vec<Waypoint>,
}

impl From<&FlightPath> for PathReport {
    fn from(path: &FlightPath) -> Self {
        Self {
            waypoints: path.waypoints(),
            path: path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionReport {
    pub config_path: String,
    pub image: ImageSize,
    pub corners: Corners,
    pub delimiter: Delimiter,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub grid: Option<GridSummary>,
    #[serde(default)]
    pub meridian: Option<PathReport>,
    #[serde(default)]
    pub horizontal: Option<PathReport>,
    #[serde(default)]
    pub camera: Option<CameraParams>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MissionReport {
    /// Build a base report from the input config.
    pub fn new(cfg: &MissionConfig, config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            image: cfg.image,
            corners: cfg.corners,
            delimiter: cfg.delimiter,
            stage: None,
            grid: None,
            meridian: None,
            horizontal: None,
            camera: None,
            error: None,
        }
    }

    /// Populate report fields from a planned session.
    pub fn set_plan(&mut self, session: &Session) {
        self.stage = Some(session.stage());
        self.grid = session.grid().map(|grid| GridSummary {
            rows: grid.rows(),
            cols: grid.cols(),
            cells: grid.cell_count(),
            selected: session.selection().iter().collect(),
            advisories: grid.advisories().to_vec(),
            steps: *grid.steps(),
        });
        self.meridian = session.paths().map(|p| PathReport::from(&p.meridian));
        self.horizontal = session.paths().map(|p| PathReport::from(&p.horizontal));
        self.camera = session.camera_params().copied();
        self.error = None;
    }

    /// Record a planning error.
    pub fn set_error(&mut self, err: &SessionError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MissionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), MissionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
