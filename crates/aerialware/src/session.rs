//! Mutable workflow state owned by a front end.
//!
//! The session is the single "current state" slot. Every mutation discards
//! whatever was derived from the changed input; nothing is updated
//! incrementally. Core computations stay pure and are called from here.

use aerialware_core::{
    build_grid, compute_camera_params, compute_paths, CameraInputs, CameraParams, CellIndex,
    CornerAdvisory, Corners, Delimiter, FlightPaths, Grid, GridError, ImageSize, PixelSteps,
    Selection,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Workflow stages, in the order they are reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ImageLoaded,
    CornersValidated,
    GridBuilt,
    CellsSelected,
    PathsComputed,
    MetricsComputed,
}

/// Errors returned by [`Session`] operations. None of them change state.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("operation needs stage {needed:?}, session is at {current:?}")]
    NotReady { needed: Stage, current: Stage },
    #[error("no cells selected")]
    EmptySelection,
    #[error("cell ({row}, {col}) is not part of the grid")]
    UnknownCell { row: usize, col: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Planning session for one image.
#[derive(Clone, Debug)]
pub struct Session {
    image: ImageSize,
    inputs: Option<(Corners, Delimiter)>,
    grid: Option<Grid>,
    // Last discarded grid, kept to decide whether the selection survives.
    previous_grid: Option<Grid>,
    selection: Selection,
    paths: Option<FlightPaths>,
    camera: Option<CameraParams>,
}

impl Session {
    /// Start a session for a loaded image.
    pub fn new(image: ImageSize) -> Result<Self, SessionError> {
        image.validate()?;
        Ok(Self {
            image,
            inputs: None,
            grid: None,
            previous_grid: None,
            selection: Selection::new(),
            paths: None,
            camera: None,
        })
    }

    pub fn stage(&self) -> Stage {
        if self.camera.is_some() {
            Stage::MetricsComputed
        } else if self.paths.is_some() {
            Stage::PathsComputed
        } else if self.grid.is_some() && !self.selection.is_empty() {
            Stage::CellsSelected
        } else if self.grid.is_some() {
            Stage::GridBuilt
        } else if self.inputs.is_some() {
            Stage::CornersValidated
        } else {
            Stage::ImageLoaded
        }
    }

    fn require(&self, needed: Stage) -> Result<(), SessionError> {
        let current = self.stage();
        if current < needed {
            return Err(SessionError::NotReady { needed, current });
        }
        Ok(())
    }

    #[inline]
    pub fn image(&self) -> ImageSize {
        self.image
    }

    #[inline]
    pub fn inputs(&self) -> Option<&(Corners, Delimiter)> {
        self.inputs.as_ref()
    }

    #[inline]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn paths(&self) -> Option<&FlightPaths> {
        self.paths.as_ref()
    }

    #[inline]
    pub fn camera_params(&self) -> Option<&CameraParams> {
        self.camera.as_ref()
    }

    /// Replace the image. Everything derived from the old one is dropped.
    pub fn set_image(&mut self, image: ImageSize) -> Result<(), SessionError> {
        *self = Self::new(image)?;
        Ok(())
    }

    /// Validate corner coordinates and grid spacing against the image.
    ///
    /// On success the grid and everything after it is invalidated. Returns
    /// non-blocking advisories about the corner layout.
    pub fn set_inputs(
        &mut self,
        corners: Corners,
        delimiter: Delimiter,
    ) -> Result<Vec<CornerAdvisory>, SessionError> {
        PixelSteps::new(&corners, &delimiter, self.image)?;
        self.inputs = Some((corners, delimiter));
        if let Some(grid) = self.grid.take() {
            self.previous_grid = Some(grid);
        }
        self.invalidate_paths();
        Ok(corners.advisories())
    }

    /// Build the grid from the validated inputs.
    ///
    /// The selection is kept only if the new grid has exactly the same cells
    /// as the previous one.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    pub fn build_grid(&mut self) -> Result<&Grid, SessionError> {
        self.require(Stage::CornersValidated)?;
        let Some((corners, delimiter)) = self.inputs else {
            return Err(SessionError::NotReady {
                needed: Stage::CornersValidated,
                current: self.stage(),
            });
        };
        let grid = build_grid(corners, delimiter, self.image)?;

        let old = self.grid.take().or_else(|| self.previous_grid.take());
        let selection = std::mem::take(&mut self.selection);
        self.selection = match &old {
            Some(old) => selection.carry_over(old, &grid),
            None => Selection::new(),
        };
        self.previous_grid = None;
        self.invalidate_paths();
        log::info!(
            "grid built: {} rows x {} cols, {} cells kept selected",
            grid.rows(),
            grid.cols(),
            self.selection.len()
        );
        Ok(self.grid.insert(grid))
    }

    fn grid_cell(&self, index: CellIndex) -> Result<CellIndex, SessionError> {
        let grid = self.grid.as_ref().ok_or(SessionError::NotReady {
            needed: Stage::GridBuilt,
            current: self.stage(),
        })?;
        grid.cell(index)
            .map(|c| c.index)
            .ok_or(SessionError::UnknownCell {
                row: index.row,
                col: index.col,
            })
    }

    /// Toggle a cell. Returns `true` if it is selected afterwards.
    pub fn toggle_cell(&mut self, index: CellIndex) -> Result<bool, SessionError> {
        let index = self.grid_cell(index)?;
        self.invalidate_paths();
        Ok(self.selection.toggle(index))
    }

    /// Select a cell (no-op if already selected).
    pub fn select_cell(&mut self, index: CellIndex) -> Result<(), SessionError> {
        let index = self.grid_cell(index)?;
        if self.selection.insert(index) {
            self.invalidate_paths();
        }
        Ok(())
    }

    pub fn select_all(&mut self) -> Result<(), SessionError> {
        self.require(Stage::GridBuilt)?;
        if let Some(grid) = &self.grid {
            self.selection = Selection::all(grid);
        }
        self.invalidate_paths();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.invalidate_paths();
    }

    /// Compute both flight paths for the current selection.
    pub fn compute_paths(&mut self) -> Result<&FlightPaths, SessionError> {
        let grid = self.grid.as_ref().ok_or(SessionError::NotReady {
            needed: Stage::CellsSelected,
            current: self.stage(),
        })?;
        if self.selection.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let paths = compute_paths(grid, &self.selection);
        self.camera = None;
        Ok(self.paths.insert(paths))
    }

    /// Derive camera parameters. Requires computed paths.
    pub fn compute_metrics(&mut self, inputs: CameraInputs) -> Result<&CameraParams, SessionError> {
        self.require(Stage::PathsComputed)?;
        if self.selection.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let Some(grid) = self.grid.as_ref() else {
            return Err(SessionError::NotReady {
                needed: Stage::PathsComputed,
                current: self.stage(),
            });
        };
        let params = compute_camera_params(grid, &self.selection, inputs);
        Ok(self.camera.insert(params))
    }

    fn invalidate_paths(&mut self) {
        self.paths = None;
        self.camera = None;
    }
}
