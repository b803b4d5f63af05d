//! Grid construction over the image.
//!
//! Vertical grid lines connect a point walking along the top image edge with
//! a point walking along the bottom edge (and likewise for horizontal lines
//! along the left/right edges). Each edge has its own pixel step, so lines are
//! not necessarily parallel and skewed quadrilaterals are handled naturally.
//! Intersecting every vertical line with every horizontal one gives a lattice
//! of points; 2×2 blocks of adjacent points become [`Cell`]s.

use crate::corners::{CornerAdvisory, Corners, Delimiter, DelimiterAxis, ImageSize};
use crate::geom::Segment;
use crate::transform::{Edge, GeoTransform, PixelSteps};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Grid construction errors. All of them are recoverable by correcting the
/// inputs and rebuilding.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("image size must be non-zero (got {width}x{height})")]
    InvalidImageSize { width: u32, height: u32 },
    #[error("{axis} delimiter must be > 0")]
    InvalidDelimiter { axis: DelimiterAxis },
    #[error("corner coordinates must be finite numbers")]
    NonFiniteCorners,
    #[error("corners of the {edge} edge are at the same coordinate")]
    DegenerateCorners { edge: Edge },
    #[error("delimiter is coarser than the {edge} edge ({step_px:.1} px step > {extent_px} px)")]
    DelimiterTooCoarse {
        edge: Edge,
        step_px: f64,
        extent_px: f64,
    },
    #[error("grid lines produced no cells")]
    DegenerateGrid,
}

/// A grid line in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    /// Position index along the walking direction (0 at the left/top edge).
    pub index: usize,
    pub segment: Segment,
}

/// Vertical and horizontal grid lines, both in increasing index order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLines {
    /// Lines from the top edge (`y = 0`) to the bottom edge (`y = height`).
    pub vertical: Vec<GridLine>,
    /// Lines from the left edge (`x = 0`) to the right edge (`x = width`).
    pub horizontal: Vec<GridLine>,
}

impl GridLines {
    /// Walk both edges of each axis with their pixel steps.
    ///
    /// Walking continues while either endpoint is within half a step of the
    /// far edge, so the trailing boundary line survives floating-point drift.
    pub fn generate(image: ImageSize, steps: &PixelSteps) -> Self {
        let w = image.width_f64();
        let h = image.height_f64();
        let vertical = walk(steps.top, steps.bottom, w)
            .map(|(index, top, bottom)| GridLine {
                index,
                segment: Segment::new(Point2::new(top, 0.0), Point2::new(bottom, h)),
            })
            .collect();
        let horizontal = walk(steps.left, steps.right, h)
            .map(|(index, left, right)| GridLine {
                index,
                segment: Segment::new(Point2::new(0.0, left), Point2::new(w, right)),
            })
            .collect();
        Self {
            vertical,
            horizontal,
        }
    }
}

fn walk(step_a: f64, step_b: f64, extent: f64) -> impl Iterator<Item = (usize, f64, f64)> {
    let bound_a = extent + step_a / 2.0;
    let bound_b = extent + step_b / 2.0;
    (0usize..)
        .map(move |k| (k, k as f64 * step_a, k as f64 * step_b))
        .take_while(move |&(_, a, b)| a <= bound_a || b <= bound_b)
}

/// Row/column position of a cell in the grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Midpoints of the four cell sides, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSides {
    pub left: Point2<f64>,
    pub right: Point2<f64>,
    pub top: Point2<f64>,
    pub bottom: Point2<f64>,
}

/// One grid cell: a pixel-space quadrilateral.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub index: CellIndex,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corners: [Point2<f64>; 4],
    pub sides: CellSides,
}

impl Cell {
    pub fn new(index: CellIndex, corners: [Point2<f64>; 4]) -> Self {
        let [tl, tr, br, bl] = corners;
        let sides = CellSides {
            left: Segment::new(tl, bl).midpoint(),
            right: Segment::new(tr, br).midpoint(),
            top: Segment::new(tl, tr).midpoint(),
            bottom: Segment::new(bl, br).midpoint(),
        };
        Self {
            index,
            corners,
            sides,
        }
    }
}

/// A built grid. Owns its transform, lines and the row-major cell arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    transform: GeoTransform,
    steps: PixelSteps,
    lines: GridLines,
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    advisories: Vec<CornerAdvisory>,
}

impl Grid {
    #[inline]
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    #[inline]
    pub fn steps(&self) -> &PixelSteps {
        &self.steps
    }

    #[inline]
    pub fn lines(&self) -> &GridLines {
        &self.lines
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        if index.row >= self.rows || index.col >= self.cols {
            return None;
        }
        self.cells.get(index.row * self.cols + index.col)
    }

    /// Warnings raised while validating the corners.
    #[inline]
    pub fn advisories(&self) -> &[CornerAdvisory] {
        &self.advisories
    }

    /// True if both grids consist of exactly the same cells.
    pub fn same_cells(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

/// Validate inputs and build the grid.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(corners, delimiter), fields(width = image.width, height = image.height))
)]
pub fn build_grid(
    corners: Corners,
    delimiter: Delimiter,
    image: ImageSize,
) -> Result<Grid, GridError> {
    let steps = PixelSteps::new(&corners, &delimiter, image)?;
    let transform = GeoTransform::new(corners, image)?;
    let advisories = corners.advisories();
    for advisory in &advisories {
        log::warn!("corner advisory: {advisory:?}; results may be unreliable");
    }

    let lines = GridLines::generate(image, &steps);
    let point_rows = lattice_points(&lines);
    if point_rows.is_empty() {
        return Err(GridError::DegenerateGrid);
    }

    let (rows, cols, cells) = cells_from_points(&point_rows);
    if cells.is_empty() {
        return Err(GridError::DegenerateGrid);
    }

    log::debug!(
        "grid {}x{} cells ({} vertical, {} horizontal lines), steps px: top={:.3} bottom={:.3} left={:.3} right={:.3}",
        rows,
        cols,
        lines.vertical.len(),
        lines.horizontal.len(),
        steps.top,
        steps.bottom,
        steps.left,
        steps.right
    );

    Ok(Grid {
        transform,
        steps,
        lines,
        rows,
        cols,
        cells,
        advisories,
    })
}

/// Lattice points, one row per horizontal line. Rows with no intersections
/// are dropped; the rest are cut to their common length.
fn lattice_points(lines: &GridLines) -> Vec<Vec<Point2<f64>>> {
    let mut rows: Vec<Vec<Point2<f64>>> = lines
        .horizontal
        .iter()
        .map(|h| {
            lines
                .vertical
                .iter()
                .filter_map(|v| v.segment.line_intersection(&h.segment))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    let width = rows.iter().map(Vec::len).min().unwrap_or(0);
    for row in &mut rows {
        row.truncate(width);
    }
    rows
}

fn cells_from_points(point_rows: &[Vec<Point2<f64>>]) -> (usize, usize, Vec<Cell>) {
    let rows = point_rows.len().saturating_sub(1);
    let cols = point_rows
        .first()
        .map(|r| r.len().saturating_sub(1))
        .unwrap_or(0);
    if rows == 0 || cols == 0 {
        return (0, 0, Vec::new());
    }

    let mut cells = Vec::with_capacity(rows * cols);
    for i in 1..point_rows.len() {
        let above = &point_rows[i - 1];
        let below = &point_rows[i];
        for j in 1..below.len() {
            cells.push(Cell::new(
                CellIndex::new(i - 1, j - 1),
                [above[j - 1], above[j], below[j], below[j - 1]],
            ));
        }
    }
    (rows, cols, cells)
}
