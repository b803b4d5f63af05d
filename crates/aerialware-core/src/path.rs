//! Boustrophedon ("lawnmower") coverage paths over selected cells.
//!
//! Selected cells are sorted along the chosen axis and grouped into runs that
//! share the same row (or column). Each run becomes one straight *leg* from
//! the entry side of its first cell to the exit side of its last cell.
//! Consecutive legs are joined by *turn* segments that alternate between the
//! two ends of the strip, so the aircraft flies every other leg in reverse.

use crate::geom::Segment;
use crate::grid::{Cell, CellIndex, Grid};
use crate::metrics::great_circle_length;
use crate::selection::Selection;
use crate::transform::GeoTransform;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Direction the legs run in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// One leg per row, flown west-east ("horizontal" path).
    Rows,
    /// One leg per column, flown north-south ("meridian" path).
    Columns,
}

impl Axis {
    #[inline]
    fn primary(self, index: CellIndex) -> usize {
        match self {
            Axis::Rows => index.row,
            Axis::Columns => index.col,
        }
    }

    #[inline]
    fn secondary(self, index: CellIndex) -> usize {
        match self {
            Axis::Rows => index.col,
            Axis::Columns => index.row,
        }
    }

    #[inline]
    fn entry(self, cell: &Cell) -> Point2<f64> {
        match self {
            Axis::Rows => cell.sides.left,
            Axis::Columns => cell.sides.top,
        }
    }

    #[inline]
    fn exit(self, cell: &Cell) -> Point2<f64> {
        match self {
            Axis::Rows => cell.sides.right,
            Axis::Columns => cell.sides.bottom,
        }
    }
}

/// What a path segment is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind {
    /// Imaging pass number `leg`.
    Leg { leg: usize },
    /// Connector from leg `from` to leg `to` (`to == from + 1`).
    Turn { from: usize, to: usize },
}

/// One straight piece of a flight path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub kind: SegmentKind,
    /// Endpoints in image pixels.
    pub px: Segment,
    /// Endpoints as `(longitude, latitude)` degrees. `None` when an endpoint
    /// cannot be projected (self-intersecting corners).
    pub geo: Option<Segment>,
    /// Great-circle length in meters, `0.0` without `geo`.
    pub length_m: f64,
}

impl PathSegment {
    fn project(kind: SegmentKind, px: Segment, transform: &GeoTransform) -> Self {
        let geo = match (transform.project(px.a), transform.project(px.b)) {
            (Ok(a), Ok(b)) => Some(Segment::new(a, b)),
            (Err(err), _) | (_, Err(err)) => {
                log::warn!("{kind:?}: {err}, segment left without coordinates");
                None
            }
        };
        Self {
            kind,
            px,
            geo,
            length_m: geo.map_or(0.0, |g| great_circle_length(g.a, g.b)),
        }
    }

    #[inline]
    pub fn is_leg(&self) -> bool {
        matches!(self.kind, SegmentKind::Leg { .. })
    }

    #[inline]
    pub fn is_turn(&self) -> bool {
        matches!(self.kind, SegmentKind::Turn { .. })
    }
}

/// A leg endpoint in flight order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub leg: usize,
    pub px: Point2<f64>,
    pub geo: Option<Point2<f64>>,
}

/// Coverage path along one axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    pub axis: Axis,
    /// Flight order: leg 0, turn 0->1, leg 1, turn 1->2, ...
    pub segments: Vec<PathSegment>,
    pub length_with_turns_m: f64,
    pub length_without_turns_m: f64,
}

impl FlightPath {
    pub fn empty(axis: Axis) -> Self {
        Self {
            axis,
            segments: Vec::new(),
            length_with_turns_m: 0.0,
            length_without_turns_m: 0.0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn legs(&self) -> impl Iterator<Item = &PathSegment> + '_ {
        self.segments.iter().filter(|s| s.is_leg())
    }

    pub fn turns(&self) -> impl Iterator<Item = &PathSegment> + '_ {
        self.segments.iter().filter(|s| s.is_turn())
    }

    pub fn leg_count(&self) -> usize {
        self.legs().count()
    }

    pub fn turn_count(&self) -> usize {
        self.turns().count()
    }

    /// Leg endpoints in the order they are flown, ignoring turns.
    ///
    /// `leg` is zero-based. Legs 1, 3, 5, ... are flown from their exit side
    /// back to their entry side, so their endpoints come out swapped. Counted
    /// from one these are the even legs 2, 4, 6, ...; reversing any other set
    /// would break continuity with the turns.
    pub fn waypoints(&self) -> Vec<Waypoint> {
        let mut out = Vec::with_capacity(self.leg_count() * 2);
        for seg in self.legs() {
            let SegmentKind::Leg { leg } = seg.kind else {
                continue;
            };
            let (px, geo) = if leg % 2 == 1 {
                (seg.px.reversed(), seg.geo.map(|g| g.reversed()))
            } else {
                (seg.px, seg.geo)
            };
            out.push(Waypoint {
                leg,
                px: px.a,
                geo: geo.map(|g| g.a),
            });
            out.push(Waypoint {
                leg,
                px: px.b,
                geo: geo.map(|g| g.b),
            });
        }
        out
    }
}

/// Both candidate paths for one selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightPaths {
    /// Column-wise path.
    pub meridian: FlightPath,
    /// Row-wise path.
    pub horizontal: FlightPath,
}

impl FlightPaths {
    pub fn get(&self, axis: Axis) -> &FlightPath {
        match axis {
            Axis::Rows => &self.horizontal,
            Axis::Columns => &self.meridian,
        }
    }
}

/// Resolve selected indices against the grid, skipping unknown ones.
pub(crate) fn selected_cells<'g>(grid: &'g Grid, selection: &Selection) -> Vec<&'g Cell> {
    selection
        .iter()
        .filter_map(|index| {
            let cell = grid.cell(index);
            if cell.is_none() {
                log::warn!(
                    "selected cell ({}, {}) is outside the {}x{} grid, skipping",
                    index.row,
                    index.col,
                    grid.rows(),
                    grid.cols()
                );
            }
            cell
        })
        .collect()
}

/// Plan the coverage path along `axis`.
///
/// An empty selection yields an empty path with zero length.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(grid, selection), fields(cells = selection.len()))
)]
pub fn plan_path(
    grid: &Grid,
    selection: &Selection,
    axis: Axis,
) -> FlightPath {
    let mut cells = selected_cells(grid, selection);
    cells.sort_by_key(|c| (axis.primary(c.index), axis.secondary(c.index)));

    let legs: Vec<Segment> = cells
        .chunk_by(|a, b| axis.primary(a.index) == axis.primary(b.index))
        .filter_map(|run| {
            let (first, last) = (run.first()?, run.last()?);
            Some(Segment::new(axis.entry(first), axis.exit(last)))
        })
        .collect();

    let transform = grid.transform();
    let mut path = FlightPath::empty(axis);
    for (k, leg) in legs.iter().enumerate() {
        if k > 0 {
            let prev = &legs[k - 1];
            // Odd turns join the exit ends, even turns the entry ends.
            let px = if k % 2 == 1 {
                Segment::new(prev.b, leg.b)
            } else {
                Segment::new(prev.a, leg.a)
            };
            let turn =
                PathSegment::project(SegmentKind::Turn { from: k - 1, to: k }, px, transform);
            path.length_with_turns_m += turn.length_m;
            path.segments.push(turn);
        }
        let seg = PathSegment::project(SegmentKind::Leg { leg: k }, *leg, transform);
        path.length_without_turns_m += seg.length_m;
        path.length_with_turns_m += seg.length_m;
        path.segments.push(seg);
    }

    log::debug!(
        "{:?} path: {} legs, {:.1} m without turns, {:.1} m with turns",
        axis,
        legs.len(),
        path.length_without_turns_m,
        path.length_with_turns_m
    );
    path
}

/// Plan both the meridian (column-wise) and horizontal (row-wise) paths.
pub fn compute_paths(grid: &Grid, selection: &Selection) -> FlightPaths {
    FlightPaths {
        meridian: plan_path(grid, selection, Axis::Columns),
        horizontal: plan_path(grid, selection, Axis::Rows),
    }
}
