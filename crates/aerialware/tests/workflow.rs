use aerialware::core::{
    great_circle_length, CameraInputs, CellIndex, CornerAdvisory, Corners, Delimiter, Edge,
    GridError, ImageSize, SegmentKind,
};
use aerialware::{Session, SessionError, Stage};
use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::Point2;

fn unit_square() -> Corners {
    Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0])
}

fn planned_session(selection: &[(usize, usize)]) -> Session {
    let mut session = Session::new(ImageSize::new(1000, 1000)).expect("session");
    let advisories = session
        .set_inputs(unit_square(), Delimiter::new(0.1, 0.1))
        .expect("inputs");
    assert!(advisories.is_empty());
    session.build_grid().expect("grid");
    if selection.is_empty() {
        session.select_all().expect("select all");
    }
    for &(row, col) in selection {
        session
            .select_cell(CellIndex::new(row, col))
            .expect("select");
    }
    session.compute_paths().expect("paths");
    session
}

#[test]
fn full_square_mission() {
    let mut session = planned_session(&[]);
    let grid = session.grid().expect("grid");
    assert_eq!((grid.rows(), grid.cols()), (10, 10));
    assert_eq!(session.selection().len(), 100);

    let paths = session.paths().expect("paths");
    let degree = great_circle_length(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
    for path in [&paths.horizontal, &paths.meridian] {
        assert_eq!(path.leg_count(), 10);
        assert_eq!(path.turn_count(), 9);
        assert_relative_eq!(path.length_without_turns_m, 10.0 * degree, max_relative = 0.01);
        assert!(path.length_with_turns_m > path.length_without_turns_m);
        assert_relative_eq!(
            path.length_with_turns_m - path.length_without_turns_m,
            9.0 * 0.1 * degree,
            max_relative = 0.01
        );
    }

    // Row path turns alternate between the east and west edges.
    let horizontal = &paths.horizontal;
    assert_eq!(
        horizontal.segments[1].kind,
        SegmentKind::Turn { from: 0, to: 1 }
    );
    assert_abs_diff_eq!(horizontal.segments[1].px.a.x, 1000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(horizontal.segments[1].px.b.x, 1000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(horizontal.segments[3].px.a.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(horizontal.segments[3].px.b.x, 0.0, epsilon = 1e-9);

    let waypoints = horizontal.waypoints();
    assert_eq!(waypoints.len(), 20);
    assert_abs_diff_eq!(waypoints[1].px.x, 1000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(waypoints[2].px.x, 1000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(waypoints[3].px.x, 0.0, epsilon = 1e-9);

    let params = *session
        .compute_metrics(CameraInputs {
            ground_resolution_m_per_px: 0.5,
            flight_height_m: 1000.0,
        })
        .expect("metrics");
    assert_eq!(session.stage(), Stage::MetricsComputed);
    assert_relative_eq!(params.max_width_m, 0.1 * degree, max_relative = 0.01);
    assert_relative_eq!(params.max_height_m, 0.1 * degree, max_relative = 0.01);
    assert_eq!(
        params.camera.width_px,
        (params.max_width_m / 0.5).floor() as u64
    );
    assert_relative_eq!(params.focal_length_mm, 2.0);
}

#[test]
fn single_cell_mission() {
    let session = planned_session(&[(4, 7)]);
    let paths = session.paths().expect("paths");
    for path in [&paths.horizontal, &paths.meridian] {
        assert_eq!(path.leg_count(), 1);
        assert_eq!(path.turn_count(), 0);
        assert_eq!(path.length_with_turns_m, path.length_without_turns_m);
        assert_relative_eq!(
            path.length_without_turns_m,
            0.1 * great_circle_length(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            max_relative = 0.01
        );
    }
}

#[test]
fn empty_selection_is_rejected() {
    let mut session = Session::new(ImageSize::new(1000, 1000)).expect("session");
    session
        .set_inputs(unit_square(), Delimiter::new(0.1, 0.1))
        .expect("inputs");
    session.build_grid().expect("grid");
    assert_eq!(
        session.compute_paths().unwrap_err(),
        SessionError::EmptySelection
    );
    assert_eq!(session.stage(), Stage::GridBuilt);
}

#[test]
fn degenerate_corners_are_rejected() {
    let mut session = Session::new(ImageSize::new(1000, 1000)).expect("session");
    let corners = Corners::from_lon_lat([0.5, 1.0], [0.5, 1.0], [0.0, 0.0], [1.0, 0.0]);
    assert_eq!(
        session
            .set_inputs(corners, Delimiter::new(0.1, 0.1))
            .unwrap_err(),
        SessionError::Grid(GridError::DegenerateCorners { edge: Edge::Top })
    );
    assert_eq!(session.stage(), Stage::ImageLoaded);
}

#[test]
fn coarse_delimiter_is_rejected() {
    let mut session = Session::new(ImageSize::new(1000, 1000)).expect("session");
    let err = session
        .set_inputs(unit_square(), Delimiter::new(2.0, 0.1))
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Grid(GridError::DelimiterTooCoarse {
            edge: Edge::Top,
            ..
        })
    ));
}

#[test]
fn figure_eight_corners_do_not_block_metrics() {
    let mut session = Session::new(ImageSize::new(100, 100)).expect("session");
    let corners = Corners::from_lon_lat([0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]);
    let advisories = session
        .set_inputs(corners, Delimiter::new(0.5, 0.5))
        .expect("inputs");
    assert_eq!(advisories, vec![CornerAdvisory::SelfIntersecting]);
    session.build_grid().expect("grid");
    session.select_all().expect("select all");
    session.compute_paths().expect("paths");
    let params = *session
        .compute_metrics(CameraInputs {
            ground_resolution_m_per_px: 1.0,
            flight_height_m: 500.0,
        })
        .expect("metrics");
    assert_eq!(session.stage(), Stage::MetricsComputed);
    assert!(params.max_width_m > 0.0);
}
