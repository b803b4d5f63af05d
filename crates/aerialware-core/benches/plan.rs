use aerialware_core::{build_grid, compute_paths, Corners, Delimiter, ImageSize, Selection};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn skewed_corners() -> Corners {
    Corners::from_lon_lat([37.50, 55.80], [37.70, 55.82], [37.48, 55.70], [37.71, 55.69])
}

fn bench_build_grid(c: &mut Criterion) {
    let image = ImageSize::new(6000, 4000);
    let delimiter = Delimiter::new(0.002, 0.002);
    c.bench_function("build_grid_100x50", |b| {
        b.iter(|| build_grid(black_box(skewed_corners()), delimiter, image).expect("grid"))
    });
}

fn bench_paths(c: &mut Criterion) {
    let grid = build_grid(
        skewed_corners(),
        Delimiter::new(0.002, 0.002),
        ImageSize::new(6000, 4000),
    )
    .expect("grid");
    let all = Selection::all(&grid);
    c.bench_function("compute_paths_all_cells", |b| {
        b.iter(|| compute_paths(black_box(&grid), black_box(&all)))
    });
}

criterion_group!(benches, bench_build_grid, bench_paths);
criterion_main!(benches);
