use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use facility_core::{compute_fov, FacilityGenerator, TileKind};

fn bench_compute_fov(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_fov");

    for radius in [4i32, 8, 16] {
        let facility = FacilityGenerator::new(77)
            .generate(96, 96)
            .expect("valid dimensions");
        let mut map = facility.map;
        let origin = facility.spawn;
        let opaque: Vec<bool> = map
            .tiles
            .iter()
            .map(|t| t.kind == TileKind::Wall)
            .collect();
        let width = map.width;

        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, &radius| {
            b.iter(|| {
                compute_fov(&mut map, origin.x, origin.y, radius, |x, y| {
                    opaque[(y * width + x) as usize]
                })
            });
        });
    }

    group.finish();
}

criterion_group!(fov_benches, bench_compute_fov);
criterion_main!(fov_benches);
