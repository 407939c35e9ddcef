use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use facility_core::{FacilityGenerator, Pathfinder, Point};

fn bench_find_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path");

    for size in [32i32, 64, 128] {
        let facility = FacilityGenerator::new(1234)
            .generate(size, size)
            .expect("valid dimensions");
        let map = facility.map;
        let start = facility.spawn;
        let target = map
            .rooms
            .last()
            .map(|room| room.center())
            .unwrap_or(Point::new(size / 2, size / 2));

        group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, _| {
            let mut pathfinder = Pathfinder::new(map.width, map.height);
            b.iter(|| pathfinder.find_path(&map, start, target));
        });
    }

    group.finish();
}

criterion_group!(path_benches, bench_find_path);
criterion_main!(path_benches);
