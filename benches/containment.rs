//! Point-in-polygon and zone filtering throughput.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo::{LineString, Polygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trackway::prelude::*;
use trackway::zones::geometry::polygon_contains;

/// A star-shaped ring around (500, 500), concave for odd vertex counts
/// above four.
fn star_polygon(vertices: usize) -> Vec<(f64, f64)> {
    (0..vertices)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / vertices as f64;
            let radius = if i % 2 == 0 { 400.0 } else { 250.0 };
            (500.0 + radius * angle.cos(), 500.0 + radius * angle.sin())
        })
        .collect()
}

fn random_points(count: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect()
}

fn bench_polygon_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_contains");
    let points = random_points(256, 7);

    for vertices in [8usize, 32, 128, 512] {
        let polygon = Polygon::new(LineString::from(star_polygon(vertices)), vec![]);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(vertices),
            &vertices,
            |bencher, _| {
                bencher.iter(|| {
                    points
                        .iter()
                        .filter(|(x, y)| polygon_contains(black_box(*x), black_box(*y), &polygon))
                        .count()
                })
            },
        );
    }

    group.finish();
}

fn bench_zone_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone_filter");

    let mut zones = ZoneSet::new();
    zones.add_inclusion_zone("roadway", &star_polygon(16));
    zones.add_exclusion_zone(
        "parked_cars",
        &[(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)],
    );
    zones.add_exclusion_zone(
        "billboard",
        &[(700.0, 600.0), (900.0, 600.0), (900.0, 800.0), (700.0, 800.0)],
    );

    for count in [10usize, 100, 1000] {
        let detections = random_points(count, 11)
            .iter()
            .map(|(x, y)| {
                let bbox = BoundingBox::new(
                    *x as f32 - 25.0,
                    *y as f32 - 15.0,
                    *x as f32 + 25.0,
                    *y as f32 + 15.0,
                )
                .unwrap();
                Detection::new(bbox, ObjectClass::Car, 0.9).unwrap()
            })
            .collect::<Vec<_>>();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |bencher, _| {
            bencher.iter(|| zones.filter(black_box(&detections)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_polygon_contains, bench_zone_filter);
criterion_main!(benches);
