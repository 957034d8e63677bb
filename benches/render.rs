use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxscape::{Capability, Heightmap, LookupTables, Quality, Renderer, Surface};

fn hills() -> Heightmap {
    Heightmap::from_fn(|x, y| {
        let fx = x as f32 / 41.0;
        let fy = y as f32 / 67.0;
        (120.0 + 70.0 * fx.sin() * fy.cos() + 30.0 * (fx * 0.4 + fy).sin()) as u8
    })
}

fn benchmark_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    group.sample_size(10);
    group.bench_function("build", |b| b.iter(|| black_box(LookupTables::new())));
    group.finish();
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    let tables = Arc::new(LookupTables::new());
    let heightmap = hills();
    let texture = Surface::filled(1024, 1024, 0xff44_8833);
    let sky = Surface::filled(1920, 100, 0xff64_95ed);

    for quality in [Quality::Low, Quality::Medium, Quality::High] {
        for (name, effects) in [("plain", false), ("effects", true)] {
            group.bench_with_input(
                BenchmarkId::new(name, quality),
                &quality,
                |b, &quality| {
                    let mut frame = Surface::new(320, 200, 4).unwrap();
                    let mut renderer = Renderer::with_tables(&mut frame, tables.clone()).unwrap();
                    renderer.set_heightmap(&heightmap);
                    renderer.set_texturemap(&texture).unwrap();
                    renderer.set_sky(&sky).unwrap();
                    renderer.set_quality(quality);
                    if effects {
                        renderer.enable(Capability::Fog);
                        renderer.enable(Capability::ReflectionMap);
                        renderer.enable(Capability::Smooth);
                    }
                    b.iter(|| renderer.render());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_tables, benchmark_frame);
criterion_main!(benches);
