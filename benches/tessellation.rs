use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shape_scene::convert::solid_to_mesh;
use shape_scene::demo::create_figure_scene;
use shape_scene::kernel::{Tolerance, Workplane};
use shape_scene::mesh::{concatenate, icosphere};
use shape_scene::StlExporter;

/// Benchmark: Sphere tessellation at both deflection presets
fn bench_sphere_tessellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_tessellation");

    for radius in [1.0, 5.0, 25.0].iter() {
        let solid = Workplane::xy().sphere(*radius).unwrap();
        group.bench_with_input(BenchmarkId::new("coarse", radius), radius, |b, _| {
            b.iter(|| black_box(solid_to_mesh(&solid, Tolerance::COARSE).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("fine", radius), radius, |b, _| {
            b.iter(|| black_box(solid_to_mesh(&solid, Tolerance::FINE).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: Icosphere subdivision levels used by the organic strategy
fn bench_icosphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("icosphere");

    for level in [1u32, 3, 5].iter() {
        group.bench_with_input(BenchmarkId::new("subdivisions", level), level, |b, &level| {
            b.iter(|| black_box(icosphere(level, 1.0).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: Concatenating many meshes into one export mesh
fn bench_concatenation(c: &mut Criterion) {
    let mut group = c.benchmark_group("concatenation");
    let part = icosphere(3, 1.0).unwrap();

    for count in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("meshes", count), count, |b, &count| {
            b.iter(|| {
                let meshes = vec![part.clone(); count];
                black_box(concatenate(meshes).triangle_count())
            })
        });
    }

    group.finish();
}

/// Benchmark: Building, tessellating and combining the reference figure
fn bench_figure_scene(c: &mut Criterion) {
    c.bench_function("figure_scene_meshes", |b| {
        b.iter(|| {
            let mut scene = create_figure_scene().unwrap();
            let combined = StlExporter::combine_meshes(scene.meshes().unwrap()).unwrap();
            black_box(combined.triangle_count())
        })
    });
}

criterion_group!(
    benches,
    bench_sphere_tessellation,
    bench_icosphere,
    bench_concatenation,
    bench_figure_scene,
);

criterion_main!(benches);
