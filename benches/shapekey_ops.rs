//! Benchmarks for shape-key operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use shapekey::algo::blend::{blend_from_vertex_group, BlendOptions};
use shapekey::algo::cleanup::{clean_small_movements, CleanupOptions};
use shapekey::algo::displacement::{compute_displacements, DEFAULT_EPSILON};
use shapekey::algo::select::{select_affected_faces, select_affected_vertices};
use shapekey::prelude::*;

/// Grid mesh with a "Bulge" shape key that lifts the centre of the grid.
fn create_grid_mesh(n: usize) -> ShapeKeyMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    let centre = n as f64 / 2.0;
    let bulge: Vec<_> = vertices
        .iter()
        .map(|p| {
            let d2 = (p.x - centre).powi(2) + (p.y - centre).powi(2);
            Point3::new(p.x, p.y, (-d2 / (n as f64)).exp())
        })
        .collect();

    let mut mesh = ShapeKeyMesh::from_triangles(vertices, &faces).unwrap();
    mesh.add_shape_key("Bulge", bulge).unwrap();
    mesh
}

fn bench_selection(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let basis = &mesh.basis().unwrap().positions;
    let shape = &mesh.active_shape_key().unwrap().positions;

    c.bench_function("displacements_100x100", |b| {
        b.iter(|| compute_displacements(black_box(basis), black_box(shape)).unwrap())
    });

    let displacements = compute_displacements(basis, shape).unwrap();
    let affected = select_affected_vertices(&displacements, DEFAULT_EPSILON);
    c.bench_function("select_faces_100x100", |b| {
        b.iter(|| select_affected_faces(black_box(&affected), mesh.faces()))
    });
}

fn bench_blend(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let basis = &mesh.basis().unwrap().positions;
    let shape = &mesh.active_shape_key().unwrap().positions;
    let weights: Vec<f64> = (0..basis.len())
        .map(|i| (i % 101) as f64 / 100.0)
        .collect();

    let mut group = c.benchmark_group("blend_100x100");
    group.bench_function("parallel", |b| {
        let options = BlendOptions::default();
        b.iter(|| blend_from_vertex_group(basis, shape, &weights, &options).unwrap())
    });
    group.bench_function("sequential", |b| {
        let options = BlendOptions::default().sequential();
        b.iter(|| blend_from_vertex_group(basis, shape, &weights, &options).unwrap())
    });
    group.finish();
}

fn bench_cleanup(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let basis = &mesh.basis().unwrap().positions;
    let shape = &mesh.active_shape_key().unwrap().positions;

    c.bench_function("clean_percentage_100x100", |b| {
        let options = CleanupOptions::percentage(10.0);
        b.iter(|| clean_small_movements(basis, shape, &options).unwrap())
    });

    c.bench_function("clean_threshold_100x100", |b| {
        let options = CleanupOptions::threshold(0.01);
        b.iter(|| clean_small_movements(basis, shape, &options).unwrap())
    });
}

criterion_group!(benches, bench_selection, bench_blend, bench_cleanup);
criterion_main!(benches);
