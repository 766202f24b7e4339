//! Physics benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rein2d::physics::broadphase::SpatialHashGrid;
use rein2d::physics::collider::PhysicsAabb;
use rein2d::physics::narrowphase::{circle_circle, circle_rect, detect_collision, rect_rect};
use rein2d::physics::raycast::raycast;
use rein2d::physics::rigid_body::integrate_bodies;
use rein2d::physics::solver::resolve_pairs;
use rein2d::{Collider, CollisionLayers, Transform2d};
use rein2d_bench::*;

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("broadphase/uniform_circles");
        for &n in &[100, 500, 1000, 2000] {
            let world = setup_circle_world(n);
            let mut grid = SpatialHashGrid::default();
            grid.rebuild(&world);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| grid.find_pairs(&world));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/mixed_shapes");
        for &n in &[100, 500, 1000, 2000] {
            let world = setup_mixed_world(n);
            let mut grid = SpatialHashGrid::default();
            grid.rebuild(&world);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| grid.find_pairs(&world));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/sparse");
        for &n in &[100, 500, 1000, 2000] {
            let world = setup_sparse_world(n);
            let mut grid = SpatialHashGrid::default();
            grid.rebuild(&world);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| grid.find_pairs(&world));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/cell_size");
        let world = setup_sparse_world(1000);
        for &cell_size in &[25.0f32, 50.0, 100.0, 200.0, 400.0] {
            let mut grid = SpatialHashGrid::new(cell_size);
            grid.rebuild(&world);
            group.bench_with_input(
                BenchmarkId::from_parameter(cell_size),
                &cell_size,
                |b, _| {
                    b.iter(|| grid.find_pairs(&world));
                },
            );
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/rebuild");
        for &n in &[100, 1000] {
            let world = setup_mixed_world(n);
            let mut grid = SpatialHashGrid::default();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| grid.rebuild(&world));
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("narrowphase/circle_circle");
        group.bench_function("intersecting", |b| {
            b.iter(|| circle_circle(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        });
        group.bench_function("separated", |b| {
            b.iter(|| circle_circle(Vec2::ZERO, 10.0, Vec2::new(50.0, 0.0), 10.0));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/rect_rect");
        let a = PhysicsAabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(10.0));
        let hit = PhysicsAabb::from_center_half_extents(Vec2::new(15.0, 3.0), Vec2::splat(10.0));
        let miss = PhysicsAabb::from_center_half_extents(Vec2::new(50.0, 0.0), Vec2::splat(10.0));
        group.bench_function("intersecting", |b| {
            b.iter(|| rect_rect(&a, &hit));
        });
        group.bench_function("separated", |b| {
            b.iter(|| rect_rect(&a, &miss));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/circle_rect");
        let rect = PhysicsAabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(10.0));
        group.bench_function("intersecting", |b| {
            b.iter(|| circle_rect(Vec2::new(15.0, 0.0), 10.0, &rect));
        });
        group.bench_function("center_inside", |b| {
            b.iter(|| circle_rect(Vec2::new(2.0, 1.0), 10.0, &rect));
        });
        group.bench_function("separated", |b| {
            b.iter(|| circle_rect(Vec2::new(50.0, 0.0), 10.0, &rect));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/dispatch");
        let ta = Transform2d::identity();
        let tb = Transform2d::from_xy(15.0, 0.0);

        let circle = Collider::circle(10.0).expect("positive radius");
        let rect = Collider::rectangle(20.0, 20.0).expect("valid shape");
        group.bench_function("circle_circle", |b| {
            b.iter(|| detect_collision(&circle, &ta, &circle, &tb));
        });
        group.bench_function("rect_rect", |b| {
            b.iter(|| detect_collision(&rect, &ta, &rect, &tb));
        });
        group.bench_function("rect_circle", |b| {
            b.iter(|| detect_collision(&rect, &ta, &circle, &tb));
        });
        group.bench_function("circle_rect", |b| {
            b.iter(|| detect_collision(&circle, &ta, &rect, &tb));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/batch");
        for &n in &[100, 500, 1000] {
            let pairs: Vec<_> = (0..n)
                .map(|i| {
                    let x = (i as f32) * 30.0;
                    let shape = Collider::circle(10.0).expect("positive radius");
                    let ta = Transform2d::from_xy(x, 0.0);
                    let tb = Transform2d::from_xy(x + 15.0, 0.0);
                    (shape.clone(), ta, shape, tb)
                })
                .collect();

            group.bench_with_input(BenchmarkId::from_parameter(n), &pairs, |b, pairs| {
                b.iter(|| {
                    for (sa, ta, sb, tb) in pairs {
                        detect_collision(sa, ta, sb, tb);
                    }
                });
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver/contact_count");
    for &n in &[10, 50, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || setup_contacts(n),
                |(mut world, pairs)| resolve_pairs(&mut world, &pairs),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries/raycast");
    for &n in &[100, 1000] {
        let world = setup_sparse_world(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                raycast(
                    &world,
                    Vec2::new(0.0, ARENA_SIZE * 0.5),
                    Vec2::X,
                    ARENA_SIZE,
                    CollisionLayers::ALL,
                )
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/step");
        group.sample_size(30);
        for &n in &[50, 100, 500, 1000] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut world, mut physics)| {
                        physics.step(&mut world, 1.0 / 60.0);
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/sustained_10steps");
        group.sample_size(20);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut world, mut physics)| {
                        for _ in 0..10 {
                            physics.step(&mut world, 1.0 / 60.0);
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/stages");
        let n = 500;
        let (world, physics) = setup_scene(n);

        let mut grid = SpatialHashGrid::new(physics.config().cell_size);
        grid.rebuild(&world);
        group.bench_function("broadphase_500", |b| {
            b.iter(|| grid.find_pairs(&world));
        });

        let gravity = physics.config().gravity;
        group.bench_function("integrate_500", |b| {
            b.iter_batched(
                || {
                    let (w, _) = setup_scene(n);
                    w
                },
                |mut w| integrate_bodies(&mut w, gravity, 1.0 / 60.0),
                criterion::BatchSize::LargeInput,
            );
        });
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Mass physics (continuous spawn + step)
// ---------------------------------------------------------------------------

fn bench_mass_physics(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("mass_physics/spawn_rate");
        group.sample_size(10);
        for &spawn_per_frame in &[1, 3, 10] {
            group.bench_with_input(
                BenchmarkId::from_parameter(spawn_per_frame),
                &spawn_per_frame,
                |b, &spf| {
                    b.iter_batched(
                        || setup_mass_scene(0),
                        |(mut world, mut physics)| {
                            run_mass_physics(&mut world, &mut physics, 60, spf, 0);
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("mass_physics/initial_bodies");
        group.sample_size(10);
        for &initial in &[0, 100, 500] {
            group.bench_with_input(
                BenchmarkId::from_parameter(initial),
                &initial,
                |b, &init| {
                    b.iter_batched(
                        || setup_mass_scene(init),
                        |(mut world, mut physics)| {
                            run_mass_physics(&mut world, &mut physics, 60, 3, init);
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_solver,
    bench_queries,
    bench_pipeline,
    bench_mass_physics,
);
criterion_main!(benches);
