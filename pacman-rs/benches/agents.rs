use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pacman_rs::{all_factories, factory_by_name, maze_from_fixture};

pub fn corridor_benchmark(c: &mut Criterion) {
    let mut g = c.benchmark_group("Ghost Corridor");
    let (_, maze) = maze_from_fixture(include_str!("../fixtures/ghost_corridor.json")).unwrap();
    let start = maze.initial_state();

    for factory in all_factories() {
        g.bench_function(factory.name(), |b| {
            b.iter(|| {
                let mut agent = factory.create(black_box(maze.clone()));

                agent.choose_action_with_report(&start).unwrap()
            })
        });
    }

    g.finish();
}

pub fn ring_benchmark(c: &mut Criterion) {
    let mut g = c.benchmark_group("Haunted Ring");
    let (_, maze) = maze_from_fixture(include_str!("../fixtures/haunted_ring.json")).unwrap();
    let start = maze.initial_state();

    for name in ["hminimax", "astar"] {
        let factory = factory_by_name(name).unwrap();

        g.bench_function(name, |b| {
            b.iter(|| {
                let mut agent = factory.create(black_box(maze.clone()));

                agent.choose_action_with_report(&start).unwrap()
            })
        });
    }

    g.finish();
}

criterion_group!(benches, corridor_benchmark, ring_benchmark);
criterion_main!(benches);
