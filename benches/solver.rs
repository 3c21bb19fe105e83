use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fast_steiner::graph::Adjacency;
use fast_steiner::{dijkstra, solve, DijkstraScratch, SolverOptions, SteinerIndex, SteinerInstance};

/// A connected random instance: a spanning cycle plus random chords.
fn random_instance(n: usize, extra_edges: usize, k: usize, seed: u64) -> SteinerInstance {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut inst = SteinerInstance::new(n);
    for v in 0..n {
        inst.add_edge(v, (v + 1) % n, rng.gen_range(1..100)).unwrap();
    }
    for _ in 0..extra_edges {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u != v {
            inst.add_edge(u, v, rng.gen_range(1..100)).unwrap();
        }
    }
    let mut terminals: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        terminals.swap(i, rng.gen_range(0..=i));
    }
    for &t in terminals.iter().take(k) {
        inst.add_terminal(t).unwrap();
    }
    inst
}

fn bench_dijkstra(c: &mut Criterion) {
    let inst = random_instance(10_000, 30_000, 2, 1);
    let index = SteinerIndex::build(&inst, 1).unwrap();
    let mut scratch = DijkstraScratch::new(index.universe());
    c.bench_function("dijkstra_10k_40k", |b| {
        b.iter(|| dijkstra(&index, 0, &mut scratch));
    });
}

fn bench_emv(c: &mut Criterion) {
    let inst = random_instance(300, 900, 8, 2);
    c.bench_function("emv_300v_8t", |b| {
        b.iter_batched(
            || SteinerIndex::build(&inst, 4).unwrap(),
            |mut index| {
                let opts = SolverOptions::new().with_workers(4);
                solve(&mut index, &opts).unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_dijkstra, bench_emv);
criterion_main!(benches);
