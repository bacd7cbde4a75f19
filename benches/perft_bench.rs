use criterion::{black_box, criterion_group, criterion_main, Criterion};
use perftcheck::board::cozy::CozyPosition;
use perftcheck::board::Setup;
use perftcheck::perft::{count, count_iterative};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_cozy(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft_cozy");
    let cases = [("startpos_d3", "startpos", 3), ("kiwipete_d2", KIWIPETE, 2)];
    for (name, fen, depth) in cases {
        let mut pos = CozyPosition::parse(fen).unwrap();
        group.bench_function(format!("{name}_recursive"), |b| b.iter(|| count(black_box(&mut pos), depth).unwrap()));
        group.bench_function(format!("{name}_iterative"), |b| b.iter(|| count_iterative(black_box(&mut pos), depth).unwrap()));
    }
    group.finish();
}

#[cfg(feature = "board-pleco")]
fn bench_pleco(c: &mut Criterion) {
    use perftcheck::board::pleco::PlecoPosition;

    let mut group = c.benchmark_group("perft_pleco");
    let cases = [("startpos_d3", "startpos", 3), ("kiwipete_d2", KIWIPETE, 2)];
    for (name, fen, depth) in cases {
        let mut pos = PlecoPosition::parse(fen).unwrap();
        group.bench_function(format!("{name}_recursive"), |b| b.iter(|| count(black_box(&mut pos), depth).unwrap()));
    }
    group.finish();
}

#[cfg(not(feature = "board-pleco"))]
fn bench_pleco(_c: &mut Criterion) {}

criterion_group!(benches, bench_cozy, bench_pleco);
criterion_main!(benches);
