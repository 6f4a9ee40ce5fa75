//! Minimax benchmarks.
//!
//! Run with: `cargo bench -p minimax`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine_core::{Board, BoardGeometry, Player, PropagationEngine, ReferenceEngine};
use minimax::{MaterialHeuristic, MinimaxConfig, MinimaxScorer, MinimaxSearch, PositionalHeuristic};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn standard_engine() -> ReferenceEngine {
    ReferenceEngine::new(Arc::new(BoardGeometry::new(9, 6).unwrap()))
}

fn random_position(engine: &ReferenceEngine, plies: usize, seed: u64) -> (Board, Player) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut board = Board::empty(engine.geometry().len());
    let mut player = Player::First;

    for _ in 0..plies {
        let moves = engine.valid_moves(&board, player);
        let Some(&cell) = moves.choose(&mut rng) else {
            break;
        };
        if engine.apply(&mut board, cell, player) {
            break;
        }
        player = player.opponent();
    }

    (board, player)
}

fn bench_search_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax_depth");
    group.sample_size(10);
    let engine = standard_engine();

    for plies in [4, 20] {
        let (board, player) = random_position(&engine, plies, 11);
        for depth in [1u32, 2] {
            group.bench_with_input(
                BenchmarkId::new(format!("plies_{plies}"), depth),
                &depth,
                |b, &depth| {
                    let mut rng = ChaCha20Rng::seed_from_u64(0);
                    b.iter(|| {
                        let mut search = MinimaxSearch::new(
                            &engine,
                            &PositionalHeuristic,
                            MinimaxConfig::new(depth, 3),
                        )
                        .unwrap();
                        black_box(search.run(&board, player, &mut rng).unwrap())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax_heuristic");
    let engine = standard_engine();
    let (board, player) = random_position(&engine, 30, 5);

    group.bench_function("positional", |b| {
        b.iter(|| black_box(PositionalHeuristic.score(engine.geometry(), &board, player)))
    });
    group.bench_function("material", |b| {
        b.iter(|| black_box(MaterialHeuristic.score(engine.geometry(), &board, player)))
    });

    group.finish();
}

criterion_group!(benches, bench_search_depth, bench_heuristics);
criterion_main!(benches);
