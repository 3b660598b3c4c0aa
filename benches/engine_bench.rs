use std::sync::atomic::AtomicBool;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use swapsolve::board::Board;
use swapsolve::eval::max_achievable_combo;
use swapsolve::movegen::standard_constraints;
use swapsolve::protocol::notation::parse_board;
use swapsolve::resolve::Resolver;
use swapsolve::scoring::ScoringChain;
use swapsolve::search::{
    exhaustive_search, ida_star_search, uct_search, IdaConfig, SearchStrategy, Silent, StopCheck,
    UctConfig,
};

/// 6x5 board with no initial run.
const STANDARD: &str = "RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL";

/// 6x5 board with a vertical run of reds in place.
const CASCADE: &str = "BGLDHB/GLRDHL/RLRHDG/RDRGHB/LDHBGL";

fn board(notation: &str) -> Board {
    parse_board(notation).unwrap()
}

fn bench_resolve_standard(c: &mut Criterion) {
    let board = board(STANDARD);
    let mut resolver = Resolver::new();
    c.bench_function("resolve_standard_no_runs", |b| {
        b.iter(|| resolver.resolve(black_box(&board)).combo_count())
    });
}

fn bench_resolve_cascade(c: &mut Criterion) {
    let board = board(CASCADE);
    let mut resolver = Resolver::new();
    c.bench_function("resolve_cascade", |b| {
        b.iter(|| resolver.resolve(black_box(&board)).combo_count())
    });
}

fn bench_resolve_in_place(c: &mut Criterion) {
    let board = board(CASCADE);
    let mut resolver = Resolver::new();
    let mut scratch = board.clone();
    c.bench_function("resolve_in_place_cascade", |b| {
        b.iter(|| {
            scratch.clone_from(black_box(&board));
            resolver.resolve_in_place(&mut scratch).len()
        })
    });
}

fn bench_max_combo(c: &mut Criterion) {
    let board = board(STANDARD);
    c.bench_function("max_achievable_combo", |b| {
        b.iter(|| max_achievable_combo(black_box(&board)))
    });
}

fn bench_exhaustive_depth3(c: &mut Criterion) {
    let board = board(STANDARD);
    let constraints = standard_constraints(true, true, true);
    c.bench_function("exhaustive_depth3", |b| {
        b.iter(|| {
            let stop = AtomicBool::new(false);
            let mut check = StopCheck::new(&stop, None);
            let mut chain = ScoringChain::combos_then_steps();
            exhaustive_search(
                black_box(&board),
                &constraints,
                &mut chain,
                3,
                SearchStrategy::Exhaustive,
                &mut check,
                &mut Silent,
            )
        })
    });
}

fn bench_ida_star(c: &mut Criterion) {
    let board = board(STANDARD);
    let constraints = standard_constraints(false, true, true);
    let config = IdaConfig {
        target_combo: Some(2),
        max_cost: 8,
        ..IdaConfig::default()
    };
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("ida_star_target2", |b| {
        b.iter(|| {
            let stop = AtomicBool::new(false);
            let mut check = StopCheck::new(&stop, None);
            ida_star_search(black_box(&board), &constraints, &config, &mut check, &mut Silent)
        })
    });
    group.finish();
}

fn bench_uct_2000(c: &mut Criterion) {
    let board = board(STANDARD);
    let constraints = standard_constraints(true, true, true);
    let config = UctConfig {
        iterations: Some(2000),
        ..UctConfig::default()
    };
    c.bench_function("uct_2000_iterations", |b| {
        b.iter(|| {
            let stop = AtomicBool::new(false);
            let mut check = StopCheck::new(&stop, None);
            uct_search(black_box(&board), &constraints, &config, 8, &mut check, &mut Silent)
        })
    });
}

fn bench_board_clone(c: &mut Criterion) {
    let board = board(STANDARD);
    c.bench_function("board_clone", |b| b.iter(|| black_box(&board).clone()));
}

criterion_group!(
    benches,
    bench_resolve_standard,
    bench_resolve_cascade,
    bench_resolve_in_place,
    bench_max_combo,
    bench_exhaustive_depth3,
    bench_ida_star,
    bench_uct_2000,
    bench_board_clone,
);
criterion_main!(benches);
