//! Property tests over seeded random boards.
//!
//! Every case is driven by a fixed `SmallRng` seed so failures reproduce.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use swapsolve::board::{Board, Cell, Path, Tile, TileType, ALL_COLORS};
use swapsolve::eval::{color_combo_ceiling, max_achievable_combo};
use swapsolve::movegen::{replay, standard_constraints, Constraints};
use swapsolve::protocol::notation::{encode_board, parse_board};
use swapsolve::resolve::{resolve, Resolver};
use swapsolve::scoring::ScoringChain;
use swapsolve::search::{
    exhaustive_search, ida_star_search, Candidate, IdaConfig, MoveCost, PureColorPolicy, SearchStrategy,
    StopCheck,
};

fn random_board(rng: &mut SmallRng, width: usize, height: usize, unknown_rate: f64) -> Board {
    let cells = (0..width * height)
        .map(|_| {
            if rng.gen_bool(unknown_rate) {
                Tile::UNKNOWN
            } else {
                Tile::new(ALL_COLORS[rng.gen_range(0..ALL_COLORS.len())])
            }
        })
        .collect();
    Board::new(width, height, cells).unwrap()
}

/// Drags from a random start through `len` random on-board moves.
fn random_path(rng: &mut SmallRng, board: &Board, constraints: &Constraints, len: usize) -> Path {
    let start = Cell::new(rng.gen_range(0..board.width()), rng.gen_range(0..board.height()));
    let mut work = board.clone();
    let mut path = Path::new(start);
    let mut from = start;
    for i in 0..len {
        let moves = constraints.legal_moves(&work, start, &path.moves, from, len - i - 1);
        if moves.is_empty() {
            break;
        }
        let (dir, to) = moves.as_slice()[rng.gen_range(0..moves.len())];
        work.swap(from, to);
        path.moves.push(dir);
        from = to;
    }
    path
}

#[test]
fn resolution_is_a_fixed_point() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut resolver = Resolver::new();
    for _ in 0..300 {
        let board = random_board(&mut rng, 6, 5, 0.05);
        let settled = resolver.resolve(&board).board;
        let again = resolver.resolve(&settled);
        assert!(again.combos.is_empty(), "{}", encode_board(&board));
        assert_eq!(again.board, settled);
    }
}

#[test]
fn boards_without_runs_are_untouched() {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut resolver = Resolver::new();
    let mut checked = 0;
    while checked < 50 {
        let board = random_board(&mut rng, 7, 6, 0.0);
        if !resolver.first_batch(&board).is_empty() {
            continue;
        }
        let resolution = resolver.resolve(&board);
        assert!(resolution.combos.is_empty());
        assert_eq!(resolution.board, board);
        checked += 1;
    }
}

#[test]
fn unknown_cells_never_match() {
    let mut rng = SmallRng::seed_from_u64(23);
    let mut resolver = Resolver::new();
    for _ in 0..300 {
        let board = random_board(&mut rng, 6, 5, 0.3);
        for combo in resolver.first_batch(&board) {
            assert!(combo.kind.is_color());
            for cell in combo.cell_list(board.layout()) {
                assert_eq!(board.get(cell).kind, combo.kind);
            }
        }
    }
}

#[test]
fn combo_ceiling_is_monotone() {
    for n in 0..20 {
        assert!(color_combo_ceiling(n) <= color_combo_ceiling(n + 1), "at {}", n);
    }
}

#[test]
fn single_colour_board_has_one_combo_ceiling() {
    let board = Board::filled(6, 5, Tile::new(TileType::Dark)).unwrap();
    assert_eq!(max_achievable_combo(&board), 1);
}

#[test]
fn top_row_triple_clears_in_place() {
    let board = parse_board("RRRBGL/BGLDHB/GLDHBG/LDHBGL/DHBGLD").unwrap();
    let resolution = resolve(&board);
    assert_eq!(resolution.combos.len(), 1);
    let combo = resolution.combos[0];
    assert_eq!(combo.kind, TileType::Fire);
    assert_eq!(combo.size(), 3);
    assert_eq!(combo.batch, 0);
    assert_eq!(encode_board(&resolution.board), "???BGL/BGLDHB/GLDHBG/LDHBGL/DHBGLD");
}

#[test]
fn replay_equals_direct_application() {
    let mut rng = SmallRng::seed_from_u64(99);
    let constraint_sets = [
        Constraints::new(),
        standard_constraints(false, true, false),
        standard_constraints(true, true, true),
    ];
    for _ in 0..200 {
        let board = random_board(&mut rng, 6, 5, 0.0);
        for constraints in &constraint_sets {
            let len = rng.gen_range(0..12);
            let path = random_path(&mut rng, &board, constraints, len);
            let replayed = replay(&board, &path, constraints).unwrap();
            assert_eq!(replayed, path.applied_to(&board), "path {}", path);
        }
    }
}

#[test]
fn ida_star_reports_never_regress() {
    let mut rng = SmallRng::seed_from_u64(7);
    let constraints = standard_constraints(false, true, false);
    let config = IdaConfig {
        factor: 2,
        target_combo: Some(4),
        move_cost: MoveCost::default(),
        max_cost: 6,
        pure_color: PureColorPolicy::Skip,
    };
    for _ in 0..10 {
        let board = random_board(&mut rng, 5, 4, 0.0);
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut keys: Vec<(u32, u32)> = Vec::new();
        let mut reporter = |c: &Candidate| {
            let h = config.factor * 4u32.saturating_sub(c.combos);
            keys.push((h, config.move_cost.of_path(&c.path.moves)));
        };
        ida_star_search(&board, &constraints, &config, &mut check, &mut reporter);
        for pair in keys.windows(2) {
            let ((h0, g0), (h1, g1)) = (pair[0], pair[1]);
            assert!(h1 <= h0);
            if h1 == h0 {
                assert!(g1 <= g0);
            }
        }
    }
}

#[test]
fn cancelling_after_first_candidate_returns_it() {
    let mut rng = SmallRng::seed_from_u64(1234);
    for _ in 0..20 {
        let board = random_board(&mut rng, 6, 5, 0.0);
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let mut first: Option<Candidate> = None;
        let mut reporter = |c: &Candidate| {
            if first.is_none() {
                first = Some(c.clone());
                stop.store(true, Ordering::Relaxed);
            }
        };
        let result = exhaustive_search(
            &board,
            &Constraints::new(),
            &mut chain,
            5,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut reporter,
        );
        assert!(result.cancelled);
        assert!(first.is_some());
        assert_eq!(result.best, first);
    }
}

#[test]
fn reported_paths_reproduce_their_combos() {
    let mut rng = SmallRng::seed_from_u64(42);
    let constraints = standard_constraints(true, true, true);
    for _ in 0..5 {
        let board = random_board(&mut rng, 5, 4, 0.0);
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let mut seen = Vec::new();
        let mut reporter = |c: &Candidate| seen.push(c.clone());
        exhaustive_search(
            &board,
            &constraints,
            &mut chain,
            3,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut reporter,
        );
        for c in &seen {
            let after = replay(&board, &c.path, &constraints).unwrap();
            assert_eq!(resolve(&after).combo_count() as u32, c.combos, "path {}", c.path);
        }
    }
}
