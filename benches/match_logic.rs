use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::cascade::{
    drop_tiles, fill_board, finalize_removals, mark_matches, resolve_initial_matches,
};
use tui_match3::core::{detect, GameSession, Grid, SimpleRng};
use tui_match3::types::ShapeKind;

fn bench_detect(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    let grid = Grid::filled_random(6, 6, &mut rng).unwrap();

    c.bench_function("detect_6x6", |b| {
        b.iter(|| {
            let _ = detect(black_box(&grid));
        })
    });
}

fn bench_cascade_step(c: &mut Criterion) {
    c.bench_function("cascade_step_6x6", |b| {
        b.iter(|| {
            let mut rng = SimpleRng::new(777);
            let mut grid = Grid::filled_random(6, 6, &mut rng).unwrap();
            if let Some(matches) = detect(&grid) {
                mark_matches(&mut grid, &matches, ShapeKind::Circle);
                finalize_removals(&mut grid).unwrap();
                drop_tiles(&mut grid).unwrap();
                fill_board(&mut grid, &mut rng).unwrap();
            }
        })
    });
}

fn bench_board_init(c: &mut Criterion) {
    c.bench_function("resolve_initial_matches", |b| {
        b.iter(|| {
            let mut rng = SimpleRng::new(424242);
            let mut grid = Grid::filled_random(6, 6, &mut rng).unwrap();
            resolve_initial_matches(&mut grid, &mut rng).unwrap();
        })
    });
}

fn bench_session_tick(c: &mut Criterion) {
    let mut session = GameSession::new(12345).unwrap();

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            session.tick(black_box(16));
        })
    });
}

criterion_group!(
    benches,
    bench_detect,
    bench_cascade_step,
    bench_board_init,
    bench_session_tick
);
criterion_main!(benches);
