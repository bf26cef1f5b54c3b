use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use card_grid::{
    BreakSet, Card, CardStore, Dashboard, DashboardConfig, GridConfig, GridState, Logger,
    NullSink, Palette, Point, TextRenderer, build_drop_slots, build_rows,
};

fn mixed_state(count: usize) -> GridState {
    let cards = (0..count)
        .map(|i| {
            if i % 5 == 4 {
                Card::full(format!("full-{i}"), "Full")
            } else {
                Card::half(format!("half-{i}"), "Half", 2 + (i % 9) as i32)
            }
        })
        .collect();
    let breaks = BreakSet::from_indices((0..count).filter(|i| i % 7 == 3));
    GridState::new(CardStore::from_cards(cards).expect("unique ids"), breaks)
}

fn dashboard(count: usize) -> Dashboard {
    let config = DashboardConfig {
        grid: GridConfig::terminal(),
        grid_width_px: 107.0,
        logger: Some(Logger::new(NullSink)),
        ..DashboardConfig::default()
    };
    Dashboard::with_config(mixed_state(count), Palette::builtin(), config).expect("dashboard")
}

fn rows_and_slots(c: &mut Criterion) {
    let state = mixed_state(200);
    c.bench_function("rows_and_slots_200", |b| {
        b.iter(|| {
            let rows = build_rows(black_box(&state.cards), black_box(&state.breaks));
            build_drop_slots(&rows)
        });
    });
}

fn drag_round_trip(c: &mut Criterion) {
    c.bench_function("drag_move_200", |b| {
        b.iter_batched(
            || dashboard(200),
            |mut dashboard| {
                dashboard.begin_card_drag(&"half-0".into(), Point::new(1.0, 1.0));
                dashboard.pointer_move(Point::new(40.0, 200.0));
                dashboard.pointer_up(black_box(Point::new(40.0, 204.5)))
            },
            BatchSize::SmallInput,
        );
    });
}

fn resize_sweep(c: &mut Criterion) {
    c.bench_function("resize_sweep", |b| {
        b.iter_batched(
            || dashboard(50),
            |mut dashboard| {
                dashboard.begin_resize(&"half-0".into(), 20.0);
                for x in (0..100).map(f64::from) {
                    dashboard.pointer_move(Point::new(black_box(x), 1.0));
                }
                dashboard.pointer_up(Point::new(60.0, 1.0))
            },
            BatchSize::SmallInput,
        );
    });
}

fn render_frame(c: &mut Criterion) {
    let dashboard = dashboard(60);
    let renderer = TextRenderer::with_default();
    c.bench_function("render_frame_60", |b| {
        b.iter(|| renderer.frame(black_box(&dashboard)));
    });
}

criterion_group!(benches, rows_and_slots, drag_round_trip, resize_sweep, render_frame);
criterion_main!(benches);
