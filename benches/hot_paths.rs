use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ratatui::style::Color;

use tui_vote_map::data::builtin_regions;
use tui_vote_map::dispatch::{Dispatcher, Gesture, RegionPainter};
use tui_vote_map::map::{MapRenderer, Viewport};
use tui_vote_map::palette::color_for;
use tui_vote_map::region::{RegionId, RegionState};

struct NullPainter;

impl RegionPainter for NullPainter {
    fn repaint(&mut self, _region: &RegionId, _color: Color) {}
}

fn bench_region_at(c: &mut Criterion) {
    let renderer = MapRenderer::new(builtin_regions());
    c.bench_function("region_at", |b| {
        b.iter(|| {
            for lon in (-180..180).step_by(15) {
                for lat in (-60..80).step_by(10) {
                    black_box(renderer.region_at(lon as f64, lat as f64));
                }
            }
        })
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let renderer = MapRenderer::new(builtin_regions());
    let (cols, rows) = (200, 50);
    let viewport = Viewport::world(cols * 2, rows * 4);
    c.bench_function("render_200x50", |b| {
        b.iter(|| black_box(renderer.render(cols, rows, &viewport)))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let ids: Vec<RegionId> = (0..250).map(|i| RegionId::new(format!("R{i}"))).collect();
    c.bench_function("dispatch_activate_hover", |b| {
        b.iter(|| {
            let mut dispatcher = Dispatcher::new();
            let mut painter = NullPainter;
            for id in &ids {
                dispatcher.dispatch(&Gesture::hover_enter(id.clone()), &mut painter);
                dispatcher.dispatch(&Gesture::activate(id.clone()), &mut painter);
                dispatcher.dispatch(&Gesture::hover_leave(id.clone()), &mut painter);
            }
            black_box(dispatcher.registry().len())
        })
    });
}

fn bench_color_for(c: &mut Criterion) {
    c.bench_function("color_for", |b| {
        b.iter(|| {
            for state in RegionState::ALL {
                black_box(color_for(black_box(state), black_box(true)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_region_at,
    bench_render_frame,
    bench_dispatch,
    bench_color_for
);
criterion_main!(benches);
