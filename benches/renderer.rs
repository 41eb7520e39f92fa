use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sketch_renderer::config::Config;
use sketch_renderer::parser::parse_drawing;
use sketch_renderer::render::{record_calls, render_svg};
use std::hint::black_box;

fn grid_drawing_source(cells: usize) -> String {
    let mut items = Vec::with_capacity(cells * 2);
    for i in 0..cells {
        let x = (i % 20) * 40;
        let y = (i / 20) * 40;
        let kind = if i % 3 == 0 { "ellipse" } else { "box" };
        items.push(format!(
            r#"{{"type": "{kind}", "x": {x}, "y": {y}, "width": 30, "height": 20, "text": "N{i}", "style": {{"line_style": "dashed"}}}}"#
        ));
        items.push(format!(
            r#"{{"start_x": {x}, "start_y": {y}, "end_x": {}, "end_y": {}}}"#,
            x + 30,
            y + 40
        ));
    }
    format!(r#"{{"items": [{}]}}"#, items.join(","))
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for cells in [10usize, 100, 1000] {
        let source = grid_drawing_source(cells);
        let drawing = parse_drawing(&source).expect("bench drawing is valid");
        let config = Config::default();

        group.bench_with_input(BenchmarkId::new("parse", cells), &source, |b, source| {
            b.iter(|| parse_drawing(black_box(source)).expect("parse failed"))
        });
        group.bench_with_input(BenchmarkId::new("record", cells), &drawing, |b, drawing| {
            b.iter(|| record_calls(black_box(drawing), &config.theme))
        });
        group.bench_with_input(BenchmarkId::new("svg", cells), &drawing, |b, drawing| {
            b.iter(|| render_svg(black_box(drawing), &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
