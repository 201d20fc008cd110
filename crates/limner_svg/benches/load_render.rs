use criterion::{black_box, criterion_group, criterion_main, Criterion};
use limner_core::IntSize;
use limner_svg::SvgRenderer;

const ICON: &str = r##"
<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
    <defs>
        <linearGradient id="fade" x1="0" y1="0" x2="1" y2="1">
            <stop offset="0" stop-color="#3b82f6"/>
            <stop offset="1" stop-color="#9333ea"/>
        </linearGradient>
    </defs>
    <rect id="frame" x="4" y="4" width="56" height="56" rx="12" fill="url(#fade)"/>
    <g id="glyph" transform="translate(32 32)">
        <circle r="14" fill="none" stroke="#ffffff" stroke-width="4"/>
        <path d="M -6 0 L 6 0 M 0 -6 L 0 6" stroke="#ffffff" stroke-width="3"/>
    </g>
</svg>
"##;

fn bench_load(c: &mut Criterion) {
    let mut renderer = SvgRenderer::new();
    c.bench_function("load_data", |b| {
        b.iter(|| renderer.load_data(black_box(ICON.as_bytes())))
    });
}

fn bench_render(c: &mut Criterion) {
    let renderer = SvgRenderer::from_data(ICON.as_bytes());
    let mut group = c.benchmark_group("render_to_image");
    for side in [64u32, 256, 1024] {
        group.bench_function(format!("{side}px"), |b| {
            b.iter(|| renderer.render_to_image(Some(IntSize::new(side, side))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load, bench_render);
criterion_main!(benches);
