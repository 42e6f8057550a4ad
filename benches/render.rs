use criterion::{criterion_group, criterion_main, Criterion};
use montepi::glyph::{draw_text, SegmentGeometry};
use montepi::raster::PixelBuffer;
use montepi::{render_sequence, simulate, RenderConfig};

fn sampling(c: &mut Criterion) {
    c.bench_function("simulate 100k points in 10 batches", |b| {
        b.iter(|| simulate(100_000, 10).map(|batches| batches.count()))
    });
}

fn readout(c: &mut Criterion) {
    let geometry = SegmentGeometry::new(800, 800, 6);
    c.bench_function("draw an 8 character readout", move |b| {
        let mut buffer = PixelBuffer::new(800, 800);
        b.iter(|| draw_text(&mut buffer, "3.14159265", 6, &geometry))
    });
}

fn sequence(c: &mut Criterion) {
    let config = RenderConfig::new(400, 50_000, 4);
    c.bench_function("render a 400px sequence", move |b| {
        b.iter(|| render_sequence(&config).map(|frames| frames.len()))
    });
}

criterion_group!(benches, sampling, readout, sequence);
criterion_main!(benches);
