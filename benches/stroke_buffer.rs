//! Benchmarks for stroke ingestion
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use tablet_ink::config::BufferConfig;
use tablet_ink::driver::MockDriver;
use tablet_ink::{IngestSession, Point, StrokeBuffer};

fn bench_stroke_buffer_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke_buffer_push");

    for increment in [16usize, 1024] {
        let points = 10_000usize;
        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(
            BenchmarkId::new("increment", increment),
            &increment,
            |b, &increment| {
                b.iter(|| {
                    let mut buffer = StrokeBuffer::new(64, increment);
                    for i in 0..points as i32 {
                        if i % 100 == 99 {
                            let _ = buffer.mark_boundary();
                        } else {
                            let _ = buffer.push(Point::new(i, i));
                        }
                    }
                    black_box(buffer.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_stroke_views(c: &mut Criterion) {
    let mut buffer = StrokeBuffer::new(2048, 1024);
    for i in 0..20_000 {
        if i % 200 == 199 {
            let _ = buffer.mark_boundary();
        } else {
            let _ = buffer.push(Point::new(i, -i));
        }
    }

    c.bench_function("strokes_iter", |b| {
        b.iter(|| black_box(buffer.strokes().map(<[Point]>::len).sum::<usize>()))
    });

    c.bench_function("segments_iter", |b| {
        b.iter(|| black_box(buffer.segments().count()))
    });
}

fn bench_session_step(c: &mut Criterion) {
    let mut packets = Vec::new();
    for stroke in 0..100u8 {
        packets.push(0xFE);
        packets.extend((1..=60).map(|i: u8| i.wrapping_add(stroke) % 0xF0 + 1));
        packets.push(0xFF);
    }

    let mut group = c.benchmark_group("session");
    group.throughput(Throughput::Elements(packets.len() as u64 / 8));
    group.bench_function("step_8_byte_packets", |b| {
        b.iter(|| {
            let mut session = IngestSession::with_source(
                Cursor::new(packets.clone()),
                Box::new(MockDriver::new(8)),
                |strokes: &StrokeBuffer| {
                    black_box(strokes.last_completed_stroke());
                },
                &BufferConfig::default(),
            )
            .unwrap();
            while session.step().is_ok() {}
            black_box(session.teardown())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_stroke_buffer_push,
    bench_stroke_views,
    bench_session_step
);
criterion_main!(benches);
