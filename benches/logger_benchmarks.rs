//! Criterion benchmarks for micro_logging

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use micro_logging::prelude::*;
use std::io;
use std::sync::Arc;

fn null_logger(name: &str, level: Level, formatter: Formatter) -> Logger {
    let logger = Logger::new(name);
    logger.set_level(level);
    logger.add_handler(Arc::new(
        Handler::new(StreamSink::new(io::sink()))
            .with_level(Level::TRACE)
            .with_formatter(formatter),
    ));
    logger
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger("bench", Level::INFO, Formatter::default());

    group.bench_function("info_no_args", |b| {
        b.iter(|| logger.info(black_box("Info message"), &[]));
    });

    group.bench_function("info_with_args", |b| {
        b.iter(|| {
            logger.info(
                black_box("request %s took %.2fms"),
                &["/health".into(), 1.25.into()],
            )
        });
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger("bench.filter", Level::WARNING, Formatter::default());

    group.bench_function("filtered", |b| {
        b.iter(|| logger.debug(black_box("dropped %d"), &[42.into()]));
    });

    group.bench_function("passed", |b| {
        b.iter(|| logger.error(black_box("kept %d"), &[42.into()]));
    });

    group.bench_function("is_enabled_for", |b| {
        b.iter(|| logger.is_enabled_for(black_box(Level::DEBUG)));
    });

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatter");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::new(
        "bench.fmt",
        Level::WARNING,
        "user %s failed %d times",
        vec!["alice".into(), 3.into()],
    );

    let percent = Formatter::new(
        Some("%(levelname)-8s %(name)s: %(message)s"),
        None,
        Style::Percent,
    )
    .expect("valid format");
    let brace = Formatter::new(Some("{levelname:<8} {name}: {message}"), None, Style::Brace)
        .expect("valid format");
    let timed = Formatter::new(Some("%(asctime)s %(message)s"), None, Style::Percent)
        .expect("valid format");

    group.bench_function("percent", |b| b.iter(|| percent.format(black_box(&record))));
    group.bench_function("brace", |b| b.iter(|| brace.format(black_box(&record))));
    group.bench_function("with_asctime", |b| b.iter(|| timed.format(black_box(&record))));

    group.bench_function("construct", |b| {
        b.iter(|| {
            Formatter::new(
                black_box(Some("%(asctime)s %(levelname)s %(name)s %(message)s")),
                None,
                Style::Percent,
            )
        })
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            let logger = Arc::new(null_logger("bench.mt", Level::INFO, Formatter::default()));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            for i in 0..100 {
                                logger.info("thread %d message %d", &[t.into(), i.into()]);
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    let _ = h.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_logging,
    bench_level_filtering,
    bench_formatter,
    bench_concurrent_logging
);
criterion_main!(benches);
