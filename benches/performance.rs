//! Performance benchmarks for the speed test monitor
//!
//! Covers the per-poll hot path: snapshot decoding, mapping to a
//! presentation update, chart updates and frame rendering.

use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use speedtest_monitor::{
    chart::ChartBuffer,
    cli::Cli,
    mapper::map_snapshot,
    models::{Config, ServerInfo, StatusSnapshot, TestStatus},
    output::{render_frame, ColorScheme, DashboardState, Presenter},
    quality::{latency_quality, throughput_quality},
};
use std::hint::black_box;
use std::time::Instant;

fn sample_snapshot() -> StatusSnapshot {
    StatusSnapshot::new(TestStatus::TestingUpload)
        .with_server(ServerInfo {
            sponsor: "Acme ISP".into(),
            name: "Berlin".into(),
            country: "Germany".into(),
        })
        .with_ping(18.4)
        .with_download(212.7)
        .with_upload(48.1)
}

/// Benchmark the per-poll mapping path
fn benchmark_snapshot_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_mapping");

    let body = serde_json::to_string(&sample_snapshot()).unwrap();
    group.bench_function("decode_status_json", |b| {
        b.iter(|| {
            let snapshot: StatusSnapshot = serde_json::from_str(black_box(&body)).unwrap();
            black_box(snapshot);
        });
    });

    let snapshot = sample_snapshot();
    group.bench_function("map_snapshot", |b| {
        b.iter(|| black_box(map_snapshot(black_box(&snapshot))));
    });

    group.bench_function("quality_ratings", |b| {
        b.iter(|| {
            for value in [5.0, 25.0, 75.0, 150.0] {
                black_box(latency_quality(black_box(value)));
                black_box(throughput_quality(black_box(value)));
            }
        });
    });

    group.finish();
}

/// Benchmark chart pushes at and below capacity
fn benchmark_chart(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");

    for capacity in [20usize, 200, 2000] {
        group.bench_with_input(BenchmarkId::new("push_full", capacity), &capacity, |b, &capacity| {
            let mut chart = ChartBuffer::with_capacity(capacity);
            for i in 0..capacity {
                chart.push_at(format!("{}", i), i as f64, 0.0);
            }
            b.iter(|| chart.push_at("12:00:00".to_string(), black_box(100.0), black_box(40.0)));
        });
    }

    group.finish();
}

/// Benchmark dashboard rendering
fn benchmark_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let mut state = DashboardState::new();
    state.reset();
    state.apply(&map_snapshot(&sample_snapshot()));
    let mut chart = ChartBuffer::new();
    for i in 0..20 {
        chart.push_at(format!("12:00:{:02}", i), 10.0 * i as f64, 4.0 * i as f64);
    }
    state.render_chart(&chart);

    let scheme = ColorScheme::default();
    for color in [false, true] {
        group.bench_with_input(BenchmarkId::new("render_frame", color), &color, |b, &color| {
            b.iter(|| black_box(render_frame(&state, &scheme, color, Instant::now())));
        });
    }

    group.finish();
}

/// Benchmark configuration handling
fn benchmark_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");

    group.bench_function("parse_cli_args", |b| {
        let args = ["stmon", "--url", "https://speed.example.com", "--poll-interval", "250", "-t", "5"];
        b.iter(|| black_box(Cli::try_parse_from(black_box(args)).unwrap()));
    });

    group.bench_function("validate_config", |b| {
        let config = Config::default();
        b.iter(|| black_box(config.validate().is_ok()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_snapshot_mapping,
    benchmark_chart,
    benchmark_rendering,
    benchmark_config
);

criterion_main!(benches);
