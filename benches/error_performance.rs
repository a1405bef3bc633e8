// benches/error_performance.rs
//! Benchmarks for error construction and message resolution.
//!
//! Covers the three costs a caller pays: building the error, resolving its
//! message (catalog hit, generic fallback, cached directory catalog), and
//! rendering a log record.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use platform_errors::{
    CachedCatalog, DirectoryCatalog, ErrorCode, Locale, MessageArg, MessagePattern,
    MessageResolver, NoCatalog, PlatformError, StaticCatalog,
};
use std::fs;
use std::hint::black_box;
use std::io;

// ============================================================================
// CONSTRUCTION
// ============================================================================

fn bench_error_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    group.bench_function("code_only", |b| {
        b.iter(|| black_box(PlatformError::new(ErrorCode::NotConnected)))
    });

    group.bench_function("with_args", |b| {
        b.iter(|| {
            black_box(PlatformError::with_args(
                ErrorCode::ConnectionFailed,
                [black_box("10.0.0.1")],
            ))
        })
    });

    group.bench_function("with_cause", |b| {
        b.iter(|| {
            black_box(PlatformError::with_cause(
                ErrorCode::IoError,
                io::Error::other("eof"),
                [black_box("/dev/sda")],
            ))
        })
    });

    group.bench_function("internal", |b| {
        b.iter(|| black_box(PlatformError::internal(black_box("disk full"))))
    });

    group.finish();
}

// ============================================================================
// RESOLUTION
// ============================================================================

fn bench_resolution(c: &mut Criterion) {
    let catalog = StaticCatalog::builtin().expect("builtin catalog");
    let cached = CachedCatalog::new(StaticCatalog::builtin().expect("builtin catalog"));
    let err = PlatformError::with_args(ErrorCode::ConnectionFailed, ["10.0.0.1"]);
    let timed_out = PlatformError::with_args(ErrorCode::TimedOut, [1500]);

    let mut group = c.benchmark_group("resolve");

    group.bench_function("catalog_hit", |b| {
        b.iter(|| black_box(err.message_in(&catalog, &Locale::US)))
    });

    group.bench_function("catalog_hit_cached", |b| {
        b.iter(|| black_box(err.message_in(&cached, &Locale::US)))
    });

    group.bench_function("catalog_hit_localized_number", |b| {
        b.iter(|| black_box(timed_out.message_in(&catalog, &Locale::GERMANY)))
    });

    group.bench_function("generic_fallback", |b| {
        b.iter(|| black_box(err.message_in(&NoCatalog, &Locale::US)))
    });

    group.bench_function("display", |b| b.iter(|| black_box(err.to_string())));

    group.finish();
}

fn bench_internal_collapsing(c: &mut Criterion) {
    let catalog = StaticCatalog::builtin().expect("builtin catalog");
    let mut group = c.benchmark_group("internal_collapse");

    for count in [1usize, 2, 4, 8] {
        let err = (1..count).fold(PlatformError::internal("first"), |err, i| {
            err.with_arg(format!("part {i}"))
        });
        group.bench_with_input(BenchmarkId::from_parameter(count), &err, |b, err| {
            b.iter(|| black_box(err.message_in(&catalog, &Locale::US)))
        });
    }

    group.finish();
}

fn bench_directory_catalog(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("bench.toml"),
        "CONNECTION_FAILED = \"Failed to connect to {0}\"\n",
    )
    .expect("write bundle");
    fs::write(
        dir.path().join("bench_de.toml"),
        "CONNECTION_FAILED = \"Verbindung zu {0} fehlgeschlagen\"\n",
    )
    .expect("write bundle");

    let uncached = DirectoryCatalog::new(dir.path(), "bench");
    let cached = CachedCatalog::new(DirectoryCatalog::new(dir.path(), "bench"));
    let err = PlatformError::with_args(ErrorCode::ConnectionFailed, ["10.0.0.1"]);

    let mut group = c.benchmark_group("directory_catalog");
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(err.message_in(&uncached, &Locale::GERMANY)))
    });
    group.bench_function("cached", |b| {
        b.iter(|| black_box(err.message_in(&cached, &Locale::GERMANY)))
    });
    group.finish();
}

// ============================================================================
// PATTERNS
// ============================================================================

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern");
    let template = "Command ''{0}'' failed with exit code {1,number,integer} after {2,number} s";
    let parsed = MessagePattern::parse(template).expect("valid pattern");
    let args = [
        MessageArg::from("ifup wwan0"),
        MessageArg::from(3i64),
        MessageArg::from(12.5f64),
    ];

    group.bench_function("parse", |b| {
        b.iter(|| black_box(MessagePattern::parse(black_box(template))))
    });
    group.bench_function("format", |b| {
        b.iter(|| black_box(parsed.format(&args, &Locale::FRANCE)))
    });
    group.finish();
}

// ============================================================================
// LOGGING
// ============================================================================

fn bench_record_write(c: &mut Criterion) {
    let inner = PlatformError::with_cause(
        ErrorCode::SerialPortNotExisting,
        io::Error::new(io::ErrorKind::NotFound, "no such device"),
        ["/dev/ttyS3"],
    );
    let err = PlatformError::with_cause(ErrorCode::UnableToObtainConnection, inner, ["modem"]);
    let long = PlatformError::internal("x".repeat(10_000));
    let resolver = MessageResolver::new(StaticCatalog::builtin().expect("builtin catalog"))
        .with_display_locale(Locale::US);

    let mut group = c.benchmark_group("record");
    group.bench_function("write_chain", |b| {
        let mut buffer = String::with_capacity(256);
        b.iter(|| {
            buffer.clear();
            err.record().write_to(&mut buffer).expect("write to string");
            black_box(buffer.len())
        })
    });
    group.bench_function("write_truncated", |b| {
        let mut buffer = String::with_capacity(2048);
        b.iter(|| {
            buffer.clear();
            long.record().write_to(&mut buffer).expect("write to string");
            black_box(buffer.len())
        })
    });
    group.bench_function("emit_without_subscriber", |b| {
        b.iter(|| err.record().emit(&resolver))
    });
    group.finish();
}

// ============================================================================
// BENCHMARK GROUPS
// ============================================================================

criterion_group!(creation_benches, bench_error_creation);

criterion_group!(
    resolution_benches,
    bench_resolution,
    bench_internal_collapsing,
    bench_directory_catalog,
);

criterion_group!(pattern_benches, bench_pattern);

criterion_group!(logging_benches, bench_record_write);

criterion_main!(
    creation_benches,
    resolution_benches,
    pattern_benches,
    logging_benches,
);
