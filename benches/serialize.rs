//! Benchmarks for building and serializing workbooks.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::indexing_slicing)]

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlwrite::{BorderSide, BorderStyle, Compression, PatternType, Workbook, WorkbookOptions};

const COLUMNS: u32 = 20;
const PALETTE: [&str; 4] = ["FFFF0000", "FF00B050", "FF0070C0", "FF7030A0"];

fn options(compression: Compression) -> WorkbookOptions {
    WorkbookOptions {
        created: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single(),
        compression,
        ..WorkbookOptions::default()
    }
}

/// A sheet of `rows` x 20 cells: a header row, text, formulas and a few
/// recurring styles.
fn build_workbook(rows: u32, compression: Compression) -> Workbook {
    let mut wb = Workbook::with_options(options(compression));
    let mut ws = wb.active_sheet_mut();
    for col in 1..=COLUMNS {
        ws.set_cell_value_by_column_and_row(col, 1, &format!("Column {col}"))
            .expect("Failed to write header")
            .set_cell_border_style_by_column_and_row(col, 1, BorderSide::Bottom, BorderStyle::Medium)
            .expect("Failed to style header");
    }
    for row in 2..=rows {
        for col in 1..=COLUMNS {
            let value = if col == COLUMNS {
                format!("=SUM(A{row}:S{row})")
            } else {
                format!("r{row}c{}", (row * col) % 97)
            };
            ws.set_cell_value_by_column_and_row(col, row, &value)
                .expect("Failed to write cell");
        }
        let color = PALETTE[(row as usize) % PALETTE.len()];
        ws.set_cell_color_by_column_and_row(1, row, color)
            .expect("Failed to color cell");
        if row % 2 == 0 {
            ws.set_cell_fill_type_by_column_and_row(2, row, PatternType::LightGray)
                .expect("Failed to fill cell");
        }
    }
    wb
}

/// Populating cells through the worksheet API
fn bench_build(c: &mut Criterion) {
    c.bench_function("build_1000x20", |b| {
        b.iter(|| build_workbook(black_box(1000), Compression::Deflated))
    });
}

/// Serializing a prepared workbook to bytes
fn bench_to_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_bytes");

    for rows in [100, 1000, 5000] {
        let mut wb = build_workbook(rows, Compression::Deflated);
        group.throughput(Throughput::Elements(u64::from(rows * COLUMNS)));
        group.bench_with_input(BenchmarkId::new("deflated", rows), &rows, |b, _| {
            b.iter(|| wb.to_bytes().expect("Failed to serialize"))
        });
    }

    group.finish();
}

/// Stored vs deflated entries for the same workbook
fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    for (name, compression) in [("stored", Compression::Stored), ("deflated", Compression::Deflated)] {
        let mut wb = build_workbook(1000, compression);
        group.bench_function(name, |b| b.iter(|| wb.to_bytes().expect("Failed to serialize")));
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_to_bytes, bench_compression);

criterion_main!(benches);
