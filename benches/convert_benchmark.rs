//! Benchmarks for filemorph extraction and conversion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filemorph::{
    classify, convert, extract, ExtractedContent, SourceKind, TabularFormat, TargetFormat,
    TextContent,
};

const CSV: SourceKind = SourceKind::Tabular(TabularFormat::Csv);

/// Creates a synthetic CSV with the given number of rows.
fn create_test_csv(rows: usize) -> Vec<u8> {
    let mut content = String::from("id,name,amount,region\n");
    for i in 0..rows {
        let amount = if i % 7 == 0 {
            String::new()
        } else {
            format!("{:.2}", i as f64 * 1.5)
        };
        content.push_str(&format!("{},item {},{},region {}\n", i, i, amount, i % 4));
    }
    content.into_bytes()
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_file_name", |b| {
        b.iter(|| classify(black_box("Quarterly Report.XLSX")).unwrap());
    });
}

fn bench_csv_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_extraction");

    for rows in [100, 1_000, 10_000].iter() {
        let data = create_test_csv(*rows);
        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| extract(black_box(&data), CSV).unwrap());
        });
    }

    group.finish();
}

fn bench_table_conversion(c: &mut Criterion) {
    let content = extract(&create_test_csv(1_000), CSV).unwrap();
    let mut group = c.benchmark_group("table_conversion");

    for target in [TargetFormat::Xlsx, TargetFormat::Word, TargetFormat::Pdf] {
        group.bench_function(target.to_string(), |b| {
            b.iter(|| convert(black_box(&content), CSV, target, "bench.csv").unwrap());
        });
    }

    group.finish();
}

fn bench_text_to_pdf(c: &mut Criterion) {
    let lines: Vec<String> = (0..500)
        .map(|i| format!("Paragraph {} of the benchmark document.", i))
        .collect();
    let content = ExtractedContent::Text(TextContent::new(lines));

    c.bench_function("word_text_to_pdf_500_lines", |b| {
        b.iter(|| {
            convert(
                black_box(&content),
                SourceKind::DocumentWord,
                TargetFormat::Pdf,
                "bench.docx",
            )
            .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_csv_extraction,
    bench_table_conversion,
    bench_text_to_pdf,
);
criterion_main!(benches);
