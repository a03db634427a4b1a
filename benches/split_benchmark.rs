//! Benchmarks for docsplit pipeline performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic composite packages.

use std::io::{Cursor, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docsplit::{split_bytes, DocumentBody, NamingTable, Package};

/// Creates a minimal synthetic composite package with the given number
/// of paragraphs.
fn create_test_package(paragraph_count: usize) -> Vec<u8> {
    let mut document = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for i in 0..paragraph_count {
        document.push_str(&format!(
            "<w:p><w:r><w:t>Benchmark paragraph {i} with some representative run text.</w:t></w:r></w:p>"
        ));
    }
    document.push_str("<w:sectPr/></w:body></w:document>");

    let cursor = Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(cursor);
    let options = zip::write::FileOptions::<()>::default();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(br#"<w:styles xmlns:w="ns"/>"#).unwrap();
    zip.finish().unwrap().into_inner()
}

fn bench_body_parse(c: &mut Criterion) {
    let bytes = create_test_package(500);
    let package = Package::from_bytes(&bytes).unwrap();

    c.bench_function("parse_body_500", |b| {
        b.iter(|| {
            let body = DocumentBody::parse(black_box(package.body_bytes())).unwrap();
            black_box(body.node_count())
        })
    });
}

fn bench_split(c: &mut Criterion) {
    let bytes = create_test_package(500);
    let table = NamingTable::from_pairs((0..20).map(|i| (format!("Name {i}"), format!("{i:03}"))));

    c.bench_function("split_500_into_20", |b| {
        b.iter(|| {
            let outcome = split_bytes(black_box(&bytes), &table).unwrap();
            black_box(outcome.summary.succeeded)
        })
    });
}

criterion_group!(benches, bench_body_parse, bench_split);
criterion_main!(benches);
