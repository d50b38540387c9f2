use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scf::{from_str, parse, tokenize, Table};
use serde::Deserialize;

#[derive(Deserialize)]
#[allow(dead_code)]
struct Window {
    width: u32,
    height: u32,
    scale: f32,
    title: String,
    fullscreen: bool,
}

const WINDOW: &str = r#"
width = 1280
height = 720
scale = 1.25
title = "benchmark"
fullscreen = false
"#;

fn flat_document(entries: usize) -> String {
    (0..entries)
        .map(|i| format!("key{i} = {i}\nname{i} = \"entry {i}\"\nratio{i} = {i}.5\n"))
        .collect()
}

fn nested_document(depth: usize) -> String {
    let mut src = String::new();
    for i in 0..depth {
        src.push_str(&format!("level{i} {{ value = {i} "));
    }
    src.push_str(&"} ".repeat(depth));
    src
}

fn benchmark_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for size in [10, 100, 1000].iter() {
        let src = flat_document(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &src, |b, src| {
            b.iter(|| tokenize(black_box(src)).count())
        });
    }
    group.finish();
}

fn benchmark_parse_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_flat");

    for size in [10, 100, 1000].iter() {
        let src = flat_document(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &src, |b, src| {
            b.iter(|| parse(black_box(src)))
        });
    }
    group.finish();
}

fn benchmark_parse_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_nested");

    for depth in [8, 64, 128].iter() {
        let src = nested_document(*depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &src, |b, src| {
            b.iter(|| parse(black_box(src)))
        });
    }
    group.finish();
}

fn benchmark_lookup(c: &mut Criterion) {
    let table = parse(&flat_document(1000)).unwrap_or_default();

    c.bench_function("lookup_last_key", |b| {
        b.iter(|| black_box(&table).get_i32(black_box("key999")))
    });

    c.bench_function("set_existing_key", |b| {
        let mut table: Table = table.clone();
        b.iter(|| table.set(black_box("name500"), black_box(1)))
    });
}

fn benchmark_deserialize(c: &mut Criterion) {
    c.bench_function("deserialize_struct", |b| {
        b.iter(|| from_str::<Window>(black_box(WINDOW)))
    });
}

criterion_group!(
    benches,
    benchmark_tokenize,
    benchmark_parse_flat,
    benchmark_parse_nested,
    benchmark_lookup,
    benchmark_deserialize
);
criterion_main!(benches);
