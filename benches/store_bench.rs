//! Benchmarks for docstore operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docstore::config::{FlushPolicy, StoreConfig};
use docstore::{Document, FileStore};
use tempfile::TempDir;

fn populated(store: &FileStore, n: usize) {
    for i in 0..n {
        let doc = Document::parse(&format!(r#"{{"id":{},"name":"entry {}"}}"#, i, i)).unwrap();
        store.set("bench", &format!("key{:06}", i), doc).unwrap();
    }
}

fn set_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    let doc = Document::parse(r#"{"name":"value","tags":[1,2,3]}"#).unwrap();

    let memory = FileStore::in_memory();
    group.bench_function("memory", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            memory.set("bench", &format!("key{}", i % 1000), doc.clone()).unwrap();
        })
    });

    // write-through cost grows with the whole tree
    for size in [10usize, 1000] {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open_path(temp_dir.path().join("db.json")).unwrap();
        populated(&store, size);
        group.bench_with_input(BenchmarkId::new("write_through", size), &size, |b, _| {
            b.iter(|| store.set("bench", "hot", doc.clone()).unwrap())
        });
    }

    let temp_dir = TempDir::new().unwrap();
    let manual = FileStore::open(
        StoreConfig::builder()
            .path(temp_dir.path().join("db.json"))
            .flush_policy(FlushPolicy::Manual)
            .build(),
    )
    .unwrap();
    group.bench_function("manual_flush", |b| {
        b.iter(|| manual.set("bench", "hot", doc.clone()).unwrap())
    });

    group.finish();
}

fn read_benchmarks(c: &mut Criterion) {
    let memory = FileStore::in_memory();
    populated(&memory, 1000);
    c.bench_function("get/memory", |b| {
        b.iter(|| black_box(memory.get("bench", "key000500").unwrap()))
    });

    let temp_dir = TempDir::new().unwrap();
    let file = FileStore::open_path(temp_dir.path().join("db.json")).unwrap();
    populated(&file, 1000);
    c.bench_function("get/file_reload", |b| {
        b.iter(|| black_box(file.get("bench", "key000500").unwrap()))
    });

    c.bench_function("list/1000_entries", |b| {
        b.iter(|| black_box(memory.list("bench", 20, 10).unwrap()))
    });
}

criterion_group!(benches, set_benchmarks, read_benchmarks);
criterion_main!(benches);
