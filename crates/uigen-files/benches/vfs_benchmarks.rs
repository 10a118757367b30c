use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use uigen_files::{FilePath, FilesBuilder, VirtualFileSystem};

/// Benchmark `read_file` across different tree sizes
fn bench_read_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_file");

    for size in [10, 100, 1000, 10000] {
        let vfs = create_vfs_with_files(size);
        let path = format!("/components/generated/Component{}.jsx", size / 2);

        group.bench_with_input(BenchmarkId::new("read", size), &path, |b, path| {
            b.iter(|| vfs.read_file(black_box(path)));
        });
    }

    group.finish();
}

/// Benchmark `list_directory` on a wide directory
fn bench_list_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_directory");

    for size in [10, 100, 1000] {
        let vfs = create_vfs_with_files(size);

        group.bench_with_input(BenchmarkId::new("list", size), &size, |b, _| {
            b.iter(|| vfs.list_directory(black_box("/components/generated")).unwrap());
        });
    }

    group.finish();
}

/// Benchmark renaming a directory with many descendants
fn bench_rename_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("rename_directory");

    for size in [10, 100, 1000] {
        let vfs = create_vfs_with_files(size);

        group.bench_with_input(BenchmarkId::new("rename", size), &size, |b, _| {
            b.iter_batched(
                || vfs.clone(),
                |mut vfs| {
                    vfs.rename("/components", "/widgets").unwrap();
                    vfs
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark the persistence round trip
fn bench_serialize_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for size in [10, 100, 1000] {
        let vfs = create_vfs_with_files(size);
        let nodes = vfs.serialize();

        group.bench_with_input(BenchmarkId::new("serialize", size), &size, |b, _| {
            b.iter(|| vfs.serialize());
        });
        group.bench_with_input(BenchmarkId::new("deserialize", size), &nodes, |b, nodes| {
            b.iter(|| VirtualFileSystem::from_nodes(black_box(nodes)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark path normalization overhead
fn bench_path_normalization(c: &mut Criterion) {
    let paths = vec![
        ("/App.jsx", "short"),
        ("components/ui/./Button.jsx", "relative"),
        ("/a/b/../c/./d//e/../../f/g/h/i/Component.tsx", "messy"),
    ];

    let mut group = c.benchmark_group("path_normalization");
    for (path, name) in paths {
        group.bench_with_input(BenchmarkId::new("normalize", name), &path, |b, path| {
            b.iter(|| FilePath::new(black_box(path)).unwrap());
        });
    }
    group.finish();
}

fn create_vfs_with_files(count: usize) -> VirtualFileSystem {
    let files: Vec<_> = (0..count)
        .map(|i| {
            (
                format!("/components/generated/Component{i}.jsx"),
                format!("export default function Component{i}() {{ return <div>{i}</div>; }}"),
            )
        })
        .collect();

    FilesBuilder::new()
        .add_file("/App.jsx", "export default function App() { return null; }")
        .add_files(files)
        .build()
        .unwrap()
}

criterion_group!(
    benches,
    bench_read_file,
    bench_list_directory,
    bench_rename_directory,
    bench_serialize_round_trip,
    bench_path_normalization
);
criterion_main!(benches);
