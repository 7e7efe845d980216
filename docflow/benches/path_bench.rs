use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docflow::path::{collapse, normalize, NormalizedPath, PathKind, PathType, Provider};
use docflow::{Document, Metadata};

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    // Benchmark absolute path normalization
    group.bench_function("absolute_path", |b| {
        b.iter(|| {
            normalize(
                black_box("/absolute/path/to/file"),
                PathKind::RelativeOrAbsolute,
                Provider::Absent,
            )
        });
    });

    // Benchmark relative path normalization
    group.bench_function("relative_path", |b| {
        b.iter(|| {
            normalize(
                black_box("./relative/path/"),
                PathKind::RelativeOrAbsolute,
                Provider::Absent,
            )
        });
    });

    // Benchmark backslashes and repeated prefixes
    group.bench_function("messy_literal", |b| {
        b.iter(|| {
            normalize(
                black_box("  .\\./posts\\2024\\hello.md/  "),
                PathKind::RelativeOrAbsolute,
                Provider::Absent,
            )
        });
    });

    // Benchmark provider-qualified literals
    group.bench_function("provider_literal", |b| {
        b.iter(|| NormalizedPath::parse(PathType::File, black_box("theme::/css/site.css")));
    });

    group.finish();
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse");

    for literal in ["/a/b/c/d", "/a/b/../c/./d", "/hello/../../../../temp", "a/./b/../../c/d/.."] {
        let path = NormalizedPath::directory(literal).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(literal), &path, |b, path| {
            b.iter(|| collapse(black_box(path)));
        });
    }

    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");

    let base = NormalizedPath::directory("/site/input").unwrap();
    let relative = NormalizedPath::file("posts/2024/hello.md").unwrap();
    let absolute = NormalizedPath::file("/elsewhere/page.md").unwrap();

    group.bench_function("relative", |b| {
        b.iter(|| black_box(&base).combine(black_box(&relative)));
    });

    group.bench_function("absolute", |b| {
        b.iter(|| black_box(&base).combine(black_box(&absolute)));
    });

    group.finish();
}

fn bench_metadata_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata_lookup");

    // Lookups walk the layer chain, so measure different depths
    for depth in [1usize, 8, 32] {
        let mut metadata = Metadata::from_entries([("Root", "value")]);
        for i in 0..depth {
            metadata = metadata.layer([(format!("Key{i}"), i64::try_from(i).unwrap_or(0))]);
        }
        let doc = Document::with_parts(
            NormalizedPath::file("/doc.md").unwrap(),
            metadata,
            docflow::Content::Empty,
        );
        group.bench_with_input(BenchmarkId::from_parameter(depth), &doc, |b, doc| {
            b.iter(|| doc.get(black_box("Root")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_collapse,
    bench_combine,
    bench_metadata_lookup
);
criterion_main!(benches);
