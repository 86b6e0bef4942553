use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use serde_jsonapi::{
    parse, parse_value, to_string, to_vec, Document, Engine, Fieldsets, IncludePaths, Links,
    Options, Relationship, Resource, ResourceIdentifier,
};

fn person(id: usize) -> Resource {
    Resource::builder("people")
        .id(id.to_string())
        .attribute("firstName", "Dan")
        .attribute("lastName", "Gebhardt")
        .attribute("twitter", "dgeb")
        .build()
        .unwrap()
}

fn article(id: usize, people: usize) -> Resource {
    let comments = (0..3)
        .map(|c| ResourceIdentifier::of("comments", format!("{id}-{c}")).unwrap())
        .collect();
    Resource::builder("articles")
        .id(id.to_string())
        .attribute("title", "JSON:API paints my bikeshed!")
        .attribute("body", "The shortest article. Ever.")
        .attribute("tags", json!(["api", "json", "rest"]))
        .relationship(
            "author",
            Relationship::to_one(Some(
                ResourceIdentifier::of("people", (id % people).to_string()).unwrap(),
            )),
        )
        .relationship("comments", Relationship::to_many(comments))
        .links(Links::self_link(format!("http://example.com/articles/{id}")))
        .build()
        .unwrap()
}

fn compound_document(size: usize) -> Document {
    let people = (size / 4).max(1);
    Document::builder()
        .data((0..size).map(|i| article(i, people)).collect::<Vec<_>>())
        .included((0..people).map(person))
        .links(Links::self_link("http://example.com/articles"))
        .build()
        .unwrap()
}

fn benchmark_parse_single(c: &mut Criterion) {
    let input = br#"{"data":{"type":"articles","id":"1","attributes":{"title":"Rails is Omakase"},"relationships":{"author":{"data":{"type":"people","id":"9"}}}}}"#;

    c.bench_function("parse_single_resource", |b| b.iter(|| parse(black_box(input))));
}

fn benchmark_parse_compound(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_compound");

    for size in [10, 50, 100, 500].iter() {
        let bytes = to_vec(&compound_document(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| parse(black_box(bytes)))
        });
    }
    group.finish();
}

fn benchmark_serialize_compound(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_compound");

    for size in [10, 50, 100, 500].iter() {
        let doc = compound_document(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| to_string(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_build_compound(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_compound");

    for size in [10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| compound_document(black_box(size)))
        });
    }
    group.finish();
}

fn benchmark_validation_modes(c: &mut Criterion) {
    let value = serde_json::to_value(compound_document(100)).unwrap();
    let closure = Engine::with_options(Options::new().with_full_closure(true));
    let paths = Engine::with_options(
        Options::new().with_include_paths(IncludePaths::parse("author").unwrap()),
    );

    let mut group = c.benchmark_group("validation_modes");
    group.bench_function("default", |b| {
        b.iter(|| parse_value(black_box(value.clone())))
    });
    group.bench_function("full_closure", |b| {
        b.iter(|| closure.parse_value(black_box(value.clone())))
    });
    group.bench_function("include_paths", |b| {
        b.iter(|| paths.parse_value(black_box(value.clone())))
    });
    group.finish();
}

fn benchmark_sparse_fieldsets(c: &mut Criterion) {
    let doc = compound_document(100);
    let fields = Fieldsets::from_query("fields[articles]=title,author&fields[people]=firstName")
        .unwrap();

    c.bench_function("sparse_fieldsets", |b| {
        b.iter(|| black_box(&doc).sparse(black_box(&fields)))
    });
}

fn benchmark_comparison(c: &mut Criterion) {
    let doc = compound_document(100);
    let text = to_string(&doc).unwrap();

    let mut group = c.benchmark_group("comparison");
    group.bench_function("validated_parse", |b| {
        b.iter(|| serde_jsonapi::parse_str(black_box(&text)))
    });
    group.bench_function("raw_json_parse", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&text)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_single,
    benchmark_parse_compound,
    benchmark_serialize_compound,
    benchmark_build_compound,
    benchmark_validation_modes,
    benchmark_sparse_fieldsets,
    benchmark_comparison
);
criterion_main!(benches);
