//! Subtype engine benchmarks.
//!
//! Measures construction, cold and cached subtype queries, and template
//! substitution over growing type sizes.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use phz_common::tracing_config::init_tracing;
use phz_solver::{
    InheritanceGraph, NoopHierarchy, RelationCache, ShapeField, SubtypeChecker, TemplateAnchor,
    TemplateArguments, TemplateReflection, TypeId, TypeInterner, Variance, resolve_templates,
};

/// `array{0: 0, 1: 1, ...}` with `size` positional elements.
fn wide_shape(interner: &TypeInterner, size: usize) -> TypeId {
    let fields = (0..size)
        .map(|i| ShapeField::positional(interner.literal_int(i as i64)))
        .collect();
    interner.array_shape_type(fields)
}

/// A union of `size` distinct string literals.
fn wide_union(interner: &TypeInterner, size: usize) -> TypeId {
    let members = (0..size)
        .map(|i| interner.literal_string(&format!("member_{i}")))
        .collect();
    interner.union(members)
}

/// `list<list<...<int>>>` nested `depth` times.
fn nested_list(interner: &TypeInterner, leaf: TypeId, depth: usize) -> TypeId {
    (0..depth).fold(leaf, |inner, _| interner.list(inner))
}

fn bench_construction(c: &mut Criterion) {
    init_tracing();
    let mut group = c.benchmark_group("construction");

    for &size in &[4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("union", size), &size, |b, &size| {
            b.iter(|| {
                let interner = TypeInterner::new();
                black_box(wide_union(&interner, size))
            })
        });
        group.bench_with_input(BenchmarkId::new("shape", size), &size, |b, &size| {
            b.iter(|| {
                let interner = TypeInterner::new();
                black_box(wide_shape(&interner, size))
            })
        });
    }

    group.finish();
}

fn bench_subtype(c: &mut Criterion) {
    let mut group = c.benchmark_group("subtype");
    let interner = TypeInterner::new();
    let graph = InheritanceGraph::new();
    let producer = interner.intern_string("Producer");
    graph.declare_class(
        producer,
        vec![TemplateReflection::new(interner.intern_string("T"), 0).with_variance(Variance::Covariant)],
    );

    for &size in &[4usize, 16, 64] {
        let shape = wide_shape(&interner, size);
        let list = interner.list(TypeId::INT);
        group.bench_with_input(BenchmarkId::new("shape_to_list", size), &size, |b, _| {
            b.iter(|| {
                let mut checker = SubtypeChecker::new(&interner, &graph);
                black_box(checker.is_subtype_of(black_box(shape), black_box(list)))
            })
        });

        let union = wide_union(&interner, size);
        group.bench_with_input(BenchmarkId::new("union_to_string", size), &size, |b, _| {
            b.iter(|| {
                let mut checker = SubtypeChecker::new(&interner, &graph);
                black_box(checker.is_subtype_of(black_box(union), TypeId::NON_EMPTY_STRING))
            })
        });

        let source = interner.named_object_atom(
            producer,
            vec![nested_list(&interner, interner.literal_int(1), size)],
        );
        let target = interner.named_object_atom(
            producer,
            vec![nested_list(&interner, TypeId::INT, size)],
        );
        group.bench_with_input(BenchmarkId::new("generic_depth", size), &size, |b, _| {
            b.iter(|| {
                let mut checker = SubtypeChecker::new(&interner, &graph);
                black_box(checker.is_subtype_of(source, target))
            })
        });
    }

    group.finish();
}

fn bench_cached_subtype(c: &mut Criterion) {
    let interner = TypeInterner::new();
    let cache = RelationCache::new();
    let shape = wide_shape(&interner, 64);
    let list = interner.list(TypeId::INT);

    // Warm the cache once.
    SubtypeChecker::new(&interner, &NoopHierarchy)
        .with_cache(&cache)
        .is_subtype_of(shape, list);

    c.bench_function("subtype/cached_shape_to_list", |b| {
        b.iter(|| {
            let mut checker =
                SubtypeChecker::new(&interner, &NoopHierarchy).with_cache(&cache);
            black_box(checker.is_subtype_of(black_box(shape), black_box(list)))
        })
    });
}

fn bench_template_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");
    let interner = TypeInterner::new();
    let templates = [TemplateReflection::new(interner.intern_string("T"), 0)];
    let arguments = TemplateArguments::from_args(&[TypeId::STRING]);
    let t = interner.class_template("T", "Box");
    let anchor = TemplateAnchor::AtClass(interner.intern_string("Box"));

    for &depth in &[1usize, 8, 32] {
        let ty = nested_list(&interner, interner.nullable(t), depth);
        group.bench_with_input(BenchmarkId::new("nested_list", depth), &ty, |b, &ty| {
            b.iter(|| black_box(resolve_templates(&interner, anchor, &templates, &arguments, ty)))
        });
    }

    group.finish();
}

criterion_group!(
    subtype_benches,
    bench_construction,
    bench_subtype,
    bench_cached_subtype,
    bench_template_resolution
);
criterion_main!(subtype_benches);
