//! End-to-end benchmark for a link run without disk output.
//!
//! Measures:
//! 1. Resolution of a layered synthetic catalog
//! 2. Loading the resolved modules into a pool
//! 3. The exclude pipeline over that pool
//! 4. Pool digest

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use modlink::{
    resolve, Content, Module, ModuleCatalog, Pipeline, PluginRegistry, ResourceKind, ResourcePool,
    StageSpec,
};

/// Build `layers` layers of `width` modules; each module requires every
/// module of the layer below and carries `resources` entries.
fn synthetic_catalog(layers: usize, width: usize, resources: usize) -> ModuleCatalog {
    let mut modules = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for i in 0..width {
            let requires: Vec<String> = if layer == 0 {
                Vec::new()
            } else {
                (0..width).map(|j| format!("m{}_{}", layer - 1, j)).collect()
            };
            let mut module = Module::new(format!("m{}_{}", layer, i)).with_requires(requires);
            for r in 0..resources {
                let (path, kind) = match r % 4 {
                    0 => (format!("pkg/C{}.class", r), ResourceKind::ClassOrResource),
                    1 => (format!("pkg/notes{}.txt", r), ResourceKind::ClassOrResource),
                    2 => (format!("conf/c{}.properties", r), ResourceKind::Config),
                    _ => (format!("lib/l{}.so", r), ResourceKind::NativeLib),
                };
                module = module.with_resource(path, kind, Content::bytes(vec![r as u8; 256]));
            }
            modules.push(module);
        }
    }
    match ModuleCatalog::new(modules) {
        Ok(c) => c,
        Err(e) => panic!("synthetic catalog: {}", e),
    }
}

fn top_roots(layers: usize, width: usize) -> Vec<String> {
    (0..width).map(|i| format!("m{}_{}", layers - 1, i)).collect()
}

fn bench_resolve(c: &mut Criterion) {
    let catalog = synthetic_catalog(20, 10, 0);
    let roots = top_roots(20, 10);

    let mut group = c.benchmark_group("resolve");
    group.bench_function("200_modules", |b| {
        b.iter(|| resolve(black_box(&catalog), black_box(&roots)).map(|r| r.len()))
    });
    group.bench_function("200_modules_load_order", |b| {
        b.iter(|| {
            resolve(&catalog, &roots).map(|r| r.graph().ordered_names().len())
        })
    });
    group.finish();
}

fn bench_pool(c: &mut Criterion) {
    let catalog = synthetic_catalog(10, 10, 40);
    let roots = top_roots(10, 10);
    let resolved = match resolve(&catalog, &roots) {
        Ok(r) => r,
        Err(e) => panic!("resolve: {}", e),
    };
    let pool = match ResourcePool::from_modules(&resolved) {
        Ok(p) => p,
        Err(e) => panic!("load pool: {}", e),
    };
    let pipeline = match Pipeline::configure(
        &PluginRegistry::builtin(),
        &[
            StageSpec::new("exclude-resources", "**/*.txt"),
            StageSpec::new("exclude-files", "regex:.*/lib/l[0-9]*3\\.so"),
        ],
    ) {
        Ok(p) => p,
        Err(e) => panic!("configure: {}", e),
    };

    let mut group = c.benchmark_group("pool");
    group.bench_function("load_4000_entries", |b| {
        b.iter(|| ResourcePool::from_modules(black_box(&resolved)).map(|p| p.len()))
    });
    group.bench_function("pipeline_2_stages", |b| {
        b.iter(|| pipeline.run(black_box(&pool)).map(|p| p.len()))
    });
    group.bench_function("digest", |b| b.iter(|| black_box(&pool).digest()));
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_pool);
criterion_main!(benches);
