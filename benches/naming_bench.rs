use cecilifier_core::{ElementKind, GenericInstantiationCache, Handle, InstantiationKey, NamingService};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_synthesize(c: &mut Criterion) {
    c.bench_function("synthesize_1000_names", |b| {
        b.iter(|| {
            let naming = NamingService::default();
            for i in 0..1000 {
                let kind = if i % 2 == 0 { ElementKind::Local } else { ElementKind::MemberReference };
                black_box(naming.synthesize(black_box("GetEnumerator"), kind));
            }
        })
    });
}

fn benchmark_cache_hits(c: &mut Criterion) {
    let cache: GenericInstantiationCache = GenericInstantiationCache::new();
    let keys: Vec<InstantiationKey> = (0..64)
        .map(|i| InstantiationKey::new("System.Collections.Generic.List`1", vec![format!("T{}", i)]))
        .collect();
    for key in &keys {
        cache.get_or_create(key, (), |k, _| Handle::new(format!("gi_{}", k.type_arguments[0])));
    }

    c.bench_function("generic_cache_hits", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(cache.get_or_create(key, (), |_, _| Handle::new("unreachable")));
            }
        })
    });
}

criterion_group!(benches, benchmark_synthesize, benchmark_cache_hits);
criterion_main!(benches);
