use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use sanctions_network::{
    Entity, EntityKind, FuzzyMatcher, IdentityGraph, RelationshipEdge, ResolutionConfig,
    Screening, ScreeningInput,
};

const WORDS: &[&str] = &[
    "NORTH", "STAR", "TRADING", "MARITIME", "HOLDINGS", "ENERGY", "CAPITAL", "BALTIC", "URAL",
    "GLOBAL", "PETRO", "INVEST", "LOGISTICS", "SHIPPING", "METALS", "FINANCE",
];

/// Deterministic three-word company name.
fn name(seed: usize) -> String {
    let a = WORDS[seed % WORDS.len()];
    let b = WORDS[(seed / WORDS.len()) % WORDS.len()];
    let c = WORDS[(seed * 7 + 3) % WORDS.len()];
    format!("{a} {b} {c} {seed} Ltd")
}

fn registry(size: usize) -> Vec<Entity> {
    (0..size)
        .map(|i| {
            Entity::new(format!("r{i}"), EntityKind::Company)
                .with_display_name(name(i))
                .with_jurisdiction(if i % 5 == 0 { "vg" } else { "gb" })
        })
        .collect()
}

fn sanctioned(size: usize) -> Vec<Entity> {
    (0..size)
        .map(|i| {
            Entity::new(format!("s{i}"), EntityKind::Company)
                .with_name(name(i * 13))
                .with_alias(name(i * 13 + 1))
                .sanctioned()
        })
        .collect()
}

fn bench_fuzzy(c: &mut Criterion) {
    let registry = registry(2_000);
    let sanctioned = sanctioned(64);
    let matcher = FuzzyMatcher::new(&registry, 85).unwrap();

    let mut group = c.benchmark_group("matching/fuzzy");
    group.throughput(Throughput::Elements(sanctioned.len() as u64));
    group.sample_size(20);
    for workers in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                let matches = matcher
                    .match_all_parallel(black_box(&sanctioned), workers)
                    .unwrap();
                black_box(matches.len())
            });
        });
    }
    group.finish();
}

/// Random-looking but deterministic ownership forest with a few sanctioned roots.
fn ownership_graph(nodes: usize) -> IdentityGraph {
    let mut graph = IdentityGraph::new();
    let entities: Vec<Entity> = (0..nodes)
        .map(|i| {
            let entity = Entity::new(format!("n{i}"), EntityKind::Company);
            if i % 50 == 0 {
                entity.sanctioned()
            } else {
                entity
            }
        })
        .collect();
    graph.add_entities(&entities);
    let edges: Vec<RelationshipEdge> = (1..nodes)
        .flat_map(|i| {
            let parent = (i * 31 + 7) % i;
            let cross = (i * 17) % nodes;
            [
                RelationshipEdge::new(format!("n{parent}"), format!("n{i}"), "owns"),
                RelationshipEdge::new(format!("n{i}"), format!("n{cross}"), "associate_of"),
            ]
        })
        .collect();
    graph.add_relationships(&edges);
    graph
}

fn bench_analytics(c: &mut Criterion) {
    let graph = ownership_graph(1_000);

    let mut group = c.benchmark_group("analytics");
    group.sample_size(10);
    group.bench_function("hubs", |b| b.iter(|| black_box(graph.hubs(20))));
    group.bench_function("betweenness", |b| {
        b.iter(|| black_box(graph.betweenness_centrality()));
    });
    group.bench_function("communities", |b| b.iter(|| black_box(graph.communities(42))));
    group.bench_function("exposure", |b| b.iter(|| black_box(graph.sanctions_exposure())));
    group.bench_function("paths_depth_3", |b| {
        b.iter(|| black_box(graph.sanction_paths(3).take(10_000).count()));
    });
    group.finish();
}

fn bench_screening(c: &mut Criterion) {
    let input = ScreeningInput {
        sanctioned: sanctioned(32),
        registry: registry(500),
        relationships: (1..500)
            .map(|i| RelationshipEdge::new(format!("r{i}"), format!("r{}", i / 2), "owned_by"))
            .collect(),
    };
    let screening = Screening::new(ResolutionConfig::default()).unwrap();

    c.bench_function("screening/run", |b| {
        b.iter(|| {
            let outcome = screening.run(black_box(&input)).unwrap();
            black_box(outcome.graph.edge_count())
        });
    });
}

criterion_group!(benches, bench_fuzzy, bench_analytics, bench_screening);
criterion_main!(benches);
