//! Benchmarks for planning many contracts, sequential vs parallel.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use persistplan::{
    plan_all, ContractView, DomainKind, DomainType, InMemoryDomainModel, MappingPlanBuilder,
    MethodView, PlannerConfig,
};
use std::hint::black_box;

/// One aggregate per contract, each owning a line entity and a value object.
fn create_model(num_aggregates: usize) -> (InMemoryDomainModel, Vec<ContractView>) {
    let mut types = Vec::with_capacity(num_aggregates * 3);
    let mut contracts = Vec::with_capacity(num_aggregates);

    for i in 0..num_aggregates {
        let root = format!("Aggregate{i}");
        let namespace = format!("com.acme.bench{i}");
        types.push(
            DomainType::new(format!("{namespace}.{root}"), DomainKind::AggregateRoot)
                .with_property("id", "Long")
                .with_property("lines", &format!("List<Line{i}>"))
                .with_property("address", &format!("Address{i}"))
                .with_property("email", "String")
                .with_property("createdAt", "LocalDateTime")
                .with_property("version", "long"),
        );
        types.push(
            DomainType::new(format!("{namespace}.Line{i}"), DomainKind::Entity)
                .with_property("id", "Long")
                .with_aggregate(format!("{namespace}.{root}")),
        );
        types.push(
            DomainType::new(format!("{namespace}.Address{i}"), DomainKind::ValueObject)
                .with_property("street", "String")
                .with_property("city", "String"),
        );
        contracts.push(
            ContractView::new(format!("{namespace}.{root}Repository"))
                .with_method(MethodView::new("findById", &format!("Optional<{root}>")).with_param("id", "Long"))
                .with_method(
                    MethodView::new("findByEmailAndCreatedAt", &format!("List<{root}>"))
                        .with_param("email", "String")
                        .with_param("createdAt", "LocalDateTime"),
                ),
        );
    }

    (InMemoryDomainModel::new(types), contracts)
}

fn benchmark_planning(c: &mut Criterion) {
    let config = PlannerConfig::default();

    for (name, parallel) in [("plan_sequential", false), ("plan_parallel", true)] {
        let mut group = c.benchmark_group(name);
        for &size in &[10, 50, 200] {
            let (model, contracts) = create_model(size);
            let builder = MappingPlanBuilder::new(&model, &config);

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(size), &contracts, |b, contracts| {
                b.iter(|| black_box(plan_all(&builder, contracts, parallel)));
            });
        }
        group.finish();
    }
}

criterion_group!(benches, benchmark_planning);
criterion_main!(benches);
