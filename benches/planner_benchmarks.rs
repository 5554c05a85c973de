//! Performance benchmarks for the recommendation pipeline
//!
//! Covers the planner over catalogs of increasing size, both when an exact
//! match exists and when the whole ladder is walked down to the fallback,
//! plus a full engine call over the in-memory store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeSet;
use std::sync::Arc;
use tripmatch_core::{
    CatalogEntry, CatalogStore, FeedbackAggregate, InMemoryStore, LikelihoodScorer, NewTrip, Query,
    RecommendationEngine, RelaxationPlanner, TravelType, TripCandidate, TripId, TripmatchConfig,
};

const TYPES: [TravelType; 3] = [TravelType::Leisure, TravelType::Adventure, TravelType::Family];

fn catalog(size: usize) -> Vec<CatalogEntry> {
    (0..size)
        .map(|i| CatalogEntry {
            trip: TripCandidate {
                id: TripId(i as u64 + 1),
                destination: format!("trip {}", i),
                budget: 5_000.0 + (i % 50) as f64 * 1_000.0,
                days: 2 + (i % 12) as u32,
                travel_type: TYPES[i % TYPES.len()],
                interests: BTreeSet::new(),
                base_popularity: (i % 100) as f64 / 100.0,
                itinerary: vec![],
            },
            aggregate: FeedbackAggregate {
                like_count: (i % 7) as u64,
                dislike_count: (i % 3) as u64,
                rating_sum: (i % 7 + i % 3) as u64 * 4,
                rating_count: (i % 7 + i % 3) as u64,
            },
        })
        .collect()
}

fn bench_planner(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner");
    let planner = RelaxationPlanner::default();
    let scorer = LikelihoodScorer::default();

    let exact = Query::new(20_000.0, 5, TravelType::Leisure, Vec::<String>::new()).unwrap();
    let unmatched = Query::new(100.0, 40, TravelType::Romantic, Vec::<String>::new()).unwrap();

    for size in [100, 1_000, 10_000] {
        let entries = catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("exact", size), &entries, |b, entries| {
            b.iter(|| planner.plan(black_box(&exact), entries, &scorer).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("fallback", size), &entries, |b, entries| {
            b.iter(|| planner.plan(black_box(&unmatched), entries, &scorer).unwrap())
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let store = Arc::new(InMemoryStore::new());
    tokio_test::block_on(async {
        for entry in catalog(1_000) {
            let trip = entry.trip;
            store
                .insert_trip(NewTrip {
                    id: Some(trip.id),
                    destination: trip.destination,
                    budget: trip.budget,
                    days: trip.days,
                    travel_type: trip.travel_type,
                    interests: trip.interests,
                    base_popularity: trip.base_popularity,
                    itinerary: trip.itinerary,
                })
                .await
                .unwrap();
        }
    });

    let engine = RecommendationEngine::new(store, &TripmatchConfig::default());
    let query = Query::new(20_000.0, 5, TravelType::Leisure, Vec::<String>::new()).unwrap();

    c.bench_function("engine_recommend_1000", |b| {
        b.iter(|| runtime.block_on(engine.recommend(black_box(&query))).unwrap())
    });
}

criterion_group!(benches, bench_planner, bench_engine);
criterion_main!(benches);
