//! Benchmarks for the comfort-first matchmaking engine: the full ten-player
//! generation pass (252 splits x 14,400 role permutations each) is the
//! hottest path in the crate and the one most worth tracking over time.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use draftcore::matchmaking::{MatchmakingEngine, PlayerProfiles};
use draftcore::profile::{Role, RoleProfile};
use uuid::Uuid;

fn players_with_spread(spread: i64) -> Vec<PlayerProfiles> {
    (0..10)
        .map(|i| {
            let user_id = Uuid::new_v4();
            let rating = 1000 + i * spread;
            let profiles: Vec<RoleProfile> = Role::ALL
                .into_iter()
                .map(|role| RoleProfile::new(user_id, role, rating, 3).unwrap())
                .collect();
            PlayerProfiles::from_role_profiles(user_id, &profiles).unwrap()
        })
        .collect()
}

fn bench_generate_tightly_matched(c: &mut Criterion) {
    let players = players_with_spread(0);
    c.bench_function("generate_identical_ratings", |b| {
        b.iter(|| {
            let batch = MatchmakingEngine::generate(black_box(&players), 42, 8).unwrap();
            black_box(batch);
        })
    });
}

fn bench_generate_by_rating_spread(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_by_rating_spread");
    for spread in [0, 25, 100].iter() {
        let players = players_with_spread(*spread);
        group.bench_with_input(BenchmarkId::from_parameter(spread), spread, |b, _| {
            b.iter(|| {
                let batch = MatchmakingEngine::generate(black_box(&players), 7, 8).unwrap();
                black_box(batch);
            })
        });
    }
    group.finish();
}

fn bench_generate_more(c: &mut Criterion) {
    let players = players_with_spread(50);
    let first = MatchmakingEngine::generate(&players, 3, 8).unwrap();
    c.bench_function("generate_more_excludes_seen", |b| {
        b.iter(|| {
            let more =
                MatchmakingEngine::generate_more(black_box(&players), &first.options, 3, 8).unwrap();
            black_box(more);
        })
    });
}

criterion_group!(
    benches,
    bench_generate_tightly_matched,
    bench_generate_by_rating_spread,
    bench_generate_more
);
criterion_main!(benches);
