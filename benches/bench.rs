//! Criterion benchmarks for the gamerec engine.
//!
//! Covers the hot paths of a recommendation request:
//! - Fitting the preference model from a ledger snapshot
//! - Ranking the catalog for one user
//! - Content neighbours from a tag-derived similarity index

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gamerec::prelude::*;

const TAGS: &[&str] = &[
    "Action",
    "Adventure",
    "RPG",
    "Strategy",
    "Simulation",
    "Puzzle",
    "FPS",
    "Co-op",
    "Multiplayer",
    "Singleplayer",
    "Indie",
    "Horror",
    "Sci-fi",
    "Fantasy",
    "Racing",
    "Sports",
];

/// Generate a catalog with a few random tags per item.
fn generate_catalog(count: usize, rng: &mut StdRng) -> CatalogStore {
    let items = (0..count as u64)
        .map(|id| {
            let tags: Vec<&str> = (0..3)
                .map(|_| TAGS[rng.random_range(0..TAGS.len())])
                .collect();
            Item::new(id, format!("Game {id}")).with_tags(tags)
        })
        .collect();
    CatalogStore::new(items).unwrap()
}

/// Generate random binary feedback.
fn generate_ratings(users: u64, items: u64, per_user: usize, rng: &mut StdRng) -> Vec<Rating> {
    let mut ratings = Vec::with_capacity(users as usize * per_user);
    for user in 0..users {
        for _ in 0..per_user {
            let item = rng.random_range(0..items);
            let label = Label::from_recommended(rng.random_bool(0.7));
            ratings.push(Rating::new(user, item, label));
        }
    }
    ratings
}

fn bench_fit(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let ratings = generate_ratings(200, 500, 20, &mut rng);

    let mut group = c.benchmark_group("fit");
    group.throughput(Throughput::Elements(ratings.len() as u64));

    for n_factors in [10, 50, 100] {
        let config = FactorizationConfig {
            n_factors,
            ..Default::default()
        };
        group.bench_function(format!("factors_{n_factors}"), |b| {
            b.iter(|| PreferenceModel::fit(black_box(config.clone()), black_box(&ratings)).unwrap())
        });
    }

    group.finish();
}

fn bench_recommend(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let catalog = Arc::new(generate_catalog(2000, &mut rng));
    let similarity = Arc::new(SimilarityIndex::from_tag_cosine(&catalog, 0.3));
    let ledger = FeedbackLedger::from_ratings(generate_ratings(200, 2000, 20, &mut rng));
    let recommender = Recommender::new(catalog.clone(), similarity);

    let mut session = Session::new(0, ledger);
    session.ensure_fitted().unwrap();

    let mut group = c.benchmark_group("recommend");
    group.throughput(Throughput::Elements(catalog.len() as u64));

    group.bench_function("for_user", |b| {
        b.iter(|| {
            recommender
                .recommend_for_user(&mut session, None, black_box(10), &TagFilter::none())
                .unwrap()
        })
    });

    let filter = TagFilter::any(["RPG", "Co-op"]);
    group.bench_function("for_user_tag_filtered", |b| {
        b.iter(|| {
            recommender
                .recommend_for_user(&mut session, None, black_box(10), &filter)
                .unwrap()
        })
    });

    group.bench_function("by_content", |b| {
        b.iter(|| recommender.recommend_by_content(black_box(0), 10).unwrap())
    });

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let catalog = generate_catalog(1000, &mut rng);

    c.bench_function("similarity/from_tag_cosine_1000", |b| {
        b.iter(|| SimilarityIndex::from_tag_cosine(black_box(&catalog), 0.0))
    });
}

criterion_group!(benches, bench_fit, bench_recommend, bench_similarity);
criterion_main!(benches);
