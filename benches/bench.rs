// Criterion benchmarks for Flirtify Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flirtify_match::core::{cosine_similarity, CompatibilityScorer, Matcher};
use flirtify_match::models::MatchCandidate;
use flirtify_match::{AudioFeatures, MusicProfile};

const ARTISTS: [&str; 12] = [
    "Taylor Swift", "Ed Sheeran", "Ariana Grande", "The Weeknd", "Drake", "Dua Lipa",
    "Doja Cat", "Post Malone", "Adele", "Billie Eilish", "Harry Styles", "SZA",
];
const GENRES: [&str; 8] = ["pop", "dance pop", "pop rock", "r&b", "hip hop", "trap", "indie", "soul"];

fn create_profile(id: usize) -> MusicProfile {
    let artists: Vec<&str> = (0..5).map(|i| ARTISTS[(id + i * 3) % ARTISTS.len()]).collect();
    let tracks: Vec<String> = (0..10).map(|i| format!("Track {}", (id * 7 + i) % 40)).collect();
    let genres: Vec<&str> = (0..3).map(|i| GENRES[(id + i) % GENRES.len()]).collect();
    let audio = AudioFeatures::new(
        (id % 10) as f64 / 10.0,
        ((id + 3) % 10) as f64 / 10.0,
        ((id + 7) % 10) as f64 / 10.0,
    );

    MusicProfile::new(artists, tracks, genres, Some(audio))
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let a = AudioFeatures::new(0.8, 0.7, 0.6);
    let b = AudioFeatures::new(0.75, 0.8, 0.65);

    c.bench_function("cosine_similarity", |bench| {
        bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_pair_score(c: &mut Criterion) {
    let scorer = CompatibilityScorer::with_defaults();
    let p1 = create_profile(1);
    let p2 = create_profile(4);

    c.bench_function("pair_score", |b| {
        b.iter(|| scorer.score(black_box(&p1), black_box(&p2)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_scorer();
    let seeker = create_profile(0);

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000].iter() {
        let candidates: Vec<MatchCandidate> = (1..=*candidate_count)
            .map(|i| MatchCandidate {
                user_id: format!("user_{}", i),
                username: None,
                profile: create_profile(i),
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("rank", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank(
                        black_box("user_0"),
                        black_box(&seeker),
                        black_box(candidates.clone()),
                        black_box(20),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_cosine_similarity, bench_pair_score, bench_ranking);

criterion_main!(benches);
