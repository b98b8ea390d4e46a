use criterion::{Criterion, black_box, criterion_group, criterion_main};
use facegate_faceid::{best_match, cosine_similarity};

fn make_embedding(seed: f32, dim: usize) -> Vec<f32> {
    (0..dim).map(|i| ((i as f32) * 0.37 + seed).sin()).collect()
}

fn bench_cosine(c: &mut Criterion) {
    let a = make_embedding(0.0, 512);
    let b = make_embedding(1.0, 512);

    c.bench_function("faceid_cosine_512d", |bench| {
        bench.iter(|| {
            let _ = black_box(cosine_similarity(black_box(&a), black_box(&b)));
        });
    });
}

fn bench_best_match_full_population(c: &mut Criterion) {
    let probe = make_embedding(0.5, 512);
    let population: Vec<Vec<f32>> = (0..50).map(|i| make_embedding(i as f32, 512)).collect();

    c.bench_function("faceid_best_match_50x512d", |bench| {
        bench.iter(|| {
            let _ = black_box(best_match(
                black_box(&probe),
                population.iter().map(|v| v.as_slice()),
            ));
        });
    });
}

criterion_group!(benches, bench_cosine, bench_best_match_full_population);
criterion_main!(benches);
