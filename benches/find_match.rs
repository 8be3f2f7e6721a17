use std::{hint::black_box, sync::Arc};

use criterion::{criterion_group, criterion_main, Criterion};
use mmr_processor::{
    matchmaking::generator::MatchGenerator, model::config::ProcessorConfig, utils::test_utils::generate_pool
};

fn find_match(generator: &MatchGenerator, count_players: usize) {
    let players = generate_pool(count_players, 2500.0, 800.0, count_players as u64);
    black_box(generator.find_match(&players, 5));
}

fn group_call(c: &mut Criterion) {
    let generator = MatchGenerator::new(Arc::new(ProcessorConfig::default()));

    let mut group = c.benchmark_group("find-match");
    group.sample_size(25);
    group.bench_function("find_match: p=10", |b| b.iter(|| find_match(&generator, 10)));
    group.bench_function("find_match: p=100", |b| b.iter(|| find_match(&generator, 100)));
    group.bench_function("find_match: p=500", |b| b.iter(|| find_match(&generator, 500)));
    group.finish();
}

criterion_group!(benches, group_call);
criterion_main!(benches);
