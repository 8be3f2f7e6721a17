use std::{sync::Arc, thread};

use itertools::Itertools;
use mmr_processor::{
    error::MmrError,
    matchmaking::generator::MatchGenerator,
    model::config::ProcessorConfig,
    processor::Processor,
    utils::test_utils::{generate_outlier_pool, generate_player, generate_pool, generate_tight_pool}
};

mod common;

#[test]
fn test_tight_pool_forms_a_match() {
    common::init_test_env();
    let processor = Processor::new(ProcessorConfig::default()).unwrap();
    for player in generate_tight_pool() {
        processor.add_to_pool(player).unwrap();
    }

    let m = processor.find_match().unwrap();

    assert!(m.quality.overall >= 0.8);
    assert_eq!(m.team_a.len(), 5);
    assert_eq!(m.team_b.len(), 5);
    assert_eq!(m.player_ids().into_iter().unique().count(), 10);
}

#[test]
fn test_outlier_pool_forms_nothing() {
    common::init_test_env();
    let processor = Processor::new(ProcessorConfig::default()).unwrap();
    for player in generate_outlier_pool() {
        processor.add_to_pool(player).unwrap();
    }

    assert!(matches!(processor.try_find_match(), Err(MmrError::NoQualifyingMatch { .. })));
    assert!(processor.find_match().is_none());
    assert_eq!(processor.pool_size(), 10);
}

#[test]
fn test_outlier_left_out_of_larger_pool() {
    common::init_test_env();
    let generator = MatchGenerator::new(Arc::new(ProcessorConfig::default()));
    let mut players = generate_tight_pool();
    players.extend(generate_pool(10, 2100.0, 80.0, 3).into_iter().map(|mut p| {
        p.id += 100;
        p
    }));
    let outlier = generate_player(999, 5200.0);
    players.push(outlier);

    if let Some(m) = generator.find_match(&players, 5) {
        assert!(!m.player_ids().contains(&999));
        assert!(m.quality.overall >= 0.8);
    }
}

#[test]
fn test_never_below_threshold() {
    common::init_test_env();
    let config = Arc::new(ProcessorConfig::default());
    let generator = MatchGenerator::new(config.clone());

    for seed in 0..12 {
        let spread = 100.0 + 150.0 * seed as f64;
        let players = generate_pool(30, 2500.0, spread, seed);

        if let Some(m) = generator.find_match(&players, 5) {
            assert!(m.quality.overall >= config.min_quality_threshold);
            assert_eq!(m.player_ids().into_iter().unique().count(), 10);
        }
    }
}

#[test]
fn test_search_is_deterministic() {
    common::init_test_env();
    let generator = MatchGenerator::new(Arc::new(ProcessorConfig {
        min_quality_threshold: 0.5,
        ..Default::default()
    }));
    let players = generate_pool(60, 2000.0, 400.0, 11);
    let reversed = players.iter().rev().cloned().collect_vec();

    let first = generator.find_match(&players, 5).unwrap();
    let second = generator.find_match(&reversed, 5).unwrap();

    assert_eq!(first.team_a, second.team_a);
    assert_eq!(first.team_b, second.team_b);
    assert_eq!(first.quality, second.quality);
}

#[test]
fn test_concurrent_queueing() {
    common::init_test_env();
    let processor = Arc::new(Processor::new(ProcessorConfig::default()).unwrap());

    let handles = (0..4)
        .map(|t| {
            let processor = Arc::clone(&processor);
            thread::spawn(move || {
                for i in 0..50 {
                    let id = t * 50 + i + 1;
                    processor.add_to_pool(generate_player(id, 2000.0)).unwrap();
                    if i % 5 == 0 {
                        processor.remove_from_pool(id).unwrap();
                    }
                }
            })
        })
        .collect_vec();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(processor.pool_size(), 160);
    assert_eq!(processor.remove_from_pool(1), Err(MmrError::NotFound(1)));
    assert_eq!(
        processor.add_to_pool(generate_player(2, 2000.0)),
        Err(MmrError::DuplicateEntry(2))
    );
}

#[test]
fn test_concurrent_matchmaking_never_shares_players() {
    common::init_test_env();
    let processor = Arc::new(
        Processor::new(ProcessorConfig {
            min_quality_threshold: 0.5,
            ..Default::default()
        })
        .unwrap()
    );
    for player in generate_pool(100, 2000.0, 200.0, 21) {
        processor.add_to_pool(player).unwrap();
    }

    let handles = (0..4)
        .map(|_| {
            let processor = Arc::clone(&processor);
            thread::spawn(move || {
                (0..3)
                    .filter_map(|_| processor.find_match())
                    .flat_map(|m| m.player_ids())
                    .collect_vec()
            })
        })
        .collect_vec();
    let matched = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect_vec();

    assert_eq!(matched.iter().unique().count(), matched.len());
    assert_eq!(processor.pool_size() + matched.len(), 100);
}
