//! Honest-path coverage: what a poster plans is what a reader lists.

use tonwork_board::{job_feed, BoardConfig, FeedItem, StaticSource};

use crate::fixtures::{code_cell, job_state, posted_tx, poster};

#[test]
fn test_post_then_read_lists_job() {
    let config = BoardConfig::default();
    let state = job_state("fix bug", 1);
    let (plan, tx) = posted_tx(&state, &config);

    let source = StaticSource::new(vec![tx]);
    let items: Vec<_> = job_feed(&source, code_cell(), &config, None)
        .unwrap()
        .collect();

    assert_eq!(items.len(), 1);
    let record = items[0].job().unwrap();
    assert_eq!(record.job, plan.job_address());
    assert_eq!(record.poster, poster());
    assert_eq!(record.value, 5_000_000_000);
    assert_eq!(record.description, "fix bug");
}

#[test]
fn test_multiple_postings_all_listed_in_order() {
    let config = BoardConfig::default();
    let first = job_state("fix bug", 1);
    let second = job_state("write docs", 2);
    let (first_plan, first_tx) = posted_tx(&first, &config);
    let (second_plan, second_tx) = posted_tx(&second, &config);
    assert_ne!(first_plan.job_address(), second_plan.job_address());

    let source = StaticSource::new(vec![first_tx, second_tx]);
    let items: Vec<_> = job_feed(&source, code_cell(), &config, None)
        .unwrap()
        .collect();

    let jobs: Vec<_> = items.iter().filter_map(FeedItem::job).collect();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].job, first_plan.job_address());
    assert_eq!(jobs[1].job, second_plan.job_address());
    assert_eq!(jobs[1].description, "write docs");
}

#[test]
fn test_listing_survives_interleaved_garbage() {
    let config = BoardConfig::default();
    let (first_plan, first_tx) = posted_tx(&job_state("fix bug", 1), &config);
    let (second_plan, second_tx) = posted_tx(&job_state("write docs", 2), &config);

    let mut noise = first_tx.clone();
    noise.body = "@@not even base64@@".into();

    let source = StaticSource::new(vec![first_tx, noise, second_tx]);
    let items: Vec<_> = job_feed(&source, code_cell(), &config, None)
        .unwrap()
        .collect();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].job().unwrap().job, first_plan.job_address());
    assert!(items[1].job().is_none());
    assert_eq!(items[2].job().unwrap().job, second_plan.job_address());
}

#[test]
fn test_long_unicode_description_roundtrips() {
    // Force the description across several chained chunks.
    let text = "fix the flaky reconnect loop 修复重连 🐛 ".repeat(8);
    assert!(text.len() > 300);

    let config = BoardConfig::default();
    let (_, tx) = posted_tx(&job_state(&text, 7), &config);

    let source = StaticSource::new(vec![tx]);
    let items: Vec<_> = job_feed(&source, code_cell(), &config, None)
        .unwrap()
        .collect();

    assert_eq!(items[0].job().unwrap().description, text);
}

#[test]
fn test_masterchain_board_roundtrips() {
    let config = BoardConfig {
        workchain: -1,
        ..BoardConfig::default()
    };
    let (plan, tx) = posted_tx(&job_state("fix bug", 1), &config);
    assert_eq!(plan.job_address().workchain(), -1);

    let source = StaticSource::new(vec![tx]);
    let items: Vec<_> = job_feed(&source, code_cell(), &config, None)
        .unwrap()
        .collect();

    let record = items[0].job().unwrap();
    assert_eq!(record.job, plan.job_address());
}
