//! Forgery coverage: claims without a backing state commitment never
//! reach the listing, and never take down the feed either.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tonwork_board::{
    job_feed, BoardConfig, FeedItem, Notification, RawTransaction, SkipReason, StaticSource,
    ValidationError,
};
use tonwork_boc::{encode_text, parse_boc, serialize_boc, CellBuilder};
use tonwork_core::Address;

use crate::fixtures::{code_cell, job_state, posted_tx};

fn read(config: &BoardConfig, transactions: Vec<RawTransaction>) -> Vec<FeedItem> {
    let source = StaticSource::new(transactions);
    job_feed(&source, code_cell(), config, None)
        .unwrap()
        .collect()
}

fn expect_skip(item: &FeedItem) -> &SkipReason {
    match item {
        FeedItem::Skipped(skip) => &skip.reason,
        other => panic!("expected skip, got {other:?}"),
    }
}

#[test]
fn test_inflated_value_is_skipped() {
    let config = BoardConfig::default();
    let (_, tx) = posted_tx(&job_state("fix bug", 1), &config);

    // Replay the honest announcement with a sweeter offer.
    let body = parse_boc(&BASE64.decode(&tx.body).unwrap()).unwrap();
    let mut forged = Notification::parse(&body).unwrap();
    forged.value *= 10;
    let forged_tx = RawTransaction {
        body: BASE64.encode(serialize_boc(&forged.to_cell().unwrap())),
        sender: tx.sender.clone(),
    };

    let items = read(&config, vec![forged_tx]);
    assert!(matches!(
        expect_skip(&items[0]),
        SkipReason::Validation(ValidationError::Mismatch(_))
    ));
}

#[test]
fn test_swapped_description_is_skipped() {
    let config = BoardConfig::default();
    let (_, tx) = posted_tx(&job_state("fix bug", 1), &config);

    let body = parse_boc(&BASE64.decode(&tx.body).unwrap()).unwrap();
    let mut forged = Notification::parse(&body).unwrap();
    forged.description = encode_text("totally different work").unwrap();
    let forged_tx = RawTransaction {
        body: BASE64.encode(serialize_boc(&forged.to_cell().unwrap())),
        sender: tx.sender.clone(),
    };

    let items = read(&config, vec![forged_tx]);
    assert!(matches!(
        expect_skip(&items[0]),
        SkipReason::Validation(ValidationError::Mismatch(_))
    ));
}

#[test]
fn test_relayed_claim_from_other_wallet_is_skipped() {
    // A different wallet relays an honest body verbatim. The derivation
    // then runs with the relayer as poster and misses the claim.
    let config = BoardConfig::default();
    let (_, mut tx) = posted_tx(&job_state("fix bug", 1), &config);
    tx.sender = Address::new(0, [0xCD; 32]).to_friendly();

    let items = read(&config, vec![tx]);
    assert!(matches!(
        expect_skip(&items[0]),
        SkipReason::Validation(ValidationError::Mismatch(_))
    ));
}

#[test]
fn test_plain_text_message_is_skipped() {
    // Someone chats at the channel. Well-formed cells, not a
    // notification.
    let config = BoardConfig::default();
    let body = BASE64.encode(serialize_boc(&encode_text("hello board").unwrap()));
    let tx = RawTransaction {
        body,
        sender: Address::new(0, [0x01; 32]).to_friendly(),
    };

    let items = read(&config, vec![tx]);
    assert!(matches!(
        expect_skip(&items[0]),
        SkipReason::Notification(_)
    ));
}

#[test]
fn test_reader_with_different_code_skips_honest_posting() {
    // Readers and posters must agree on the contract code; a reader
    // pinned to other code derives other addresses.
    let config = BoardConfig::default();
    let (_, tx) = posted_tx(&job_state("fix bug", 1), &config);

    let mut b = CellBuilder::new();
    b.store_uint(0xBEEF, 16).unwrap();
    let other_code = Arc::new(b.build());

    let source = StaticSource::new(vec![tx]);
    let items: Vec<_> = job_feed(&source, other_code, &config, None)
        .unwrap()
        .collect();
    assert!(items[0].job().is_none());
}

#[test]
fn test_skips_serialize_for_audit_logs() {
    let config = BoardConfig::default();
    let tx = RawTransaction {
        body: "))) nonsense (((".into(),
        sender: "also nonsense".into(),
    };

    let items = read(&config, vec![tx]);
    match &items[0] {
        FeedItem::Skipped(skip) => {
            let json = serde_json::to_string(skip).unwrap();
            assert!(json.contains("\"sender\":\"also nonsense\""));
            assert!(json.contains("body transport decoding failed"));
        }
        other => panic!("expected skip, got {other:?}"),
    }
}
