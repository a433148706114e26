//! Shared fixtures for the pipeline suite
//!
//! One poster, one synthetic code cell, and helpers that turn a planned
//! posting into the transaction the channel's history would hand back.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tonwork_board::{plan_job_posting, BoardConfig, JobState, PostingPlan, RawTransaction};
use tonwork_boc::{encode_text, serialize_boc, Cell, CellBuilder};
use tonwork_core::Address;

/// Stake attached to every deploy message in the suite.
pub const STAKE: u64 = 100_000_000;

/// Synthetic job contract code: a 16-bit marker cell.
pub fn code_cell() -> Arc<Cell> {
    let mut b = CellBuilder::new();
    b.store_uint(0xC0DE, 16).unwrap();
    Arc::new(b.build())
}

/// The posting wallet used across the suite.
pub fn poster() -> Address {
    Address::new(0, [0xAB; 32])
}

/// A job state with the given description and key tail byte.
pub fn job_state(description: &str, key_tail: u8) -> JobState {
    let mut key = [0u8; 32];
    key[31] = key_tail;
    JobState {
        poster: poster(),
        value: 5_000_000_000,
        description: encode_text(description).unwrap(),
        auth_key: key,
    }
}

/// Plans a posting and returns it with the channel's view of its
/// notify leg.
pub fn posted_tx(state: &JobState, config: &BoardConfig) -> (PostingPlan, RawTransaction) {
    let plan = plan_job_posting(state, STAKE, &code_cell(), config).unwrap();
    let tx = RawTransaction {
        body: BASE64.encode(serialize_boc(&plan.notify.body)),
        sender: state.poster.to_friendly(),
    };
    (plan, tx)
}
