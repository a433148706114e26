//! Tonwork - Peer-verifiable job board on the TON cell-tree ledger
//!
//! Tonwork implements a job board with no server. A job is a contract
//! whose address commits to its initial state; a public notification
//! channel carries announcements, and every reader re-derives each
//! claimed address before listing it. Forged announcements fall out of
//! the feed on their own.
//!
//! # Quick Start
//!
//! ```ignore
//! use tonwork::{job_feed, plan_job_posting, BoardConfig, JobState};
//!
//! // Posting side: derive the contract and plan the wallet messages
//! let state = JobState { poster, value, description, auth_key };
//! let plan = plan_job_posting(&state, stake, &code, &config)?;
//!
//! // Reading side: replay the channel into validated listings
//! let feed = job_feed(&source, code, &config, None)?;
//! let jobs: Vec<_> = feed.filter_map(|item| item.job().cloned()).collect();
//! ```
//!
//! # Architecture
//!
//! Three layers, each a crate:
//!
//! - `tonwork-core`: addresses and protocol limits,
//! - `tonwork-boc`: cells, builders, slices, text chains, and the
//!   bag-of-cells wire format,
//! - `tonwork-board`: job state, address derivation, notifications,
//!   validation, and the feed.
//!
//! Everything re-exported here; the member crates stay usable on their
//! own for callers that only need the cell layer.

// Re-export the public API from the member crates
pub use tonwork_board::*;
pub use tonwork_boc::*;
pub use tonwork_core::*;
