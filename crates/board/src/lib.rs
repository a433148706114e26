//! Peer-verifiable job board
//!
//! The board has no server. Jobs live as contracts whose addresses
//! commit to their initial state, and a public notification channel
//! carries announcements. This crate implements both sides of that
//! protocol: planning the messages that list a job, and replaying the
//! channel into validated listings that anyone can re-check.
//!
//! Reading end:
//!
//! - [`job_feed`] streams a [`TransactionSource`] into [`FeedItem`]s,
//! - [`validate`] re-derives a claimed job address from its fields.
//!
//! Writing end:
//!
//! - [`JobState`] describes a job and derives its contract address,
//! - [`plan_job_posting`] produces the deploy and notify messages.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod config;
pub mod feed;
pub mod notify;
pub mod post;
pub mod state;
pub mod validate;

pub use code::{code_from_bytes, load_code_cell, CodeError};
pub use config::{BoardConfig, JOB_NOTIFICATIONS, NOTIFICATION_FEE};
pub use feed::{
    job_feed, FeedError, FeedItem, JobFeed, RawTransaction, SkipReason, SkippedNotification,
    StaticSource, TransactionSource,
};
pub use notify::{Notification, NotificationError};
pub use post::{plan_job_posting, OutboundMessage, PostingPlan};
pub use state::JobState;
pub use validate::{validate, InvalidNotification, JobRecord, ValidationError};
