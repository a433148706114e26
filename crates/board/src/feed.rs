//! Job feed
//!
//! Turns the notification channel's inbound transactions into a stream
//! of validated job listings. Every transaction body runs the same
//! pipeline:
//!
//! ```text
//! base64 body -> bag of cells -> notification -> validate against sender
//! ```
//!
//! The channel is a public mailbox, so garbage is expected traffic
//! rather than an error condition. A failure at any stage skips that
//! one entry with a reason and the feed carries on; a single mangled
//! message never takes the whole listing down.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonwork_boc::{parse_boc, BocError, Cell};
use tonwork_core::{Address, AddressParseError};

use crate::config::BoardConfig;
use crate::notify::{Notification, NotificationError};
use crate::validate::{validate, JobRecord, ValidationError};

/// One inbound transaction, as transport layers deliver it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Message body, base64-encoded bag of cells.
    pub body: String,

    /// Sender account, in raw or friendly form.
    pub sender: String,
}

/// Supplies the transaction history of an account.
///
/// Implementations wrap whatever transport is at hand; the feed only
/// needs the inbound messages of the notification channel, oldest
/// first.
pub trait TransactionSource {
    /// Iterator over the account's transactions.
    type Iter: Iterator<Item = RawTransaction>;

    /// Returns the inbound transactions of `account`.
    fn transactions(&self, account: &Address) -> Self::Iter;
}

/// A fixed in-memory transaction list.
///
/// Serves the same transactions for every account. Used to replay
/// captured traffic and as the test double for the feed pipeline.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    transactions: Vec<RawTransaction>,
}

impl StaticSource {
    /// Creates a source serving the given transactions.
    pub fn new(transactions: Vec<RawTransaction>) -> Self {
        StaticSource { transactions }
    }
}

impl TransactionSource for StaticSource {
    type Iter = std::vec::IntoIter<RawTransaction>;

    fn transactions(&self, _account: &Address) -> Self::Iter {
        self.transactions.clone().into_iter()
    }
}

/// Why the feed could not start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// A resume cursor was requested.
    #[error("resume from cursor {cursor} is not supported; replay the feed from the start")]
    ResumeNotSupported {
        /// The cursor that was asked for.
        cursor: u64,
    },
}

/// Why one notification was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The body was not valid base64.
    #[error("body transport decoding failed: {0}")]
    Transport(String),

    /// The body bytes were not a well-formed bag of cells.
    #[error("bad bag of cells: {0}")]
    Boc(#[from] BocError),

    /// The root cell did not parse as a notification.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// The sender field was not an address.
    #[error("bad sender address: {0}")]
    Sender(#[from] AddressParseError),

    /// The notification parsed but failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A transaction the feed rejected, with the stage that rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNotification {
    /// Sender field of the rejected transaction, verbatim.
    pub sender: String,

    /// The stage that rejected it.
    pub reason: SkipReason,
}

impl Serialize for SkippedNotification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("SkippedNotification", 2)?;
        s.serialize_field("sender", &self.sender)?;
        s.serialize_field("reason", &self.reason.to_string())?;
        s.end()
    }
}

/// One processed feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem {
    /// A notification that validated into a listing.
    Job(JobRecord),

    /// A notification rejected somewhere along the pipeline.
    Skipped(SkippedNotification),
}

impl FeedItem {
    /// The validated record, if this entry carries one.
    pub fn job(&self) -> Option<&JobRecord> {
        match self {
            FeedItem::Job(record) => Some(record),
            FeedItem::Skipped(_) => None,
        }
    }
}

/// Streaming view of the notification channel.
///
/// Yields one [`FeedItem`] per source transaction, in source order.
#[derive(Debug)]
pub struct JobFeed<I> {
    transactions: I,
    code: Arc<Cell>,
    config: BoardConfig,
}

impl<I: Iterator<Item = RawTransaction>> Iterator for JobFeed<I> {
    type Item = FeedItem;

    fn next(&mut self) -> Option<FeedItem> {
        let tx = self.transactions.next()?;
        Some(self.process(tx))
    }
}

impl<I: Iterator<Item = RawTransaction>> JobFeed<I> {
    fn process(&self, tx: RawTransaction) -> FeedItem {
        match self.try_process(&tx) {
            Ok(record) => {
                tracing::debug!(target: "tonwork::feed", job = %record.job, "Validated job posting");
                FeedItem::Job(record)
            }
            Err(reason) => {
                tracing::warn!(target: "tonwork::feed", reason = %reason, "Skipping notification");
                FeedItem::Skipped(SkippedNotification {
                    sender: tx.sender,
                    reason,
                })
            }
        }
    }

    fn try_process(&self, tx: &RawTransaction) -> Result<JobRecord, SkipReason> {
        let bytes = BASE64
            .decode(&tx.body)
            .map_err(|e| SkipReason::Transport(e.to_string()))?;
        let body = parse_boc(&bytes)?;
        let notification = Notification::parse(&body)?;
        let sender: Address = tx.sender.parse()?;
        Ok(validate(
            &notification,
            sender,
            &self.code,
            self.config.workchain,
        )?)
    }
}

/// Opens the job feed over `source`.
///
/// `resume_from` must be `None`: derivation needs the full history, so
/// cursors are rejected up front instead of silently producing a feed
/// that misses listings.
pub fn job_feed<S: TransactionSource>(
    source: &S,
    code: Arc<Cell>,
    config: &BoardConfig,
    resume_from: Option<u64>,
) -> Result<JobFeed<S::Iter>, FeedError> {
    if let Some(cursor) = resume_from {
        return Err(FeedError::ResumeNotSupported { cursor });
    }
    Ok(JobFeed {
        transactions: source.transactions(&config.notification_address),
        code,
        config: config.clone(),
    })
}
