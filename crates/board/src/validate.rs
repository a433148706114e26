//! Notification validation
//!
//! Anyone can message the notification channel and claim any job
//! address. Validation closes that hole: rebuild the job state from the
//! claimed fields with the sender as poster, re-derive the contract
//! address, and require an exact match. A notification that survives is
//! backed by a real state commitment; one that does not is forged or
//! corrupted.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonwork_boc::{Cell, CellBuildError, TextError};
use tonwork_core::Address;

use crate::notify::Notification;
use crate::state::JobState;

/// A notification whose claimed address is not backed by its fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("claimed job address {claimed} does not match derived {derived}")]
pub struct InvalidNotification {
    /// Address the notification claimed.
    pub claimed: Address,

    /// Address derived from the notification's own fields.
    pub derived: Address,

    /// Sender treated as the poster during derivation.
    pub poster: Address,

    /// Decoded job description.
    pub description: String,
}

/// Why a notification failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The claimed address does not match the derived one.
    #[error(transparent)]
    Mismatch(#[from] InvalidNotification),

    /// The claimed fields cannot form a job state cell.
    #[error("failed to rebuild job state: {0}")]
    Rebuild(#[from] CellBuildError),

    /// The description chain is not valid text.
    #[error("failed to decode description: {0}")]
    Description(#[from] TextError),
}

/// A validated job posting, ready to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Verified address of the job contract.
    pub job: Address,

    /// Account that posted the job.
    pub poster: Address,

    /// Offered payment in base units.
    pub value: u64,

    /// Job description text.
    pub description: String,
}

/// Checks a notification against the sender that delivered it.
///
/// The sender of the enclosing message is taken as the poster; a forger
/// cannot claim someone else's job because the derivation would then
/// require the victim's address as sender.
pub fn validate(
    notification: &Notification,
    poster: Address,
    code: &Arc<Cell>,
    workchain: i8,
) -> Result<JobRecord, ValidationError> {
    let description = notification.description_text()?;
    let state = JobState {
        poster,
        value: notification.value,
        description: notification.description.clone(),
        auth_key: notification.auth_key,
    };
    let derived = state.derive_address(code, workchain)?;
    if derived != notification.job {
        return Err(InvalidNotification {
            claimed: notification.job,
            derived,
            poster,
            description,
        }
        .into());
    }
    Ok(JobRecord {
        job: derived,
        poster,
        value: notification.value,
        description,
    })
}
