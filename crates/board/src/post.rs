//! Posting plan
//!
//! Listing a job takes two outbound messages from the poster's wallet:
//! first a deploy carrying the state-init and the stake to the derived
//! contract address, then a notification to the channel so peers can
//! discover the job. This module computes both without talking to any
//! network; signing and sending stay with the wallet.

use std::sync::Arc;

use tonwork_boc::{Cell, CellBuildError};
use tonwork_core::Address;

use crate::config::BoardConfig;
use crate::notify::Notification;
use crate::state::JobState;

/// An unsigned outbound message a wallet should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Destination account.
    pub destination: Address,

    /// Amount attached, in base units.
    pub value: u64,

    /// State-init to deploy with, when the destination is new.
    pub state_init: Option<Arc<Cell>>,

    /// Message body.
    pub body: Arc<Cell>,
}

/// The two messages that list a job, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    /// Deploys the job contract with the stake.
    pub deploy: OutboundMessage,

    /// Announces the job on the notification channel.
    pub notify: OutboundMessage,
}

impl PostingPlan {
    /// Address the job contract will live at.
    pub fn job_address(&self) -> Address {
        self.deploy.destination
    }
}

/// Plans the two messages that list `state` as a job.
///
/// `stake` is the amount locked into the contract at deploy time; the
/// notification fee comes from `config`.
pub fn plan_job_posting(
    state: &JobState,
    stake: u64,
    code: &Arc<Cell>,
    config: &BoardConfig,
) -> Result<PostingPlan, CellBuildError> {
    let state_init = state.state_init(code)?;
    let job = Address::new(config.workchain, state_init.repr_hash());

    let deploy = OutboundMessage {
        destination: job,
        value: stake,
        state_init: Some(state_init),
        body: Cell::empty(),
    };

    let notification = Notification {
        job,
        value: state.value,
        description: state.description.clone(),
        auth_key: state.auth_key,
    };
    let notify = OutboundMessage {
        destination: config.notification_address,
        value: config.notification_fee,
        state_init: None,
        body: notification.to_cell()?,
    };

    Ok(PostingPlan { deploy, notify })
}
