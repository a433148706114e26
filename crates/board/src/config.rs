//! Board configuration
//!
//! Everything environment-specific lives here: which notification channel
//! to watch, which workchain jobs deploy to, and the fee attached to a
//! notification. The feed and the posting planner take a `BoardConfig`
//! explicitly, so tests run against synthetic channels without touching
//! the well-known one.

use serde::{Deserialize, Serialize};
use tonwork_core::Address;

/// The well-known mainnet notification channel.
///
/// A vanity account whose friendly form reads
/// `EQA__RATELANCE_______________________________JvN`; every job posting
/// announces itself with a message to this address.
pub const JOB_NOTIFICATIONS: Address = Address::new(
    0,
    [
        0x3F, 0xFD, 0x10, 0x13, 0x10, 0xB0, 0x0D, 0x08, 0x4F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFC,
    ],
);

/// Default fee attached to a notification message, in base units (0.05).
pub const NOTIFICATION_FEE: u64 = 50_000_000;

/// Board-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Channel observed for job announcements.
    pub notification_address: Address,

    /// Workchain job contracts deploy to.
    pub workchain: i8,

    /// Amount attached to the notification message, in base units.
    pub notification_fee: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            notification_address: JOB_NOTIFICATIONS,
            workchain: 0,
            notification_fee: NOTIFICATION_FEE,
        }
    }
}
