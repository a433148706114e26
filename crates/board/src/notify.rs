//! Notification message body
//!
//! A posting wallet announces its new job by messaging the notification
//! channel. The body carries everything a peer needs to re-derive the
//! job address and decide whether the announcement is honest:
//!
//! ```text
//! +----------------+--------+-----------+----------+
//! | job address    | value  | ref: desc | auth key |
//! | 267 bits       | 64 bits|           | 256 bits |
//! +----------------+--------+-----------+----------+
//! ```
//!
//! Parsing is strict: leftover bits or refs after the key mean the body
//! is not a notification, not a notification with extras.

use std::sync::Arc;

use thiserror::Error;
use tonwork_boc::{decode_text, Cell, CellBuildError, CellBuilder, CellError, TextError};
use tonwork_core::Address;

/// A malformed notification body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed notification: {0}")]
pub struct NotificationError(#[from] pub CellError);

/// A parsed job announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Address the announcement claims the job contract lives at.
    pub job: Address,

    /// Offered payment in base units.
    pub value: u64,

    /// Job description, as a text cell chain.
    pub description: Arc<Cell>,

    /// Public key authorized to manage the job.
    pub auth_key: [u8; 32],
}

impl Notification {
    /// Parses a message body into a notification.
    pub fn parse(body: &Cell) -> Result<Self, NotificationError> {
        let mut slice = body.begin_parse();
        let job = slice.load_address()?;
        let value = slice.load_uint(64)?;
        let description = slice.load_ref()?.clone();
        let auth_key = slice.load_uint256()?;
        slice.ensure_empty()?;
        Ok(Notification {
            job,
            value,
            description,
            auth_key,
        })
    }

    /// Builds the message body for this notification.
    pub fn to_cell(&self) -> Result<Arc<Cell>, CellBuildError> {
        let mut b = CellBuilder::new();
        b.store_address(&self.job)?
            .store_uint(self.value, 64)?
            .store_ref(self.description.clone())?
            .store_uint256(&self.auth_key)?;
        Ok(Arc::new(b.build()))
    }

    /// Decodes the description chain into text.
    pub fn description_text(&self) -> Result<String, TextError> {
        decode_text(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use tonwork_boc::{encode_text, parse_boc, serialize_boc};

    const BODY_B64: &str = "te6ccgEBAgEAVgABk4AJWcZRblGmxlbiMXge2CnKDhSK/yHcZAo92JGiYsMaXqAAAAAlQL5AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAwAQAOZml4IGJ1Zw==";

    fn sample() -> Notification {
        let job: Address = "EQBKzjKLco02MrcRi8D2wU5QcKRX-Q7jIFHuxI0TFhjS9aSB"
            .parse()
            .unwrap();
        let mut key = [0u8; 32];
        key[31] = 1;
        Notification {
            job,
            value: 5_000_000_000,
            description: encode_text("fix bug").unwrap(),
            auth_key: key,
        }
    }

    fn hex(bytes: &[u8; 32]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    // === Roundtrip ===

    #[test]
    fn test_notification_roundtrip() {
        let original = sample();
        let body = original.to_cell().unwrap();
        assert_eq!(body.bit_len(), 587);
        let parsed = Notification::parse(&body).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.description_text().unwrap(), "fix bug");
    }

    #[test]
    fn test_body_matches_known_vector() {
        let body = sample().to_cell().unwrap();
        assert_eq!(
            hex(&body.repr_hash()),
            "a3a80447541228c054d492eccca321cd4af8944d8ad3873790c9354b5b24b089"
        );
        assert_eq!(BASE64.encode(serialize_boc(&body)), BODY_B64);
    }

    #[test]
    fn test_parse_wire_vector() {
        let bytes = BASE64.decode(BODY_B64).unwrap();
        let body = parse_boc(&bytes).unwrap();
        let parsed = Notification::parse(&body).unwrap();
        assert_eq!(parsed, sample());
    }

    // === Strictness ===

    #[test]
    fn test_parse_rejects_trailing_bit() {
        let n = sample();
        let mut b = CellBuilder::new();
        b.store_address(&n.job)
            .unwrap()
            .store_uint(n.value, 64)
            .unwrap()
            .store_ref(n.description.clone())
            .unwrap()
            .store_uint256(&n.auth_key)
            .unwrap()
            .store_bit(true)
            .unwrap();
        let err = Notification::parse(&b.build()).unwrap_err();
        assert!(matches!(
            err,
            NotificationError(CellError::TrailingData { bits: 1, refs: 0 })
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_ref() {
        let n = sample();
        let mut b = CellBuilder::new();
        b.store_address(&n.job)
            .unwrap()
            .store_uint(n.value, 64)
            .unwrap()
            .store_ref(n.description.clone())
            .unwrap()
            .store_uint256(&n.auth_key)
            .unwrap()
            .store_ref(Cell::empty())
            .unwrap();
        let err = Notification::parse(&b.build()).unwrap_err();
        assert!(matches!(
            err,
            NotificationError(CellError::TrailingData { bits: 0, refs: 1 })
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_body() {
        let n = sample();
        let mut b = CellBuilder::new();
        b.store_address(&n.job)
            .unwrap()
            .store_uint(n.value, 64)
            .unwrap()
            .store_ref(n.description.clone())
            .unwrap();
        // Key missing entirely.
        let err = Notification::parse(&b.build()).unwrap_err();
        assert!(matches!(
            err,
            NotificationError(CellError::DataUnderrun {
                wanted: 256,
                available: 0
            })
        ));
    }

    #[test]
    fn test_parse_rejects_non_address_prefix() {
        // A data-cell style body starts with uint(0, 2), tag 0b00.
        let mut b = CellBuilder::new();
        b.store_uint(0, 2).unwrap();
        let err = Notification::parse(&b.build()).unwrap_err();
        assert!(matches!(
            err,
            NotificationError(CellError::UnsupportedAddressTag { tag: 0b00 })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = NotificationError(CellError::DataUnderrun {
            wanted: 256,
            available: 0,
        });
        let msg = err.to_string();
        assert!(msg.contains("malformed notification"));
        assert!(msg.contains("256"));
    }
}
