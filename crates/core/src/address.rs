//! Ledger account addresses
//!
//! An address identifies an account by its workchain and a 256-bit content
//! hash. Two text renderings exist:
//!
//! # Friendly Format
//!
//! 36 bytes, base64-encoded (48 characters, no padding):
//!
//! ```text
//! +------------------+ 0
//! | Tag byte         | 1 byte (0x11 bounceable, 0x51 non-bounceable,
//! |                  |         bit 0x80 set for testnet-only)
//! +------------------+ 1
//! | Workchain        | 1 byte (signed)
//! +------------------+ 2
//! | Account hash     | 32 bytes
//! +------------------+ 34
//! | CRC-16/XMODEM    | 2 bytes big-endian, over bytes 0..34
//! +------------------+ 36
//! ```
//!
//! Encoding uses the URL-safe alphabet; decoding accepts the standard
//! alphabet as well. Tag bits describe a *rendering* (how a wallet should
//! treat a transfer), never the address value itself: parsing discards them.
//!
//! # Raw Format
//!
//! `workchain:hash` with the workchain in signed decimal and the hash as 64
//! lowercase hex characters, e.g. `0:3ffd1013...`.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Tag byte for a bounceable rendering.
const TAG_BOUNCEABLE: u8 = 0x11;

/// Tag byte for a non-bounceable rendering.
const TAG_NON_BOUNCEABLE: u8 = 0x51;

/// Tag bit marking a testnet-only rendering.
const TAG_TESTNET: u8 = 0x80;

/// Packed size of the friendly form: tag + workchain + hash + checksum.
const FRIENDLY_BYTES: usize = 36;

/// Base64 length of the friendly form.
const FRIENDLY_CHARS: usize = 48;

/// Errors from parsing an address from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// The friendly form has the wrong length.
    #[error("friendly address must be {expected} characters, got {actual}")]
    InvalidLength {
        /// Required character count.
        expected: usize,
        /// Character count of the input.
        actual: usize,
    },

    /// The friendly form is not valid base64 in either alphabet.
    #[error("friendly address is not valid base64")]
    InvalidBase64,

    /// The embedded checksum does not match the address content.
    #[error("address checksum mismatch: expected {expected:#06x}, got {actual:#06x}")]
    ChecksumMismatch {
        /// Checksum computed over the decoded content.
        expected: u16,
        /// Checksum stored in the input.
        actual: u16,
    },

    /// The tag byte is neither bounceable nor non-bounceable.
    #[error("unknown address tag byte {tag:#04x}")]
    UnknownTag {
        /// The offending tag byte, testnet bit included.
        tag: u8,
    },

    /// The raw form is not `workchain:hash`.
    #[error("raw address must be `workchain:hash`, got {input:?}")]
    InvalidRawFormat {
        /// The offending input.
        input: String,
    },

    /// The workchain part of the raw form is not a signed 8-bit integer.
    #[error("invalid workchain id {input:?}")]
    InvalidWorkchain {
        /// The offending workchain text.
        input: String,
    },

    /// The hash part of the raw form has the wrong length.
    #[error("address hash must be {expected} hex characters, got {actual}")]
    InvalidHashLength {
        /// Required hex character count.
        expected: usize,
        /// Hex character count of the input.
        actual: usize,
    },

    /// The hash part of the raw form contains non-hex characters.
    #[error("address hash contains non-hex characters")]
    InvalidHex,
}

/// A ledger account address: workchain plus 256-bit account hash.
///
/// Addresses are opaque identifiers compared by exact byte equality over
/// both fields. For accounts deployed from an initial state, the hash is the
/// content hash of that state, which is what makes job postings verifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    workchain: i8,
    hash: [u8; 32],
}

impl Address {
    /// Create an address from its workchain and account hash.
    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Address { workchain, hash }
    }

    /// Workchain this account lives in.
    pub fn workchain(&self) -> i8 {
        self.workchain
    }

    /// 256-bit account hash.
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Render the default friendly form: bounceable, mainnet, URL-safe.
    pub fn to_friendly(&self) -> String {
        self.to_friendly_with(true, false)
    }

    /// Render a friendly form with explicit tag bits.
    pub fn to_friendly_with(&self, bounceable: bool, testnet: bool) -> String {
        let mut bytes = [0u8; FRIENDLY_BYTES];
        bytes[0] = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if testnet {
            bytes[0] |= TAG_TESTNET;
        }
        bytes[1] = self.workchain as u8;
        bytes[2..34].copy_from_slice(&self.hash);
        let crc = crc16_xmodem(&bytes[..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());
        URL_SAFE.encode(bytes)
    }

    /// Render the raw `workchain:hash` form.
    pub fn to_raw(&self) -> String {
        let hex: String = self.hash.iter().map(|b| format!("{b:02x}")).collect();
        format!("{}:{}", self.workchain, hex)
    }

    /// Parse the friendly base64 form.
    ///
    /// Accepts both the URL-safe and the standard alphabet. Tag bits
    /// (bounceable / testnet) are validated and discarded.
    ///
    /// # Errors
    /// Returns an error on wrong length, invalid base64, checksum mismatch,
    /// or an unknown tag byte.
    pub fn from_friendly(s: &str) -> Result<Self, AddressParseError> {
        if s.len() != FRIENDLY_CHARS {
            return Err(AddressParseError::InvalidLength {
                expected: FRIENDLY_CHARS,
                actual: s.len(),
            });
        }
        let bytes = URL_SAFE
            .decode(s)
            .or_else(|_| STANDARD.decode(s))
            .map_err(|_| AddressParseError::InvalidBase64)?;
        // Embedded padding can shrink a 48-character input below 36 bytes.
        if bytes.len() != FRIENDLY_BYTES {
            return Err(AddressParseError::InvalidBase64);
        }
        let stored = u16::from_be_bytes([bytes[34], bytes[35]]);
        let computed = crc16_xmodem(&bytes[..34]);
        if stored != computed {
            return Err(AddressParseError::ChecksumMismatch {
                expected: computed,
                actual: stored,
            });
        }
        let tag = bytes[0] & !TAG_TESTNET;
        if tag != TAG_BOUNCEABLE && tag != TAG_NON_BOUNCEABLE {
            return Err(AddressParseError::UnknownTag { tag: bytes[0] });
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);
        Ok(Address {
            workchain: bytes[1] as i8,
            hash,
        })
    }

    /// Parse the raw `workchain:hash` form.
    ///
    /// # Errors
    /// Returns an error if the separator is missing, the workchain is not a
    /// signed 8-bit decimal, or the hash is not 64 hex characters.
    pub fn from_raw(s: &str) -> Result<Self, AddressParseError> {
        let (wc, hex) = s
            .split_once(':')
            .ok_or_else(|| AddressParseError::InvalidRawFormat {
                input: s.to_string(),
            })?;
        let workchain: i8 = wc
            .parse()
            .map_err(|_| AddressParseError::InvalidWorkchain {
                input: wc.to_string(),
            })?;
        if hex.len() != 64 {
            return Err(AddressParseError::InvalidHashLength {
                expected: 64,
                actual: hex.len(),
            });
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AddressParseError::InvalidHex);
        }
        let mut hash = [0u8; 32];
        for (i, byte) in hash.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
                .map_err(|_| AddressParseError::InvalidHex)?;
        }
        Ok(Address { workchain, hash })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_friendly())
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parse either text form: raw if the input contains `:`, friendly
    /// otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            Address::from_raw(s)
        } else {
            Address::from_friendly(s)
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_friendly())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// CRC-16/XMODEM: polynomial 0x1021, initial value 0, no reflection.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
