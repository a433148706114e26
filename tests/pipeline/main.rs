//! Job Board Pipeline Test Suite
//!
//! End-to-end coverage of the posting-to-listing pipeline: a wallet
//! plans the deploy and notify messages, the channel carries the
//! notification, and a reader replays the channel into validated
//! listings. Everything runs against in-memory transaction sources;
//! no network is involved.
//!
//! ## Modules
//!
//! - `roundtrip`: honest postings come out of the feed as listings
//! - `adversarial`: forged and mangled traffic never does
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole pipeline suite
//! cargo test --test pipeline
//!
//! # Honest-path tests only
//! cargo test --test pipeline roundtrip::
//!
//! # Forgery tests only
//! cargo test --test pipeline adversarial::
//!
//! # Run with output
//! cargo test --test pipeline -- --nocapture
//! ```

// Shared fixtures
pub mod fixtures;

// Test modules
mod adversarial;
mod roundtrip;
