//! Job contract state and address derivation
//!
//! A job contract's address is a commitment to its initial state. We
//! rebuild that state cell-for-cell from the fields a notification
//! claims, hash it, and compare. The layouts here are frozen; changing a
//! single bit moves every derived address.
//!
//! State-init cell (a cut-down `StateInit` with only code and data):
//!
//! ```text
//! +--------+-----------+-----------+
//! | 0b00110 | ref: code | ref: data |
//! | 5 bits  |           |           |
//! +--------+-----------+-----------+
//! ```
//!
//! Data cell (the contract's storage at deploy time):
//!
//! ```text
//! +--------+----------------+--------+-----------+----------+
//! | 0b00   | poster address | value  | ref: desc | auth key |
//! | 2 bits | 267 bits       | 64 bits|           | 256 bits |
//! +--------+----------------+--------+-----------+----------+
//! ```

use std::sync::Arc;

use tonwork_boc::{Cell, CellBuildError, CellBuilder};
use tonwork_core::Address;

/// Initial state of a job contract.
///
/// Holds everything that feeds the address derivation: who posted, the
/// offered value, the description cell, and the poster's public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    /// Address of the account that posted the job.
    pub poster: Address,

    /// Offered payment in base units.
    pub value: u64,

    /// Job description, as a text cell chain.
    pub description: Arc<Cell>,

    /// Public key authorized to manage the job.
    pub auth_key: [u8; 32],
}

impl JobState {
    /// Builds the contract's initial data cell.
    pub fn data_cell(&self) -> Result<Arc<Cell>, CellBuildError> {
        let mut b = CellBuilder::new();
        b.store_uint(0, 2)?
            .store_address(&self.poster)?
            .store_uint(self.value, 64)?
            .store_ref(self.description.clone())?
            .store_uint256(&self.auth_key)?;
        Ok(Arc::new(b.build()))
    }

    /// Builds the state-init cell for the given code.
    pub fn state_init(&self, code: &Arc<Cell>) -> Result<Arc<Cell>, CellBuildError> {
        let mut b = CellBuilder::new();
        b.store_uint(0b00110, 5)?
            .store_ref(code.clone())?
            .store_ref(self.data_cell()?)?;
        Ok(Arc::new(b.build()))
    }

    /// Derives the job contract's address on the given workchain.
    pub fn derive_address(
        &self,
        code: &Arc<Cell>,
        workchain: i8,
    ) -> Result<Address, CellBuildError> {
        let init = self.state_init(code)?;
        Ok(Address::new(workchain, init.repr_hash()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonwork_boc::encode_text;

    fn code_cell() -> Arc<Cell> {
        let mut b = CellBuilder::new();
        b.store_uint(0xC0DE, 16).unwrap();
        Arc::new(b.build())
    }

    fn sample_state(key: [u8; 32]) -> JobState {
        JobState {
            poster: Address::new(0, [0xAB; 32]),
            value: 5_000_000_000,
            description: encode_text("fix bug").unwrap(),
            auth_key: key,
        }
    }

    fn key(n: u8) -> [u8; 32] {
        let mut k = [0u8; 32];
        k[31] = n;
        k
    }

    fn hex(bytes: &[u8; 32]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    // === Layout ===

    #[test]
    fn test_data_cell_layout() {
        let state = sample_state(key(1));
        let data = state.data_cell().unwrap();
        // 2 + 267 + 64 + 256 bits of inline data, one ref for the text.
        assert_eq!(data.bit_len(), 589);
        assert_eq!(data.refs().len(), 1);
        assert_eq!(
            hex(&data.repr_hash()),
            "e1b835e96a561c2b88d3f0977db614f973535305bf25d84068a286b74ddab869"
        );
    }

    #[test]
    fn test_state_init_layout() {
        let state = sample_state(key(1));
        let init = state.state_init(&code_cell()).unwrap();
        assert_eq!(init.bit_len(), 5);
        assert_eq!(init.refs().len(), 2);
        assert_eq!(
            hex(&init.repr_hash()),
            "4ace328b728d3632b7118bc0f6c14e5070a457f90ee32051eec48d131618d2f5"
        );
    }

    // === Derivation ===

    #[test]
    fn test_derive_address_known_vector() {
        let state = sample_state(key(1));
        let addr = state.derive_address(&code_cell(), 0).unwrap();
        assert_eq!(
            addr.to_friendly(),
            "EQBKzjKLco02MrcRi8D2wU5QcKRX-Q7jIFHuxI0TFhjS9aSB"
        );
        assert_eq!(
            addr.to_friendly_with(false, false),
            "UQBKzjKLco02MrcRi8D2wU5QcKRX-Q7jIFHuxI0TFhjS9flE"
        );
    }

    #[test]
    fn test_derive_address_second_key_vector() {
        let state = sample_state(key(2));
        let addr = state.derive_address(&code_cell(), 0).unwrap();
        assert_eq!(
            hex(addr.hash()),
            "b3c4194be961b9db0a1c1871dd4bf442667c6d14f48b010a416306c161c5611e"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = sample_state(key(1)).derive_address(&code_cell(), 0).unwrap();
        let b = sample_state(key(1)).derive_address(&code_cell(), 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derivation_depends_on_every_field() {
        let code = code_cell();
        let base = sample_state(key(1)).derive_address(&code, 0).unwrap();

        let mut tampered = sample_state(key(1));
        tampered.value += 1;
        assert_ne!(tampered.derive_address(&code, 0).unwrap(), base);

        let mut tampered = sample_state(key(1));
        tampered.poster = Address::new(0, [0xAC; 32]);
        assert_ne!(tampered.derive_address(&code, 0).unwrap(), base);

        let mut tampered = sample_state(key(1));
        tampered.description = encode_text("fix bugs").unwrap();
        assert_ne!(tampered.derive_address(&code, 0).unwrap(), base);

        assert_ne!(sample_state(key(2)).derive_address(&code, 0).unwrap(), base);
    }

    #[test]
    fn test_derivation_depends_on_code_and_workchain() {
        let state = sample_state(key(1));
        let base = state.derive_address(&code_cell(), 0).unwrap();

        let mut b = CellBuilder::new();
        b.store_uint(0xBEEF, 16).unwrap();
        let other_code = Arc::new(b.build());
        assert_ne!(state.derive_address(&other_code, 0).unwrap(), base);

        let masterchain = state.derive_address(&code_cell(), -1).unwrap();
        assert_eq!(masterchain.hash(), base.hash());
        assert_ne!(masterchain, base);
    }
}
