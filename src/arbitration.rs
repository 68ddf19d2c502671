//! Advisory arbitration record.
//!
//! Clients claim control by id and address so cooperating clients can check
//! who spoke last. The render loop never consults it; commands from any
//! client are executed regardless of the current owner.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Who last claimed control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitrationToken {
    pub owner_id: String,
    pub owner_address: String,
}

/// Shared owner record, unclaimed at startup
#[derive(Debug, Default)]
pub struct Arbitration {
    owner: Mutex<Option<ArbitrationToken>>,
}

impl Arbitration {
    pub const fn new() -> Self {
        Self {
            owner: Mutex::new(None),
        }
    }

    /// Overwrite the owner record
    pub fn claim(&self, id: &str, address: &str) {
        *self.lock() = Some(ArbitrationToken {
            owner_id: id.to_owned(),
            owner_address: address.to_owned(),
        });
    }

    /// Check whether `(id, address)` matches the current owner
    pub fn check(&self, id: &str, address: &str) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|owner| owner.owner_id == id && owner.owner_address == address)
    }

    pub fn owner(&self) -> Option<ArbitrationToken> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ArbitrationToken>> {
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
