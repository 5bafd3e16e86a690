//! Access Control Module
//!
//! Minting authority is a capability, not a balance. [`MinterRole`] names the
//! single principal currently allowed to create reward supply, and the
//! immutable owner that alone may reassign it.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{DBankError, DBankResult};
use crate::types::{Address, Short};

// ============================================================================
// Types
// ============================================================================

/// Capabilities checked by privileged calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum Role {
    /// May mint reward units
    Minter,
    /// May reassign the minter
    Owner,
}

impl Role {
    /// Stable reason string shown when a caller lacks this role
    pub fn denial(&self) -> &'static str {
        match self {
            Role::Minter => "ERROR: Address not allowed to mint tokens.",
            Role::Owner => "ERROR: Address not allowed to change minter address.",
        }
    }
}

/// Minter capability gated by an immutable owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct MinterRole {
    owner: Address,
    minter: Address,
}

impl MinterRole {
    /// Owner starts out as the minter
    pub fn new(owner: Address) -> Self {
        Self { owner, minter: owner }
    }

    /// Current minter
    pub fn minter(&self) -> Address {
        self.minter
    }

    /// Owner (fixed at construction)
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Check that `caller` holds `role`
    pub fn ensure(&self, role: Role, caller: &Address) -> DBankResult<()> {
        let holder = match role {
            Role::Minter => &self.minter,
            Role::Owner => &self.owner,
        };
        if holder != caller {
            tracing::warn!(?role, caller = %Short(caller), "capability check failed");
            return Err(DBankError::Unauthorized { role, caller: *caller });
        }
        Ok(())
    }

    /// Reassign the minter. Only the owner may call this; repeats and
    /// reassigning the current minter are allowed.
    ///
    /// Returns the previous minter.
    pub fn pass(&mut self, caller: &Address, new_minter: Address) -> DBankResult<Address> {
        self.ensure(Role::Owner, caller)?;
        let previous = core::mem::replace(&mut self.minter, new_minter);
        Ok(previous)
    }
}
