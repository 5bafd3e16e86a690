//! Core Types for dBank
//!
//! Identities, amounts, per-account deposit records and the call context
//! every state-changing operation runs under.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::events::{DBankEvent, EventLog};

/// Type alias for account and component identities (32-byte hash)
pub type Address = [u8; 32];

/// Base-asset amount in its smallest unit (18 decimals)
pub type Wei = u128;

/// Reward-asset amount in its smallest unit (18 decimals)
pub type RewardUnits = u128;

/// Seconds since the UNIX epoch
pub type Timestamp = u64;

/// The all-zero address. Never a valid account.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Abbreviated hex rendering of an address for log lines (first 4 bytes).
#[derive(Debug, Clone, Copy)]
pub struct Short<'a>(pub &'a Address);

impl core::fmt::Display for Short<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("..")
    }
}

// ============ Identity Derivation ============

/// Generate a deterministic component identity from its publisher and nonce
pub fn generate_contract_address(publisher: &Address, nonce: u64) -> Address {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(b"dbank/contract");
    hasher.update(publisher);
    hasher.update(nonce.to_le_bytes());
    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&result);
    id
}

/// Derive an account identity from operator key material
pub fn address_from_key(key: &[u8]) -> Address {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(b"dbank/account");
    hasher.update(key);
    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&result);
    id
}

// ============ Deposit Records ============

/// Per-account deposit state in the custody bank
///
/// Accounts the bank has never seen read as [`DepositState::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum DepositState {
    /// No active deposit
    #[default]
    Idle,
    /// Principal held in custody since `started_at`
    Active {
        /// Base-asset amount held
        principal: Wei,
        /// Timestamp of the deposit (always non-zero)
        started_at: Timestamp,
    },
}

impl DepositState {
    /// Returns true if a deposit is active
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Principal held, 0 when idle
    pub fn principal(&self) -> Wei {
        match self {
            Self::Idle => 0,
            Self::Active { principal, .. } => *principal,
        }
    }

    /// Deposit start, 0 when idle
    pub fn started_at(&self) -> Timestamp {
        match self {
            Self::Idle => 0,
            Self::Active { started_at, .. } => *started_at,
        }
    }
}

// ============ Call Context ============

/// Context a state-changing call executes under
///
/// Carries the authenticated caller, the environment's current time, and the
/// event log the call appends to. Events are only appended once a call has
/// fully committed.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Account issuing the call
    pub caller: Address,
    /// Current time as supplied by the environment
    pub timestamp: Timestamp,
    /// Events emitted by committed calls
    pub events: EventLog,
}

impl CallContext {
    /// Create a context for `caller` at `timestamp` with an empty log
    pub fn new(caller: Address, timestamp: Timestamp) -> Self {
        Self {
            caller,
            timestamp,
            events: EventLog::new(),
        }
    }

    /// Create a context reading the time from `clock`
    pub fn at<C: crate::clock::Clock + ?Sized>(caller: Address, clock: &C) -> Self {
        Self::new(caller, clock.now())
    }

    /// Same environment, different caller, fresh event log.
    ///
    /// Used when a component calls into another one under its own identity.
    pub fn nested(&self, caller: Address) -> Self {
        Self::new(caller, self.timestamp)
    }

    /// Append an event
    pub fn emit(&mut self, event: DBankEvent) {
        self.events.emit(event);
    }

    /// Move all events of `other` into this context, in order
    pub fn absorb(&mut self, other: CallContext) {
        for event in other.events.into_events() {
            self.events.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_reads_as_zero() {
        let state = DepositState::default();
        assert!(!state.is_active());
        assert_eq!(state.principal(), 0);
        assert_eq!(state.started_at(), 0);
    }

    #[test]
    fn test_active_exposes_fields() {
        let state = DepositState::Active {
            principal: 5,
            started_at: 100,
        };
        assert!(state.is_active());
        assert_eq!(state.principal(), 5);
        assert_eq!(state.started_at(), 100);
    }

    #[test]
    fn test_nested_context_keeps_time() {
        let ctx = CallContext::new([1u8; 32], 42);
        let inner = ctx.nested([2u8; 32]);
        assert_eq!(inner.caller, [2u8; 32]);
        assert_eq!(inner.timestamp, 42);
        assert!(!inner.events.has_events());
    }

    #[test]
    fn test_contract_address_depends_on_nonce() {
        let publisher = [7u8; 32];
        let a = generate_contract_address(&publisher, 0);
        let b = generate_contract_address(&publisher, 1);
        assert_ne!(a, b);
        assert_eq!(a, generate_contract_address(&publisher, 0));
        assert_ne!(a, ZERO_ADDRESS);
    }

    #[test]
    fn test_key_and_contract_domains_differ() {
        let key = [7u8; 32];
        assert_ne!(address_from_key(&key), generate_contract_address(&key, 0));
    }

    #[test]
    fn test_short_address() {
        let addr = [0xabu8; 32];
        assert_eq!(format!("{}", Short(&addr)), "abababab..");
    }
}
