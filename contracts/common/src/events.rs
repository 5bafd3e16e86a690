//! Ledger Events for dBank
//!
//! Events are appended to the call context once a call has committed and can
//! be indexed off-chain. A failed call emits nothing.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::types::{Address, RewardUnits, Timestamp, Wei};
use crate::Vec;

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Bank Events (0x01 - 0x1F)
    Deposit = 0x01,
    Withdraw = 0x02,

    // Token Events (0x40 - 0x5F)
    Transfer = 0x40,
    Mint = 0x41,
    MinterChanged = 0x42,
}

/// Main event enum containing all ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum DBankEvent {
    // ============ Bank Events ============

    /// Emitted when principal enters custody
    Deposit {
        user: Address,
        amount: Wei,
        timestamp: Timestamp,
    },

    /// Emitted when principal leaves custody
    Withdraw {
        user: Address,
        amount: Wei,
        /// Seconds the deposit was held
        deposit_time: u64,
        /// Reward units minted to the user
        interest: RewardUnits,
    },

    // ============ Token Events ============

    /// Emitted on reward token transfer
    Transfer {
        from: Address,
        to: Address,
        amount: RewardUnits,
    },

    /// Emitted when reward units are minted
    Mint {
        to: Address,
        amount: RewardUnits,
        new_total_supply: RewardUnits,
    },

    /// Emitted when the minter capability is reassigned
    MinterChanged {
        from: Address,
        to: Address,
    },
}

impl DBankEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Deposit { .. } => EventType::Deposit,
            Self::Withdraw { .. } => EventType::Withdraw,
            Self::Transfer { .. } => EventType::Transfer,
            Self::Mint { .. } => EventType::Mint,
            Self::MinterChanged { .. } => EventType::MinterChanged,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<DBankEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: DBankEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[DBankEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<DBankEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&DBankEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events were emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
