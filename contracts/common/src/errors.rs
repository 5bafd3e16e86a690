//! Error Types for dBank
//!
//! Every failure aborts the whole call with no state change. Nothing is
//! retried; the caller re-issues the call after fixing the precondition.

use thiserror::Error;

use crate::access_control::Role;
use crate::types::{Address, Timestamp};

/// Result type alias for dBank operations
pub type DBankResult<T> = Result<T, DBankError>;

/// Main error enum for all dBank errors
///
/// `Display` renders the stable, user-facing reason string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DBankError {
    // ============ Authorization Errors ============
    /// Caller lacks the capability required for this operation
    #[error("{}", .role.denial())]
    Unauthorized { role: Role, caller: Address },

    // ============ Deposit Errors ============
    /// Deposit below the minimum amount
    #[error("ERROR: Deposit Amount must be greater than 0.01 ETH.")]
    InsufficientAmount { amount: u128, minimum: u128 },

    /// Deposit attempted while one is already active for the account
    #[error("ERROR: Deposit already active.")]
    AlreadyActive { account: Address },

    /// Withdrawal attempted with no active deposit
    #[error("ERROR: No active deposit.")]
    NoActiveDeposit { account: Address },

    /// Withdrawal handed a reward asset other than the one the bank was built with
    #[error("ERROR: Reward asset does not belong to this bank.")]
    WrongRewardAsset { expected: Address, actual: Address },

    // ============ Amount Errors ============
    /// Insufficient balance for the operation
    #[error("ERROR: Insufficient balance.")]
    InsufficientBalance { available: u128, requested: u128 },

    /// Zero amount not allowed
    #[error("ERROR: Amount must be greater than zero.")]
    ZeroAmount,

    // ============ Environment Errors ============
    /// Clock reported 0 or moved backwards
    #[error("ERROR: Invalid timestamp.")]
    InvalidTimestamp { timestamp: Timestamp, earliest: Timestamp },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    #[error("ERROR: Arithmetic overflow.")]
    Overflow,

    // ============ State Errors ============
    /// Persisted state bytes could not be decoded
    #[error("ERROR: Invalid state encoding.")]
    Decode,
}

impl DBankError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { role: Role::Minter, .. } => "E001_MINT_UNAUTHORIZED",
            Self::Unauthorized { role: Role::Owner, .. } => "E002_OWNER_ONLY",
            Self::InsufficientAmount { .. } => "E010_INSUFFICIENT_AMOUNT",
            Self::AlreadyActive { .. } => "E011_ALREADY_ACTIVE",
            Self::NoActiveDeposit { .. } => "E012_NO_ACTIVE_DEPOSIT",
            Self::WrongRewardAsset { .. } => "E013_WRONG_REWARD_ASSET",
            Self::InsufficientBalance { .. } => "E020_INSUFFICIENT_BALANCE",
            Self::ZeroAmount => "E021_ZERO_AMOUNT",
            Self::InvalidTimestamp { .. } => "E030_INVALID_TIMESTAMP",
            Self::Overflow => "E040_OVERFLOW",
            Self::Decode => "E050_DECODE",
        }
    }

    /// Stable reason string suitable for direct display
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unauthorized { role, .. } => role.denial(),
            Self::InsufficientAmount { .. } => "ERROR: Deposit Amount must be greater than 0.01 ETH.",
            Self::AlreadyActive { .. } => "ERROR: Deposit already active.",
            Self::NoActiveDeposit { .. } => "ERROR: No active deposit.",
            Self::WrongRewardAsset { .. } => "ERROR: Reward asset does not belong to this bank.",
            Self::InsufficientBalance { .. } => "ERROR: Insufficient balance.",
            Self::ZeroAmount => "ERROR: Amount must be greater than zero.",
            Self::InvalidTimestamp { .. } => "ERROR: Invalid timestamp.",
            Self::Overflow => "ERROR: Arithmetic overflow.",
            Self::Decode => "ERROR: Invalid state encoding.",
        }
    }

    /// Returns true if the caller can fix the precondition and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientAmount { .. }
                | Self::InsufficientBalance { .. }
                | Self::AlreadyActive { .. }
                | Self::NoActiveDeposit { .. }
        )
    }
}
