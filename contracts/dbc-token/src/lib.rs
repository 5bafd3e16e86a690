//! DBC Token Contract
//!
//! Fungible reward asset of the dBank ledger ("Decentralized Bank Currency").
//! Supply starts at zero and grows only through the single authorized
//! minter. The deploying account owns the token and is the only one that can
//! hand the minter capability to another principal (normally the custody
//! bank, once, as the last provisioning step).

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use dbank_common::{
    access_control::{MinterRole, Role},
    constants::token,
    errors::{DBankError, DBankResult},
    events::DBankEvent,
    types::{Address, CallContext, RewardUnits, Short},
};

// ============ Token State ============

/// DBC token ledger
///
/// Invariant: the sum of all balances equals `total_supply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RewardAsset {
    /// Published identity of this token
    address: Address,
    /// Minter capability and its owner
    role: MinterRole,
    /// Total supply tracking
    total_supply: RewardUnits,
    /// Per-holder balances; absent holders hold 0
    balances: BTreeMap<Address, RewardUnits>,
}

impl RewardAsset {
    /// Create a token published at `address` by `owner`.
    ///
    /// The owner is the initial minter and supply is zero.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            role: MinterRole::new(owner),
            total_supply: 0,
            balances: BTreeMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Get token name
    pub fn name(&self) -> &'static str {
        token::NAME
    }

    /// Get token symbol
    pub fn symbol(&self) -> &'static str {
        token::SYMBOL
    }

    /// Get token decimals
    pub fn decimals(&self) -> u8 {
        token::DECIMALS
    }

    pub fn total_supply(&self) -> RewardUnits {
        self.total_supply
    }

    /// Balance of `account`, 0 if never credited
    pub fn balance_of(&self, account: &Address) -> RewardUnits {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Current minter
    pub fn minter(&self) -> Address {
        self.role.minter()
    }

    pub fn owner(&self) -> Address {
        self.role.owner()
    }

    // ============ Minting ============

    /// Precondition of [`RewardAsset::mint`]: `caller` is the minter and the
    /// supply can absorb `amount`.
    ///
    /// Returns the total supply after such a mint.
    pub fn check_mint(&self, caller: &Address, amount: RewardUnits) -> DBankResult<RewardUnits> {
        self.role.ensure(Role::Minter, caller)?;
        self.total_supply
            .checked_add(amount)
            .ok_or(DBankError::Overflow)
    }

    /// Mint `amount` to `to`. Only the current minter may call this.
    ///
    /// A zero amount succeeds without touching balances.
    pub fn mint(&mut self, ctx: &mut CallContext, to: Address, amount: RewardUnits) -> DBankResult<()> {
        let new_supply = self.check_mint(&ctx.caller, amount)?;

        // balance <= supply, so this cannot overflow once the supply check passed
        if amount > 0 {
            *self.balances.entry(to).or_insert(0) += amount;
        }
        self.total_supply = new_supply;

        tracing::debug!(to = %Short(&to), amount, total_supply = new_supply, "minted");
        ctx.emit(DBankEvent::Mint {
            to,
            amount,
            new_total_supply: new_supply,
        });

        Ok(())
    }

    // ============ Minter Role ============

    /// Reassign the minter capability. Only the owner may call this.
    pub fn pass_minter_role(&mut self, ctx: &mut CallContext, new_minter: Address) -> DBankResult<()> {
        let previous = self.role.pass(&ctx.caller, new_minter)?;

        tracing::debug!(from = %Short(&previous), to = %Short(&new_minter), "minter changed");
        ctx.emit(DBankEvent::MinterChanged {
            from: previous,
            to: new_minter,
        });

        Ok(())
    }

    // ============ Transfers ============

    /// Move `amount` from the caller to `to`
    pub fn transfer(&mut self, ctx: &mut CallContext, to: Address, amount: RewardUnits) -> DBankResult<()> {
        if amount == 0 {
            return Err(DBankError::ZeroAmount);
        }

        let from = ctx.caller;
        let available = self.balance_of(&from);
        if available < amount {
            return Err(DBankError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        if from != to {
            self.balances.insert(from, available - amount);
            *self.balances.entry(to).or_insert(0) += amount;
        }

        tracing::debug!(from = %Short(&from), to = %Short(&to), amount, "transferred");
        ctx.emit(DBankEvent::Transfer { from, to, amount });

        Ok(())
    }

    // ============ Persistence ============

    /// Encode the full token state for a key-value store
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Decode token state written by [`RewardAsset::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> DBankResult<Self> {
        borsh::from_slice(bytes).map_err(|_| DBankError::Decode)
    }
}

/// Format amount for display as (whole, fractional) tokens
pub fn format_amount(amount: RewardUnits) -> (u128, u128) {
    dbank_common::math::format_amount(amount, token::ONE)
}

// ============ Tests ============
