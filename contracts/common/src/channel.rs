//! Base-Asset Transfer Channel
//!
//! The custody bank only decides amounts and direction. Moving base-asset
//! value is delegated to a [`BaseAssetChannel`] supplied by the environment.
//! [`NativeLedger`] is the in-memory channel used by the deployer and tests.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{DBankError, DBankResult};
use crate::types::{Address, Short, Wei};
use crate::BTreeMap;

/// External value-transfer primitive
pub trait BaseAssetChannel {
    /// Move `amount` from `from` into the custody of `custodian`
    fn pull(&mut self, from: &Address, custodian: &Address, amount: Wei) -> DBankResult<()>;

    /// Move `amount` out of the custody of `custodian` to `to`
    fn push(&mut self, custodian: &Address, to: &Address, amount: Wei) -> DBankResult<()>;
}

/// In-memory base-asset balances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct NativeLedger {
    balances: BTreeMap<Address, Wei>,
}

impl NativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`, 0 if never credited
    pub fn balance_of(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credit `amount` out of thin air (genesis funding of test accounts)
    pub fn fund(&mut self, account: Address, amount: Wei) -> DBankResult<()> {
        let entry = self.balances.entry(account).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(DBankError::Overflow)?;
        Ok(())
    }

    /// Sum of all balances
    pub fn total(&self) -> Wei {
        self.balances.values().sum()
    }

    fn move_value(&mut self, from: &Address, to: &Address, amount: Wei) -> DBankResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(DBankError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(DBankError::Overflow)?;

        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, credited);
        tracing::trace!(from = %Short(from), to = %Short(to), amount, "base asset moved");
        Ok(())
    }
}

impl BaseAssetChannel for NativeLedger {
    fn pull(&mut self, from: &Address, custodian: &Address, amount: Wei) -> DBankResult<()> {
        self.move_value(from, custodian, amount)
    }

    fn push(&mut self, custodian: &Address, to: &Address, amount: Wei) -> DBankResult<()> {
        self.move_value(custodian, to, amount)
    }
}
