//! Custody Bank Contract
//!
//! Holds depositors' base-asset principal and pays interest in DBC.
//!
//! ## Per-account state machine
//!
//! - `Idle -> Active` via [`CustodyBank::deposit`]: at least `MIN_DEPOSIT`,
//!   never merged into an already active deposit.
//! - `Active -> Idle` via [`CustodyBank::withdraw`]: all-or-nothing. The
//!   principal comes back exactly and the accrued interest is minted.
//!
//! Withdrawal commits the account to `Idle` before any value leaves custody,
//! so a transfer step that could call back into the bank would find no
//! active deposit to withdraw again.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use dbank_common::{
    channel::BaseAssetChannel,
    constants::deposit::MIN_DEPOSIT,
    errors::{DBankError, DBankResult},
    events::DBankEvent,
    math::{accrued_interest, elapsed_since},
    types::{Address, CallContext, DepositState, RewardUnits, Short, Timestamp, Wei},
};
use dbank_token::RewardAsset;


// ============ Bank State ============

/// Custody bank ledger
///
/// Invariants:
/// - every account is either `Idle` or holds exactly one `Active` deposit
/// - `custody` equals the sum of all active principals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CustodyBank {
    /// Published identity; the custodian account on the base-asset channel
    address: Address,
    /// Reward token this bank mints into (fixed at construction)
    reward_asset: Address,
    /// Per-account deposit records; absent accounts are `Idle`
    accounts: BTreeMap<Address, DepositState>,
    /// Total principal held
    custody: Wei,
}

impl CustodyBank {
    /// Create a bank published at `address` that pays interest in `reward_asset`
    pub fn new(address: Address, reward_asset: Address) -> Self {
        Self {
            address,
            reward_asset,
            accounts: BTreeMap::new(),
            custody: 0,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Identity of the reward token this bank mints into
    pub fn reward_asset(&self) -> Address {
        self.reward_asset
    }

    // ============ Accessors ============

    /// Deposit record of `account`
    pub fn deposit_state(&self, account: &Address) -> DepositState {
        self.accounts.get(account).copied().unwrap_or_default()
    }

    /// Principal held for `account`, 0 when idle
    pub fn ether_balance_of(&self, account: &Address) -> Wei {
        self.deposit_state(account).principal()
    }

    /// Deposit start of `account`, 0 when idle
    pub fn deposit_start(&self, account: &Address) -> Timestamp {
        self.deposit_state(account).started_at()
    }

    pub fn is_deposited(&self, account: &Address) -> bool {
        self.deposit_state(account).is_active()
    }

    /// Total principal held across all accounts
    pub fn total_custody(&self) -> Wei {
        self.custody
    }

    /// Number of accounts with an active deposit
    pub fn active_deposits(&self) -> usize {
        self.accounts.values().filter(|s| s.is_active()).count()
    }

    /// Interest a withdrawal by `account` at `now` would mint
    pub fn pending_interest(&self, account: &Address, now: Timestamp) -> DBankResult<RewardUnits> {
        match self.deposit_state(account) {
            DepositState::Idle => Ok(0),
            DepositState::Active { principal, started_at } => {
                accrued_interest(principal, elapsed_since(started_at, now)?)
            }
        }
    }

    // ============ Deposit ============

    /// Lock `amount` of base asset from the caller, starting the interest clock
    pub fn deposit<B>(&mut self, ctx: &mut CallContext, amount: Wei, channel: &mut B) -> DBankResult<()>
    where
        B: BaseAssetChannel + ?Sized,
    {
        let user = ctx.caller;

        // 1. One active deposit per account, whatever the amount
        if self.is_deposited(&user) {
            return Err(DBankError::AlreadyActive { account: user });
        }

        // 2. Minimum amount
        if amount < MIN_DEPOSIT {
            return Err(DBankError::InsufficientAmount {
                amount,
                minimum: MIN_DEPOSIT,
            });
        }

        // 3. Deposit start must be distinguishable from "no deposit"
        if ctx.timestamp == 0 {
            return Err(DBankError::InvalidTimestamp {
                timestamp: 0,
                earliest: 1,
            });
        }

        let new_custody = self.custody.checked_add(amount).ok_or(DBankError::Overflow)?;

        // 4. Pull funds; nothing is recorded if the channel refuses
        channel.pull(&user, &self.address, amount)?;

        // 5. Commit
        self.accounts.insert(
            user,
            DepositState::Active {
                principal: amount,
                started_at: ctx.timestamp,
            },
        );
        self.custody = new_custody;

        tracing::debug!(user = %Short(&user), amount, started_at = ctx.timestamp, "deposit opened");
        ctx.emit(DBankEvent::Deposit {
            user,
            amount,
            timestamp: ctx.timestamp,
        });

        Ok(())
    }

    // ============ Withdraw ============

    /// Return the caller's principal and mint the accrued interest
    ///
    /// `reward_asset` must be the token this bank was constructed with, and
    /// the bank must hold its minter role.
    pub fn withdraw<B>(
        &mut self,
        ctx: &mut CallContext,
        reward_asset: &mut RewardAsset,
        channel: &mut B,
    ) -> DBankResult<()>
    where
        B: BaseAssetChannel + ?Sized,
    {
        let user = ctx.caller;

        // 1. Must have an active deposit
        let record = self.deposit_state(&user);
        let (principal, started_at) = match record {
            DepositState::Active { principal, started_at } => (principal, started_at),
            DepositState::Idle => return Err(DBankError::NoActiveDeposit { account: user }),
        };

        // 2. Must mint into our own token
        if reward_asset.address() != self.reward_asset {
            return Err(DBankError::WrongRewardAsset {
                expected: self.reward_asset,
                actual: reward_asset.address(),
            });
        }

        // 3. Interest over the holding period
        let elapsed = elapsed_since(started_at, ctx.timestamp)?;
        let interest = accrued_interest(principal, elapsed)?;

        // 4. The mint must not be able to fail once state is committed
        reward_asset.check_mint(&self.address, interest)?;

        let remaining = self.custody.checked_sub(principal).ok_or(DBankError::Overflow)?;

        // 5. Commit the account to Idle before value leaves custody
        self.accounts.insert(user, DepositState::Idle);
        self.custody = remaining;

        // 6. Return principal; roll back if the channel refuses
        if let Err(err) = channel.push(&self.address, &user, principal) {
            self.accounts.insert(user, record);
            self.custody = remaining + principal;
            tracing::warn!(user = %Short(&user), error = %err, "principal transfer failed, withdrawal rolled back");
            return Err(err);
        }

        // 7. Mint interest under the bank's own identity. The call holds the
        // token exclusively since step 4, so `check_mint` still holds and the
        // withdrawal has committed either way.
        let mut mint_ctx = ctx.nested(self.address);
        let minted = reward_asset.mint(&mut mint_ctx, user, interest);
        debug_assert!(minted.is_ok(), "mint failed after check_mint: {minted:?}");
        if let Err(err) = minted {
            tracing::error!(user = %Short(&user), interest, error = %err, "interest mint failed after commit");
        }

        tracing::debug!(user = %Short(&user), principal, elapsed, interest, "deposit closed");
        ctx.emit(DBankEvent::Withdraw {
            user,
            amount: principal,
            deposit_time: elapsed,
            interest,
        });
        ctx.absorb(mint_ctx);

        Ok(())
    }

    // ============ Persistence ============

    /// Encode the full bank state for a key-value store
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Decode bank state written by [`CustodyBank::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> DBankResult<Self> {
        borsh::from_slice(bytes).map_err(|_| DBankError::Decode)
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use dbank_common::{channel::NativeLedger, constants::base_asset::ONE, events::EventType};

    const BANK: Address = [0xBBu8; 32];
    const TOKEN: Address = [0xAAu8; 32];
    const START: Timestamp = 1_700_000_000;

    fn owner() -> Address {
        [1u8; 32]
    }

    fn user() -> Address {
        [2u8; 32]
    }

    struct Setup {
        token: RewardAsset,
        bank: CustodyBank,
        ledger: NativeLedger,
    }

    fn setup() -> Setup {
        let mut token = RewardAsset::new(TOKEN, owner());
        let bank = CustodyBank::new(BANK, TOKEN);
        token
            .pass_minter_role(&mut CallContext::new(owner(), START), BANK)
            .unwrap();
        let mut ledger = NativeLedger::new();
        ledger.fund(user(), 100 * ONE).unwrap();
        Setup { token, bank, ledger }
    }

    #[test]
    fn test_deposit_success() {
        let mut s = setup();
        let mut ctx = CallContext::new(user(), START);

        s.bank.deposit(&mut ctx, ONE, &mut s.ledger).unwrap();

        assert_eq!(s.bank.ether_balance_of(&user()), ONE);
        assert_eq!(s.bank.deposit_start(&user()), START);
        assert!(s.bank.is_deposited(&user()));
        assert_eq!(s.bank.total_custody(), ONE);
        assert_eq!(s.ledger.balance_of(&user()), 99 * ONE);
        assert_eq!(s.ledger.balance_of(&BANK), ONE);
    }

    #[test]
    fn test_deposit_event_fires_once() {
        let mut s = setup();
        let mut ctx = CallContext::new(user(), START);

        s.bank.deposit(&mut ctx, ONE, &mut s.ledger).unwrap();

        assert_eq!(ctx.events.len(), 1);
        assert_eq!(
            ctx.events.events()[0],
            DBankEvent::Deposit { user: user(), amount: ONE, timestamp: START }
        );
    }

    #[test]
    fn test_deposit_below_minimum() {
        let mut s = setup();
        let mut ctx = CallContext::new(user(), START);

        let result = s.bank.deposit(&mut ctx, MIN_DEPOSIT / 10, &mut s.ledger);

        let err = result.unwrap_err();
        assert!(matches!(err, DBankError::InsufficientAmount { .. }));
        assert_eq!(err.to_string(), "ERROR: Deposit Amount must be greater than 0.01 ETH.");
        assert!(!s.bank.is_deposited(&user()));
        assert_eq!(s.ledger.balance_of(&user()), 100 * ONE);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_deposit_exact_minimum() {
        let mut s = setup();
        let mut ctx = CallContext::new(user(), START);
        s.bank.deposit(&mut ctx, MIN_DEPOSIT, &mut s.ledger).unwrap();
        assert_eq!(s.bank.ether_balance_of(&user()), MIN_DEPOSIT);
    }

    #[test]
    fn test_redeposit_rejected() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let mut ctx = CallContext::new(user(), START + 5);
        let result = s.bank.deposit(&mut ctx, 2 * ONE, &mut s.ledger);

        let err = result.unwrap_err();
        assert_eq!(err, DBankError::AlreadyActive { account: user() });
        assert_eq!(err.to_string(), "ERROR: Deposit already active.");
        assert_eq!(s.bank.ether_balance_of(&user()), ONE);
        assert_eq!(s.bank.deposit_start(&user()), START);
        assert_eq!(s.ledger.balance_of(&user()), 99 * ONE);
    }

    #[test]
    fn test_redeposit_below_minimum_reports_active() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let mut ctx = CallContext::new(user(), START + 5);
        let result = s.bank.deposit(&mut ctx, MIN_DEPOSIT / 10, &mut s.ledger);

        assert_eq!(result, Err(DBankError::AlreadyActive { account: user() }));
        assert!(ctx.events.is_empty());
        assert_eq!(s.bank.ether_balance_of(&user()), ONE);
    }

    #[test]
    fn test_deposit_at_time_zero_rejected() {
        let mut s = setup();
        let result = s.bank.deposit(&mut CallContext::new(user(), 0), ONE, &mut s.ledger);
        assert!(matches!(result, Err(DBankError::InvalidTimestamp { .. })));
        assert!(!s.bank.is_deposited(&user()));
    }

    #[test]
    fn test_deposit_unfunded_account() {
        let mut s = setup();
        let poor = [7u8; 32];
        let result = s.bank.deposit(&mut CallContext::new(poor, START), ONE, &mut s.ledger);
        assert!(matches!(result, Err(DBankError::InsufficientBalance { .. })));
        assert!(!s.bank.is_deposited(&poor));
        assert_eq!(s.bank.total_custody(), 0);
    }

    #[test]
    fn test_withdraw_returns_principal_and_resets() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let mut ctx = CallContext::new(user(), START);
        s.bank.withdraw(&mut ctx, &mut s.token, &mut s.ledger).unwrap();

        assert_eq!(s.bank.ether_balance_of(&user()), 0);
        assert_eq!(s.bank.deposit_start(&user()), 0);
        assert!(!s.bank.is_deposited(&user()));
        assert_eq!(s.bank.total_custody(), 0);
        assert_eq!(s.ledger.balance_of(&user()), 100 * ONE);
        // Zero elapsed, zero interest
        assert_eq!(s.token.balance_of(&user()), 0);
    }

    #[test]
    fn test_withdraw_mints_interest() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let mut ctx = CallContext::new(user(), START + 2);
        s.bank.withdraw(&mut ctx, &mut s.token, &mut s.ledger).unwrap();

        let expected = accrued_interest(ONE, 2).unwrap();
        assert!(expected > 0);
        assert_eq!(s.token.balance_of(&user()), expected);
        assert_eq!(s.token.total_supply(), expected);

        assert_eq!(ctx.events.len(), 2);
        assert_eq!(
            ctx.events.events()[0],
            DBankEvent::Withdraw { user: user(), amount: ONE, deposit_time: 2, interest: expected }
        );
        assert_eq!(ctx.events.filter_by_type(EventType::Mint).len(), 1);
    }

    #[test]
    fn test_withdraw_without_deposit() {
        let mut s = setup();
        let mut ctx = CallContext::new(user(), START);

        let result = s.bank.withdraw(&mut ctx, &mut s.token, &mut s.ledger);

        let err = result.unwrap_err();
        assert_eq!(err, DBankError::NoActiveDeposit { account: user() });
        assert_eq!(err.to_string(), "ERROR: No active deposit.");
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_double_withdraw_rejected() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();
        s.bank
            .withdraw(&mut CallContext::new(user(), START + 10), &mut s.token, &mut s.ledger)
            .unwrap();
        let minted = s.token.total_supply();

        let result = s.bank.withdraw(&mut CallContext::new(user(), START + 20), &mut s.token, &mut s.ledger);

        assert!(matches!(result, Err(DBankError::NoActiveDeposit { .. })));
        assert_eq!(s.token.total_supply(), minted);
        assert_eq!(s.ledger.balance_of(&user()), 100 * ONE);
    }

    #[test]
    fn test_withdraw_wrong_reward_asset() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let mut other = RewardAsset::new([0xCCu8; 32], owner());
        let result = s.bank.withdraw(&mut CallContext::new(user(), START + 1), &mut other, &mut s.ledger);

        assert!(matches!(result, Err(DBankError::WrongRewardAsset { .. })));
        assert!(s.bank.is_deposited(&user()));
    }

    #[test]
    fn test_withdraw_without_minter_role_leaves_state() {
        let mut token = RewardAsset::new(TOKEN, owner());
        let mut bank = CustodyBank::new(BANK, TOKEN);
        let mut ledger = NativeLedger::new();
        ledger.fund(user(), ONE).unwrap();

        bank.deposit(&mut CallContext::new(user(), START), ONE, &mut ledger).unwrap();
        let result = bank.withdraw(&mut CallContext::new(user(), START + 3), &mut token, &mut ledger);

        assert!(matches!(result, Err(DBankError::Unauthorized { .. })));
        assert!(bank.is_deposited(&user()));
        assert_eq!(bank.ether_balance_of(&user()), ONE);
        assert_eq!(ledger.balance_of(&BANK), ONE);
        assert_eq!(token.total_supply(), 0);
    }

    #[test]
    fn test_withdraw_clock_regression() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let result = s.bank.withdraw(&mut CallContext::new(user(), START - 1), &mut s.token, &mut s.ledger);
        assert!(matches!(result, Err(DBankError::InvalidTimestamp { .. })));
        assert!(s.bank.is_deposited(&user()));
    }

    #[test]
    fn test_pending_interest() {
        let mut s = setup();
        assert_eq!(s.bank.pending_interest(&user(), START).unwrap(), 0);

        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();
        assert_eq!(
            s.bank.pending_interest(&user(), START + 60).unwrap(),
            accrued_interest(ONE, 60).unwrap()
        );
    }

    #[test]
    fn test_state_bytes_restore() {
        let mut s = setup();
        s.bank
            .deposit(&mut CallContext::new(user(), START), ONE, &mut s.ledger)
            .unwrap();

        let restored = CustodyBank::from_bytes(&s.bank.to_bytes()).unwrap();
        assert_eq!(restored, s.bank);
        assert_eq!(restored.deposit_start(&user()), START);
        assert!(CustodyBank::from_bytes(&[0xFF]).is_err());
    }
}
