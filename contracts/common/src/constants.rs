//! Protocol Constants
//!
//! All magic numbers of the dBank ledger. Amounts of both assets use 18
//! decimals, so one whole unit is `10^18` base units.

/// Reward token metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Decentralized Bank Currency";
    /// Token symbol
    pub const SYMBOL: &str = "DBC";
    /// Decimal places
    pub const DECIMALS: u8 = 18;
    /// One whole token in base units
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Base asset (the value depositors lock in custody)
pub mod base_asset {
    /// One whole base-asset unit in wei
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Deposit limits
pub mod deposit {
    use super::base_asset::ONE;

    /// Smallest accepted deposit: 0.01 base unit.
    ///
    /// Also the reference principal the interest rate is quoted against.
    pub const MIN_DEPOSIT: u128 = ONE / 100;
}

/// Interest accrual
pub mod interest {
    /// Reward units minted per second for every `MIN_DEPOSIT` of principal.
    ///
    /// 0.01 * 10% / 31_536_000 s ≈ 3.17e-11 whole units per second, i.e. a
    /// nominal ~10% annual rate. Scales linearly with principal.
    pub const INTEREST_PER_SECOND: u128 = 31_668_017;

    /// Principal the rate above is quoted against.
    pub const RATE_BASE: u128 = super::deposit::MIN_DEPOSIT;
}

/// Time-related constants
pub mod time {
    /// Seconds in a (non-leap) year
    pub const SECONDS_PER_YEAR: u64 = 31_536_000;

    /// Seconds in a day
    pub const SECONDS_PER_DAY: u64 = 86_400;
}
