//! dBank Common Library
//!
//! Shared types, constants, and utilities for the dBank custodial ledger.
//!
//! ## Components
//!
//! - **DBC Token** (`dbank-token`): fungible reward asset with a single
//!   authorized minter, reassignable only by the immutable owner.
//! - **Custody Bank** (`dbank-custody`): holds base-asset principal, one active
//!   deposit per account, mints accrued interest on withdrawal.
//!
//! Everything both components agree on lives here: identities and amounts,
//! the error taxonomy, domain events, the interest formula, the minter
//! capability, and the seams to the execution environment (clock and
//! base-asset transfer channel).
//!
//! This crate is `no_std` compatible when built without the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod access_control;
pub mod channel;
pub mod clock;
pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod types;

// Re-exports for convenience
pub use access_control::*;
pub use channel::*;
pub use clock::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use types::*;
