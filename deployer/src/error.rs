use thiserror::Error;

use dbank_common::errors::DBankError;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("ledger error: {0}")]
    Ledger(#[from] DBankError),

    #[error("config error: {0}")]
    Config(String),

    #[error("network {0} requires an operator key (from_key)")]
    MissingKey(&'static str),

    #[error("invalid operator key: {0}")]
    InvalidKey(#[from] hex::FromHexError),

    #[error("development network has no pre-funded accounts")]
    NoDevAccounts,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
