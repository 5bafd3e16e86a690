//! dBank provisioning: selects the operating account, publishes the DBC
//! token and the custody bank, and hands the minter role to the bank.

pub mod config;
pub mod error;
pub mod logging;
pub mod provision;

pub use config::{DeployConfig, Network};
pub use error::DeployError;
pub use provision::{dev_account, provision, select_account, Deployment, DeploymentReport};
