//! Publishes the DBC token and the custody bank and wires them together.

use serde::Serialize;

use dbank_common::{
    channel::NativeLedger,
    clock::Clock,
    constants::base_asset,
    events::EventLog,
    types::{address_from_key, generate_contract_address, Address, CallContext, Short},
};
use dbank_custody::CustodyBank;
use dbank_token::RewardAsset;

use crate::{DeployConfig, DeployError, Network};

/// Publisher nonce of the token
const TOKEN_NONCE: u64 = 0;
/// Publisher nonce of the bank
const BANK_NONCE: u64 = 1;

/// A provisioned ledger: both components, the operator that published them,
/// and the base-asset balances of the development accounts.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub network: Network,
    pub operator: Address,
    pub token: RewardAsset,
    pub bank: CustodyBank,
    pub ledger: NativeLedger,
    pub dev_accounts: Vec<Address>,
    /// Events emitted while provisioning
    pub events: EventLog,
}

impl Deployment {
    /// Published identities
    pub fn report(&self) -> DeploymentReport {
        DeploymentReport {
            network: self.network.as_str(),
            operator: hex::encode(self.operator),
            token: hex::encode(self.token.address()),
            bank: hex::encode(self.bank.address()),
            minter: hex::encode(self.token.minter()),
        }
    }
}

/// Identities reported at the end of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub network: &'static str,
    pub operator: String,
    pub token: String,
    pub bank: String,
    pub minter: String,
}

/// Pre-funded development account `index`
pub fn dev_account(index: usize) -> Address {
    address_from_key(format!("dbank/dev/{index}").as_bytes())
}

/// Operating account for the configured network.
///
/// Production networks derive it from the configured key; development
/// networks use the first pre-funded account.
pub fn select_account(config: &DeployConfig) -> Result<Address, DeployError> {
    if config.network.is_production() {
        let key = config
            .from_key
            .as_deref()
            .ok_or(DeployError::MissingKey(config.network.as_str()))?;
        let bytes = hex::decode(key.trim_start_matches("0x"))?;
        Ok(address_from_key(&bytes))
    } else if config.dev_accounts == 0 {
        Err(DeployError::NoDevAccounts)
    } else {
        Ok(dev_account(0))
    }
}

/// Publish the token, then the bank, then hand the minter role to the bank.
pub fn provision<C: Clock + ?Sized>(config: &DeployConfig, clock: &C) -> Result<Deployment, DeployError> {
    let operator = select_account(config)?;
    tracing::info!(network = config.network.as_str(), operator = %Short(&operator), "provisioning");

    let mut ledger = NativeLedger::new();
    let mut dev_accounts = Vec::new();
    if !config.network.is_production() {
        let balance = u128::from(config.dev_account_balance) * base_asset::ONE;
        for index in 0..config.dev_accounts {
            let account = dev_account(index);
            ledger.fund(account, balance)?;
            dev_accounts.push(account);
        }
    }

    // Token with no initial supply; interest is minted on the fly
    let token_address = generate_contract_address(&operator, TOKEN_NONCE);
    let mut token = RewardAsset::new(token_address, operator);
    tracing::info!(token = %Short(&token_address), "token published");

    // Bank bound to the token it will mint into
    let bank_address = generate_contract_address(&operator, BANK_NONCE);
    let bank = CustodyBank::new(bank_address, token.address());
    tracing::info!(bank = %Short(&bank_address), "bank published");

    let mut ctx = CallContext::at(operator, clock);
    token.pass_minter_role(&mut ctx, bank.address())?;
    tracing::info!(minter = %Short(&token.minter()), "minter role handed to bank");

    Ok(Deployment {
        network: config.network,
        operator,
        token,
        bank,
        ledger,
        dev_accounts,
        events: ctx.events,
    })
}
