use soroban_sdk::{ contracttype, Address, BytesN, Env };
use tidal::constants::{
    INSTANCE_BUMP_AMOUNT,
    INSTANCE_LIFETIME_THRESHOLD,
    PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config,
    Initialized,
    FeeConfig,
    BeaconStat,
    BufferedEther,
    WithdrawalCredentials,
    Stopped,
    LastReportEpoch,
}

// ################################################################
//                             Config
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub acl: Address,
    /// Staked asset accepted by `submit`
    pub ether_token: Address,
    /// Liquid staking share ledger, minted and burned by the pool
    pub share_token: Address,
    pub node_operators: Address,
    pub withdrawal_queue: Address,
    /// Validator registration sink
    pub deposit_contract: Address,
    pub treasury: Address,
    pub insurance_fund: Address,
    /// Holds the operators' part of every reward distribution
    pub operator_rewards: Address,
}

pub fn save_config(env: &Env, config: Config) {
    env.storage().persistent().set(&DataKey::Config, &config);
    env.storage()
        .persistent()
        .extend_ttl(&DataKey::Config, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_config(env: &Env) -> Config {
    let config = env.storage().persistent().get(&DataKey::Config).expect("Config not set");

    env.storage()
        .persistent()
        .extend_ttl(&DataKey::Config, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

    config
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Initialized).unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ################################################################
//                              Fees
// ################################################################

/// Protocol fee and its split, all in basis points.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Cut of every reward taken by the protocol
    pub fee_bps: i128,
    pub treasury_bps: i128,
    pub insurance_bps: i128,
    pub operators_bps: i128,
}

pub fn save_fee_config(env: &Env, fee_config: &FeeConfig) {
    env.storage().persistent().set(&DataKey::FeeConfig, fee_config);
    env.storage()
        .persistent()
        .extend_ttl(&DataKey::FeeConfig, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_fee_config(env: &Env) -> FeeConfig {
    let fee_config = env.storage().persistent().get(&DataKey::FeeConfig).expect("Fees not set");

    env.storage()
        .persistent()
        .extend_ttl(&DataKey::FeeConfig, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

    fee_config
}

// ################################################################
//                         Beacon balance
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BeaconStat {
    /// Validators ever deposited by the pool
    pub deposited_validators: u64,
    /// Validators seen by the last oracle report
    pub beacon_validators: u64,
    /// Balance of those validators as of the last oracle report
    pub beacon_balance: i128,
}

pub fn get_beacon_stat(env: &Env) -> BeaconStat {
    env.storage().instance().get(&DataKey::BeaconStat).unwrap_or_default()
}

pub fn save_beacon_stat(env: &Env, stat: &BeaconStat) {
    env.storage().instance().set(&DataKey::BeaconStat, stat);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Ether held by the pool and not yet staked or locked for withdrawals.
pub fn get_buffered_ether(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::BufferedEther).unwrap_or(0)
}

pub fn save_buffered_ether(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::BufferedEther, &amount);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_last_report_epoch(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::LastReportEpoch).unwrap_or(0)
}

pub fn save_last_report_epoch(env: &Env, epoch: u64) {
    env.storage().instance().set(&DataKey::LastReportEpoch, &epoch);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ################################################################
//                            Controls
// ################################################################

pub fn get_withdrawal_credentials(env: &Env) -> Option<BytesN<32>> {
    env.storage().instance().get(&DataKey::WithdrawalCredentials)
}

pub fn save_withdrawal_credentials(env: &Env, withdrawal_credentials: &BytesN<32>) {
    env.storage().instance().set(&DataKey::WithdrawalCredentials, withdrawal_credentials);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_stopped(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Stopped).unwrap_or(false)
}

pub fn set_stopped(env: &Env, stopped: bool) {
    env.storage().instance().set(&DataKey::Stopped, &stopped);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
