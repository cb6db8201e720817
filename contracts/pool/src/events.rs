use soroban_sdk::{ Address, BytesN, Env, Symbol };

use crate::storage::FeeConfig;

pub struct PoolEvents {}

impl PoolEvents {
    /// Emitted when the pool is initialized
    ///
    /// - topics - `["initialize", ether_token: Address, share_token: Address]`
    /// - data - `fee_config: FeeConfig`
    pub fn initialize(env: &Env, ether_token: Address, share_token: Address, fee_config: FeeConfig) {
        let topics = (Symbol::new(env, "initialize"), ether_token, share_token);
        env.events().publish(topics, fee_config);
    }

    /// Emitted when ether is staked through `submit`
    ///
    /// - topics - `["submitted", sender: Address]`
    /// - data - `[amount: i128, shares: i128, referral: Option<Address>]`
    pub fn submitted(env: &Env, sender: Address, amount: i128, shares: i128, referral: Option<Address>) {
        let topics = (Symbol::new(env, "submitted"), sender);
        env.events().publish(topics, (amount, shares, referral));
    }

    /// Emitted for every validator registered with the deposit contract
    ///
    /// - topics - `["validator_deposited"]`
    /// - data - `[pubkey: BytesN<48>, amount: i128]`
    pub fn validator_deposited(env: &Env, pubkey: BytesN<48>, amount: i128) {
        let topics = (Symbol::new(env, "validator_deposited"),);
        env.events().publish(topics, (pubkey, amount));
    }

    /// Emitted when an oracle report is applied
    ///
    /// - topics - `["beacon_reported", epoch: u64]`
    /// - data - `[beacon_validators: u64, beacon_balance: i128, rewards: i128]`
    pub fn beacon_reported(
        env: &Env,
        epoch: u64,
        beacon_validators: u64,
        beacon_balance: i128,
        rewards: i128
    ) {
        let topics = (Symbol::new(env, "beacon_reported"), epoch);
        env.events().publish(topics, (beacon_validators, beacon_balance, rewards));
    }

    /// - topics - `["rewards_distributed"]`
    /// - data - `[treasury: i128, insurance: i128, operators: i128]`
    pub fn rewards_distributed(env: &Env, treasury: i128, insurance: i128, operators: i128) {
        let topics = (Symbol::new(env, "rewards_distributed"),);
        env.events().publish(topics, (treasury, insurance, operators));
    }

    /// - topics - `["withdrawals_finalized", last_request_id: u64]`
    /// - data - `[eth_locked: i128, shares_burned: i128]`
    pub fn withdrawals_finalized(env: &Env, last_request_id: u64, eth_locked: i128, shares_burned: i128) {
        let topics = (Symbol::new(env, "withdrawals_finalized"), last_request_id);
        env.events().publish(topics, (eth_locked, shares_burned));
    }

    /// - topics - `["fee_set"]`
    /// - data - `fee_config: FeeConfig`
    pub fn fee_set(env: &Env, fee_config: FeeConfig) {
        let topics = (Symbol::new(env, "fee_set"),);
        env.events().publish(topics, fee_config);
    }

    /// - topics - `["withdrawal_credentials_set"]`
    /// - data - `withdrawal_credentials: BytesN<32>`
    pub fn withdrawal_credentials_set(env: &Env, withdrawal_credentials: BytesN<32>) {
        let topics = (Symbol::new(env, "withdrawal_credentials_set"),);
        env.events().publish(topics, withdrawal_credentials);
    }

    /// - topics - `["stopped"]` or `["resumed"]`
    /// - data - `sender: Address`
    pub fn stopped(env: &Env, sender: Address, stopped: bool) {
        let name = if stopped { "stopped" } else { "resumed" };
        env.events().publish((Symbol::new(env, name),), sender);
    }
}
