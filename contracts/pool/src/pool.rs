use soroban_sdk::{ Address, BytesN, Env, Vec };
use tidal::error::ErrorCode;

use crate::storage::{ BeaconStat, Config, FeeConfig };

pub trait PoolTrait {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(env: Env, config: Config, fee_config: FeeConfig);

    fn update_config(
        env: Env,
        sender: Address,
        acl: Option<Address>,
        node_operators: Option<Address>,
        withdrawal_queue: Option<Address>,
        deposit_contract: Option<Address>,
        treasury: Option<Address>,
        insurance_fund: Option<Address>,
        operator_rewards: Option<Address>
    ) -> Result<(), ErrorCode>;

    fn set_fee(env: Env, sender: Address, fee_bps: i128) -> Result<(), ErrorCode>;

    /// Sets how minted fee shares are split. The three parts must add up to 10_000 bps.
    fn set_fee_distribution(
        env: Env,
        sender: Address,
        treasury_bps: i128,
        insurance_bps: i128,
        operators_bps: i128
    ) -> Result<(), ErrorCode>;

    /// Points future deposits at new withdrawal credentials. Keys signed for the old
    /// credentials are dropped from the registry.
    fn set_withdrawal_credentials(
        env: Env,
        sender: Address,
        withdrawal_credentials: BytesN<32>
    ) -> Result<(), ErrorCode>;

    fn stop(env: Env, sender: Address) -> Result<(), ErrorCode>;

    fn resume(env: Env, sender: Address) -> Result<(), ErrorCode>;

    // ################################################################
    //                              USER
    // ################################################################

    /// Stakes `amount` of ether and mints shares at the current rate.
    fn submit(env: Env, sender: Address, amount: i128, referral: Option<Address>) -> Result<i128, ErrorCode>;

    // ################################################################
    //                            KEEPERS
    // ################################################################

    /// Registers up to `max_deposits` validators out of the buffered ether.
    fn deposit_buffered_ether(env: Env, sender: Address, max_deposits: u32) -> Result<u32, ErrorCode>;

    /// Applies a beacon chain balance report and mints the protocol fee on rewards.
    fn handle_oracle_report(
        env: Env,
        sender: Address,
        epoch: u64,
        beacon_validators: u64,
        beacon_balance: i128
    ) -> Result<(), ErrorCode>;

    /// Locks buffered ether in the withdrawal queue for the given batches.
    fn finalize_withdrawals(
        env: Env,
        sender: Address,
        batches: Vec<u64>,
        max_share_rate: i128
    ) -> Result<(), ErrorCode>;

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config;

    fn get_total_pooled_ether(env: Env) -> Result<i128, ErrorCode>;

    fn get_buffered_ether(env: Env) -> i128;

    fn get_beacon_stat(env: Env) -> BeaconStat;

    fn get_fee(env: Env) -> i128;

    /// `(treasury_bps, insurance_bps, operators_bps)`
    fn get_fee_distribution(env: Env) -> (i128, i128, i128);

    fn get_shares_by_pooled_eth(env: Env, eth_amount: i128) -> Result<i128, ErrorCode>;

    fn get_pooled_eth_by_shares(env: Env, shares_amount: i128) -> Result<i128, ErrorCode>;

    /// Ether per share with 27 decimals.
    fn get_share_rate(env: Env) -> Result<i128, ErrorCode>;

    fn get_withdrawal_credentials(env: Env) -> Option<BytesN<32>>;

    fn get_last_report_epoch(env: Env) -> u64;

    fn is_stopped(env: Env) -> bool;
}
