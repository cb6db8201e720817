use soroban_sdk::{ Address, Env, Vec };
use tidal::{ error::ErrorCode, types::{ BatchesCalculationState, Prefinalization } };

use crate::storage::{ Checkpoint, Config, WithdrawalRequestStatus };

pub trait WithdrawalQueueTrait {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(
        env: Env,
        acl: Address,
        pool: Address,
        ether_token: Address,
        share_token: Address
    );

    fn update_config(
        env: Env,
        sender: Address,
        acl: Option<Address>,
        pool: Option<Address>
    ) -> Result<(), ErrorCode>;

    // ################################################################
    //                              USER
    // ################################################################

    /// Locks the shares backing every amount and opens one request per amount.
    fn request_withdrawals(env: Env, owner: Address, amounts: Vec<i128>) -> Result<Vec<u64>, ErrorCode>;

    fn claim_withdrawal(
        env: Env,
        sender: Address,
        request_id: u64,
        hint: u32,
        recipient: Option<Address>
    ) -> Result<i128, ErrorCode>;

    fn claim_withdrawals(
        env: Env,
        sender: Address,
        request_ids: Vec<u64>,
        hints: Vec<u32>,
        recipient: Option<Address>
    ) -> Result<i128, ErrorCode>;

    fn transfer_request(env: Env, owner: Address, request_id: u64, to: Address) -> Result<(), ErrorCode>;

    // ################################################################
    //                          FINALIZATION
    // ################################################################

    fn calculate_finalization_batches(
        env: Env,
        max_share_rate: i128,
        max_timestamp: u64,
        max_requests_per_call: u32,
        state: BatchesCalculationState
    ) -> Result<BatchesCalculationState, ErrorCode>;

    fn prefinalize(
        env: Env,
        batches: Vec<u64>,
        max_share_rate: i128
    ) -> Result<Prefinalization, ErrorCode>;

    fn finalize(
        env: Env,
        sender: Address,
        last_request_id_to_finalize: u64,
        amount_of_eth: i128,
        max_share_rate: i128
    ) -> Result<(), ErrorCode>;

    /// Closes the current report segment and records a share rate extremum if the
    /// trend turned.
    fn on_oracle_report(env: Env, sender: Address) -> Result<(), ErrorCode>;

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config;

    fn find_checkpoint_hint(env: Env, request_id: u64, start: u32, end: u32) -> Result<u32, ErrorCode>;

    fn find_checkpoint_hints(
        env: Env,
        request_ids: Vec<u64>,
        first_index: u32,
        last_index: u32
    ) -> Result<Vec<u32>, ErrorCode>;

    fn get_withdrawal_requests(env: Env, owner: Address) -> Vec<u64>;

    fn get_withdrawal_status(
        env: Env,
        request_ids: Vec<u64>
    ) -> Result<Vec<WithdrawalRequestStatus>, ErrorCode>;

    fn get_claimable_ether(
        env: Env,
        request_ids: Vec<u64>,
        hints: Vec<u32>
    ) -> Result<Vec<i128>, ErrorCode>;

    fn get_last_request_id(env: Env) -> u64;

    fn get_last_finalized_request_id(env: Env) -> u64;

    fn get_last_checkpoint_index(env: Env) -> u32;

    fn get_locked_ether_amount(env: Env) -> i128;

    fn unfinalized_request_number(env: Env) -> u64;

    fn unfinalized_steth(env: Env) -> Result<i128, ErrorCode>;

    fn get_checkpoint(env: Env, index: u32) -> Result<Checkpoint, ErrorCode>;

    fn get_extrema(env: Env) -> Result<Vec<u64>, ErrorCode>;
}
