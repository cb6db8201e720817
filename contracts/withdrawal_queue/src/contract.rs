use soroban_sdk::{
    contract,
    contractimpl,
    contractmeta,
    log,
    panic_with_error,
    Address,
    Env,
    Vec,
};
use tidal::{
    constants::{
        INSTANCE_BUMP_AMOUNT,
        INSTANCE_LIFETIME_THRESHOLD,
        MAX_STETH_WITHDRAWAL_AMOUNT,
        MIN_STETH_WITHDRAWAL_AMOUNT,
    },
    error::ErrorCode,
    interfaces::{ ShareTokenClient, StakingPoolClient },
    math::safe_math::SafeMath,
    roles::{ check_role, FINALIZE_ROLE, MANAGE_PROTOCOL_CONTRACTS_ROLE, ORACLE_REPORT_ROLE },
    safe_increment,
    types::{ BatchesCalculationState, Prefinalization },
    validate,
};

use crate::{
    controller::{ batches, checkpoints, extrema, queue },
    events::WithdrawalQueueEvents,
    storage::{
        self,
        get_config,
        get_extrema_count,
        get_extremum,
        get_last_finalized_request_id,
        get_last_request_id,
        get_request,
        get_requests_by_owner,
        is_initialized,
        save_checkpoint,
        save_config,
        save_request,
        set_initialized,
        Checkpoint,
        Config,
        WithdrawalRequest,
        WithdrawalRequestStatus,
    },
    withdrawal_queue::WithdrawalQueueTrait,
};

contractmeta!(
    key = "Description",
    val = "FIFO queue redeeming liquid staking shares for ether"
);

#[contract]
pub struct WithdrawalQueue;

#[contractimpl]
impl WithdrawalQueueTrait for WithdrawalQueue {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(
        env: Env,
        acl: Address,
        pool: Address,
        ether_token: Address,
        share_token: Address
    ) {
        if is_initialized(&env) {
            log!(&env, "Withdrawal Queue: Initialize: initializing contract twice is not allowed");
            panic_with_error!(&env, ErrorCode::AlreadyInitialized);
        }

        set_initialized(&env);

        save_config(&env, Config {
            acl,
            pool: pool.clone(),
            ether_token: ether_token.clone(),
            share_token: share_token.clone(),
        });

        // sentinels keep cumulative differences and checkpoint lookups branch free
        save_request(&env, 0, &WithdrawalRequest {
            cumulative_steth: 0,
            cumulative_shares: 0,
            owner: env.current_contract_address(),
            timestamp: env.ledger().timestamp(),
            claimed: true,
        });
        save_checkpoint(&env, 0, &Checkpoint {
            from_request_id: 0,
            max_share_rate: 0,
        });

        WithdrawalQueueEvents::initialize(&env, pool, ether_token, share_token);
    }

    fn update_config(
        env: Env,
        sender: Address,
        acl: Option<Address>,
        pool: Option<Address>
    ) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let mut config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_PROTOCOL_CONTRACTS_ROLE)?;

        if let Some(acl) = acl {
            config.acl = acl;
        }
        if let Some(pool) = pool {
            config.pool = pool;
        }

        save_config(&env, config);

        Ok(())
    }

    // ################################################################
    //                              USER
    // ################################################################

    fn request_withdrawals(env: Env, owner: Address, amounts: Vec<i128>) -> Result<Vec<u64>, ErrorCode> {
        owner.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        let pool = StakingPoolClient::new(&env, &config.pool);
        let share_token = ShareTokenClient::new(&env, &config.share_token);
        let queue_address = env.current_contract_address();

        let mut request_ids = Vec::new(&env);
        for amount_of_steth in amounts.iter() {
            validate!(
                &env,
                amount_of_steth >= MIN_STETH_WITHDRAWAL_AMOUNT,
                ErrorCode::RequestAmountTooSmall,
                "{} is below the minimal withdrawal",
                amount_of_steth
            )?;
            validate!(
                &env,
                amount_of_steth <= MAX_STETH_WITHDRAWAL_AMOUNT,
                ErrorCode::RequestAmountTooLarge,
                "{} is above the maximal withdrawal",
                amount_of_steth
            )?;

            let amount_of_shares = pool.get_shares_by_pooled_eth(&amount_of_steth);
            validate!(&env, amount_of_shares > 0, ErrorCode::ZeroShares)?;

            share_token.transfer(&owner, &queue_address, &amount_of_shares);

            request_ids.push_back(queue::enqueue(&env, amount_of_steth, amount_of_shares, &owner)?);
        }

        Ok(request_ids)
    }

    fn claim_withdrawal(
        env: Env,
        sender: Address,
        request_id: u64,
        hint: u32,
        recipient: Option<Address>
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        let recipient = recipient.unwrap_or(sender.clone());

        queue::claim(&env, &config, &sender, request_id, hint, &recipient)
    }

    fn claim_withdrawals(
        env: Env,
        sender: Address,
        request_ids: Vec<u64>,
        hints: Vec<u32>,
        recipient: Option<Address>
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        validate!(&env, request_ids.len() == hints.len(), ErrorCode::ArraysLengthMismatch)?;

        let config = get_config(&env);
        let recipient = recipient.unwrap_or(sender.clone());

        let mut total_claimed: i128 = 0;
        for (request_id, hint) in request_ids.iter().zip(hints.iter()) {
            let claimed = queue::claim(&env, &config, &sender, request_id, hint, &recipient)?;
            safe_increment!(&env, total_claimed, claimed);
        }

        Ok(total_claimed)
    }

    fn transfer_request(env: Env, owner: Address, request_id: u64, to: Address) -> Result<(), ErrorCode> {
        owner.require_auth();

        queue::transfer_request(&env, &owner, request_id, &to)
    }

    // ################################################################
    //                          FINALIZATION
    // ################################################################

    fn calculate_finalization_batches(
        env: Env,
        max_share_rate: i128,
        max_timestamp: u64,
        max_requests_per_call: u32,
        state: BatchesCalculationState
    ) -> Result<BatchesCalculationState, ErrorCode> {
        batches::calculate_finalization_batches(
            &env,
            max_share_rate,
            max_timestamp,
            max_requests_per_call,
            state
        )
    }

    fn prefinalize(
        env: Env,
        batches: Vec<u64>,
        max_share_rate: i128
    ) -> Result<Prefinalization, ErrorCode> {
        batches::prefinalize(&env, &batches, max_share_rate)
    }

    fn finalize(
        env: Env,
        sender: Address,
        last_request_id_to_finalize: u64,
        amount_of_eth: i128,
        max_share_rate: i128
    ) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, FINALIZE_ROLE)?;

        queue::finalize(&env, &config, last_request_id_to_finalize, amount_of_eth, max_share_rate)
    }

    fn on_oracle_report(env: Env, sender: Address) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, ORACLE_REPORT_ROLE)?;

        extrema::on_report(&env)?;

        Ok(())
    }

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config {
        get_config(&env)
    }

    fn find_checkpoint_hint(env: Env, request_id: u64, start: u32, end: u32) -> Result<u32, ErrorCode> {
        checkpoints::find_checkpoint_hint(&env, request_id, start, end)
    }

    fn find_checkpoint_hints(
        env: Env,
        request_ids: Vec<u64>,
        first_index: u32,
        last_index: u32
    ) -> Result<Vec<u32>, ErrorCode> {
        checkpoints::find_checkpoint_hints(&env, &request_ids, first_index, last_index)
    }

    fn get_withdrawal_requests(env: Env, owner: Address) -> Vec<u64> {
        get_requests_by_owner(&env, &owner)
    }

    fn get_withdrawal_status(
        env: Env,
        request_ids: Vec<u64>
    ) -> Result<Vec<WithdrawalRequestStatus>, ErrorCode> {
        let last_request_id = get_last_request_id(&env);
        let last_finalized_request_id = get_last_finalized_request_id(&env);

        let mut statuses = Vec::new(&env);
        for request_id in request_ids.iter() {
            validate!(
                &env,
                request_id != 0 && request_id <= last_request_id,
                ErrorCode::InvalidRequestId
            )?;

            let prev = get_request(&env, request_id - 1)?;
            let request = get_request(&env, request_id)?;

            statuses.push_back(WithdrawalRequestStatus {
                amount_of_steth: request.cumulative_steth.safe_sub(prev.cumulative_steth, &env)?,
                amount_of_shares: request.cumulative_shares.safe_sub(
                    prev.cumulative_shares,
                    &env
                )?,
                owner: request.owner,
                timestamp: request.timestamp,
                is_finalized: request_id <= last_finalized_request_id,
                is_claimed: request.claimed,
            });
        }

        Ok(statuses)
    }

    fn get_claimable_ether(
        env: Env,
        request_ids: Vec<u64>,
        hints: Vec<u32>
    ) -> Result<Vec<i128>, ErrorCode> {
        validate!(&env, request_ids.len() == hints.len(), ErrorCode::ArraysLengthMismatch)?;

        let last_request_id = get_last_request_id(&env);
        let last_finalized_request_id = get_last_finalized_request_id(&env);

        let mut claimable = Vec::new(&env);
        for (request_id, hint) in request_ids.iter().zip(hints.iter()) {
            validate!(
                &env,
                request_id != 0 && request_id <= last_request_id,
                ErrorCode::InvalidRequestId
            )?;

            let request = get_request(&env, request_id)?;
            if request_id > last_finalized_request_id || request.claimed {
                claimable.push_back(0);
                continue;
            }

            claimable.push_back(
                checkpoints::calculate_claimable_ether(&env, request_id, &request, hint)?
            );
        }

        Ok(claimable)
    }

    fn get_last_request_id(env: Env) -> u64 {
        get_last_request_id(&env)
    }

    fn get_last_finalized_request_id(env: Env) -> u64 {
        get_last_finalized_request_id(&env)
    }

    fn get_last_checkpoint_index(env: Env) -> u32 {
        storage::get_last_checkpoint_index(&env)
    }

    fn get_locked_ether_amount(env: Env) -> i128 {
        storage::get_locked_ether_amount(&env)
    }

    fn unfinalized_request_number(env: Env) -> u64 {
        get_last_request_id(&env) - get_last_finalized_request_id(&env)
    }

    fn unfinalized_steth(env: Env) -> Result<i128, ErrorCode> {
        let last_request = get_request(&env, get_last_request_id(&env))?;
        let last_finalized_request = get_request(&env, get_last_finalized_request_id(&env))?;

        last_request.cumulative_steth.safe_sub(last_finalized_request.cumulative_steth, &env)
    }

    fn get_checkpoint(env: Env, index: u32) -> Result<Checkpoint, ErrorCode> {
        storage::get_checkpoint(&env, index)
    }

    fn get_extrema(env: Env) -> Result<Vec<u64>, ErrorCode> {
        let mut extrema = Vec::new(&env);
        for index in 1..=get_extrema_count(&env) {
            extrema.push_back(get_extremum(&env, index)?);
        }

        Ok(extrema)
    }
}
