use soroban_sdk::{
    contract,
    contractimpl,
    contractmeta,
    log,
    panic_with_error,
    token::TokenClient,
    Address,
    BytesN,
    Env,
    Vec,
};
use tidal::{
    constants::{ DEPOSIT_SIZE, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD },
    error::{ ErrorCode, TidalResult },
    interfaces::{
        DepositContractClient,
        NodeOperatorsClient,
        ShareTokenClient,
        WithdrawalQueueClient,
    },
    math::{ casting::Cast, mul_div::{ calc_share_rate, mul_div_floor }, safe_math::SafeMath },
    roles::{
        check_role,
        DEPOSIT_ROLE,
        MANAGE_FEE,
        MANAGE_PROTOCOL_CONTRACTS_ROLE,
        MANAGE_WITHDRAWAL_KEY,
        PAUSE_ROLE,
        REPORT_ROLE,
        RESUME_ROLE,
    },
    safe_decrement,
    safe_increment,
    validate,
};

use crate::{
    controller::{ deposit::deposit_data_root, rewards },
    events::PoolEvents,
    pool::PoolTrait,
    storage::{
        get_beacon_stat,
        get_buffered_ether,
        get_config,
        get_fee_config,
        get_last_report_epoch,
        get_withdrawal_credentials,
        is_initialized,
        is_stopped,
        save_beacon_stat,
        save_buffered_ether,
        save_config,
        save_fee_config,
        save_last_report_epoch,
        save_withdrawal_credentials,
        set_initialized,
        set_stopped,
        BeaconStat,
        Config,
        FeeConfig,
    },
};

contractmeta!(key = "Description", val = "Liquid staking pool minting shares against staked ether");

#[contract]
pub struct StakingPool;

#[contractimpl]
impl PoolTrait for StakingPool {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(env: Env, config: Config, fee_config: FeeConfig) {
        if is_initialized(&env) {
            log!(&env, "Staking Pool: Initialize: initializing contract twice is not allowed");
            panic_with_error!(&env, ErrorCode::AlreadyInitialized);
        }

        if let Err(error_code) = rewards::validate_fee_config(&env, &fee_config) {
            panic_with_error!(&env, error_code);
        }

        set_initialized(&env);

        PoolEvents::initialize(
            &env,
            config.ether_token.clone(),
            config.share_token.clone(),
            fee_config.clone()
        );

        save_config(&env, config);
        save_fee_config(&env, &fee_config);
    }

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
    ) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let mut config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_PROTOCOL_CONTRACTS_ROLE)?;

        if let Some(acl) = acl {
            config.acl = acl;
        }
        if let Some(node_operators) = node_operators {
            config.node_operators = node_operators;
        }
        if let Some(withdrawal_queue) = withdrawal_queue {
            config.withdrawal_queue = withdrawal_queue;
        }
        if let Some(deposit_contract) = deposit_contract {
            config.deposit_contract = deposit_contract;
        }
        if let Some(treasury) = treasury {
            config.treasury = treasury;
        }
        if let Some(insurance_fund) = insurance_fund {
            config.insurance_fund = insurance_fund;
        }
        if let Some(operator_rewards) = operator_rewards {
            config.operator_rewards = operator_rewards;
        }

        save_config(&env, config);

        Ok(())
    }

    fn set_fee(env: Env, sender: Address, fee_bps: i128) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_FEE)?;

        let mut fee_config = get_fee_config(&env);
        fee_config.fee_bps = fee_bps;
        rewards::validate_fee_config(&env, &fee_config)?;

        save_fee_config(&env, &fee_config);
        PoolEvents::fee_set(&env, fee_config);

        Ok(())
    }

    fn set_fee_distribution(
        env: Env,
        sender: Address,
        treasury_bps: i128,
        insurance_bps: i128,
        operators_bps: i128
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_FEE)?;

        let fee_config = FeeConfig {
            fee_bps: get_fee_config(&env).fee_bps,
            treasury_bps,
            insurance_bps,
            operators_bps,
        };
        rewards::validate_fee_config(&env, &fee_config)?;

        save_fee_config(&env, &fee_config);
        PoolEvents::fee_set(&env, fee_config);

        Ok(())
    }

    fn set_withdrawal_credentials(
        env: Env,
        sender: Address,
        withdrawal_credentials: BytesN<32>
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_WITHDRAWAL_KEY)?;

        save_withdrawal_credentials(&env, &withdrawal_credentials);

        NodeOperatorsClient::new(&env, &config.node_operators).trim_unused_keys(
            &env.current_contract_address()
        );

        PoolEvents::withdrawal_credentials_set(&env, withdrawal_credentials);

        Ok(())
    }

    fn stop(env: Env, sender: Address) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, PAUSE_ROLE)?;

        set_stopped(&env, true);
        PoolEvents::stopped(&env, sender, true);

        Ok(())
    }

    fn resume(env: Env, sender: Address) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, RESUME_ROLE)?;

        set_stopped(&env, false);
        PoolEvents::stopped(&env, sender, false);

        Ok(())
    }

    // ################################################################
    //                              USER
    // ################################################################

    fn submit(
        env: Env,
        sender: Address,
        amount: i128,
        referral: Option<Address>
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        validate!(&env, !is_stopped(&env), ErrorCode::Stopped)?;
        validate!(&env, amount > 0, ErrorCode::ZeroDeposit)?;

        let config = get_config(&env);
        let pool_address = env.current_contract_address();

        let shares = shares_by_pooled_eth(&env, &config, amount)?;
        validate!(
            &env,
            shares > 0,
            ErrorCode::ZeroShares,
            "{} is worth less than one share",
            amount
        )?;

        TokenClient::new(&env, &config.ether_token).transfer(&sender, &pool_address, &amount);
        ShareTokenClient::new(&env, &config.share_token).mint(&sender, &shares);

        let mut buffered_ether = get_buffered_ether(&env);
        safe_increment!(&env, buffered_ether, amount);
        save_buffered_ether(&env, buffered_ether);

        PoolEvents::submitted(&env, sender, amount, shares, referral);

        Ok(shares)
    }

    // ################################################################
    //                            KEEPERS
    // ################################################################

    fn deposit_buffered_ether(env: Env, sender: Address, max_deposits: u32) -> Result<u32, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, DEPOSIT_ROLE)?;

        validate!(&env, !is_stopped(&env), ErrorCode::Stopped)?;
        let withdrawal_credentials = get_withdrawal_credentials(&env).ok_or_else(|| {
            log!(&env, "Staking Pool: Deposit: withdrawal credentials are not set");
            ErrorCode::EmptyWithdrawalCredentials
        })?;

        let mut buffered_ether = get_buffered_ether(&env);
        let units = buffered_ether.safe_div(DEPOSIT_SIZE, &env)?.min(max_deposits.cast(&env)?);
        if units == 0 {
            return Ok(0);
        }

        let pool_address = env.current_contract_address();
        let allocation = NodeOperatorsClient::new(&env, &config.node_operators).assign_next_signing_keys(
            &pool_address,
            &units.safe_mul(DEPOSIT_SIZE, &env)?,
            &DEPOSIT_SIZE
        );

        let ether = TokenClient::new(&env, &config.ether_token);
        let deposit_contract = DepositContractClient::new(&env, &config.deposit_contract);

        for (pubkey, signature) in allocation.pubkeys.iter().zip(allocation.signatures.iter()) {
            let balance_before = ether.balance(&pool_address);

            let root = deposit_data_root(
                &env,
                &pubkey,
                &withdrawal_credentials,
                &signature,
                DEPOSIT_SIZE
            )?;
            ether.transfer(&pool_address, &config.deposit_contract, &DEPOSIT_SIZE);
            deposit_contract.deposit(&pubkey, &withdrawal_credentials, &signature, &root);

            if ether.balance(&pool_address) != balance_before.safe_sub(DEPOSIT_SIZE, &env)? {
                log!(&env, "Staking Pool: Deposit: balance mismatch after staking {}", pubkey);
                panic_with_error!(&env, ErrorCode::DepositBalanceMismatch);
            }

            PoolEvents::validator_deposited(&env, pubkey, DEPOSIT_SIZE);
        }

        let deposits = allocation.pubkeys.len();
        if deposits > 0 {
            let mut beacon_stat = get_beacon_stat(&env);
            safe_increment!(&env, beacon_stat.deposited_validators, deposits as u64);
            save_beacon_stat(&env, &beacon_stat);

            safe_decrement!(&env, buffered_ether, allocation.deposited_amount);
            save_buffered_ether(&env, buffered_ether);
        }

        Ok(deposits)
    }

    fn handle_oracle_report(
        env: Env,
        sender: Address,
        epoch: u64,
        beacon_validators: u64,
        beacon_balance: i128
    ) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, REPORT_ROLE)?;

        let last_report_epoch = get_last_report_epoch(&env);
        if epoch <= last_report_epoch {
            log!(
                &env,
                "Staking Pool: Oracle report: epoch {} is not newer than {}, skipping",
                epoch,
                last_report_epoch
            );
            return Ok(());
        }

        let mut beacon_stat = get_beacon_stat(&env);
        validate!(
            &env,
            beacon_validators <= beacon_stat.deposited_validators,
            ErrorCode::ReportedMoreDeposited,
            "{} validators reported, {} deposited",
            beacon_validators,
            beacon_stat.deposited_validators
        )?;
        validate!(
            &env,
            beacon_validators >= beacon_stat.beacon_validators,
            ErrorCode::ReportedLessValidators,
            "{} validators reported, {} seen before",
            beacon_validators,
            beacon_stat.beacon_validators
        )?;

        let appeared_validators: i128 = (beacon_validators - beacon_stat.beacon_validators).cast(
            &env
        )?;
        let reward_base = appeared_validators
            .safe_mul(DEPOSIT_SIZE, &env)?
            .safe_add(beacon_stat.beacon_balance, &env)?;

        beacon_stat.beacon_validators = beacon_validators;
        beacon_stat.beacon_balance = beacon_balance;
        save_beacon_stat(&env, &beacon_stat);
        save_last_report_epoch(&env, epoch);

        let rewards = if beacon_balance > reward_base {
            beacon_balance.safe_sub(reward_base, &env)?
        } else {
            0
        };
        if rewards > 0 {
            distribute_fee(&env, &config, rewards)?;
        }

        WithdrawalQueueClient::new(&env, &config.withdrawal_queue).on_oracle_report(
            &env.current_contract_address()
        );

        PoolEvents::beacon_reported(&env, epoch, beacon_validators, beacon_balance, rewards);

        Ok(())
    }

    fn finalize_withdrawals(
        env: Env,
        sender: Address,
        batches: Vec<u64>,
        max_share_rate: i128
    ) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, REPORT_ROLE)?;

        let queue = WithdrawalQueueClient::new(&env, &config.withdrawal_queue);
        let prefinalization = queue.prefinalize(&batches, &max_share_rate);

        let mut buffered_ether = get_buffered_ether(&env);
        validate!(
            &env,
            prefinalization.eth_to_lock <= buffered_ether,
            ErrorCode::NotEnoughBufferedEther,
            "{} ether to lock, {} buffered",
            prefinalization.eth_to_lock,
            buffered_ether
        )?;

        let pool_address = env.current_contract_address();
        let last_request_id = batches.last_unchecked();

        TokenClient::new(&env, &config.ether_token).transfer(
            &pool_address,
            &config.withdrawal_queue,
            &prefinalization.eth_to_lock
        );
        queue.finalize(&pool_address, &last_request_id, &prefinalization.eth_to_lock, &max_share_rate);

        safe_decrement!(&env, buffered_ether, prefinalization.eth_to_lock);
        save_buffered_ether(&env, buffered_ether);

        PoolEvents::withdrawals_finalized(
            &env,
            last_request_id,
            prefinalization.eth_to_lock,
            prefinalization.shares_to_burn
        );

        Ok(())
    }

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config {
        get_config(&env)
    }

    fn get_total_pooled_ether(env: Env) -> Result<i128, ErrorCode> {
        total_pooled_ether(&env)
    }

    fn get_buffered_ether(env: Env) -> i128 {
        get_buffered_ether(&env)
    }

    fn get_beacon_stat(env: Env) -> BeaconStat {
        get_beacon_stat(&env)
    }

    fn get_fee(env: Env) -> i128 {
        get_fee_config(&env).fee_bps
    }

    fn get_fee_distribution(env: Env) -> (i128, i128, i128) {
        let fee_config = get_fee_config(&env);
        (fee_config.treasury_bps, fee_config.insurance_bps, fee_config.operators_bps)
    }

    fn get_shares_by_pooled_eth(env: Env, eth_amount: i128) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        shares_by_pooled_eth(&env, &config, eth_amount)
    }

    fn get_pooled_eth_by_shares(env: Env, shares_amount: i128) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let total_shares = ShareTokenClient::new(&env, &config.share_token).total_supply();
        if total_shares == 0 {
            return Ok(0);
        }

        mul_div_floor(&env, shares_amount, total_pooled_ether(&env)?, total_shares)
    }

    fn get_share_rate(env: Env) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let total_shares = ShareTokenClient::new(&env, &config.share_token).total_supply();

        calc_share_rate(&env, total_pooled_ether(&env)?, total_shares)
    }

    fn get_withdrawal_credentials(env: Env) -> Option<BytesN<32>> {
        get_withdrawal_credentials(&env)
    }

    fn get_last_report_epoch(env: Env) -> u64 {
        get_last_report_epoch(&env)
    }

    fn is_stopped(env: Env) -> bool {
        is_stopped(&env)
    }
}

/// Buffered ether, the last reported beacon balance and the deposits the beacon chain has
/// not picked up yet.
fn total_pooled_ether(env: &Env) -> TidalResult<i128> {
    let beacon_stat = get_beacon_stat(env);
    let transient_validators: i128 = beacon_stat.deposited_validators
        .safe_sub(beacon_stat.beacon_validators, env)?
        .cast(env)?;

    get_buffered_ether(env)
        .safe_add(beacon_stat.beacon_balance, env)?
        .safe_add(transient_validators.safe_mul(DEPOSIT_SIZE, env)?, env)
}

fn shares_by_pooled_eth(env: &Env, config: &Config, eth_amount: i128) -> TidalResult<i128> {
    let total_shares = ShareTokenClient::new(env, &config.share_token).total_supply();
    let total_pooled_ether = total_pooled_ether(env)?;

    if total_shares == 0 || total_pooled_ether == 0 {
        return Ok(eth_amount);
    }

    mul_div_floor(env, eth_amount, total_shares, total_pooled_ether)
}

/// Mints the protocol cut of `rewards` as new shares and hands them out per the fee
/// distribution.
fn distribute_fee(env: &Env, config: &Config, rewards: i128) -> TidalResult {
    let fee_config = get_fee_config(env);
    let share_token = ShareTokenClient::new(env, &config.share_token);

    let shares_to_mint = rewards::shares_for_fee(
        env,
        rewards,
        fee_config.fee_bps,
        total_pooled_ether(env)?,
        share_token.total_supply()
    )?;
    if shares_to_mint == 0 {
        return Ok(());
    }

    let split = rewards::split_shares(env, shares_to_mint, &fee_config)?;
    for (recipient, shares) in [
        (&config.treasury, split.treasury),
        (&config.insurance_fund, split.insurance),
        (&config.operator_rewards, split.operators),
    ] {
        if shares > 0 {
            share_token.mint(recipient, &shares);
        }
    }

    PoolEvents::rewards_distributed(env, split.treasury, split.insurance, split.operators);

    Ok(())
}
