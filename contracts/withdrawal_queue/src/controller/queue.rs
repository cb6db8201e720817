use soroban_sdk::{ log, token, Address, Env };
use tidal::{
    constants::SHARE_RATE_UNLIMITED,
    error::{ ErrorCode, TidalResult },
    interfaces::ShareTokenClient,
    math::{ mul_div::{ calc_share_rate, shares_to_eth }, safe_math::SafeMath },
    safe_decrement,
    safe_increment,
    validate,
};

use crate::{
    controller::checkpoints::calculate_claimable_ether,
    events::WithdrawalQueueEvents,
    storage::{
        add_request_to_owner,
        get_checkpoint,
        get_last_checkpoint_index,
        get_last_finalized_request_id,
        get_last_request_id,
        get_locked_ether_amount,
        get_request,
        remove_request_from_owner,
        save_checkpoint,
        save_last_checkpoint_index,
        save_last_finalized_request_id,
        save_last_request_id,
        save_locked_ether_amount,
        save_request,
        Checkpoint,
        Config,
        WithdrawalRequest,
    },
};

/// Totals of a contiguous run of requests, derived from two cumulative entries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchValue {
    pub share_rate: i128,
    pub steth: i128,
    pub shares: i128,
}

impl BatchValue {
    /// Ether owed for the run when the share rate is capped at `max_share_rate`.
    pub fn eth_at_cap(&self, env: &Env, max_share_rate: i128) -> TidalResult<i128> {
        if self.share_rate > max_share_rate {
            shares_to_eth(env, self.shares, max_share_rate)
        } else {
            Ok(self.steth)
        }
    }
}

/// Values the requests in `(prev, request]`. `prev` must precede `request` in the queue.
pub fn calc_batch(
    env: &Env,
    prev: &WithdrawalRequest,
    request: &WithdrawalRequest
) -> TidalResult<BatchValue> {
    let steth = request.cumulative_steth.safe_sub(prev.cumulative_steth, env)?;
    let shares = request.cumulative_shares.safe_sub(prev.cumulative_shares, env)?;

    Ok(BatchValue {
        share_rate: calc_share_rate(env, steth, shares)?,
        steth,
        shares,
    })
}

/// Share rate the request was created at.
pub fn request_share_rate(env: &Env, request_id: u64) -> TidalResult<i128> {
    let prev = get_request(env, request_id.safe_sub(1, env)?)?;
    let request = get_request(env, request_id)?;

    Ok(calc_batch(env, &prev, &request)?.share_rate)
}

pub fn enqueue(env: &Env, amount_of_steth: i128, amount_of_shares: i128, owner: &Address) -> TidalResult<u64> {
    let last_request_id = get_last_request_id(env);
    let last_request = get_request(env, last_request_id)?;
    let request_id = last_request_id.safe_add(1, env)?;

    save_request(env, request_id, &WithdrawalRequest {
        cumulative_steth: last_request.cumulative_steth.safe_add(amount_of_steth, env)?,
        cumulative_shares: last_request.cumulative_shares.safe_add(amount_of_shares, env)?,
        owner: owner.clone(),
        timestamp: env.ledger().timestamp(),
        claimed: false,
    });
    save_last_request_id(env, request_id);
    add_request_to_owner(env, owner, request_id);

    WithdrawalQueueEvents::withdrawal_requested(
        env,
        request_id,
        owner.clone(),
        amount_of_steth,
        amount_of_shares
    );

    Ok(request_id)
}

/// Marks every request up to `last_request_id_to_finalize` as finalized with
/// `amount_of_eth` reserved for them.
///
/// The ether has to be on the queue's balance already. Paying out less than the stETH
/// due records `max_share_rate` as the cap for the range.
pub fn finalize(
    env: &Env,
    config: &Config,
    last_request_id_to_finalize: u64,
    amount_of_eth: i128,
    max_share_rate: i128
) -> TidalResult {
    let last_finalized_request_id = get_last_finalized_request_id(env);
    validate!(
        env,
        last_request_id_to_finalize > last_finalized_request_id &&
            last_request_id_to_finalize <= get_last_request_id(env),
        ErrorCode::InvalidRequestId,
        "request {} can not be finalized",
        last_request_id_to_finalize
    )?;
    validate!(env, amount_of_eth >= 0, ErrorCode::InvalidAmount)?;

    let last_finalized_request = get_request(env, last_finalized_request_id)?;
    let request_to_finalize = get_request(env, last_request_id_to_finalize)?;
    let batch = calc_batch(env, &last_finalized_request, &request_to_finalize)?;

    validate!(
        env,
        amount_of_eth <= batch.steth,
        ErrorCode::TooMuchEtherToFinalize,
        "{} ether offered for {} stETH",
        amount_of_eth,
        batch.steth
    )?;

    let effective_share_rate = if amount_of_eth == batch.steth {
        SHARE_RATE_UNLIMITED
    } else {
        validate!(env, max_share_rate > 0, ErrorCode::ZeroShareRate)?;
        max_share_rate
    };

    let first_request_id_to_finalize = last_finalized_request_id.safe_add(1, env)?;
    let last_checkpoint_index = get_last_checkpoint_index(env);
    let last_checkpoint = get_checkpoint(env, last_checkpoint_index)?;

    if last_checkpoint.max_share_rate != effective_share_rate {
        let checkpoint_index = last_checkpoint_index.safe_add(1, env)?;
        save_checkpoint(env, checkpoint_index, &Checkpoint {
            from_request_id: first_request_id_to_finalize,
            max_share_rate: effective_share_rate,
        });
        save_last_checkpoint_index(env, checkpoint_index);
    }

    let queue = env.current_contract_address();
    let mut locked_ether_amount = get_locked_ether_amount(env);
    safe_increment!(env, locked_ether_amount, amount_of_eth);

    let balance = token::TokenClient::new(env, &config.ether_token).balance(&queue);
    if locked_ether_amount > balance {
        log!(env, "Withdrawal Queue: locking {} with only {} on balance", locked_ether_amount, balance);
        return Err(ErrorCode::LockedEtherExceedsBalance);
    }

    save_locked_ether_amount(env, locked_ether_amount);
    save_last_finalized_request_id(env, last_request_id_to_finalize);

    if batch.shares > 0 {
        ShareTokenClient::new(env, &config.share_token).burn(&queue, &batch.shares);
    }

    WithdrawalQueueEvents::withdrawals_finalized(
        env,
        first_request_id_to_finalize,
        last_request_id_to_finalize,
        amount_of_eth,
        batch.shares,
        env.ledger().timestamp()
    );

    Ok(())
}

pub fn claim(
    env: &Env,
    config: &Config,
    sender: &Address,
    request_id: u64,
    hint: u32,
    recipient: &Address
) -> TidalResult<i128> {
    validate!(env, request_id != 0, ErrorCode::InvalidRequestId)?;
    validate!(
        env,
        request_id <= get_last_finalized_request_id(env),
        ErrorCode::RequestNotFoundOrNotFinalized,
        "request {} is not finalized",
        request_id
    )?;

    let mut request = get_request(env, request_id)?;
    validate!(env, !request.claimed, ErrorCode::RequestAlreadyClaimed)?;
    validate!(env, request.owner == *sender, ErrorCode::NotOwner)?;

    let amount_of_eth = calculate_claimable_ether(env, request_id, &request, hint)?;

    request.claimed = true;
    save_request(env, request_id, &request);
    remove_request_from_owner(env, &request.owner, request_id);

    let mut locked_ether_amount = get_locked_ether_amount(env);
    safe_decrement!(env, locked_ether_amount, amount_of_eth);
    save_locked_ether_amount(env, locked_ether_amount);

    token::TokenClient
        ::new(env, &config.ether_token)
        .transfer(&env.current_contract_address(), recipient, &amount_of_eth);

    WithdrawalQueueEvents::withdrawal_claimed(
        env,
        request_id,
        request.owner,
        recipient.clone(),
        amount_of_eth
    );

    Ok(amount_of_eth)
}

pub fn transfer_request(env: &Env, owner: &Address, request_id: u64, to: &Address) -> TidalResult {
    validate!(
        env,
        request_id != 0 && request_id <= get_last_request_id(env),
        ErrorCode::InvalidRequestId
    )?;
    validate!(env, owner != to, ErrorCode::InvalidOwner, "request can not be sent to its owner")?;

    let mut request = get_request(env, request_id)?;
    validate!(env, request.owner == *owner, ErrorCode::NotOwner)?;
    validate!(env, !request.claimed, ErrorCode::RequestAlreadyClaimed)?;

    request.owner = to.clone();
    save_request(env, request_id, &request);
    remove_request_from_owner(env, owner, request_id);
    add_request_to_owner(env, to, request_id);

    WithdrawalQueueEvents::request_transferred(env, request_id, owner.clone(), to.clone());

    Ok(())
}
