use soroban_sdk::{ Env, Vec };
use tidal::{
    constants::MAX_BATCHES_LENGTH,
    error::{ ErrorCode, TidalResult },
    math::safe_math::SafeMath,
    safe_decrement,
    safe_increment,
    types::{ BatchesCalculationState, Prefinalization },
    validate,
};

use crate::{
    controller::queue::{ calc_batch, request_share_rate },
    storage::{
        get_extrema_count,
        get_extremum,
        get_last_finalized_request_id,
        get_last_request_id,
        get_report_state,
        get_request,
    },
};

/// Extends `state` with the next finalization batches.
///
/// Requests are taken in order while they are older than `max_timestamp` and the ether
/// they need at `max_share_rate` fits into the remaining budget. Consecutive requests on
/// the same side of the cap share a batch. A call handles at most
/// `max_requests_per_call` requests; `finished` tells the caller whether to call again.
pub fn calculate_finalization_batches(
    env: &Env,
    max_share_rate: i128,
    max_timestamp: u64,
    max_requests_per_call: u32,
    state: BatchesCalculationState
) -> TidalResult<BatchesCalculationState> {
    let mut state = state;

    validate!(
        env,
        !state.finished && state.remaining_eth_budget > 0,
        ErrorCode::InvalidState,
        "batch calculation is already finished"
    )?;
    validate!(env, state.batches.len() <= MAX_BATCHES_LENGTH, ErrorCode::TooManyBatches)?;

    let last_finalized_request_id = get_last_finalized_request_id(env);
    let last_request_id = get_last_request_id(env);

    let (mut current_id, mut prev_request, mut prev_share_rate) = match state.batches.last() {
        None => (last_finalized_request_id.safe_add(1, env)?, get_request(env, last_finalized_request_id)?, 0),
        Some(last_handled_id) => {
            validate!(
                env,
                last_handled_id > last_finalized_request_id && last_handled_id <= last_request_id,
                ErrorCode::InvalidState,
                "batches were computed against another queue state"
            )?;
            (
                last_handled_id.safe_add(1, env)?,
                get_request(env, last_handled_id)?,
                request_share_rate(env, last_handled_id)?,
            )
        }
    };

    let next_call_request_id = current_id.safe_add(max_requests_per_call as u64, env)?;
    let queue_length = last_request_id.safe_add(1, env)?;
    let mut batches_full = false;

    while current_id < queue_length && current_id < next_call_request_id {
        let request = get_request(env, current_id)?;
        if request.timestamp > max_timestamp {
            break;
        }

        let batch = calc_batch(env, &prev_request, &request)?;
        let eth_to_finalize = batch.eth_at_cap(env, max_share_rate)?;
        if eth_to_finalize > state.remaining_eth_budget {
            break;
        }

        let batches_length = state.batches.len();
        let same_side =
            batches_length != 0 &&
            (prev_share_rate > max_share_rate) == (batch.share_rate > max_share_rate);

        if same_side {
            state.batches.set(batches_length - 1, current_id);
        } else {
            if batches_length == MAX_BATCHES_LENGTH {
                batches_full = true;
                break;
            }
            state.batches.push_back(current_id);
        }
        safe_decrement!(env, state.remaining_eth_budget, eth_to_finalize);

        prev_share_rate = batch.share_rate;
        prev_request = request;
        current_id += 1;
    }

    // a full batch list leaves requests behind even when the per-call limit was not hit
    state.finished =
        !batches_full && (current_id == queue_length || current_id < next_call_request_id);

    Ok(state)
}

/// Index of the first recorded extremum strictly after `request_id`, or `count + 1`.
fn first_extremum_after(env: &Env, request_id: u64, count: u32) -> TidalResult<u32> {
    let mut low = 1;
    let mut high = count + 1;

    while low < high {
        let mid = (low + high) / 2;
        if get_extremum(env, mid)? > request_id {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    Ok(low)
}

/// Checks that every request in `[first_id, last_id]` is on the same side of the cap.
///
/// Share rates are monotonic between extrema, so only the batch ends, the extrema
/// inside the batch and the end of the last reported segment need a look.
fn check_batch_side(
    env: &Env,
    first_id: u64,
    last_id: u64,
    max_share_rate: i128,
    pending_extremum: u64
) -> TidalResult {
    let above_cap = request_share_rate(env, first_id)? > max_share_rate;
    let on_same_side = |request_id: u64| -> TidalResult<bool> {
        Ok((request_share_rate(env, request_id)? > max_share_rate) == above_cap)
    };

    validate!(
        env,
        on_same_side(last_id)?,
        ErrorCode::InvalidBatches,
        "batch [{}, {}] crosses the share rate cap",
        first_id,
        last_id
    )?;

    if pending_extremum > first_id && pending_extremum < last_id {
        validate!(env, on_same_side(pending_extremum)?, ErrorCode::InvalidBatches)?;
    }

    let extrema_count = get_extrema_count(env);
    let mut index = first_extremum_after(env, first_id, extrema_count)?;
    while index <= extrema_count {
        let extremum = get_extremum(env, index)?;
        if extremum >= last_id {
            break;
        }
        validate!(
            env,
            on_same_side(extremum)?,
            ErrorCode::InvalidBatches,
            "extremum {} crosses the share rate cap",
            extremum
        )?;
        index += 1;
    }

    Ok(())
}

/// Ether owed to the requests in `(prev_id, last_id]` when each one is paid on its own
/// at `max_share_rate`, rounded the same way the claims round.
fn eth_at_cap_per_request(
    env: &Env,
    prev_id: u64,
    last_id: u64,
    max_share_rate: i128
) -> TidalResult<i128> {
    let mut eth: i128 = 0;
    let mut prev = get_request(env, prev_id)?;

    for request_id in prev_id + 1..=last_id {
        let request = get_request(env, request_id)?;
        safe_increment!(env, eth, calc_batch(env, &prev, &request)?.eth_at_cap(env, max_share_rate)?);
        prev = request;
    }

    Ok(eth)
}

/// Ether to lock and shares to burn for finalizing `batches` at `max_share_rate`.
pub fn prefinalize(
    env: &Env,
    batches: &Vec<u64>,
    max_share_rate: i128
) -> TidalResult<Prefinalization> {
    validate!(env, max_share_rate > 0, ErrorCode::ZeroShareRate)?;
    validate!(env, !batches.is_empty(), ErrorCode::EmptyBatches)?;
    validate!(
        env,
        batches.len() <= MAX_BATCHES_LENGTH,
        ErrorCode::TooManyBatches,
        "{} batches given",
        batches.len()
    )?;

    let last_finalized_request_id = get_last_finalized_request_id(env);
    let first_batch_end = batches.first_unchecked();
    let last_batch_end = batches.last_unchecked();

    validate!(
        env,
        first_batch_end > last_finalized_request_id,
        ErrorCode::InvalidRequestId,
        "request {} is already finalized",
        first_batch_end
    )?;
    validate!(
        env,
        last_batch_end <= get_last_request_id(env),
        ErrorCode::InvalidRequestId,
        "request {} does not exist",
        last_batch_end
    )?;

    let pending_extremum = get_report_state(env).last_report_request_id;

    let mut eth_to_lock: i128 = 0;
    let mut shares_to_burn: i128 = 0;
    let mut prev_batch_end_id = last_finalized_request_id;
    let mut prev_batch_end = get_request(env, prev_batch_end_id)?;

    for batch_end_id in batches.iter() {
        validate!(
            env,
            batch_end_id > prev_batch_end_id,
            ErrorCode::InvalidBatches,
            "batches are not sorted"
        )?;

        check_batch_side(
            env,
            prev_batch_end_id + 1,
            batch_end_id,
            max_share_rate,
            pending_extremum
        )?;

        let batch_end = get_request(env, batch_end_id)?;
        let batch = calc_batch(env, &prev_batch_end, &batch_end)?;

        if batch.share_rate > max_share_rate {
            safe_increment!(
                env,
                eth_to_lock,
                eth_at_cap_per_request(env, prev_batch_end_id, batch_end_id, max_share_rate)?
            );
        } else {
            safe_increment!(env, eth_to_lock, batch.steth);
        }
        safe_increment!(env, shares_to_burn, batch.shares);

        prev_batch_end_id = batch_end_id;
        prev_batch_end = batch_end;
    }

    Ok(Prefinalization { eth_to_lock, shares_to_burn })
}
