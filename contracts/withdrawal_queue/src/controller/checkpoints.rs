use soroban_sdk::{ Env, Vec };
use tidal::{
    constants::NOT_FOUND,
    error::{ ErrorCode, TidalResult },
    math::safe_math::SafeMath,
    validate,
};

use crate::{
    controller::queue::calc_batch,
    storage::{
        get_checkpoint,
        get_last_checkpoint_index,
        get_last_finalized_request_id,
        get_last_request_id,
        get_request,
        WithdrawalRequest,
    },
};

/// Finds the index of the checkpoint covering `request_id` within `[start, end]`.
///
/// Returns `NOT_FOUND` when the request is not finalized yet or the window does not
/// contain its checkpoint.
pub fn find_checkpoint_hint(env: &Env, request_id: u64, start: u32, end: u32) -> TidalResult<u32> {
    validate!(
        env,
        request_id != 0 && request_id <= get_last_request_id(env),
        ErrorCode::InvalidRequestId,
        "request {} does not exist",
        request_id
    )?;

    let last_checkpoint_index = get_last_checkpoint_index(env);
    validate!(
        env,
        start != 0 && end <= last_checkpoint_index,
        ErrorCode::InvalidRequestIdRange,
        "checkpoint range [{}, {}] is out of bounds",
        start,
        end
    )?;

    if
        last_checkpoint_index == 0 ||
        request_id > get_last_finalized_request_id(env) ||
        start > end
    {
        return Ok(NOT_FOUND);
    }

    // right boundary
    if request_id >= get_checkpoint(env, end)?.from_request_id {
        if end == last_checkpoint_index {
            return Ok(end);
        }
        if request_id < get_checkpoint(env, end + 1)?.from_request_id {
            return Ok(end);
        }
        return Ok(NOT_FOUND);
    }

    // left boundary
    if request_id < get_checkpoint(env, start)?.from_request_id {
        return Ok(NOT_FOUND);
    }

    // the checkpoint lies in [start, end - 1]
    let mut min = start;
    let mut max = end - 1;
    while max > min {
        let mid = (max + min + 1) / 2;
        if get_checkpoint(env, mid)?.from_request_id <= request_id {
            min = mid;
        } else {
            max = mid - 1;
        }
    }

    Ok(min)
}

/// Hints for a sorted list of requests, each search starting where the previous one
/// ended.
pub fn find_checkpoint_hints(
    env: &Env,
    request_ids: &Vec<u64>,
    first_index: u32,
    last_index: u32
) -> TidalResult<Vec<u32>> {
    let mut hints = Vec::new(env);
    let mut start = first_index;
    let mut prev_request_id = 0;

    for request_id in request_ids.iter() {
        validate!(
            env,
            request_id >= prev_request_id,
            ErrorCode::InvalidRequestId,
            "request ids are not sorted"
        )?;

        let hint = find_checkpoint_hint(env, request_id, start, last_index)?;
        if hint != NOT_FOUND {
            start = hint;
        }

        hints.push_back(hint);
        prev_request_id = request_id;
    }

    Ok(hints)
}

/// Ether a finalized request pays out, given the index of the checkpoint covering it.
pub fn calculate_claimable_ether(
    env: &Env,
    request_id: u64,
    request: &WithdrawalRequest,
    hint: u32
) -> TidalResult<i128> {
    let last_checkpoint_index = get_last_checkpoint_index(env);
    validate!(
        env,
        hint != 0 && hint <= last_checkpoint_index,
        ErrorCode::InvalidHint,
        "hint {} is out of range",
        hint
    )?;

    let checkpoint = get_checkpoint(env, hint)?;
    validate!(env, request_id >= checkpoint.from_request_id, ErrorCode::InvalidHint)?;

    if hint < last_checkpoint_index {
        let next_checkpoint = get_checkpoint(env, hint + 1)?;
        validate!(env, request_id < next_checkpoint.from_request_id, ErrorCode::InvalidHint)?;
    }

    let prev = get_request(env, request_id.safe_sub(1, env)?)?;
    let batch = calc_batch(env, &prev, request)?;

    batch.eth_at_cap(env, checkpoint.max_share_rate)
}
