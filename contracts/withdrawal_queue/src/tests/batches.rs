use pretty_assertions::assert_eq;
use soroban_sdk::{ testutils::{ storage::Persistent as _, Ledger }, vec, Vec };
use tidal::{
    constants::{
        DAY_IN_LEDGERS,
        E27_PRECISION_BASE,
        ETHER,
        MAX_BATCHES_LENGTH,
        PERSISTENT_BUMP_AMOUNT,
    },
    error::ErrorCode,
    types::{ BatchesCalculationState, Prefinalization },
};

use super::setup::{ deploy_queue, QueueTest };
use crate::storage::DataKey;

const CAP: i128 = (3 * E27_PRECISION_BASE) / 2;

fn fresh_state(test: &QueueTest, budget: i128) -> BatchesCalculationState {
    BatchesCalculationState {
        remaining_eth_budget: budget,
        finished: false,
        batches: Vec::new(&test.env),
    }
}

/// Requests 1-2 at one ether per share, 3-4 at two, 5 at one again, with a report after
/// every rate change.
fn queue_with_rate_swing<'a>() -> QueueTest<'a> {
    let test = deploy_queue();
    let alice = test.user();

    test.request(&alice, ETHER);
    test.request(&alice, ETHER);
    test.report();

    test.pool.set_rate(&2, &1);
    test.request(&alice, ETHER);
    test.request(&alice, ETHER);
    test.report();

    test.pool.set_rate(&1, &1);
    test.request(&alice, ETHER);
    test.report();

    test
}

#[test]
fn consecutive_requests_on_one_side_of_the_cap_share_a_batch() {
    let test = queue_with_rate_swing();

    let state = test.queue.calculate_finalization_batches(
        &CAP,
        &u64::MAX,
        &100,
        &fresh_state(&test, 100 * ETHER)
    );

    assert_eq!(state.batches, vec![&test.env, 2, 4, 5]);
    assert!(state.finished);
    // requests 3 and 4 only need 0.75 ether each at the cap
    assert_eq!(state.remaining_eth_budget, 100 * ETHER - (3 * ETHER + (3 * ETHER) / 2));
}

#[test]
fn calculation_resumes_across_calls() {
    let test = queue_with_rate_swing();

    let state = test.queue.calculate_finalization_batches(
        &CAP,
        &u64::MAX,
        &2,
        &fresh_state(&test, 100 * ETHER)
    );
    assert_eq!(state.batches, vec![&test.env, 2]);
    assert!(!state.finished);

    let state = test.queue.calculate_finalization_batches(&CAP, &u64::MAX, &2, &state);
    assert_eq!(state.batches, vec![&test.env, 2, 4]);
    assert!(!state.finished);

    let state = test.queue.calculate_finalization_batches(&CAP, &u64::MAX, &2, &state);
    assert_eq!(state.batches, vec![&test.env, 2, 4, 5]);
    assert!(state.finished);

    assert_eq!(
        test.queue.try_calculate_finalization_batches(&CAP, &u64::MAX, &2, &state),
        Err(Ok(ErrorCode::InvalidState))
    );
}

#[test]
fn budget_and_timestamp_stop_the_calculation() {
    let test = deploy_queue();
    let alice = test.user();
    test.env.ledger().with_mut(|li| {
        li.timestamp = 100;
    });
    test.request(&alice, ETHER);
    test.request(&alice, ETHER);
    test.env.ledger().with_mut(|li| {
        li.timestamp = 200;
    });
    test.request(&alice, ETHER);

    let state = test.queue.calculate_finalization_batches(
        &CAP,
        &u64::MAX,
        &100,
        &fresh_state(&test, (3 * ETHER) / 2)
    );
    assert_eq!(state.batches, vec![&test.env, 1]);
    assert_eq!(state.remaining_eth_budget, ETHER / 2);
    assert!(state.finished);

    let state = test.queue.calculate_finalization_batches(
        &CAP,
        &150,
        &100,
        &fresh_state(&test, 100 * ETHER)
    );
    assert_eq!(state.batches, vec![&test.env, 2]);
    assert!(state.finished);

    assert_eq!(
        test.queue.try_calculate_finalization_batches(&CAP, &u64::MAX, &100, &fresh_state(&test, 0)),
        Err(Ok(ErrorCode::InvalidState))
    );
}

#[test]
fn full_batch_list_leaves_the_calculation_unfinished() {
    let test = deploy_queue();
    let alice = test.user();
    // odd requests at one ether per share, even ones at two: every request flips the side
    for id in 1..=40u64 {
        if id % 2 == 0 {
            test.pool.set_rate(&2, &1);
        } else {
            test.pool.set_rate(&1, &1);
        }
        test.request(&alice, ETHER);
    }

    let state = test.queue.calculate_finalization_batches(
        &CAP,
        &u64::MAX,
        &1_000,
        &fresh_state(&test, 100 * ETHER)
    );
    assert_eq!(state.batches.len(), MAX_BATCHES_LENGTH);
    assert_eq!(state.batches.last_unchecked(), 36);
    assert!(!state.finished);
    assert_eq!(state.remaining_eth_budget, 100 * ETHER - (18 * ETHER + (27 * ETHER) / 2));

    // once the planned batches are finalized the rest of the queue gets planned
    test.finalize(36, 100 * ETHER - state.remaining_eth_budget, CAP);
    let state = test.queue.calculate_finalization_batches(
        &CAP,
        &u64::MAX,
        &1_000,
        &fresh_state(&test, 100 * ETHER)
    );
    assert_eq!(state.batches, vec![&test.env, 37, 38, 39, 40]);
    assert!(state.finished);
}

#[test]
fn prefinalize_discounts_batches_above_the_cap() {
    let test = queue_with_rate_swing();

    let prefinalization = test.queue.prefinalize(&vec![&test.env, 2, 4, 5], &CAP);

    assert_eq!(prefinalization, Prefinalization {
        eth_to_lock: 2 * ETHER + (3 * ETHER) / 2 + ETHER,
        shares_to_burn: 2 * ETHER + ETHER + ETHER,
    });
}

#[test]
fn extrema_mark_the_turning_points() {
    let test = queue_with_rate_swing();

    assert_eq!(test.queue.get_extrema(), vec![&test.env, 4]);
}

#[test]
fn reading_extrema_extends_their_ttl() {
    let test = queue_with_rate_swing();
    let extremum_ttl = || {
        test.env.as_contract(&test.queue.address, || {
            test.env.storage().persistent().get_ttl(&DataKey::Extremum(1))
        })
    };

    test.env.ledger().with_mut(|li| {
        li.sequence_number += 2 * DAY_IN_LEDGERS;
    });
    assert_eq!(extremum_ttl(), PERSISTENT_BUMP_AMOUNT - 2 * DAY_IN_LEDGERS);

    test.queue.get_extrema();
    assert_eq!(extremum_ttl(), PERSISTENT_BUMP_AMOUNT);
}

#[test]
fn batch_hiding_a_swing_is_rejected() {
    let test = queue_with_rate_swing();

    // both ends are below the cap but requests 3 and 4 are above it
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 5], &CAP),
        Err(Ok(ErrorCode::InvalidBatches))
    );
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 3], &CAP),
        Err(Ok(ErrorCode::InvalidBatches))
    );
    // a cap above every rate puts the whole queue on one side
    assert_eq!(
        test.queue.prefinalize(&vec![&test.env, 5], &(2 * E27_PRECISION_BASE)).eth_to_lock,
        5 * ETHER
    );
}

#[test]
fn unreported_turn_is_still_caught() {
    let test = deploy_queue();
    let alice = test.user();
    test.request(&alice, ETHER);
    test.pool.set_rate(&2, &1);
    test.request(&alice, ETHER);
    test.report();
    test.pool.set_rate(&1, &1);
    test.request(&alice, ETHER);

    assert!(test.queue.get_extrema().is_empty());
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 3], &CAP),
        Err(Ok(ErrorCode::InvalidBatches))
    );
}

#[test]
fn malformed_batches_are_rejected() {
    let test = queue_with_rate_swing();
    test.finalize(1, ETHER, CAP);

    assert_eq!(test.queue.try_prefinalize(&Vec::new(&test.env), &CAP), Err(Ok(ErrorCode::EmptyBatches)));
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 2], &0),
        Err(Ok(ErrorCode::ZeroShareRate))
    );
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 1, 2], &CAP),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 2, 6], &CAP),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
    assert_eq!(
        test.queue.try_prefinalize(&vec![&test.env, 4, 2], &CAP),
        Err(Ok(ErrorCode::InvalidBatches))
    );

    let mut too_many = Vec::new(&test.env);
    for id in 0..(MAX_BATCHES_LENGTH as u64) + 1 {
        too_many.push_back(id + 2);
    }
    assert_eq!(
        test.queue.try_prefinalize(&too_many, &CAP),
        Err(Ok(ErrorCode::TooManyBatches))
    );
}
