use pretty_assertions::assert_eq;
use soroban_sdk::{ testutils::{ Address as _, Ledger }, vec, Address };
use tidal::{
    constants::{
        E27_PRECISION_BASE,
        ETHER,
        MAX_STETH_WITHDRAWAL_AMOUNT,
        MIN_STETH_WITHDRAWAL_AMOUNT,
    },
    error::ErrorCode,
};

use super::setup::deploy_queue;
use crate::storage::{ Checkpoint, Config, WithdrawalRequestStatus };

#[test]
fn queue_successfully_inits_itself() {
    let test = deploy_queue();

    assert_eq!(test.queue.query_config(), Config {
        acl: test.acl.address.clone(),
        pool: test.pool.address.clone(),
        ether_token: test.ether.address.clone(),
        share_token: test.shares.address.clone(),
    });
    assert_eq!(test.queue.get_last_request_id(), 0);
    assert_eq!(test.queue.get_last_checkpoint_index(), 0);
    assert_eq!(test.queue.get_checkpoint(&0), Checkpoint { from_request_id: 0, max_share_rate: 0 });
}

#[test]
#[should_panic(expected = "Error(Contract, #1)")]
fn initializing_twice_fails() {
    let test = deploy_queue();

    test.queue.initialize(
        &test.acl.address,
        &test.pool.address,
        &test.ether.address,
        &test.shares.address
    );
}

#[test]
fn requests_get_consecutive_ids_and_cumulative_sums() {
    let test = deploy_queue();
    let alice = test.user();
    let bob = test.user();
    test.env.ledger().with_mut(|li| {
        li.timestamp = 1_000;
    });

    let ids = test.queue.request_withdrawals(&alice, &vec![&test.env, ETHER, 2 * ETHER]);
    test.pool.set_rate(&2, &1);
    let bob_id = test.request(&bob, 3 * ETHER);

    assert_eq!(ids, vec![&test.env, 1, 2]);
    assert_eq!(bob_id, 3);
    assert_eq!(test.queue.get_last_request_id(), 3);
    assert_eq!(test.queue.unfinalized_request_number(), 3);
    assert_eq!(test.queue.unfinalized_steth(), 6 * ETHER);

    let statuses = test.queue.get_withdrawal_status(&vec![&test.env, 2, 3]);
    assert_eq!(statuses.get_unchecked(0), WithdrawalRequestStatus {
        amount_of_steth: 2 * ETHER,
        amount_of_shares: 2 * ETHER,
        owner: alice.clone(),
        timestamp: 1_000,
        is_finalized: false,
        is_claimed: false,
    });
    assert_eq!(statuses.get_unchecked(1).amount_of_shares, (3 * ETHER) / 2);

    assert_eq!(test.queue.get_withdrawal_requests(&alice), vec![&test.env, 1, 2]);
    assert_eq!(test.queue.get_withdrawal_requests(&bob), vec![&test.env, 3]);
}

#[test]
fn requested_shares_move_to_the_queue() {
    let test = deploy_queue();
    let alice = test.user();

    test.request(&alice, 10 * ETHER);

    assert_eq!(test.shares.balance(&alice), 90 * ETHER);
    assert_eq!(test.shares.balance(&test.queue.address), 10 * ETHER);
}

#[test]
fn request_amount_bounds_are_enforced() {
    let test = deploy_queue();
    let alice = test.user();

    assert_eq!(
        test.queue.try_request_withdrawals(
            &alice,
            &vec![&test.env, MIN_STETH_WITHDRAWAL_AMOUNT - 1]
        ),
        Err(Ok(ErrorCode::RequestAmountTooSmall))
    );
    assert_eq!(
        test.queue.try_request_withdrawals(
            &alice,
            &vec![&test.env, ETHER, MAX_STETH_WITHDRAWAL_AMOUNT + 1]
        ),
        Err(Ok(ErrorCode::RequestAmountTooLarge))
    );
    // the whole call reverts, including the valid first amount
    assert_eq!(test.queue.get_last_request_id(), 0);
    assert_eq!(test.shares.balance(&alice), 100 * ETHER);
}

#[test]
fn status_of_unknown_request_fails() {
    let test = deploy_queue();

    assert_eq!(
        test.queue.try_get_withdrawal_status(&vec![&test.env, 1]),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
}

#[test]
fn owner_lists_follow_transfers_and_claims() {
    let test = deploy_queue();
    let alice = test.user();
    let bob = Address::generate(&test.env);
    for _ in 0..4 {
        test.request(&alice, ETHER);
    }

    // leaving requests are replaced by the owner's last one
    test.queue.transfer_request(&alice, &1, &bob);
    assert_eq!(test.queue.get_withdrawal_requests(&alice), vec![&test.env, 4, 2, 3]);
    assert_eq!(test.queue.get_withdrawal_requests(&bob), vec![&test.env, 1]);

    test.finalize(4, 4 * ETHER, E27_PRECISION_BASE);
    test.queue.claim_withdrawal(&alice, &2, &1, &None);
    test.queue.claim_withdrawal(&bob, &1, &1, &None);
    assert_eq!(test.queue.get_withdrawal_requests(&alice), vec![&test.env, 4, 3]);
    assert!(test.queue.get_withdrawal_requests(&bob).is_empty());

    let id = test.request(&alice, ETHER);
    assert_eq!(test.queue.get_withdrawal_requests(&alice), vec![&test.env, 4, 3, id]);
}

#[test]
fn requests_can_change_hands() {
    let test = deploy_queue();
    let alice = test.user();
    let bob = Address::generate(&test.env);
    let id = test.request(&alice, ETHER);

    test.queue.transfer_request(&alice, &id, &bob);

    assert_eq!(test.queue.get_withdrawal_status(&vec![&test.env, id]).get_unchecked(0).owner, bob);
    assert!(test.queue.get_withdrawal_requests(&alice).is_empty());
    assert_eq!(test.queue.get_withdrawal_requests(&bob), vec![&test.env, id]);

    assert_eq!(
        test.queue.try_transfer_request(&alice, &id, &bob),
        Err(Ok(ErrorCode::NotOwner))
    );
    assert_eq!(
        test.queue.try_transfer_request(&bob, &id, &bob),
        Err(Ok(ErrorCode::InvalidOwner))
    );
    assert_eq!(
        test.queue.try_transfer_request(&bob, &2, &alice),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
}
