use soroban_sdk::vec;
use test_case::test_case;
use tidal::{ constants::{ E27_PRECISION_BASE, ETHER, NOT_FOUND }, error::ErrorCode };

use super::setup::{ deploy_queue, QueueTest };

/// Six requests finalized one by one, alternating between full and capped payouts:
/// checkpoints start at requests 1, 2, 3 and 4, request 5 and 6 stay unfinalized.
fn queue_with_checkpoints<'a>() -> QueueTest<'a> {
    let test = deploy_queue();
    let alice = test.user();

    test.request(&alice, ETHER);
    test.pool.set_rate(&2, &1);
    test.request(&alice, 2 * ETHER);
    test.pool.set_rate(&1, &1);
    test.request(&alice, ETHER);
    test.pool.set_rate(&2, &1);
    test.request(&alice, 2 * ETHER);
    test.request(&alice, 2 * ETHER);
    test.request(&alice, 2 * ETHER);

    test.finalize(1, ETHER, E27_PRECISION_BASE);
    test.finalize(2, ETHER, E27_PRECISION_BASE);
    test.finalize(3, ETHER, E27_PRECISION_BASE);
    test.finalize(4, (3 * ETHER) / 2, (3 * E27_PRECISION_BASE) / 2);

    test
}

#[test_case(1 => 1 ; "first checkpoint")]
#[test_case(2 => 2 ; "inner checkpoint")]
#[test_case(3 => 3 ; "last inner checkpoint")]
#[test_case(4 => 4 ; "right boundary")]
#[test_case(5 => NOT_FOUND ; "not finalized")]
fn hint_over_full_range(request_id: u64) -> u32 {
    let test = queue_with_checkpoints();
    assert_eq!(test.queue.get_last_checkpoint_index(), 4);

    test.queue.find_checkpoint_hint(&request_id, &1, &4)
}

#[test]
fn hint_outside_the_window_is_not_found() {
    let test = queue_with_checkpoints();

    assert_eq!(test.queue.find_checkpoint_hint(&1, &2, &4), NOT_FOUND);
    assert_eq!(test.queue.find_checkpoint_hint(&4, &1, &2), NOT_FOUND);
    assert_eq!(test.queue.find_checkpoint_hint(&2, &3, &2), NOT_FOUND);
    assert_eq!(test.queue.find_checkpoint_hint(&3, &3, &3), 3);
}

#[test]
fn hint_search_validates_its_input() {
    let test = queue_with_checkpoints();

    assert_eq!(
        test.queue.try_find_checkpoint_hint(&0, &1, &4),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
    assert_eq!(
        test.queue.try_find_checkpoint_hint(&7, &1, &4),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
    assert_eq!(
        test.queue.try_find_checkpoint_hint(&1, &0, &4),
        Err(Ok(ErrorCode::InvalidRequestIdRange))
    );
    assert_eq!(
        test.queue.try_find_checkpoint_hint(&1, &1, &5),
        Err(Ok(ErrorCode::InvalidRequestIdRange))
    );
}

#[test]
fn hints_follow_sorted_requests() {
    let test = queue_with_checkpoints();

    assert_eq!(
        test.queue.find_checkpoint_hints(&vec![&test.env, 1, 2, 2, 4, 5], &1, &4),
        vec![&test.env, 1, 2, 2, 4, NOT_FOUND]
    );
    assert_eq!(
        test.queue.try_find_checkpoint_hints(&vec![&test.env, 3, 1], &1, &4),
        Err(Ok(ErrorCode::InvalidRequestId))
    );
}

#[test]
fn claimable_ether_follows_each_checkpoint() {
    let test = queue_with_checkpoints();
    let ids = vec![&test.env, 1, 2, 3, 4];
    let hints = test.queue.find_checkpoint_hints(&ids, &1, &4);

    assert_eq!(
        test.queue.get_claimable_ether(&ids, &hints),
        vec![&test.env, ETHER, ETHER, ETHER, (3 * ETHER) / 2]
    );
}
