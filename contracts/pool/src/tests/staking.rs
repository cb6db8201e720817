use pretty_assertions::assert_eq;
use soroban_sdk::{ testutils::Address as _, vec, Address, BytesN };
use tidal::constants::{ DEPOSIT_SIZE, E27_PRECISION_BASE, ETHER };
use tidal::error::ErrorCode;

use super::setup::{ deploy_pool, deploy_pool_without_credentials, withdrawal_credentials };
use crate::{ controller::deposit::deposit_data_root, storage::BeaconStat };

#[test]
fn first_submit_mints_one_share_per_ether() {
    let test = deploy_pool();
    let alice = test.staker(10 * ETHER);

    assert_eq!(test.shares.balance(&alice), 10 * ETHER);
    assert_eq!(test.ether.balance(&test.pool.address), 10 * ETHER);
    assert_eq!(test.pool.get_buffered_ether(), 10 * ETHER);
    assert_eq!(test.pool.get_total_pooled_ether(), 10 * ETHER);
    assert_eq!(test.pool.get_share_rate(), E27_PRECISION_BASE);
    assert_eq!(test.pool.get_pooled_eth_by_shares(&ETHER), ETHER);
}

#[test]
fn submit_rejects_empty_deposits() {
    let test = deploy_pool();
    let alice = Address::generate(&test.env);

    assert_eq!(test.pool.try_submit(&alice, &0, &None), Err(Ok(ErrorCode::ZeroDeposit)));
}

#[test]
fn submit_passes_the_referral_through() {
    let test = deploy_pool();
    let alice = Address::generate(&test.env);
    let referral = Address::generate(&test.env);
    test.ether_admin.mint(&alice, &ETHER);

    assert_eq!(test.pool.submit(&alice, &ETHER, &Some(referral)), ETHER);
}

#[test]
fn deposit_registers_validators_in_allocation_order() {
    let test = deploy_pool();
    let first = test.operator_with_keys(10, 3, 1);
    let second = test.operator_with_keys(10, 3, 11);
    test.staker(100 * ETHER);

    assert_eq!(test.pool.deposit_buffered_ether(&test.admin, &5), 3);

    assert_eq!(
        test.deposit_contract.get_pubkeys(),
        vec![
            &test.env,
            BytesN::from_array(&test.env, &[1; 48]),
            BytesN::from_array(&test.env, &[11; 48]),
            BytesN::from_array(&test.env, &[2; 48])
        ]
    );
    assert_eq!(test.ether.balance(&test.deposit_contract.address), 3 * DEPOSIT_SIZE);
    assert_eq!(test.pool.get_buffered_ether(), 4 * ETHER);
    assert_eq!(test.pool.get_beacon_stat(), BeaconStat {
        deposited_validators: 3,
        beacon_validators: 0,
        beacon_balance: 0,
    });
    // deposits in flight still count towards the pool
    assert_eq!(test.pool.get_total_pooled_ether(), 100 * ETHER);

    assert_eq!(test.registry.get_node_operator(&first).used_signing_keys, 2);
    assert_eq!(test.registry.get_node_operator(&second).used_signing_keys, 1);
}

#[test]
fn deposit_commits_to_the_deposit_data_root() {
    let test = deploy_pool();
    test.operator_with_keys(10, 1, 7);
    test.staker(DEPOSIT_SIZE);

    test.pool.deposit_buffered_ether(&test.admin, &1);

    let expected = deposit_data_root(
        &test.env,
        &BytesN::from_array(&test.env, &[7; 48]),
        &withdrawal_credentials(&test.env),
        &BytesN::from_array(&test.env, &[7; 96]),
        DEPOSIT_SIZE
    ).unwrap();
    assert_eq!(test.deposit_contract.get_last_root(), Some(expected));
}

#[test]
fn deposit_respects_the_call_limit() {
    let test = deploy_pool();
    test.operator_with_keys(10, 5, 1);
    test.staker(5 * DEPOSIT_SIZE);

    assert_eq!(test.pool.deposit_buffered_ether(&test.admin, &2), 2);
    assert_eq!(test.pool.get_buffered_ether(), 3 * DEPOSIT_SIZE);
    assert_eq!(test.pool.deposit_buffered_ether(&test.admin, &0), 0);
}

#[test]
fn deposit_keeps_ether_without_enough_buffer_or_keys() {
    let test = deploy_pool();
    test.staker(DEPOSIT_SIZE - 1);
    assert_eq!(test.pool.deposit_buffered_ether(&test.admin, &10), 0);

    // a full unit but no operator to take it
    test.staker(ETHER);
    assert_eq!(test.pool.deposit_buffered_ether(&test.admin, &10), 0);
    assert_eq!(test.pool.get_buffered_ether(), DEPOSIT_SIZE - 1 + ETHER);
    assert_eq!(test.pool.get_beacon_stat().deposited_validators, 0);
    assert!(test.deposit_contract.get_pubkeys().is_empty());
}

#[test]
fn deposit_needs_the_deposit_role() {
    let test = deploy_pool();
    test.operator_with_keys(10, 1, 1);
    test.staker(DEPOSIT_SIZE);

    let stranger = Address::generate(&test.env);
    assert_eq!(
        test.pool.try_deposit_buffered_ether(&stranger, &1),
        Err(Ok(ErrorCode::NotAuthorized))
    );
}

#[test]
fn deposit_needs_withdrawal_credentials() {
    let test = deploy_pool_without_credentials();
    test.operator_with_keys(10, 1, 1);
    test.staker(DEPOSIT_SIZE);

    assert_eq!(test.pool.get_withdrawal_credentials(), None);
    assert_eq!(
        test.pool.try_deposit_buffered_ether(&test.admin, &1),
        Err(Ok(ErrorCode::EmptyWithdrawalCredentials))
    );
}

#[test]
fn new_withdrawal_credentials_drop_unused_keys() {
    let test = deploy_pool();
    let operator_id = test.operator_with_keys(10, 3, 1);
    test.staker(DEPOSIT_SIZE);
    test.pool.deposit_buffered_ether(&test.admin, &1);

    let credentials = BytesN::from_array(&test.env, &[9; 32]);
    test.pool.set_withdrawal_credentials(&test.admin, &credentials);

    assert_eq!(test.pool.get_withdrawal_credentials(), Some(credentials));
    assert_eq!(test.registry.get_total_signing_keys_count(&operator_id), 1);
    assert_eq!(test.registry.get_unused_signing_keys_count(&operator_id), 0);
}
