use soroban_sdk::{
    contract,
    contractimpl,
    contractmeta,
    log,
    panic_with_error,
    Address,
    Bytes,
    Env,
    String,
    Vec,
};
use tidal::{
    constants::{ INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD },
    error::{ ErrorCode, TidalResult },
    math::safe_math::SafeMath,
    roles::{
        check_role,
        ADD_NODE_OPERATOR_ROLE,
        MANAGE_PROTOCOL_CONTRACTS_ROLE,
        MANAGE_SIGNING_KEYS,
        REPORT_STOPPED_VALIDATORS_ROLE,
        SET_NODE_OPERATOR_ACTIVE_ROLE,
        SET_NODE_OPERATOR_ADDRESS_ROLE,
        SET_NODE_OPERATOR_LIMIT_ROLE,
        SET_NODE_OPERATOR_NAME_ROLE,
    },
    safe_increment,
    types::Allocation,
    validate,
};

use crate::{
    allocator::{ allocate, OperatorCache },
    events::NodeOperatorsEvents,
    node_operators::NodeOperatorsRegistryTrait,
    signing_keys,
    storage::{
        get_active_operators_count,
        get_config,
        get_keys_op_index,
        get_operator,
        get_operators_count,
        get_signing_key,
        increment_keys_op_index,
        is_initialized,
        save_active_operators_count,
        save_config,
        save_operator,
        save_operators_count,
        set_initialized,
        Config,
        NodeOperator,
        SigningKeyInfo,
    },
};

contractmeta!(
    key = "Description",
    val = "Registry of validator node operators and their signing keys"
);

#[contract]
pub struct NodeOperatorsRegistry;

#[contractimpl]
impl NodeOperatorsRegistryTrait for NodeOperatorsRegistry {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(env: Env, acl: Address, pool: Address) {
        if is_initialized(&env) {
            log!(&env, "Node Operators: Initialize: initializing contract twice is not allowed");
            panic_with_error!(&env, ErrorCode::AlreadyInitialized);
        }

        set_initialized(&env);

        save_config(&env, Config {
            acl: acl.clone(),
            pool: pool.clone(),
        });

        NodeOperatorsEvents::initialize(&env, acl, pool);
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
    //                           OPERATORS
    // ################################################################

    fn add_node_operator(
        env: Env,
        sender: Address,
        name: String,
        reward_address: Address,
        staking_limit: u64
    ) -> Result<u32, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, ADD_NODE_OPERATOR_ROLE)?;

        let operator_id = get_operators_count(&env).safe_add(1, &env)?;

        save_operator(&env, operator_id, &NodeOperator {
            active: true,
            reward_address: reward_address.clone(),
            name: name.clone(),
            staking_limit,
            stopped_validators: 0,
            total_signing_keys: 0,
            used_signing_keys: 0,
        });
        save_operators_count(&env, operator_id);
        save_active_operators_count(&env, get_active_operators_count(&env).safe_add(1, &env)?);

        NodeOperatorsEvents::operator_added(&env, operator_id, name, reward_address, staking_limit);

        Ok(operator_id)
    }

    fn set_node_operator_active(
        env: Env,
        sender: Address,
        operator_id: u32,
        active: bool
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, SET_NODE_OPERATOR_ACTIVE_ROLE)?;

        let mut operator = get_operator(&env, operator_id)?;
        validate!(
            &env,
            operator.active != active,
            ErrorCode::OperatorActivityAlreadySet,
            "operator {} activity is already {}",
            operator_id,
            active
        )?;

        let active_count = get_active_operators_count(&env);
        let active_count = if active {
            active_count.safe_add(1, &env)?
        } else {
            active_count.safe_sub(1, &env)?
        };
        save_active_operators_count(&env, active_count);

        operator.active = active;
        save_operator(&env, operator_id, &operator);

        NodeOperatorsEvents::active_set(&env, operator_id, active);

        Ok(())
    }

    fn set_node_operator_name(
        env: Env,
        sender: Address,
        operator_id: u32,
        name: String
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, SET_NODE_OPERATOR_NAME_ROLE)?;

        let mut operator = get_operator(&env, operator_id)?;
        operator.name = name.clone();
        save_operator(&env, operator_id, &operator);

        NodeOperatorsEvents::name_set(&env, operator_id, name);

        Ok(())
    }

    fn set_node_operator_reward_address(
        env: Env,
        sender: Address,
        operator_id: u32,
        reward_address: Address
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, SET_NODE_OPERATOR_ADDRESS_ROLE)?;

        let mut operator = get_operator(&env, operator_id)?;
        operator.reward_address = reward_address.clone();
        save_operator(&env, operator_id, &operator);

        NodeOperatorsEvents::reward_address_set(&env, operator_id, reward_address);

        Ok(())
    }

    fn set_node_operator_staking_limit(
        env: Env,
        sender: Address,
        operator_id: u32,
        staking_limit: u64
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, SET_NODE_OPERATOR_LIMIT_ROLE)?;

        let mut operator = get_operator(&env, operator_id)?;
        operator.staking_limit = staking_limit;
        save_operator(&env, operator_id, &operator);

        NodeOperatorsEvents::staking_limit_set(&env, operator_id, staking_limit);

        Ok(())
    }

    fn report_stopped_validators(
        env: Env,
        sender: Address,
        operator_id: u32,
        stopped_increment: u64
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, REPORT_STOPPED_VALIDATORS_ROLE)?;

        validate!(&env, stopped_increment > 0, ErrorCode::InvalidQuantity)?;

        let mut operator = get_operator(&env, operator_id)?;
        safe_increment!(&env, operator.stopped_validators, stopped_increment);
        validate!(
            &env,
            operator.stopped_validators <= operator.used_signing_keys,
            ErrorCode::StoppedValidatorsExceedUsed,
            "operator {} would have more stopped validators than deposited keys",
            operator_id
        )?;
        save_operator(&env, operator_id, &operator);

        NodeOperatorsEvents::stopped_validators_reported(
            &env,
            operator_id,
            operator.stopped_validators
        );

        Ok(())
    }

    fn trim_unused_keys(env: Env, sender: Address) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        validate!(
            &env,
            sender == config.pool,
            ErrorCode::NotAuthorized,
            "only the staking pool can trim keys"
        )?;

        let mut trimmed = false;
        for operator_id in 1..=get_operators_count(&env) {
            let mut operator = get_operator(&env, operator_id)?;
            if signing_keys::trim_keys(&env, operator_id, &mut operator) {
                save_operator(&env, operator_id, &operator);
                trimmed = true;
            }
        }

        if trimmed {
            let keys_op_index = increment_keys_op_index(&env);
            NodeOperatorsEvents::keys_op_index_set(&env, keys_op_index);
        }

        Ok(())
    }

    // ################################################################
    //                          SIGNING KEYS
    // ################################################################

    fn add_signing_keys(
        env: Env,
        sender: Address,
        operator_id: u32,
        quantity: u32,
        pubkeys: Bytes,
        signatures: Bytes
    ) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_SIGNING_KEYS)?;

        add_signing_keys_unchecked(&env, operator_id, quantity, &pubkeys, &signatures)
    }

    fn add_signing_keys_operator_bh(
        env: Env,
        operator_id: u32,
        quantity: u32,
        pubkeys: Bytes,
        signatures: Bytes
    ) -> Result<(), ErrorCode> {
        get_operator(&env, operator_id)?.reward_address.require_auth();

        add_signing_keys_unchecked(&env, operator_id, quantity, &pubkeys, &signatures)
    }

    fn remove_signing_key(env: Env, sender: Address, operator_id: u32, index: u64) -> Result<(), ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        check_role(&env, &config.acl, &sender, MANAGE_SIGNING_KEYS)?;

        remove_signing_key_unchecked(&env, operator_id, index)
    }

    fn remove_signing_key_operator_bh(env: Env, operator_id: u32, index: u64) -> Result<(), ErrorCode> {
        get_operator(&env, operator_id)?.reward_address.require_auth();

        remove_signing_key_unchecked(&env, operator_id, index)
    }

    // ################################################################
    //                          STAKING POOL
    // ################################################################

    fn assign_next_signing_keys(
        env: Env,
        sender: Address,
        total_amount: i128,
        unit: i128
    ) -> Result<Allocation, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env);
        validate!(
            &env,
            sender == config.pool,
            ErrorCode::NotAuthorized,
            "only the staking pool can consume signing keys"
        )?;

        let mut cache: Vec<OperatorCache> = Vec::new(&env);
        for operator_id in 1..=get_operators_count(&env) {
            let operator = get_operator(&env, operator_id)?;
            if operator.active {
                cache.push_back(OperatorCache::new(operator_id, &operator));
            }
        }

        let assignment = allocate(&env, &mut cache, total_amount, unit)?;

        let mut pubkeys = Vec::new(&env);
        let mut signatures = Vec::new(&env);
        for selection in assignment.selections.iter() {
            let key = get_signing_key(&env, selection.operator_id, selection.index)?;
            pubkeys.push_back(key.pubkey);
            signatures.push_back(key.signature);
        }

        for entry in cache.iter() {
            if entry.assigned_keys() == 0 {
                continue;
            }

            let mut operator = get_operator(&env, entry.id)?;
            if entry.used_signing_keys > operator.total_signing_keys {
                log!(&env, "Node Operators: operator {} ran past its keys", entry.id);
                panic_with_error!(&env, ErrorCode::UsedKeysExceedTotal);
            }
            operator.used_signing_keys = entry.used_signing_keys;
            save_operator(&env, entry.id, &operator);
        }

        if !assignment.selections.is_empty() {
            let keys_op_index = increment_keys_op_index(&env);
            NodeOperatorsEvents::keys_op_index_set(&env, keys_op_index);
        }

        Ok(Allocation {
            pubkeys,
            signatures,
            deposited_amount: assignment.deposited_amount,
        })
    }

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config {
        get_config(&env)
    }

    fn get_node_operator(env: Env, operator_id: u32) -> Result<NodeOperator, ErrorCode> {
        get_operator(&env, operator_id)
    }

    fn get_node_operators_count(env: Env) -> u32 {
        get_operators_count(&env)
    }

    fn get_active_node_operators_count(env: Env) -> u32 {
        get_active_operators_count(&env)
    }

    fn get_total_signing_keys_count(env: Env, operator_id: u32) -> Result<u64, ErrorCode> {
        Ok(get_operator(&env, operator_id)?.total_signing_keys)
    }

    fn get_unused_signing_keys_count(env: Env, operator_id: u32) -> Result<u64, ErrorCode> {
        Ok(get_operator(&env, operator_id)?.unused_signing_keys())
    }

    fn get_signing_key(env: Env, operator_id: u32, index: u64) -> Result<SigningKeyInfo, ErrorCode> {
        let operator = get_operator(&env, operator_id)?;
        validate!(&env, index < operator.total_signing_keys, ErrorCode::SigningKeyNotFound)?;

        let key = get_signing_key(&env, operator_id, index)?;

        Ok(SigningKeyInfo {
            pubkey: key.pubkey,
            signature: key.signature,
            used: index < operator.used_signing_keys,
        })
    }

    fn get_keys_op_index(env: Env) -> u64 {
        get_keys_op_index(&env)
    }
}

fn add_signing_keys_unchecked(
    env: &Env,
    operator_id: u32,
    quantity: u32,
    pubkeys: &Bytes,
    signatures: &Bytes
) -> TidalResult {
    let mut operator = get_operator(env, operator_id)?;
    signing_keys::add_keys(env, operator_id, &mut operator, quantity, pubkeys, signatures)?;
    save_operator(env, operator_id, &operator);

    let keys_op_index = increment_keys_op_index(env);
    NodeOperatorsEvents::keys_op_index_set(env, keys_op_index);

    Ok(())
}

fn remove_signing_key_unchecked(env: &Env, operator_id: u32, index: u64) -> TidalResult {
    let mut operator = get_operator(env, operator_id)?;
    signing_keys::remove_key(env, operator_id, &mut operator, index)?;
    save_operator(env, operator_id, &operator);

    let keys_op_index = increment_keys_op_index(env);
    NodeOperatorsEvents::keys_op_index_set(env, keys_op_index);

    Ok(())
}
