use soroban_sdk::{ contracttype, Address, BytesN, Env, String };
use tidal::{
    constants::{
        INSTANCE_BUMP_AMOUNT,
        INSTANCE_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
        PERSISTENT_LIFETIME_THRESHOLD,
    },
    error::{ ErrorCode, TidalResult },
};

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config,
    Initialized,
    OperatorsCount,
    ActiveOperatorsCount,
    KeysOpIndex,
    Operator(u32),
    SigningKey(u32, u64),
}

// ################################################################
//                             Config
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Access control contract consulted before every mutation
    pub acl: Address,
    /// Staking pool, the only caller allowed to consume signing keys
    pub pool: Address,
}

pub fn save_config(env: &Env, config: Config) {
    env.storage().persistent().set(&DataKey::Config, &config);
    env.storage()
        .persistent()
        .extend_ttl(&DataKey::Config, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_config(env: &Env) -> Config {
    let config = env.storage().persistent().get(&DataKey::Config).expect("Config not set");

    env.storage()
        .persistent()
        .extend_ttl(&DataKey::Config, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

    config
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Initialized).unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ################################################################
//                          Node Operators
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeOperator {
    /// Inactive operators are skipped by the allocator
    pub active: bool,
    /// Receives rewards and may manage its own signing keys
    pub reward_address: Address,
    pub name: String,
    /// Maximum number of validators to stake for this operator
    pub staking_limit: u64,
    /// Validators that exited or were slashed
    pub stopped_validators: u64,
    pub total_signing_keys: u64,
    pub used_signing_keys: u64,
}

impl NodeOperator {
    pub fn unused_signing_keys(&self) -> u64 {
        self.total_signing_keys - self.used_signing_keys
    }
}

pub fn get_operators_count(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::OperatorsCount).unwrap_or(0)
}

pub fn save_operators_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::OperatorsCount, &count);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_active_operators_count(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::ActiveOperatorsCount).unwrap_or(0)
}

pub fn save_active_operators_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::ActiveOperatorsCount, &count);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_operator(env: &Env, id: u32) -> TidalResult<NodeOperator> {
    let key = DataKey::Operator(id);
    let operator = env.storage().persistent().get::<_, NodeOperator>(&key);

    match operator {
        Some(operator) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
            Ok(operator)
        }
        None => Err(ErrorCode::OperatorNotFound),
    }
}

pub fn save_operator(env: &Env, id: u32, operator: &NodeOperator) {
    let key = DataKey::Operator(id);
    env.storage().persistent().set(&key, operator);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ################################################################
//                           Signing Keys
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigningKey {
    pub pubkey: BytesN<48>,
    pub signature: BytesN<96>,
}

/// Signing key as returned to callers, flagged with whether it was already staked.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigningKeyInfo {
    pub pubkey: BytesN<48>,
    pub signature: BytesN<96>,
    pub used: bool,
}

pub fn get_signing_key(env: &Env, operator_id: u32, index: u64) -> TidalResult<SigningKey> {
    let key = DataKey::SigningKey(operator_id, index);
    let signing_key = env.storage().persistent().get::<_, SigningKey>(&key);

    match signing_key {
        Some(signing_key) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
            Ok(signing_key)
        }
        None => Err(ErrorCode::SigningKeyNotFound),
    }
}

pub fn save_signing_key(env: &Env, operator_id: u32, index: u64, signing_key: &SigningKey) {
    let key = DataKey::SigningKey(operator_id, index);
    env.storage().persistent().set(&key, signing_key);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn delete_signing_key(env: &Env, operator_id: u32, index: u64) {
    env.storage().persistent().remove(&DataKey::SigningKey(operator_id, index));
}

/// Nonce bumped on every change of the key set, lets depositors detect a stale view.
pub fn get_keys_op_index(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::KeysOpIndex).unwrap_or(0)
}

pub fn increment_keys_op_index(env: &Env) -> u64 {
    let index = get_keys_op_index(env).saturating_add(1);
    env.storage().instance().set(&DataKey::KeysOpIndex, &index);
    index
}
