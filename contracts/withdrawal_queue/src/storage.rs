use soroban_sdk::{ contracttype, Address, Env, Vec };
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
    LastRequestId,
    LastFinalizedRequestId,
    LastCheckpointIndex,
    LockedEtherAmount,
    ReportState,
    ExtremaCount,
    Request(u64),
    Checkpoint(u32),
    Extremum(u32),
    OwnerRequestCount(Address),
    OwnerRequest(Address, u32),
    OwnerRequestPosition(u64),
}

// ################################################################
//                             Config
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub acl: Address,
    /// Staking pool used to price new requests in shares
    pub pool: Address,
    /// Asset paid out on claim
    pub ether_token: Address,
    /// Share ledger escrowed by the queue until finalization burns it
    pub share_token: Address,
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
//                            Counters
// ################################################################

fn get_counter<T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val> + Default>(
    env: &Env,
    key: &DataKey
) -> T {
    env.storage().instance().get(key).unwrap_or_default()
}

fn save_counter<T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: &DataKey, value: T) {
    env.storage().instance().set(key, &value);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_last_request_id(env: &Env) -> u64 {
    get_counter(env, &DataKey::LastRequestId)
}

pub fn save_last_request_id(env: &Env, id: u64) {
    save_counter(env, &DataKey::LastRequestId, id);
}

pub fn get_last_finalized_request_id(env: &Env) -> u64 {
    get_counter(env, &DataKey::LastFinalizedRequestId)
}

pub fn save_last_finalized_request_id(env: &Env, id: u64) {
    save_counter(env, &DataKey::LastFinalizedRequestId, id);
}

pub fn get_last_checkpoint_index(env: &Env) -> u32 {
    get_counter(env, &DataKey::LastCheckpointIndex)
}

pub fn save_last_checkpoint_index(env: &Env, index: u32) {
    save_counter(env, &DataKey::LastCheckpointIndex, index);
}

/// Ether reserved for finalized requests that are not claimed yet.
pub fn get_locked_ether_amount(env: &Env) -> i128 {
    get_counter(env, &DataKey::LockedEtherAmount)
}

pub fn save_locked_ether_amount(env: &Env, amount: i128) {
    save_counter(env, &DataKey::LockedEtherAmount, amount);
}

// ################################################################
//                            Requests
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalRequest {
    /// Sum of stETH locked by this and every earlier request
    pub cumulative_steth: i128,
    /// Sum of shares locked by this and every earlier request
    pub cumulative_shares: i128,
    pub owner: Address,
    pub timestamp: u64,
    pub claimed: bool,
}

/// Per-request view built from the cumulative ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalRequestStatus {
    pub amount_of_steth: i128,
    pub amount_of_shares: i128,
    pub owner: Address,
    pub timestamp: u64,
    pub is_finalized: bool,
    pub is_claimed: bool,
}

pub fn get_request(env: &Env, id: u64) -> TidalResult<WithdrawalRequest> {
    let key = DataKey::Request(id);
    let request = env.storage().persistent().get::<_, WithdrawalRequest>(&key);

    match request {
        Some(request) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
            Ok(request)
        }
        None => Err(ErrorCode::InvalidRequestId),
    }
}

pub fn save_request(env: &Env, id: u64, request: &WithdrawalRequest) {
    let key = DataKey::Request(id);
    env.storage().persistent().set(&key, request);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// Unclaimed requests of an owner are kept as a 1-based keyed list. Every request also
// stores its position so it can be swapped out in O(1) on claim or transfer.

fn get_owner_request_count(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerRequestCount(owner.clone()))
        .unwrap_or(0)
}

fn save_owner_request_count(env: &Env, owner: &Address, count: u32) {
    let key = DataKey::OwnerRequestCount(owner.clone());
    if count == 0 {
        env.storage().persistent().remove(&key);
        return;
    }

    env.storage().persistent().set(&key, &count);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn save_owner_request(env: &Env, owner: &Address, position: u32, id: u64) {
    let key = DataKey::OwnerRequest(owner.clone(), position);
    env.storage().persistent().set(&key, &id);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

    let position_key = DataKey::OwnerRequestPosition(id);
    env.storage().persistent().set(&position_key, &position);
    env.storage()
        .persistent()
        .extend_ttl(&position_key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_requests_by_owner(env: &Env, owner: &Address) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for position in 1..=get_owner_request_count(env, owner) {
        let key = DataKey::OwnerRequest(owner.clone(), position);
        if let Some(id) = env.storage().persistent().get::<_, u64>(&key) {
            ids.push_back(id);
        }
    }

    ids
}

pub fn add_request_to_owner(env: &Env, owner: &Address, id: u64) {
    let position = get_owner_request_count(env, owner) + 1;

    save_owner_request(env, owner, position, id);
    save_owner_request_count(env, owner, position);
}

pub fn remove_request_from_owner(env: &Env, owner: &Address, id: u64) {
    let position_key = DataKey::OwnerRequestPosition(id);
    let Some(position) = env.storage().persistent().get::<_, u32>(&position_key) else {
        return;
    };

    let count = get_owner_request_count(env, owner);
    let last_key = DataKey::OwnerRequest(owner.clone(), count);
    if position != count {
        if let Some(last_id) = env.storage().persistent().get::<_, u64>(&last_key) {
            save_owner_request(env, owner, position, last_id);
        }
    }

    env.storage().persistent().remove(&last_key);
    env.storage().persistent().remove(&position_key);
    save_owner_request_count(env, owner, count - 1);
}

// ################################################################
//                           Checkpoints
// ################################################################

/// Share rate cap applied to every request from `from_request_id` up to the next
/// checkpoint.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub from_request_id: u64,
    pub max_share_rate: i128,
}

pub fn get_checkpoint(env: &Env, index: u32) -> TidalResult<Checkpoint> {
    let key = DataKey::Checkpoint(index);
    let checkpoint = env.storage().persistent().get::<_, Checkpoint>(&key);

    match checkpoint {
        Some(checkpoint) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
            Ok(checkpoint)
        }
        None => Err(ErrorCode::InvalidHint),
    }
}

pub fn save_checkpoint(env: &Env, index: u32, checkpoint: &Checkpoint) {
    let key = DataKey::Checkpoint(index);
    env.storage().persistent().set(&key, checkpoint);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ################################################################
//                             Extrema
// ################################################################

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RateDirection {
    Flat,
    Rising,
    Falling,
}

/// Share rate trend of the requests seen by the last oracle report.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportState {
    /// Last request that existed when the previous report arrived
    pub last_report_request_id: u64,
    /// Aggregate share rate of the last non-empty report segment
    pub last_segment_rate: i128,
    pub direction: RateDirection,
}

pub fn get_report_state(env: &Env) -> ReportState {
    env.storage()
        .instance()
        .get(&DataKey::ReportState)
        .unwrap_or(ReportState {
            last_report_request_id: 0,
            last_segment_rate: 0,
            direction: RateDirection::Flat,
        })
}

pub fn save_report_state(env: &Env, state: &ReportState) {
    env.storage().instance().set(&DataKey::ReportState, state);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_extrema_count(env: &Env) -> u32 {
    get_counter(env, &DataKey::ExtremaCount)
}

/// Extrema are stored 1-based, in increasing request id order.
pub fn get_extremum(env: &Env, index: u32) -> TidalResult<u64> {
    let key = DataKey::Extremum(index);
    let extremum = env.storage().persistent().get::<_, u64>(&key);

    match extremum {
        Some(request_id) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
            Ok(request_id)
        }
        None => Err(ErrorCode::InvalidState),
    }
}

pub fn push_extremum(env: &Env, request_id: u64) -> u32 {
    let index = get_extrema_count(env) + 1;
    let key = DataKey::Extremum(index);

    env.storage().persistent().set(&key, &request_id);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    save_counter(env, &DataKey::ExtremaCount, index);

    index
}
