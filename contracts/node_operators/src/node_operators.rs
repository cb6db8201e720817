use soroban_sdk::{ Address, Bytes, Env, String };
use tidal::{ error::ErrorCode, types::Allocation };

use crate::storage::{ Config, NodeOperator, SigningKeyInfo };

pub trait NodeOperatorsRegistryTrait {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(env: Env, acl: Address, pool: Address);

    fn update_config(
        env: Env,
        sender: Address,
        acl: Option<Address>,
        pool: Option<Address>
    ) -> Result<(), ErrorCode>;

    // ################################################################
    //                           OPERATORS
    // ################################################################

    /// Registers a new active operator and returns its id. Ids start at 1.
    fn add_node_operator(
        env: Env,
        sender: Address,
        name: String,
        reward_address: Address,
        staking_limit: u64
    ) -> Result<u32, ErrorCode>;

    fn set_node_operator_active(
        env: Env,
        sender: Address,
        operator_id: u32,
        active: bool
    ) -> Result<(), ErrorCode>;

    fn set_node_operator_name(
        env: Env,
        sender: Address,
        operator_id: u32,
        name: String
    ) -> Result<(), ErrorCode>;

    fn set_node_operator_reward_address(
        env: Env,
        sender: Address,
        operator_id: u32,
        reward_address: Address
    ) -> Result<(), ErrorCode>;

    fn set_node_operator_staking_limit(
        env: Env,
        sender: Address,
        operator_id: u32,
        staking_limit: u64
    ) -> Result<(), ErrorCode>;

    /// Adds `stopped_increment` exited validators to the operator's counter.
    fn report_stopped_validators(
        env: Env,
        sender: Address,
        operator_id: u32,
        stopped_increment: u64
    ) -> Result<(), ErrorCode>;

    /// Drops every unused key of every operator. Callable by the pool only, used when
    /// withdrawal credentials change and pre-signed deposits become invalid.
    fn trim_unused_keys(env: Env, sender: Address) -> Result<(), ErrorCode>;

    // ################################################################
    //                          SIGNING KEYS
    // ################################################################

    /// Appends `quantity` keys. `pubkeys` and `signatures` are the concatenated raw keys.
    fn add_signing_keys(
        env: Env,
        sender: Address,
        operator_id: u32,
        quantity: u32,
        pubkeys: Bytes,
        signatures: Bytes
    ) -> Result<(), ErrorCode>;

    /// Same as `add_signing_keys`, authorized by the operator's reward address.
    fn add_signing_keys_operator_bh(
        env: Env,
        operator_id: u32,
        quantity: u32,
        pubkeys: Bytes,
        signatures: Bytes
    ) -> Result<(), ErrorCode>;

    fn remove_signing_key(env: Env, sender: Address, operator_id: u32, index: u64) -> Result<(), ErrorCode>;

    fn remove_signing_key_operator_bh(env: Env, operator_id: u32, index: u64) -> Result<(), ErrorCode>;

    // ################################################################
    //                          STAKING POOL
    // ################################################################

    /// Hands out keys for up to `total_amount / unit` new validators.
    fn assign_next_signing_keys(
        env: Env,
        sender: Address,
        total_amount: i128,
        unit: i128
    ) -> Result<Allocation, ErrorCode>;

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config;

    fn get_node_operator(env: Env, operator_id: u32) -> Result<NodeOperator, ErrorCode>;

    fn get_node_operators_count(env: Env) -> u32;

    fn get_active_node_operators_count(env: Env) -> u32;

    fn get_total_signing_keys_count(env: Env, operator_id: u32) -> Result<u64, ErrorCode>;

    fn get_unused_signing_keys_count(env: Env, operator_id: u32) -> Result<u64, ErrorCode>;

    fn get_signing_key(env: Env, operator_id: u32, index: u64) -> Result<SigningKeyInfo, ErrorCode>;

    fn get_keys_op_index(env: Env) -> u64;
}
