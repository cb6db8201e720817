use soroban_sdk::{ Address, BytesN, Env, String, Symbol };

pub struct NodeOperatorsEvents {}

impl NodeOperatorsEvents {
    /// Emitted when the registry is initialized
    ///
    /// - topics - `["initialize", acl: Address]`
    /// - data - `pool: Address`
    pub fn initialize(env: &Env, acl: Address, pool: Address) {
        let topics = (Symbol::new(env, "initialize"), acl);
        env.events().publish(topics, pool);
    }

    /// Emitted when a new operator is registered
    ///
    /// - topics - `["operator_added", operator_id: u32]`
    /// - data - `[name: String, reward_address: Address, staking_limit: u64]`
    pub fn operator_added(
        env: &Env,
        operator_id: u32,
        name: String,
        reward_address: Address,
        staking_limit: u64
    ) {
        let topics = (Symbol::new(env, "operator_added"), operator_id);
        env.events().publish(topics, (name, reward_address, staking_limit));
    }

    /// - topics - `["operator_active_set", operator_id: u32]`
    /// - data - `active: bool`
    pub fn active_set(env: &Env, operator_id: u32, active: bool) {
        let topics = (Symbol::new(env, "operator_active_set"), operator_id);
        env.events().publish(topics, active);
    }

    /// - topics - `["operator_name_set", operator_id: u32]`
    /// - data - `name: String`
    pub fn name_set(env: &Env, operator_id: u32, name: String) {
        let topics = (Symbol::new(env, "operator_name_set"), operator_id);
        env.events().publish(topics, name);
    }

    /// - topics - `["operator_reward_address_set", operator_id: u32]`
    /// - data - `reward_address: Address`
    pub fn reward_address_set(env: &Env, operator_id: u32, reward_address: Address) {
        let topics = (Symbol::new(env, "operator_reward_address_set"), operator_id);
        env.events().publish(topics, reward_address);
    }

    /// - topics - `["operator_staking_limit_set", operator_id: u32]`
    /// - data - `staking_limit: u64`
    pub fn staking_limit_set(env: &Env, operator_id: u32, staking_limit: u64) {
        let topics = (Symbol::new(env, "operator_staking_limit_set"), operator_id);
        env.events().publish(topics, staking_limit);
    }

    /// Emitted with the operator's new total of stopped validators
    ///
    /// - topics - `["operator_stopped_validators", operator_id: u32]`
    /// - data - `stopped_validators: u64`
    pub fn stopped_validators_reported(env: &Env, operator_id: u32, stopped_validators: u64) {
        let topics = (Symbol::new(env, "operator_stopped_validators"), operator_id);
        env.events().publish(topics, stopped_validators);
    }

    /// - topics - `["signing_key_added", operator_id: u32]`
    /// - data - `pubkey: BytesN<48>`
    pub fn signing_key_added(env: &Env, operator_id: u32, pubkey: BytesN<48>) {
        let topics = (Symbol::new(env, "signing_key_added"), operator_id);
        env.events().publish(topics, pubkey);
    }

    /// - topics - `["signing_key_removed", operator_id: u32]`
    /// - data - `pubkey: BytesN<48>`
    pub fn signing_key_removed(env: &Env, operator_id: u32, pubkey: BytesN<48>) {
        let topics = (Symbol::new(env, "signing_key_removed"), operator_id);
        env.events().publish(topics, pubkey);
    }

    /// Emitted whenever the key set changes
    ///
    /// - topics - `["keys_op_index_set"]`
    /// - data - `keys_op_index: u64`
    pub fn keys_op_index_set(env: &Env, keys_op_index: u64) {
        let topics = (Symbol::new(env, "keys_op_index_set"),);
        env.events().publish(topics, keys_op_index);
    }
}
