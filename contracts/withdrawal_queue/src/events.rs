use soroban_sdk::{ Address, Env, Symbol };

pub struct WithdrawalQueueEvents {}

impl WithdrawalQueueEvents {
    /// Emitted when the queue is initialized
    ///
    /// - topics - `["initialize", pool: Address]`
    /// - data - `[ether_token: Address, share_token: Address]`
    pub fn initialize(env: &Env, pool: Address, ether_token: Address, share_token: Address) {
        let topics = (Symbol::new(env, "initialize"), pool);
        env.events().publish(topics, (ether_token, share_token));
    }

    /// Emitted for every enqueued request
    ///
    /// - topics - `["withdrawal_requested", request_id: u64, owner: Address]`
    /// - data - `[amount_of_steth: i128, amount_of_shares: i128]`
    pub fn withdrawal_requested(
        env: &Env,
        request_id: u64,
        owner: Address,
        amount_of_steth: i128,
        amount_of_shares: i128
    ) {
        let topics = (Symbol::new(env, "withdrawal_requested"), request_id, owner);
        env.events().publish(topics, (amount_of_steth, amount_of_shares));
    }

    /// Emitted when a range of requests is finalized
    ///
    /// - topics - `["withdrawals_finalized", from_request_id: u64, to_request_id: u64]`
    /// - data - `[amount_of_eth_locked: i128, shares_burned: i128, timestamp: u64]`
    pub fn withdrawals_finalized(
        env: &Env,
        from_request_id: u64,
        to_request_id: u64,
        amount_of_eth_locked: i128,
        shares_burned: i128,
        timestamp: u64
    ) {
        let topics = (Symbol::new(env, "withdrawals_finalized"), from_request_id, to_request_id);
        env.events().publish(topics, (amount_of_eth_locked, shares_burned, timestamp));
    }

    /// - topics - `["withdrawal_claimed", request_id: u64, owner: Address]`
    /// - data - `[recipient: Address, amount_of_eth: i128]`
    pub fn withdrawal_claimed(
        env: &Env,
        request_id: u64,
        owner: Address,
        recipient: Address,
        amount_of_eth: i128
    ) {
        let topics = (Symbol::new(env, "withdrawal_claimed"), request_id, owner);
        env.events().publish(topics, (recipient, amount_of_eth));
    }

    /// - topics - `["request_transferred", request_id: u64]`
    /// - data - `[from: Address, to: Address]`
    pub fn request_transferred(env: &Env, request_id: u64, from: Address, to: Address) {
        let topics = (Symbol::new(env, "request_transferred"), request_id);
        env.events().publish(topics, (from, to));
    }

    /// Emitted when the share rate trend of the queue turns
    ///
    /// - topics - `["extremum_recorded"]`
    /// - data - `request_id: u64`
    pub fn extremum_recorded(env: &Env, request_id: u64) {
        let topics = (Symbol::new(env, "extremum_recorded"),);
        env.events().publish(topics, request_id);
    }
}
