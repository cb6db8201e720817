use soroban_sdk::{ contract, contractimpl, contracttype, Env };

#[contracttype]
#[derive(Clone)]
enum DataKey {
    PooledEther,
    TotalShares,
}

/// Converts between ether and shares at a rate set by the test.
#[contract]
pub struct MockStakingPool;

#[contractimpl]
impl MockStakingPool {
    pub fn set_rate(env: Env, pooled_ether: i128, total_shares: i128) {
        env.storage().instance().set(&DataKey::PooledEther, &pooled_ether);
        env.storage().instance().set(&DataKey::TotalShares, &total_shares);
    }

    pub fn get_shares_by_pooled_eth(env: Env, eth_amount: i128) -> i128 {
        let (pooled_ether, total_shares) = Self::rate(&env);
        (eth_amount * total_shares) / pooled_ether
    }

    pub fn get_pooled_eth_by_shares(env: Env, shares_amount: i128) -> i128 {
        let (pooled_ether, total_shares) = Self::rate(&env);
        (shares_amount * pooled_ether) / total_shares
    }
}

impl MockStakingPool {
    fn rate(env: &Env) -> (i128, i128) {
        let pooled_ether = env.storage().instance().get(&DataKey::PooledEther).unwrap_or(1);
        let total_shares = env.storage().instance().get(&DataKey::TotalShares).unwrap_or(1);
        (pooled_ether, total_shares)
    }
}
