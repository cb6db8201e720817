use soroban_sdk::{ contractclient, Env };

#[contractclient(name = "StakingPoolClient")]
pub trait StakingPoolTrait {
    fn get_shares_by_pooled_eth(env: Env, eth_amount: i128) -> i128;

    fn get_pooled_eth_by_shares(env: Env, shares_amount: i128) -> i128;
}
