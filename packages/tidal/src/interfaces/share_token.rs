use soroban_sdk::{ contractclient, Address, Env };

/// Liquid staking share ledger. Balances are denominated in shares.
#[contractclient(name = "ShareTokenClient")]
pub trait ShareTokenTrait {
    fn mint(env: Env, to: Address, amount: i128);

    fn burn(env: Env, from: Address, amount: i128);

    fn transfer(env: Env, from: Address, to: Address, amount: i128);

    fn balance(env: Env, id: Address) -> i128;

    fn total_supply(env: Env) -> i128;
}
