use soroban_sdk::{ contract, contractimpl, contracttype, Address, Env };

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Minter,
    TotalSupply,
    Balance(Address),
}

fn read_balance(env: &Env, id: &Address) -> i128 {
    env.storage().persistent().get(&DataKey::Balance(id.clone())).unwrap_or(0)
}

fn write_balance(env: &Env, id: &Address, amount: i128) {
    env.storage().persistent().set(&DataKey::Balance(id.clone()), &amount);
}

fn read_total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
}

#[contract]
pub struct MockShareToken;

#[contractimpl]
impl MockShareToken {
    pub fn __constructor(env: Env, minter: Address) {
        env.storage().instance().set(&DataKey::Minter, &minter);
    }

    pub fn mint(env: Env, to: Address, amount: i128) {
        let minter: Address = env.storage().instance().get(&DataKey::Minter).unwrap();
        minter.require_auth();
        assert!(amount >= 0, "negative amount is not allowed");

        write_balance(&env, &to, read_balance(&env, &to) + amount);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(read_total_supply(&env) + amount));
    }

    pub fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        let balance = read_balance(&env, &from);
        assert!(amount >= 0 && balance >= amount, "insufficient balance");

        write_balance(&env, &from, balance - amount);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(read_total_supply(&env) - amount));
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        let balance = read_balance(&env, &from);
        assert!(amount >= 0 && balance >= amount, "insufficient balance");

        write_balance(&env, &from, balance - amount);
        write_balance(&env, &to, read_balance(&env, &to) + amount);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        read_total_supply(&env)
    }
}
