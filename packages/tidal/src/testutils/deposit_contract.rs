use soroban_sdk::{ contract, contractimpl, contracttype, BytesN, Env, Vec };

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Pubkeys,
    LastRoot,
}

/// Records every registered validator pubkey.
#[contract]
pub struct MockDepositContract;

#[contractimpl]
impl MockDepositContract {
    pub fn deposit(
        env: Env,
        pubkey: BytesN<48>,
        _withdrawal_credentials: BytesN<32>,
        _signature: BytesN<96>,
        deposit_data_root: BytesN<32>
    ) {
        let mut pubkeys = Self::get_pubkeys(env.clone());
        pubkeys.push_back(pubkey);
        env.storage().instance().set(&DataKey::Pubkeys, &pubkeys);
        env.storage().instance().set(&DataKey::LastRoot, &deposit_data_root);
    }

    pub fn get_pubkeys(env: Env) -> Vec<BytesN<48>> {
        env.storage()
            .instance()
            .get(&DataKey::Pubkeys)
            .unwrap_or(Vec::new(&env))
    }

    pub fn get_last_root(env: Env) -> Option<BytesN<32>> {
        env.storage().instance().get(&DataKey::LastRoot)
    }
}
