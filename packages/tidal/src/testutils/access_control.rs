use soroban_sdk::{ contract, contractimpl, contracttype, Address, Env, Symbol };

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Permission(Address, Symbol),
}

#[contract]
pub struct MockAccessControl;

#[contractimpl]
impl MockAccessControl {
    pub fn grant(env: Env, who: Address, role: Symbol) {
        env.storage().persistent().set(&DataKey::Permission(who, role), &true);
    }

    pub fn revoke(env: Env, who: Address, role: Symbol) {
        env.storage().persistent().remove(&DataKey::Permission(who, role));
    }

    pub fn can_perform(env: Env, who: Address, role: Symbol) -> bool {
        env.storage().persistent().get(&DataKey::Permission(who, role)).unwrap_or(false)
    }
}
