use soroban_sdk::{ contractclient, Address, Env, Symbol };

#[contractclient(name = "AccessControlClient")]
pub trait AccessControlTrait {
    fn can_perform(env: Env, who: Address, role: Symbol) -> bool;
}
