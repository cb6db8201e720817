use soroban_sdk::{ contractclient, Address, Env };

use crate::types::Allocation;

#[contractclient(name = "NodeOperatorsClient")]
pub trait NodeOperatorsTrait {
    fn assign_next_signing_keys(
        env: Env,
        sender: Address,
        total_amount: i128,
        unit: i128
    ) -> Allocation;

    fn trim_unused_keys(env: Env, sender: Address);
}
