use soroban_sdk::{ contractclient, Address, Env, Vec };

use crate::types::Prefinalization;

#[contractclient(name = "WithdrawalQueueClient")]
pub trait WithdrawalQueueTrait {
    fn prefinalize(env: Env, batches: Vec<u64>, max_share_rate: i128) -> Prefinalization;

    fn finalize(
        env: Env,
        sender: Address,
        last_request_id_to_finalize: u64,
        amount_of_eth: i128,
        max_share_rate: i128
    );

    fn on_oracle_report(env: Env, sender: Address);
}
