use soroban_sdk::{ contractclient, BytesN, Env };

/// Validator registration sink. The caller pushes exactly one deposit worth of ether to
/// the sink before every `deposit` call.
#[contractclient(name = "DepositContractClient")]
pub trait DepositContractTrait {
    fn deposit(
        env: Env,
        pubkey: BytesN<48>,
        withdrawal_credentials: BytesN<32>,
        signature: BytesN<96>,
        deposit_data_root: BytesN<32>
    );
}
