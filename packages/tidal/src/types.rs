use soroban_sdk::{ contracttype, BytesN, Vec };

/// Keys handed out by the node operators registry for one deposit round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub pubkeys: Vec<BytesN<48>>,
    pub signatures: Vec<BytesN<96>>,
    /// Multiple of the deposit unit that was matched to keys
    pub deposited_amount: i128,
}

/// Resumable state of the finalization batch planner.
///
/// `batches` holds the last request id of every batch, in increasing order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchesCalculationState {
    pub remaining_eth_budget: i128,
    pub finished: bool,
    pub batches: Vec<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prefinalization {
    pub eth_to_lock: i128,
    pub shares_to_burn: i128,
}
