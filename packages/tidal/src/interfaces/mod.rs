mod access_control;
mod deposit_contract;
mod node_operators;
mod share_token;
mod staking_pool;
mod withdrawal_queue;

pub use access_control::*;
pub use deposit_contract::*;
pub use node_operators::*;
pub use share_token::*;
pub use staking_pool::*;
pub use withdrawal_queue::*;
