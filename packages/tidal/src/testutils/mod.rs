//! In-memory collaborators used by the contract test suites.

mod access_control;
mod deposit_contract;
mod share_token;
mod staking_pool;

pub use access_control::{ MockAccessControl, MockAccessControlClient };
pub use deposit_contract::{ MockDepositContract, MockDepositContractClient };
pub use share_token::{ MockShareToken, MockShareTokenClient };
pub use staking_pool::{ MockStakingPool, MockStakingPoolClient };
