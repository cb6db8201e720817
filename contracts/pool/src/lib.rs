#![no_std]

mod contract;
mod controller;
mod events;
mod pool;
pub mod storage;

pub use contract::{ StakingPool, StakingPoolClient };

#[cfg(test)]
mod tests;
