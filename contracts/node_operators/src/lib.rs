#![no_std]

mod allocator;
mod contract;
mod events;
mod node_operators;
mod signing_keys;
pub mod storage;

pub use contract::{ NodeOperatorsRegistry, NodeOperatorsRegistryClient };
