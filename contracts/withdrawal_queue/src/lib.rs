#![no_std]

mod contract;
mod controller;
mod events;
pub mod storage;
mod withdrawal_queue;

pub use contract::{ WithdrawalQueue, WithdrawalQueueClient };

#[cfg(test)]
mod tests;
