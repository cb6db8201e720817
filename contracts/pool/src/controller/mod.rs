pub mod deposit;
pub mod rewards;
