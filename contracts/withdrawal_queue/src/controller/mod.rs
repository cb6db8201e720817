pub mod batches;
pub mod checkpoints;
pub mod extrema;
pub mod queue;
