mod batches;
mod hints;
mod requests;
