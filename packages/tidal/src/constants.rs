// TTL

pub const DAY_IN_LEDGERS: u32 = 17280;

pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

// PRECISIONS

pub const ETHER: i128 = 1_000_000_000_000_000_000; // 1e18
pub const GWEI: i128 = 1_000_000_000; // 1e9

/// Share rates are expressed as ether per share with 27 decimals
pub const E27_PRECISION_BASE: i128 = 1_000_000_000_000_000_000_000_000_000; // 1e27

pub const MAX_BPS: i128 = 10_000;

// VALIDATORS

/// Amount of ether staked per validator
pub const DEPOSIT_SIZE: i128 = 32 * ETHER;

pub const PUBKEY_LENGTH: u32 = 48;
pub const SIGNATURE_LENGTH: u32 = 96;

// WITHDRAWAL QUEUE

/// Checkpoint cap recorded when a finalization locked the full amount due
pub const SHARE_RATE_UNLIMITED: i128 = i128::MAX;

/// Upper bound for the number of batches a single finalization may carry
pub const MAX_BATCHES_LENGTH: u32 = 36;

pub const MIN_STETH_WITHDRAWAL_AMOUNT: i128 = 100;
pub const MAX_STETH_WITHDRAWAL_AMOUNT: i128 = 1_000 * ETHER;

/// Returned by hint searches when the window does not contain the request
pub const NOT_FOUND: u32 = 0;
