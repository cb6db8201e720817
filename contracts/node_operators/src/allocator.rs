use soroban_sdk::{ contracttype, log, Env, Vec };
use tidal::{ error::{ ErrorCode, TidalResult }, math::safe_math::SafeMath, validate };

use crate::storage::NodeOperator;

/// Snapshot of an active operator taken before allocation starts.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorCache {
    pub id: u32,
    pub staking_limit: u64,
    pub stopped_validators: u64,
    pub total_signing_keys: u64,
    pub used_signing_keys: u64,
    pub initial_used_signing_keys: u64,
}

impl OperatorCache {
    pub fn new(id: u32, operator: &NodeOperator) -> Self {
        OperatorCache {
            id,
            staking_limit: operator.staking_limit,
            stopped_validators: operator.stopped_validators,
            total_signing_keys: operator.total_signing_keys,
            used_signing_keys: operator.used_signing_keys,
            initial_used_signing_keys: operator.used_signing_keys,
        }
    }

    fn active_validators(&self) -> u64 {
        self.used_signing_keys - self.stopped_validators
    }

    fn can_take_next_key(&self) -> bool {
        self.used_signing_keys < self.total_signing_keys &&
            self.active_validators() < self.staking_limit
    }

    pub fn assigned_keys(&self) -> u64 {
        self.used_signing_keys - self.initial_used_signing_keys
    }
}

/// A single key chosen for staking, identified by its operator and key index.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySelection {
    pub operator_id: u32,
    pub index: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub selections: Vec<KeySelection>,
    pub deposited_amount: i128,
}

/// Distributes `total_amount` over the cached operators one `unit` at a time.
///
/// Every unit goes to the eligible operator with the fewest running validators, the
/// lowest id winning ties. Allocation stops early once no operator can take another key;
/// whatever is left stays with the caller.
pub fn allocate(
    env: &Env,
    cache: &mut Vec<OperatorCache>,
    total_amount: i128,
    unit: i128
) -> TidalResult<Assignment> {
    validate!(env, unit > 0, ErrorCode::InvalidDepositUnit, "deposit unit must be positive")?;
    validate!(
        env,
        total_amount > 0 && total_amount % unit == 0,
        ErrorCode::InvalidAmount,
        "amount {} is not a positive multiple of the deposit unit",
        total_amount
    )?;

    let mut selections = Vec::new(env);
    let mut remaining = total_amount;

    if cache.is_empty() {
        return Ok(Assignment { selections, deposited_amount: 0 });
    }

    while remaining >= unit {
        let mut best: Option<(u32, u64)> = None;

        for (position, entry) in cache.iter().enumerate() {
            if !entry.can_take_next_key() {
                continue;
            }

            let load = entry.active_validators();
            match best {
                Some((_, best_load)) if best_load <= load => {}
                _ => {
                    best = Some((position as u32, load));
                }
            }
        }

        let Some((position, _)) = best else {
            log!(env, "Allocator: no operator can take more keys, {} left unassigned", remaining);
            break;
        };

        let mut winner = cache.get_unchecked(position);
        selections.push_back(KeySelection {
            operator_id: winner.id,
            index: winner.used_signing_keys,
        });
        winner.used_signing_keys = winner.used_signing_keys.safe_add(1, env)?;
        cache.set(position, winner);

        remaining = remaining.safe_sub(unit, env)?;
    }

    let deposited_amount = total_amount.safe_sub(remaining, env)?;

    Ok(Assignment { selections, deposited_amount })
}

#[cfg(test)]
mod test {
    use soroban_sdk::{ vec, Env, Vec };
    use tidal::error::ErrorCode;

    use super::{ allocate, KeySelection, OperatorCache };

    fn entry(id: u32, staking_limit: u64, total: u64, used: u64, stopped: u64) -> OperatorCache {
        OperatorCache {
            id,
            staking_limit,
            stopped_validators: stopped,
            total_signing_keys: total,
            used_signing_keys: used,
            initial_used_signing_keys: used,
        }
    }

    #[test]
    fn picks_least_loaded_operator_first() {
        let env = Env::default();
        let mut cache = vec![&env, entry(1, 10, 10, 3, 0), entry(2, 10, 10, 1, 0)];

        let assignment = allocate(&env, &mut cache, 3, 1).unwrap();

        assert_eq!(assignment.deposited_amount, 3);
        assert_eq!(
            assignment.selections,
            vec![
                &env,
                KeySelection { operator_id: 2, index: 1 },
                KeySelection { operator_id: 2, index: 2 },
                // both operators at three validators, lowest id wins the tie
                KeySelection { operator_id: 1, index: 3 }
            ]
        );
        assert_eq!(cache.get_unchecked(0).assigned_keys(), 1);
        assert_eq!(cache.get_unchecked(1).assigned_keys(), 2);
    }

    #[test]
    fn stopped_validators_free_up_capacity() {
        let env = Env::default();
        // four used keys, three stopped: one running validator against a limit of two
        let mut cache = vec![&env, entry(1, 2, 6, 4, 3), entry(2, 2, 6, 2, 0)];

        let assignment = allocate(&env, &mut cache, 2, 1).unwrap();

        assert_eq!(assignment.deposited_amount, 1);
        assert_eq!(
            assignment.selections,
            vec![&env, KeySelection { operator_id: 1, index: 4 }]
        );
    }

    #[test]
    fn stops_early_when_keys_run_out() {
        let env = Env::default();
        let mut cache = vec![&env, entry(1, 5, 1, 0, 0)];

        let assignment = allocate(&env, &mut cache, 300, 100).unwrap();

        assert_eq!(assignment.deposited_amount, 100);
        assert_eq!(assignment.selections.len(), 1);
    }

    #[test]
    fn empty_cache_deposits_nothing() {
        let env = Env::default();
        let mut cache: Vec<OperatorCache> = Vec::new(&env);

        let assignment = allocate(&env, &mut cache, 64, 32).unwrap();

        assert_eq!(assignment.deposited_amount, 0);
        assert!(assignment.selections.is_empty());
    }

    #[test]
    fn rejects_amounts_off_the_unit_grid() {
        let env = Env::default();
        let mut cache = vec![&env, entry(1, 5, 5, 0, 0)];

        assert_eq!(allocate(&env, &mut cache, 50, 32), Err(ErrorCode::InvalidAmount));
        assert_eq!(allocate(&env, &mut cache, 0, 32), Err(ErrorCode::InvalidAmount));
        assert_eq!(allocate(&env, &mut cache, 64, 0), Err(ErrorCode::InvalidDepositUnit));
    }
}
