use soroban_sdk::Env;
use tidal::{
    error::{ ErrorCode, TidalResult },
    math::{ mul_div::{ apply_bps, mul_div_floor }, safe_math::SafeMath },
    validate,
    validate_bps,
};

use crate::storage::FeeConfig;

/// Shares minted for one reward distribution, by recipient.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardSplit {
    pub treasury: i128,
    pub insurance: i128,
    pub operators: i128,
}

impl RewardSplit {
    pub fn total(&self) -> i128 {
        self.treasury + self.insurance + self.operators
    }
}

pub fn validate_fee_config(env: &Env, fee_config: &FeeConfig) -> TidalResult {
    validate_bps!(
        env,
        fee_config.fee_bps,
        fee_config.treasury_bps,
        fee_config.insurance_bps,
        fee_config.operators_bps
    )?;

    let distribution_bps = fee_config.treasury_bps
        .safe_add(fee_config.insurance_bps, env)?
        .safe_add(fee_config.operators_bps, env)?;

    validate!(
        env,
        distribution_bps == tidal::constants::MAX_BPS,
        ErrorCode::InvalidFeeDistribution,
        "fee distribution adds up to {} bps",
        distribution_bps
    )
}

/// Shares to mint so that the protocol owns `rewards * fee_bps / 10_000` worth of the
/// pool after the mint.
///
/// `total_pooled_ether` already includes the rewards. An empty share ledger mints the fee
/// one to one.
pub fn shares_for_fee(
    env: &Env,
    rewards: i128,
    fee_bps: i128,
    total_pooled_ether: i128,
    total_shares: i128
) -> TidalResult<i128> {
    let protocol_cut = apply_bps(env, rewards, fee_bps)?;

    if protocol_cut == 0 {
        return Ok(0);
    }
    if total_shares == 0 {
        return Ok(protocol_cut);
    }

    mul_div_floor(env, protocol_cut, total_shares, total_pooled_ether.safe_sub(protocol_cut, env)?)
}

/// Splits minted shares between treasury and insurance by their bps; the operators get
/// what is left so that no share is lost to rounding.
pub fn split_shares(env: &Env, shares_to_mint: i128, fee_config: &FeeConfig) -> TidalResult<RewardSplit> {
    let treasury = apply_bps(env, shares_to_mint, fee_config.treasury_bps)?;
    let insurance = apply_bps(env, shares_to_mint, fee_config.insurance_bps)?;
    let operators = shares_to_mint.safe_sub(treasury, env)?.safe_sub(insurance, env)?;

    Ok(RewardSplit { treasury, insurance, operators })
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;
    use test_case::test_case;
    use tidal::{ constants::ETHER, error::ErrorCode };

    use super::{ shares_for_fee, split_shares, validate_fee_config, RewardSplit };
    use crate::storage::FeeConfig;

    fn fee(fee_bps: i128, treasury_bps: i128, insurance_bps: i128, operators_bps: i128) -> FeeConfig {
        FeeConfig { fee_bps, treasury_bps, insurance_bps, operators_bps }
    }

    #[test]
    fn fee_shares_keep_the_cut_value() {
        let env = Env::default();
        // 100 ether pooled over 100 shares, 10 ether of rewards already in the total
        let shares = shares_for_fee(&env, 10 * ETHER, 1_000, 110 * ETHER, 100 * ETHER).unwrap();

        // the cut is 1 ether: shares * 110 / (100 + shares) == 1
        assert_eq!(shares, (100 * ETHER) / 109);
    }

    #[test]
    fn empty_ledger_mints_the_cut_one_to_one() {
        let env = Env::default();
        assert_eq!(shares_for_fee(&env, 10 * ETHER, 1_000, 10 * ETHER, 0), Ok(ETHER));
        assert_eq!(shares_for_fee(&env, 10 * ETHER, 0, 10 * ETHER, 5 * ETHER), Ok(0));
    }

    #[test_case(1_000, 5_000, 2_500, 2_500 ; "default split")]
    #[test_case(999, 3_333, 3_333, 3_334 ; "rounding remainder")]
    #[test_case(7, 10_000, 0, 0 ; "treasury only")]
    fn split_adds_up_exactly(shares: i128, treasury_bps: i128, insurance_bps: i128, operators_bps: i128) {
        let env = Env::default();
        let split = split_shares(&env, shares, &fee(1_000, treasury_bps, insurance_bps, operators_bps)).unwrap();

        assert_eq!(split.total(), shares);
        assert_eq!(split.treasury, (shares * treasury_bps) / 10_000);
        assert_eq!(split.insurance, (shares * insurance_bps) / 10_000);
    }

    #[test]
    fn default_split_values() {
        let env = Env::default();
        assert_eq!(split_shares(&env, 1_000, &fee(1_000, 5_000, 2_500, 2_500)), Ok(RewardSplit {
            treasury: 500,
            insurance: 250,
            operators: 250,
        }));
    }

    #[test]
    fn distribution_must_cover_all_bps() {
        let env = Env::default();
        assert_eq!(validate_fee_config(&env, &fee(1_000, 5_000, 2_500, 2_500)), Ok(()));
        assert_eq!(
            validate_fee_config(&env, &fee(1_000, 5_000, 2_500, 2_000)),
            Err(ErrorCode::InvalidFeeDistribution)
        );
        assert_eq!(
            validate_fee_config(&env, &fee(10_001, 5_000, 2_500, 2_500)),
            Err(ErrorCode::InvalidFee)
        );
    }
}
