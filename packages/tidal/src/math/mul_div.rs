use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{ log, Env, I256 };

use crate::{ constants::{ E27_PRECISION_BASE, MAX_BPS }, error::{ ErrorCode, TidalResult } };

/// Computes `a * b / denominator` rounding down, with a 256-bit intermediate product.
///
/// Share rate math multiplies 1e27 scaled rates by ether amounts, which does not fit
/// into 128 bits.
pub fn mul_div_floor(env: &Env, a: i128, b: i128, denominator: i128) -> TidalResult<i128> {
    if denominator == 0 {
        log!(env, "Math error: division by zero");
        return Err(ErrorCode::MathError);
    }

    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    let quotient = product.div(&I256::from_i128(env, denominator));

    quotient.to_i128().ok_or_else(|| {
        log!(env, "Math error: mul_div result does not fit into i128");
        ErrorCode::MathError
    })
}

/// Ether per share with 27 decimals. Zero shares yield a zero rate.
pub fn calc_share_rate(env: &Env, eth: i128, shares: i128) -> TidalResult<i128> {
    if shares == 0 {
        return Ok(0);
    }
    mul_div_floor(env, eth, E27_PRECISION_BASE, shares)
}

/// Ether a number of shares is worth at `share_rate`.
pub fn shares_to_eth(env: &Env, shares: i128, share_rate: i128) -> TidalResult<i128> {
    mul_div_floor(env, shares, share_rate, E27_PRECISION_BASE)
}

/// `amount * bps / 10_000`, rounding down.
pub fn apply_bps(env: &Env, amount: i128, bps: i128) -> TidalResult<i128> {
    amount.fixed_mul_floor(bps, MAX_BPS).ok_or_else(|| {
        log!(env, "Math error: bps multiplication overflow");
        ErrorCode::MathError
    })
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;
    use test_case::test_case;

    use crate::{
        constants::{ E27_PRECISION_BASE, ETHER },
        error::ErrorCode,
        math::mul_div::{ apply_bps, calc_share_rate, mul_div_floor, shares_to_eth },
    };

    #[test]
    fn mul_div_handles_wide_products() {
        let env = Env::default();
        // 1e9 ether in wei times a 1e27 rate overflows i128 before the division
        let shares = 1_000_000_000 * ETHER;
        assert_eq!(
            mul_div_floor(&env, shares, E27_PRECISION_BASE, E27_PRECISION_BASE),
            Ok(shares)
        );
    }

    #[test]
    fn mul_div_rejects_zero_denominator() {
        let env = Env::default();
        assert_eq!(mul_div_floor(&env, 1, 1, 0), Err(ErrorCode::MathError));
    }

    #[test]
    fn share_rate_round_trip_rounds_down() {
        let env = Env::default();
        let rate = calc_share_rate(&env, 2 * ETHER, 3 * ETHER).unwrap();
        assert_eq!(rate, 666_666_666_666_666_666_666_666_666);
        assert_eq!(shares_to_eth(&env, 3 * ETHER, rate).unwrap(), 2 * ETHER - 1);
        assert_eq!(calc_share_rate(&env, 5, 0), Ok(0));
    }

    #[test_case(10_000, 1_000 => 1_000 ; "full")]
    #[test_case(999, 1_000 => 99 ; "truncates")]
    #[test_case(0, 1_000 => 0 ; "zero bps")]
    fn bps_application(bps: i128, amount: i128) -> i128 {
        let env = Env::default();
        apply_bps(&env, amount, bps).unwrap()
    }
}
