use soroban_sdk::{ log, Env };

use crate::error::{ ErrorCode, TidalResult };

pub trait Cast: Sized {
    /// Perform a casting operation with error handling.
    #[track_caller]
    #[inline(always)]
    fn cast<T: CastFrom<Self>>(self, env: &Env) -> TidalResult<T> {
        T::cast_from(self, env)
    }
}

pub trait CastFrom<T>: Sized {
    fn cast_from(value: T, env: &Env) -> TidalResult<Self>;
}

macro_rules! impl_cast {
    ($src:ty, $dst:ty) => {
        impl CastFrom<$src> for $dst {
            fn cast_from(value: $src, env: &Env) -> TidalResult<Self> {
                value.try_into().map_err(|_| {
                    log!(env, "Casting error: failed to cast {}", value);
                    ErrorCode::CastingFailure
                })
            }
        }
    };
}

impl_cast!(u64, i128);
impl_cast!(u32, i128);
impl_cast!(u32, u64);
impl_cast!(u64, u32);
impl_cast!(i128, u64);
impl_cast!(i128, u32);
impl_cast!(i128, u128);
impl_cast!(u128, i128);

impl Cast for u128 {}
impl Cast for u64 {}
impl Cast for u32 {}
impl Cast for i128 {}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;

    use crate::{ error::ErrorCode, math::casting::Cast };

    #[test]
    fn casts_within_range() {
        let env = Env::default();
        assert_eq!((42_u64).cast::<i128>(&env), Ok(42_i128));
        assert_eq!((7_i128).cast::<u32>(&env), Ok(7_u32));
    }

    #[test]
    fn fails_out_of_range() {
        let env = Env::default();
        assert_eq!((-1_i128).cast::<u64>(&env), Err(ErrorCode::CastingFailure));
        assert_eq!((u64::MAX).cast::<u32>(&env), Err(ErrorCode::CastingFailure));
    }
}
