#[macro_export]
macro_rules! validate {
    ($env:expr, $assert:expr, $err:expr) => {
        {
            if ($assert) {
                Ok(())
            } else {
                let error_code: $crate::error::ErrorCode = $err;
                soroban_sdk::log!($env, "Error {} thrown at line {}", error_code as u32, line!());
                Err(error_code)
            }
        }
    };
    (
        $env:expr,
        $assert:expr,
        $err:expr,
        $($arg:tt)+
    ) => {
        {
        if ($assert) {
            Ok(())
        } else {
            let error_code: $crate::error::ErrorCode = $err;
            soroban_sdk::log!($env, "Error {} thrown at line {}", error_code as u32, line!());
            soroban_sdk::log!($env, $($arg)*);
            Err(error_code)
        }
        }
    };
}

#[macro_export]
macro_rules! safe_increment {
    ($env:expr, $struct:expr, $value:expr) => {{
        $struct = $crate::math::safe_math::SafeMath::safe_add($struct, $value, $env)?
    }};
}

#[macro_export]
macro_rules! safe_decrement {
    ($env:expr, $struct:expr, $value:expr) => {{
        $struct = $crate::math::safe_math::SafeMath::safe_sub($struct, $value, $env)?
    }};
}

// Validate all bps to be between the range 0..10_000
#[macro_export]
macro_rules! validate_bps {
    ($env:expr, $($value:expr),+) => {
        {
            let mut result: $crate::error::TidalResult = Ok(());
            $(
                if result.is_ok() {
                    result = $crate::validate!(
                        $env,
                        (0..=$crate::constants::MAX_BPS).contains(&$value),
                        $crate::error::ErrorCode::InvalidFee,
                        "The value {} is out of range. Must be between 0 and 10000 bps.",
                        $value
                    );
                }
            )+
            result
        }
    };
}
