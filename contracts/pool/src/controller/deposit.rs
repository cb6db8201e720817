use soroban_sdk::{ Bytes, BytesN, Env };
use tidal::{
    constants::GWEI,
    error::TidalResult,
    math::{ casting::Cast, safe_math::SafeMath },
};

fn sha256(env: &Env, data: &Bytes) -> Bytes {
    env.crypto().sha256(data).to_bytes().into()
}

fn concat(env: &Env, left: &Bytes, right: &Bytes) -> Bytes {
    let mut joined = Bytes::new(env);
    joined.append(left);
    joined.append(right);
    joined
}

/// SSZ hash tree root of a beacon chain `DepositData` record.
///
/// The deposit contract recomputes this root and rejects the deposit on mismatch, so the
/// layout has to follow the beacon chain containers exactly: the pubkey padded to 64
/// bytes, the signature split into two chunks and the amount in little endian gwei.
pub fn deposit_data_root(
    env: &Env,
    pubkey: &BytesN<48>,
    withdrawal_credentials: &BytesN<32>,
    signature: &BytesN<96>,
    amount: i128
) -> TidalResult<BytesN<32>> {
    let mut padded_pubkey: Bytes = pubkey.clone().into();
    padded_pubkey.extend_from_array(&[0u8; 16]);
    let pubkey_root = sha256(env, &padded_pubkey);

    let signature: Bytes = signature.clone().into();
    let mut signature_tail = signature.slice(64..96);
    signature_tail.extend_from_array(&[0u8; 32]);
    let signature_root = sha256(
        env,
        &concat(env, &sha256(env, &signature.slice(0..64)), &sha256(env, &signature_tail))
    );

    let amount_in_gwei: u64 = amount.safe_div(GWEI, env)?.cast(env)?;
    let mut amount_chunk = Bytes::from_array(env, &amount_in_gwei.to_le_bytes());
    amount_chunk.extend_from_array(&[0u8; 24]);

    let node = concat(
        env,
        &sha256(env, &concat(env, &pubkey_root, &withdrawal_credentials.clone().into())),
        &sha256(env, &concat(env, &amount_chunk, &signature_root))
    );

    Ok(env.crypto().sha256(&node).to_bytes())
}

#[cfg(test)]
mod test {
    use soroban_sdk::{ BytesN, Env };
    use tidal::constants::{ DEPOSIT_SIZE, GWEI };

    use super::deposit_data_root;

    fn inputs(env: &Env) -> (BytesN<48>, BytesN<32>, BytesN<96>) {
        (
            BytesN::from_array(env, &[1; 48]),
            BytesN::from_array(env, &[2; 32]),
            BytesN::from_array(env, &[3; 96]),
        )
    }

    #[test]
    fn root_commits_to_every_field() {
        let env = Env::default();
        let (pubkey, withdrawal_credentials, signature) = inputs(&env);

        let root = deposit_data_root(&env, &pubkey, &withdrawal_credentials, &signature, DEPOSIT_SIZE).unwrap();
        assert_eq!(
            deposit_data_root(&env, &pubkey, &withdrawal_credentials, &signature, DEPOSIT_SIZE),
            Ok(root.clone())
        );

        let other_credentials = BytesN::from_array(&env, &[4; 32]);
        assert_ne!(
            deposit_data_root(&env, &pubkey, &other_credentials, &signature, DEPOSIT_SIZE),
            Ok(root.clone())
        );
        assert_ne!(
            deposit_data_root(&env, &pubkey, &withdrawal_credentials, &signature, 2 * DEPOSIT_SIZE),
            Ok(root)
        );
    }

    #[test]
    fn amount_is_truncated_to_gwei() {
        let env = Env::default();
        let (pubkey, withdrawal_credentials, signature) = inputs(&env);

        assert_eq!(
            deposit_data_root(&env, &pubkey, &withdrawal_credentials, &signature, GWEI + 1),
            deposit_data_root(&env, &pubkey, &withdrawal_credentials, &signature, GWEI)
        );
    }
}
