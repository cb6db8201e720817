use soroban_sdk::{ Bytes, BytesN, Env };
use tidal::{
    constants::{ PUBKEY_LENGTH, SIGNATURE_LENGTH },
    error::{ ErrorCode, TidalResult },
    math::safe_math::SafeMath,
    safe_decrement,
    safe_increment,
    validate,
};

use crate::{
    events::NodeOperatorsEvents,
    storage::{ delete_signing_key, get_signing_key, save_signing_key, NodeOperator, SigningKey },
};

fn is_empty_pubkey(pubkey: &BytesN<48>) -> bool {
    pubkey.to_array().iter().all(|byte| *byte == 0)
}

fn read_key<const N: usize>(env: &Env, payload: &Bytes, position: u32) -> TidalResult<BytesN<N>> {
    let length = N as u32;
    let start = position.safe_mul(length, env)?;
    let end = start.safe_add(length, env)?;

    BytesN::<N>::try_from(payload.slice(start..end)).map_err(|_| ErrorCode::InvalidKeyLength)
}

/// Splits the concatenated payloads into `quantity` keys and appends them after the
/// operator's current keys. The caller persists the operator.
pub fn add_keys(
    env: &Env,
    operator_id: u32,
    operator: &mut NodeOperator,
    quantity: u32,
    pubkeys: &Bytes,
    signatures: &Bytes
) -> TidalResult {
    validate!(env, quantity > 0, ErrorCode::InvalidQuantity, "no keys to add")?;
    validate!(
        env,
        pubkeys.len() == quantity.safe_mul(PUBKEY_LENGTH, env)?,
        ErrorCode::InvalidKeyLength,
        "pubkeys payload of {} bytes does not hold {} keys",
        pubkeys.len(),
        quantity
    )?;
    validate!(
        env,
        signatures.len() == quantity.safe_mul(SIGNATURE_LENGTH, env)?,
        ErrorCode::InvalidKeyLength,
        "signatures payload of {} bytes does not hold {} keys",
        signatures.len(),
        quantity
    )?;

    for position in 0..quantity {
        let pubkey: BytesN<48> = read_key(env, pubkeys, position)?;
        let signature: BytesN<96> = read_key(env, signatures, position)?;

        validate!(env, !is_empty_pubkey(&pubkey), ErrorCode::EmptySigningKey)?;

        save_signing_key(env, operator_id, operator.total_signing_keys, &SigningKey {
            pubkey: pubkey.clone(),
            signature,
        });
        safe_increment!(env, operator.total_signing_keys, 1);

        NodeOperatorsEvents::signing_key_added(env, operator_id, pubkey);
    }

    Ok(())
}

/// Removes an unused key by moving the operator's last key into its slot.
///
/// The staking limit is lowered to `index` when it was above it, so the operator has to
/// approve the reordered key set again.
pub fn remove_key(
    env: &Env,
    operator_id: u32,
    operator: &mut NodeOperator,
    index: u64
) -> TidalResult {
    validate!(
        env,
        index < operator.total_signing_keys,
        ErrorCode::SigningKeyNotFound,
        "key {} is out of range",
        index
    )?;
    validate!(
        env,
        index >= operator.used_signing_keys,
        ErrorCode::SigningKeyAlreadyUsed,
        "key {} was already deposited",
        index
    )?;

    let removed = get_signing_key(env, operator_id, index)?;
    let last_index = operator.total_signing_keys.safe_sub(1, env)?;

    if index < last_index {
        let last = get_signing_key(env, operator_id, last_index)?;
        save_signing_key(env, operator_id, index, &last);
    }
    delete_signing_key(env, operator_id, last_index);
    safe_decrement!(env, operator.total_signing_keys, 1);

    if operator.staking_limit > index {
        operator.staking_limit = index;
    }

    NodeOperatorsEvents::signing_key_removed(env, operator_id, removed.pubkey);

    Ok(())
}

/// Deletes the keys past `used_signing_keys`. Returns whether anything was removed.
pub fn trim_keys(env: &Env, operator_id: u32, operator: &mut NodeOperator) -> bool {
    if operator.total_signing_keys == operator.used_signing_keys {
        return false;
    }

    for index in operator.used_signing_keys..operator.total_signing_keys {
        delete_signing_key(env, operator_id, index);
    }
    operator.total_signing_keys = operator.used_signing_keys;

    true
}
