//! Role identifiers checked against the access control contract.

use soroban_sdk::{ log, symbol_short, Address, Env, Symbol };

use crate::{ error::{ ErrorCode, TidalResult }, interfaces::AccessControlClient };

// Staking pool
pub const PAUSE_ROLE: Symbol = symbol_short!("PAUSE");
pub const RESUME_ROLE: Symbol = symbol_short!("RESUME");
pub const MANAGE_FEE: Symbol = symbol_short!("MNG_FEE");
pub const MANAGE_WITHDRAWAL_KEY: Symbol = symbol_short!("MNG_WC");
pub const MANAGE_PROTOCOL_CONTRACTS_ROLE: Symbol = symbol_short!("MNG_PROTO");
pub const DEPOSIT_ROLE: Symbol = symbol_short!("DEPOSIT");
pub const REPORT_ROLE: Symbol = symbol_short!("REPORT");

// Node operators
pub const MANAGE_SIGNING_KEYS: Symbol = symbol_short!("MNG_KEYS");
pub const ADD_NODE_OPERATOR_ROLE: Symbol = symbol_short!("ADD_OP");
pub const SET_NODE_OPERATOR_ACTIVE_ROLE: Symbol = symbol_short!("OP_ACTIVE");
pub const SET_NODE_OPERATOR_NAME_ROLE: Symbol = symbol_short!("OP_NAME");
pub const SET_NODE_OPERATOR_ADDRESS_ROLE: Symbol = symbol_short!("OP_ADDR");
pub const SET_NODE_OPERATOR_LIMIT_ROLE: Symbol = symbol_short!("OP_LIMIT");
pub const REPORT_STOPPED_VALIDATORS_ROLE: Symbol = symbol_short!("OP_STOP");

// Withdrawal queue
pub const FINALIZE_ROLE: Symbol = symbol_short!("FINALIZE");
pub const ORACLE_REPORT_ROLE: Symbol = symbol_short!("Q_REPORT");

/// Asks the access control contract whether `sender` holds `role`.
///
/// Callers are expected to have run `sender.require_auth()` already.
pub fn check_role(env: &Env, acl: &Address, sender: &Address, role: Symbol) -> TidalResult {
    let acl_client = AccessControlClient::new(env, acl);

    if !acl_client.can_perform(sender, &role) {
        log!(env, "Access control: {} is missing role {}", sender.clone(), role);
        return Err(ErrorCode::NotAuthorized);
    }

    Ok(())
}
