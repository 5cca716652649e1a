//! # Timelock & Rate Limiting
//!
//! Every privileged entry point passes through [`check_action`] before it
//! validates anything else, and through [`record_activity`] once it has
//! decided to write. An identity whose role changed recently is locked out
//! until `ROLE_CHANGE_DELAY` has elapsed, independently of quorum.

use soroban_sdk::{Address, Env};

use crate::errors::GovernanceError;
use crate::roles::{self, INACTIVITY_THRESHOLD};
use crate::types::{AdminTimeConfig, GovernanceDataKey};

/// Wait imposed on an identity after it is granted a role.
pub const ROLE_CHANGE_DELAY: u64 = 24 * 60 * 60; // 1 day

pub fn get_admin_time(env: &Env, account: &Address) -> AdminTimeConfig {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::AdminTime(account.clone()))
        .unwrap_or_default()
}

fn store_admin_time(env: &Env, account: &Address, time: &AdminTimeConfig) {
    env.storage()
        .persistent()
        .set(&GovernanceDataKey::AdminTime(account.clone()), time);
}

/// Requires `caller` to be an admin whose timelock has expired.
///
/// # Errors
/// - [`GovernanceError::Unauthorized`] if the caller is not an admin.
/// - [`GovernanceError::TimeLockActive`] if the caller is still locked.
pub fn check_action(env: &Env, caller: &Address) -> Result<(), GovernanceError> {
    roles::require_admin(env, caller)?;
    let time = get_admin_time(env, caller);
    if env.ledger().timestamp() < time.timelock_expiry {
        return Err(GovernanceError::TimeLockActive);
    }
    Ok(())
}

/// Stamps the caller's last privileged action.
pub fn record_activity(env: &Env, caller: &Address) {
    let mut time = get_admin_time(env, caller);
    time.last_activity = env.ledger().timestamp();
    store_admin_time(env, caller, &time);
}

/// Active means a privileged action, grant or bootstrap within
/// [`INACTIVITY_THRESHOLD`]. Every role member carries a stamped record.
pub fn is_active(env: &Env, account: &Address, now: u64) -> bool {
    let time = get_admin_time(env, account);
    now.saturating_sub(time.last_activity) <= INACTIVITY_THRESHOLD
}

pub(crate) fn bootstrap(env: &Env, account: &Address) {
    store_admin_time(
        env,
        account,
        &AdminTimeConfig {
            timelock_expiry: 0,
            last_activity: env.ledger().timestamp(),
        },
    );
}

/// Restarts the timelock after a grant; returns the new expiry.
pub(crate) fn reset(env: &Env, account: &Address) -> u64 {
    let now = env.ledger().timestamp();
    let expiry = now.saturating_add(ROLE_CHANGE_DELAY);
    store_admin_time(
        env,
        account,
        &AdminTimeConfig {
            timelock_expiry: expiry,
            last_activity: now,
        },
    );
    expiry
}

pub(crate) fn clear(env: &Env, account: &Address) {
    let mut time = get_admin_time(env, account);
    time.timelock_expiry = 0;
    store_admin_time(env, account, &time);
}
