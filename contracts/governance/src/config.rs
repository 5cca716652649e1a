//! # Configuration
//!
//! Bootstrap and the admin-settable timing surface of the engine.
//!
//! Timing values apply to proposals created after the change; existing
//! proposals keep the window computed at creation.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::errors::GovernanceError;
use crate::events::{emit_config_updated, ConfigUpdatedEvent};
use crate::roles::{self, ADMIN_ROLE, MIN_QUORUM};
use crate::timelock;
use crate::types::{GovernanceConfig, GovernanceDataKey, RoleConfig};

pub const DEFAULT_PROPOSAL_TIMEOUT: u64 = 48 * 60 * 60; // 48 hours
pub const DEFAULT_MIN_EXECUTION_DELAY: u64 = 24 * 60 * 60; // 24 hours
pub const MIN_PROPOSAL_TIMEOUT: u64 = 60 * 60; // 1 hour
pub const MAX_PROPOSAL_TIMEOUT: u64 = 30 * 24 * 60 * 60; // 30 days
pub const MAX_MIN_EXECUTION_DELAY: u64 = 7 * 24 * 60 * 60; // 7 days

const PARAM_TIMEOUT: Symbol = symbol_short!("timeout");
const PARAM_DELAY: Symbol = symbol_short!("exec_dly");

pub fn is_initialized(env: &Env) -> bool {
    env.storage()
        .instance()
        .has(&GovernanceDataKey::Initialized)
}

/// Sets up the admin set, the admin quorum and the default timing config.
///
/// Bootstrap admins start unlocked and active. Every later role change goes
/// through a RoleChange proposal.
///
/// # Errors
/// - [`GovernanceError::AlreadyInitialized`] on a second call.
/// - [`GovernanceError::InvalidConfig`] if `admins` is empty or has duplicates.
/// - [`GovernanceError::InvalidQuorum`] if the quorum is below 2 or above
///   the number of admins.
/// - [`GovernanceError::InvalidAmount`] if `supply_cap` is not positive.
pub fn initialize(
    env: &Env,
    admins: Vec<Address>,
    admin_quorum: u32,
    distribution: Option<Address>,
    supply_cap: Option<i128>,
) -> Result<(), GovernanceError> {
    if is_initialized(env) {
        return Err(GovernanceError::AlreadyInitialized);
    }
    if admins.is_empty() {
        return Err(GovernanceError::InvalidConfig);
    }
    for i in 0..admins.len() {
        for j in (i + 1)..admins.len() {
            if admins.get_unchecked(i) == admins.get_unchecked(j) {
                return Err(GovernanceError::InvalidConfig);
            }
        }
    }
    if admin_quorum < MIN_QUORUM || admin_quorum > admins.len() {
        return Err(GovernanceError::InvalidQuorum);
    }
    let supply_cap = supply_cap.unwrap_or(i128::MAX);
    if supply_cap <= 0 {
        return Err(GovernanceError::InvalidAmount);
    }

    let config = GovernanceConfig {
        proposal_timeout: DEFAULT_PROPOSAL_TIMEOUT,
        min_execution_delay: DEFAULT_MIN_EXECUTION_DELAY,
        supply_cap,
        distribution,
    };
    store_config(env, &config);
    env.storage()
        .instance()
        .set(&GovernanceDataKey::Initialized, &true);

    roles::store_role_config(
        env,
        &ADMIN_ROLE,
        &RoleConfig {
            quorum: admin_quorum,
            max_amount: 0,
        },
    );
    for admin in admins.iter() {
        roles::bootstrap_admin(env, &admin);
    }

    Ok(())
}

pub fn get_config(env: &Env) -> Result<GovernanceConfig, GovernanceError> {
    env.storage()
        .instance()
        .get(&GovernanceDataKey::Config)
        .ok_or(GovernanceError::NotInitialized)
}

fn store_config(env: &Env, config: &GovernanceConfig) {
    env.storage()
        .instance()
        .set(&GovernanceDataKey::Config, config);
}

/// Changes how long new proposals stay open.
///
/// # Errors
/// - [`GovernanceError::InvalidConfig`] unless the value lies within
///   [`MIN_PROPOSAL_TIMEOUT`]..=[`MAX_PROPOSAL_TIMEOUT`] and stays above the
///   execution delay.
pub fn set_proposal_timeout(
    env: &Env,
    caller: &Address,
    seconds: u64,
) -> Result<(), GovernanceError> {
    timelock::check_action(env, caller)?;
    let mut config = get_config(env)?;
    if !(MIN_PROPOSAL_TIMEOUT..=MAX_PROPOSAL_TIMEOUT).contains(&seconds)
        || seconds <= config.min_execution_delay
    {
        return Err(GovernanceError::InvalidConfig);
    }

    config.proposal_timeout = seconds;
    store_config(env, &config);
    timelock::record_activity(env, caller);

    emit_config_updated(
        env,
        ConfigUpdatedEvent {
            actor: caller.clone(),
            parameter: PARAM_TIMEOUT,
            value: seconds,
        },
    );
    Ok(())
}

/// Changes the minimum wait between creation and execution of new proposals.
///
/// # Errors
/// - [`GovernanceError::InvalidConfig`] if the value exceeds
///   [`MAX_MIN_EXECUTION_DELAY`] or is not below the proposal timeout.
pub fn set_min_execution_delay(
    env: &Env,
    caller: &Address,
    seconds: u64,
) -> Result<(), GovernanceError> {
    timelock::check_action(env, caller)?;
    let mut config = get_config(env)?;
    if seconds > MAX_MIN_EXECUTION_DELAY || seconds >= config.proposal_timeout {
        return Err(GovernanceError::InvalidConfig);
    }

    config.min_execution_delay = seconds;
    store_config(env, &config);
    timelock::record_activity(env, caller);

    emit_config_updated(
        env,
        ConfigUpdatedEvent {
            actor: caller.clone(),
            parameter: PARAM_DELAY,
            value: seconds,
        },
    );
    Ok(())
}
