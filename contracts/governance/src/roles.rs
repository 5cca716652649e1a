//! # Role Registry
//!
//! Role membership, per-role quorum and value ceilings.
//!
//! Membership changes only through executed RoleChange proposals (and the
//! one-time bootstrap in `initialize`). The admin role carries a floor:
//! a revocation never leaves fewer than two admins, never leaves the
//! remaining admins without an active majority, and never drops the admin
//! count below the admin quorum.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::errors::GovernanceError;
use crate::events::{
    emit_quorum_updated, emit_role_granted, emit_role_limit_updated, emit_role_revoked,
    QuorumUpdatedEvent, RoleGrantedEvent, RoleLimitUpdatedEvent, RoleRevokedEvent,
};
use crate::timelock;
use crate::types::{GovernanceDataKey, RoleConfig};

pub const ADMIN_ROLE: Symbol = symbol_short!("ADMIN");

/// Smallest usable quorum for any role.
pub const MIN_QUORUM: u32 = 2;

/// Revoking an admin is refused while this many or fewer admins exist.
pub const MIN_ADMIN_COUNT: u32 = 2;

/// An admin with no privileged action for longer than this is dormant.
pub const INACTIVITY_THRESHOLD: u64 = 90 * 24 * 60 * 60; // 90 days

pub fn has_role(env: &Env, role: &Symbol, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::RoleMember(role.clone(), account.clone()))
        .unwrap_or(false)
}

pub fn is_admin(env: &Env, account: &Address) -> bool {
    has_role(env, &ADMIN_ROLE, account)
}

pub fn require_admin(env: &Env, caller: &Address) -> Result<(), GovernanceError> {
    if !is_admin(env, caller) {
        return Err(GovernanceError::Unauthorized);
    }
    Ok(())
}

pub fn role_members(env: &Env, role: &Symbol) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::RoleMembers(role.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

fn add_member(env: &Env, role: &Symbol, account: &Address) {
    env.storage().persistent().set(
        &GovernanceDataKey::RoleMember(role.clone(), account.clone()),
        &true,
    );
    let mut members = role_members(env, role);
    if !members.contains(account) {
        members.push_back(account.clone());
        env.storage()
            .persistent()
            .set(&GovernanceDataKey::RoleMembers(role.clone()), &members);
    }
}

fn remove_member(env: &Env, role: &Symbol, account: &Address) {
    env.storage()
        .persistent()
        .remove(&GovernanceDataKey::RoleMember(role.clone(), account.clone()));
    let mut members = role_members(env, role);
    if let Some(index) = members.first_index_of(account) {
        members.remove(index);
        env.storage()
            .persistent()
            .set(&GovernanceDataKey::RoleMembers(role.clone()), &members);
    }
}

/// Returns the role's config, or the disabled default (quorum 0, no ceiling).
pub fn get_role_config(env: &Env, role: &Symbol) -> RoleConfig {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::RoleConfig(role.clone()))
        .unwrap_or_default()
}

pub(crate) fn store_role_config(env: &Env, role: &Symbol, config: &RoleConfig) {
    env.storage()
        .persistent()
        .set(&GovernanceDataKey::RoleConfig(role.clone()), config);
}

pub fn get_quorum(env: &Env, role: &Symbol) -> u32 {
    get_role_config(env, role).quorum
}

/// Sets the number of distinct approvals a proposal of `role` needs.
///
/// # Errors
/// - [`GovernanceError::InvalidQuorum`] if `quorum` is below [`MIN_QUORUM`],
///   or for the admin role, above the current number of admins.
pub fn set_quorum(
    env: &Env,
    caller: &Address,
    role: &Symbol,
    quorum: u32,
) -> Result<(), GovernanceError> {
    timelock::check_action(env, caller)?;
    if quorum < MIN_QUORUM {
        return Err(GovernanceError::InvalidQuorum);
    }
    if *role == ADMIN_ROLE && quorum > role_members(env, &ADMIN_ROLE).len() {
        return Err(GovernanceError::InvalidQuorum);
    }

    let mut config = get_role_config(env, role);
    config.quorum = quorum;
    store_role_config(env, role, &config);
    timelock::record_activity(env, caller);

    emit_quorum_updated(
        env,
        QuorumUpdatedEvent {
            actor: caller.clone(),
            role: role.clone(),
            quorum,
        },
    );
    Ok(())
}

/// Sets the largest amount a proposal of `role` may carry (0 lifts the ceiling).
pub fn set_role_limit(
    env: &Env,
    caller: &Address,
    role: &Symbol,
    max_amount: i128,
) -> Result<(), GovernanceError> {
    timelock::check_action(env, caller)?;
    if max_amount < 0 {
        return Err(GovernanceError::InvalidAmount);
    }

    let mut config = get_role_config(env, role);
    config.max_amount = max_amount;
    store_role_config(env, role, &config);
    timelock::record_activity(env, caller);

    emit_role_limit_updated(
        env,
        RoleLimitUpdatedEvent {
            actor: caller.clone(),
            role: role.clone(),
            max_amount,
        },
    );
    Ok(())
}

/// Registers a bootstrap admin: unlocked, active, no delay.
pub(crate) fn bootstrap_admin(env: &Env, admin: &Address) {
    add_member(env, &ADMIN_ROLE, admin);
    timelock::bootstrap(env, admin);
    emit_role_granted(
        env,
        RoleGrantedEvent {
            role: ADMIN_ROLE,
            account: admin.clone(),
            timelock_expiry: 0,
        },
    );
}

/// Checks that `account` may lose `role` without breaching the admin floor.
pub(crate) fn ensure_can_revoke(
    env: &Env,
    role: &Symbol,
    account: &Address,
) -> Result<(), GovernanceError> {
    if !has_role(env, role, account) {
        return Err(GovernanceError::RoleNotGranted);
    }
    if *role != ADMIN_ROLE {
        return Ok(());
    }

    let members = role_members(env, &ADMIN_ROLE);
    if members.len() <= MIN_ADMIN_COUNT {
        return Err(GovernanceError::MinimumRoleCount);
    }

    let remaining = members.len() - 1;
    let now = env.ledger().timestamp();
    let mut active: u32 = 0;
    for member in members.iter() {
        if member != *account && timelock::is_active(env, &member, now) {
            active += 1;
        }
    }
    if active < remaining / 2 + 1 {
        return Err(GovernanceError::MinimumRoleCount);
    }
    if remaining < get_quorum(env, &ADMIN_ROLE) {
        return Err(GovernanceError::MinimumRoleCount);
    }
    Ok(())
}

/// Adds `account` to `role` and restarts its timelock.
pub(crate) fn grant_role(env: &Env, role: &Symbol, account: &Address) {
    add_member(env, role, account);
    let timelock_expiry = timelock::reset(env, account);
    emit_role_granted(
        env,
        RoleGrantedEvent {
            role: role.clone(),
            account: account.clone(),
            timelock_expiry,
        },
    );
}

/// Removes `account` from `role` and clears its timelock.
///
/// Callers validate with [`ensure_can_revoke`] first.
pub(crate) fn revoke_role(env: &Env, role: &Symbol, account: &Address) {
    remove_member(env, role, account);
    timelock::clear(env, account);
    emit_role_revoked(
        env,
        RoleRevokedEvent {
            role: role.clone(),
            account: account.clone(),
        },
    );
}
