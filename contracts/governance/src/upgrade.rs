//! # Upgrade Authorization Gate
//!
//! The last check before the contract's code pointer changes. An upgrade to
//! `new_wasm_hash` is allowed only when the Upgrade proposal for exactly that
//! hash is active, has met its quorum and has passed its execution delay.
//! Every condition is re-read from storage at the moment of the swap, so a
//! caller cannot race an unapproved hash in ahead of the quorum.

use soroban_sdk::{log, Address, BytesN, Env};

use crate::dispatcher;
use crate::errors::GovernanceError;
use crate::events::{emit_upgrade_authorized, UpgradeAuthorizedEvent};
use crate::pending;
use crate::proposal::{effective_approvals, get_proposal, required_quorum};
use crate::reentrancy::ExecutionGuard;
use crate::roles::MIN_QUORUM;
use crate::timelock;
use crate::types::{GovernanceDataKey, ProposalKind, ProposalTarget};

/// Consumes the matured Upgrade proposal for `new_wasm_hash`.
///
/// # Returns
/// The identifier of the consumed proposal.
///
/// # Errors
/// - [`GovernanceError::ProposalNotFound`] if no Upgrade proposal targets
///   the hash, or it was already executed, or it has expired.
/// - [`GovernanceError::InsufficientApprovals`] if its quorum is not met.
/// - [`GovernanceError::ExecutionDelayNotMet`] if it is too early.
pub fn authorize_upgrade(
    env: &Env,
    executor: &Address,
    new_wasm_hash: &BytesN<32>,
) -> Result<BytesN<32>, GovernanceError> {
    let target = ProposalTarget::Code(new_wasm_hash.clone());
    let proposal_id = pending::pending_id(env, &target, ProposalKind::Upgrade)
        .ok_or(GovernanceError::ProposalNotFound)?;
    let proposal = get_proposal(env, &proposal_id).ok_or(GovernanceError::ProposalNotFound)?;

    let now = env.ledger().timestamp();
    if proposal.executed || now >= proposal.expiry_time {
        return Err(GovernanceError::ProposalNotFound);
    }
    let quorum = required_quorum(env, &proposal);
    if quorum < MIN_QUORUM || effective_approvals(env, &proposal) < quorum {
        return Err(GovernanceError::InsufficientApprovals);
    }
    if now < proposal.earliest_execution_time {
        return Err(GovernanceError::ExecutionDelayNotMet);
    }

    let _guard = ExecutionGuard::acquire(env, &proposal_id)?;
    dispatcher::commit(env, executor, &proposal);
    env.storage()
        .instance()
        .set(&GovernanceDataKey::CurrentWasmHash, new_wasm_hash);

    log!(env, "upgrade authorized {}", new_wasm_hash);
    emit_upgrade_authorized(
        env,
        UpgradeAuthorizedEvent {
            proposal_id: proposal_id.clone(),
            new_wasm_hash: new_wasm_hash.clone(),
            timestamp: now,
        },
    );
    Ok(proposal_id)
}

/// Swaps the contract code once the gate has authorized `new_wasm_hash`.
pub fn upgrade(
    env: &Env,
    caller: &Address,
    new_wasm_hash: BytesN<32>,
) -> Result<(), GovernanceError> {
    timelock::check_action(env, caller)?;
    authorize_upgrade(env, caller, &new_wasm_hash)?;
    timelock::record_activity(env, caller);
    env.deployer().update_current_contract_wasm(new_wasm_hash);
    Ok(())
}

/// Code pointer recorded by the last authorized upgrade.
pub fn current_wasm_hash(env: &Env) -> Option<BytesN<32>> {
    env.storage()
        .instance()
        .get(&GovernanceDataKey::CurrentWasmHash)
}
