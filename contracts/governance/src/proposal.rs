//! # Proposal Store & Lifecycle
//!
//! Implements the create → approve → execute flow shared by every privileged
//! operation.
//!
//! ## How It Works
//! 1. An admin opens a proposal with [`create_proposal`]; the proposer is the
//!    first approver and the (target, kind) pair is marked pending.
//! 2. Other admins approve with [`approve_proposal`]. The approval that makes
//!    the proposal executable runs it inline.
//! 3. Alternatively any admin calls [`execute_proposal`] once the quorum and
//!    the execution delay are both satisfied.
//!
//! ## Safety Guarantees
//! - Each admin approves a proposal at most once; `approval_count` always
//!   equals the size of the approver set.
//! - At most one active proposal per (target, kind).
//! - A proposal executes only inside `[earliest_execution_time, expiry_time)`
//!   with the quorum of its role met by approvers who are still admins.
//! - Approving an expired proposal deletes it and never counts the approval.
//! - Upgrade proposals are consumed by the upgrade gate, never here.

use soroban_sdk::{log, xdr::ToXdr, Address, BytesN, Env, Symbol, Vec};

use crate::config;
use crate::dispatcher;
use crate::errors::GovernanceError;
use crate::events::{
    emit_proposal_approved, emit_proposal_created, emit_proposal_expired, ProposalApprovedEvent,
    ProposalCreatedEvent, ProposalExpiredEvent,
};
use crate::pending;
use crate::roles::{self, ADMIN_ROLE, MIN_QUORUM};
use crate::timelock;
use crate::types::{
    ApprovalReceipt, GovernanceConfig, GovernanceDataKey, PendingProposals, Proposal,
    ProposalDetails, ProposalKind, ProposalTarget,
};

/// Largest page returned by [`get_pending_proposals`].
pub const MAX_PAGE_SIZE: u32 = 20;

// ============================================================================
// Storage
// ============================================================================

pub fn get_proposal(env: &Env, proposal_id: &BytesN<32>) -> Option<Proposal> {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::Proposal(proposal_id.clone()))
}

pub(crate) fn store_proposal(env: &Env, proposal: &Proposal) {
    env.storage()
        .persistent()
        .set(&GovernanceDataKey::Proposal(proposal.id.clone()), proposal);
}

fn delete_proposal(env: &Env, proposal_id: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&GovernanceDataKey::Proposal(proposal_id.clone()));
}

/// Hash of (kind, target, role, amount, asset, created_at).
pub fn derive_id(
    env: &Env,
    kind: ProposalKind,
    target: &ProposalTarget,
    role: &Option<Symbol>,
    amount: Option<i128>,
    asset: &Option<Address>,
    created_at: u64,
) -> BytesN<32> {
    let preimage = (
        kind,
        target.clone(),
        role.clone(),
        amount,
        asset.clone(),
        created_at,
    )
        .to_xdr(env);
    env.crypto().sha256(&preimage).to_bytes()
}

/// The role whose quorum gates the proposal; the admin role when none is set.
pub fn quorum_role(proposal: &Proposal) -> Symbol {
    proposal.role.clone().unwrap_or(ADMIN_ROLE)
}

pub fn required_quorum(env: &Env, proposal: &Proposal) -> u32 {
    roles::get_quorum(env, &quorum_role(proposal))
}

/// Approvals from identities that still hold the admin role. An admin
/// revoked after approving no longer counts toward the quorum.
pub fn effective_approvals(env: &Env, proposal: &Proposal) -> u32 {
    let mut count = 0;
    for approver in proposal.approvers.iter() {
        if roles::is_admin(env, &approver) {
            count += 1;
        }
    }
    count
}

// ============================================================================
// Create
// ============================================================================

fn validate_request(
    env: &Env,
    config: &GovernanceConfig,
    proposal: &Proposal,
) -> Result<(), GovernanceError> {
    let is_code = matches!(proposal.target, ProposalTarget::Code(_));
    if is_code != (proposal.kind == ProposalKind::Upgrade) {
        return Err(GovernanceError::InvalidProposal);
    }

    match proposal.kind {
        ProposalKind::RoleChange => {
            let role = proposal
                .role
                .as_ref()
                .ok_or(GovernanceError::InvalidProposal)?;
            let account = proposal
                .target
                .account()
                .ok_or(GovernanceError::InvalidProposal)?;
            let held = roles::has_role(env, role, &account);
            if proposal.is_add && held {
                return Err(GovernanceError::RoleAlreadyGranted);
            }
            if !proposal.is_add && !held {
                return Err(GovernanceError::RoleNotGranted);
            }
        }
        ProposalKind::WalletAdd | ProposalKind::Recovery => {
            if proposal.asset.is_none() || proposal.amount.is_none() {
                return Err(GovernanceError::InvalidProposal);
            }
        }
        ProposalKind::WalletRemove => {
            if proposal.asset.is_none() {
                return Err(GovernanceError::InvalidProposal);
            }
        }
        ProposalKind::Upgrade | ProposalKind::Whitelist => {}
    }

    if let Some(amount) = proposal.amount {
        if amount <= 0 || amount > config.supply_cap {
            return Err(GovernanceError::InvalidAmount);
        }
        let ceiling = roles::get_role_config(env, &quorum_role(proposal)).max_amount;
        if ceiling > 0 && amount > ceiling {
            return Err(GovernanceError::AmountExceedsRoleLimit);
        }
    }
    Ok(())
}

/// Opens a proposal and records the proposer as its first approval.
///
/// # Returns
/// The derived proposal identifier.
///
/// # Errors
/// - [`GovernanceError::Unauthorized`] / [`GovernanceError::TimeLockActive`]
///   if the caller may not act.
/// - [`GovernanceError::InvalidProposal`], [`GovernanceError::InvalidAmount`],
///   [`GovernanceError::AmountExceedsRoleLimit`],
///   [`GovernanceError::RoleAlreadyGranted`], [`GovernanceError::RoleNotGranted`]
///   if the request is malformed for its kind.
/// - [`GovernanceError::DuplicateProposal`] if the (target, kind) pair
///   already has an active proposal.
#[allow(clippy::too_many_arguments)]
pub fn create_proposal(
    env: &Env,
    caller: &Address,
    kind: ProposalKind,
    target: ProposalTarget,
    role: Option<Symbol>,
    amount: Option<i128>,
    asset: Option<Address>,
    is_add: bool,
) -> Result<BytesN<32>, GovernanceError> {
    timelock::check_action(env, caller)?;
    let config = config::get_config(env)?;

    let now = env.ledger().timestamp();
    let id = derive_id(env, kind, &target, &role, amount, &asset, now);
    let mut approvers = Vec::new(env);
    approvers.push_back(caller.clone());

    let proposal = Proposal {
        id: id.clone(),
        kind,
        target,
        role,
        amount,
        asset,
        is_add,
        proposer: caller.clone(),
        approval_count: approvers.len(),
        approvers,
        created_at: now,
        earliest_execution_time: now.saturating_add(config.min_execution_delay),
        expiry_time: now.saturating_add(config.proposal_timeout),
        executed: false,
    };
    validate_request(env, &config, &proposal)?;

    if pending::is_pending(env, &proposal.target, kind) || get_proposal(env, &id).is_some() {
        return Err(GovernanceError::DuplicateProposal);
    }

    store_proposal(env, &proposal);
    pending::mark(env, &proposal.target, kind, &id);
    pending::register(env, &id);
    timelock::record_activity(env, caller);

    log!(env, "proposal created {} expires {}", id, proposal.expiry_time);
    emit_proposal_created(
        env,
        ProposalCreatedEvent {
            proposal_id: id.clone(),
            kind,
            target: proposal.target.clone(),
            proposer: caller.clone(),
            expiry_time: proposal.expiry_time,
        },
    );

    Ok(id)
}

// ============================================================================
// Approve
// ============================================================================

/// Garbage-collects a proposal whose window has closed.
fn expire(env: &Env, proposal: &Proposal) {
    if pending::pending_id(env, &proposal.target, proposal.kind).as_ref() == Some(&proposal.id) {
        pending::clear(env, &proposal.target, proposal.kind);
    }
    delete_proposal(env, &proposal.id);
    pending::unregister(env, &proposal.id);

    log!(env, "proposal expired {}", proposal.id);
    emit_proposal_expired(
        env,
        ProposalExpiredEvent {
            proposal_id: proposal.id.clone(),
            kind: proposal.kind,
            target: proposal.target.clone(),
        },
    );
}

/// Records the caller's approval and executes the proposal inline when the
/// approval makes it executable.
///
/// An approval that lands on an expired proposal deletes it and clears its
/// pending entry; the receipt reports `expired = true` and the approval is
/// not counted.
///
/// # Errors
/// - [`GovernanceError::ProposalNotFound`] if the proposal does not exist.
/// - [`GovernanceError::AlreadyExecuted`] if it already ran.
/// - [`GovernanceError::AlreadyApproved`] if the caller approved before.
/// - Any effect error raised by inline execution; the approval is then not
///   recorded either.
pub fn approve_proposal(
    env: &Env,
    caller: &Address,
    proposal_id: &BytesN<32>,
) -> Result<ApprovalReceipt, GovernanceError> {
    timelock::check_action(env, caller)?;
    let mut proposal =
        get_proposal(env, proposal_id).ok_or(GovernanceError::ProposalNotFound)?;
    if proposal.executed {
        return Err(GovernanceError::AlreadyExecuted);
    }

    if env.ledger().timestamp() >= proposal.expiry_time {
        expire(env, &proposal);
        timelock::record_activity(env, caller);
        return Ok(ApprovalReceipt {
            proposal_id: proposal_id.clone(),
            approvals: 0,
            execution_attempted: false,
            expired: true,
        });
    }

    if proposal.approvers.contains(caller) {
        return Err(GovernanceError::AlreadyApproved);
    }
    proposal.approvers.push_back(caller.clone());
    proposal.approval_count = proposal.approvers.len();
    store_proposal(env, &proposal);
    timelock::record_activity(env, caller);

    let execution_attempted = match try_execute(env, caller, &proposal) {
        Ok(()) => true,
        Err(err) if err.defers_execution() => false,
        Err(err) => return Err(err),
    };

    emit_proposal_approved(
        env,
        ProposalApprovedEvent {
            proposal_id: proposal_id.clone(),
            approver: caller.clone(),
            approvals: proposal.approval_count,
            execution_attempted,
        },
    );

    Ok(ApprovalReceipt {
        proposal_id: proposal_id.clone(),
        approvals: proposal.approval_count,
        execution_attempted,
        expired: false,
    })
}

// ============================================================================
// Execute
// ============================================================================

/// Checks every executability condition against current state.
pub(crate) fn ensure_executable(env: &Env, proposal: &Proposal) -> Result<(), GovernanceError> {
    if proposal.executed {
        return Err(GovernanceError::AlreadyExecuted);
    }
    let now = env.ledger().timestamp();
    if now >= proposal.expiry_time {
        return Err(GovernanceError::ProposalExpired);
    }
    if proposal.kind == ProposalKind::Upgrade {
        return Err(GovernanceError::UpgradeRequiresGate);
    }
    let quorum = required_quorum(env, proposal);
    if quorum < MIN_QUORUM {
        return Err(GovernanceError::InvalidQuorum);
    }
    if effective_approvals(env, proposal) < quorum {
        return Err(GovernanceError::InsufficientApprovals);
    }
    if now < proposal.earliest_execution_time {
        return Err(GovernanceError::ExecutionDelayNotMet);
    }
    Ok(())
}

/// The single execution path used by both approval and explicit execution.
pub(crate) fn try_execute(
    env: &Env,
    executor: &Address,
    proposal: &Proposal,
) -> Result<(), GovernanceError> {
    ensure_executable(env, proposal)?;
    dispatcher::execute(env, executor, proposal)
}

/// Executes a proposal whose quorum and delay are already satisfied.
///
/// # Errors
/// - [`GovernanceError::ProposalNotFound`], [`GovernanceError::AlreadyExecuted`],
///   [`GovernanceError::ProposalExpired`].
/// - [`GovernanceError::InvalidQuorum`] if the role's quorum is not configured.
/// - [`GovernanceError::InsufficientApprovals`],
///   [`GovernanceError::ExecutionDelayNotMet`] if it is not ready yet.
/// - [`GovernanceError::UpgradeRequiresGate`] for Upgrade proposals.
pub fn execute_proposal(
    env: &Env,
    caller: &Address,
    proposal_id: &BytesN<32>,
) -> Result<(), GovernanceError> {
    timelock::check_action(env, caller)?;
    let proposal = get_proposal(env, proposal_id).ok_or(GovernanceError::ProposalNotFound)?;
    try_execute(env, caller, &proposal)?;
    timelock::record_activity(env, caller);
    Ok(())
}

// ============================================================================
// View Functions
// ============================================================================

pub fn get_proposal_details(
    env: &Env,
    proposal_id: &BytesN<32>,
    caller: &Address,
) -> Result<ProposalDetails, GovernanceError> {
    let proposal = get_proposal(env, proposal_id).ok_or(GovernanceError::ProposalNotFound)?;
    Ok(ProposalDetails {
        caller_has_approved: proposal.approvers.contains(caller),
        kind: proposal.kind,
        target: proposal.target,
        role: proposal.role,
        amount: proposal.amount,
        asset: proposal.asset,
        is_add: proposal.is_add,
        approvals: proposal.approval_count,
        expiry_time: proposal.expiry_time,
        execution_time: proposal.earliest_execution_time,
        executed: proposal.executed,
    })
}

/// Returns one page of stored proposals in creation order.
///
/// # Errors
/// - [`GovernanceError::LimitTooHigh`] if `limit` exceeds [`MAX_PAGE_SIZE`].
pub fn get_pending_proposals(
    env: &Env,
    offset: u32,
    limit: u32,
) -> Result<PendingProposals, GovernanceError> {
    if limit > MAX_PAGE_SIZE {
        return Err(GovernanceError::LimitTooHigh);
    }

    let registry = pending::registry(env);
    let total = registry.len();
    let end = offset.saturating_add(limit).min(total);

    let mut page = PendingProposals {
        ids: Vec::new(env),
        kinds: Vec::new(env),
        targets: Vec::new(env),
        expiry_times: Vec::new(env),
        executed: Vec::new(env),
        total,
    };
    for index in offset..end {
        let id = registry.get_unchecked(index);
        if let Some(proposal) = get_proposal(env, &id) {
            page.ids.push_back(id);
            page.kinds.push_back(proposal.kind);
            page.targets.push_back(proposal.target);
            page.expiry_times.push_back(proposal.expiry_time);
            page.executed.push_back(proposal.executed);
        }
    }
    Ok(page)
}

pub fn has_approved_proposal(env: &Env, proposal_id: &BytesN<32>, account: &Address) -> bool {
    get_proposal(env, proposal_id)
        .map(|proposal| proposal.approvers.contains(account))
        .unwrap_or(false)
}
