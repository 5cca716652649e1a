//! # Governance Events
//!
//! One `#[contractevent]` struct per state transition of the engine. The
//! macro derives the snake_case struct name as the leading topic and packs
//! the fields into a map payload, so indexers can follow a proposal from
//! creation to execution or expiry without reading contract storage.
//!
//! Every transition publishes through an `emit_*` helper so each action has
//! a single call-site.
use soroban_sdk::{contractevent, Address, BytesN, Env, Symbol};

use crate::types::{ProposalKind, ProposalTarget};

/// Emitted when an admin opens a proposal. The proposer counts as the first
/// approval.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalCreatedEvent {
    pub proposal_id: BytesN<32>,
    pub kind: ProposalKind,
    pub target: ProposalTarget,
    pub proposer: Address,
    pub expiry_time: u64,
}

/// Emitted for every registered approval.
///
/// `execution_attempted` is true when this approval made the proposal
/// executable and it ran inline, so callers never need to poll.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalApprovedEvent {
    pub proposal_id: BytesN<32>,
    pub approver: Address,
    pub approvals: u32,
    pub execution_attempted: bool,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalExecutedEvent {
    pub proposal_id: BytesN<32>,
    pub kind: ProposalKind,
    pub executor: Address,
    pub timestamp: u64,
}

/// Emitted when an approval lands on an expired proposal and the record is
/// deleted.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalExpiredEvent {
    pub proposal_id: BytesN<32>,
    pub kind: ProposalKind,
    pub target: ProposalTarget,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct RoleGrantedEvent {
    pub role: Symbol,
    pub account: Address,
    pub timelock_expiry: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct RoleRevokedEvent {
    pub role: Symbol,
    pub account: Address,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct QuorumUpdatedEvent {
    pub actor: Address,
    pub role: Symbol,
    pub quorum: u32,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct RoleLimitUpdatedEvent {
    pub actor: Address,
    pub role: Symbol,
    pub max_amount: i128,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ConfigUpdatedEvent {
    pub actor: Address,
    pub parameter: Symbol,
    pub value: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct UpgradeAuthorizedEvent {
    pub proposal_id: BytesN<32>,
    pub new_wasm_hash: BytesN<32>,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct FundsRecoveredEvent {
    pub asset: Address,
    pub recipient: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct WhitelistUpdatedEvent {
    pub account: Address,
    pub whitelisted: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Emitter helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn emit_proposal_created(e: &Env, event: ProposalCreatedEvent) {
    event.publish(e);
}

pub fn emit_proposal_approved(e: &Env, event: ProposalApprovedEvent) {
    event.publish(e);
}

pub fn emit_proposal_executed(e: &Env, event: ProposalExecutedEvent) {
    event.publish(e);
}

pub fn emit_proposal_expired(e: &Env, event: ProposalExpiredEvent) {
    event.publish(e);
}

pub fn emit_role_granted(e: &Env, event: RoleGrantedEvent) {
    event.publish(e);
}

pub fn emit_role_revoked(e: &Env, event: RoleRevokedEvent) {
    event.publish(e);
}

pub fn emit_quorum_updated(e: &Env, event: QuorumUpdatedEvent) {
    event.publish(e);
}

pub fn emit_role_limit_updated(e: &Env, event: RoleLimitUpdatedEvent) {
    event.publish(e);
}

pub fn emit_config_updated(e: &Env, event: ConfigUpdatedEvent) {
    event.publish(e);
}

pub fn emit_upgrade_authorized(e: &Env, event: UpgradeAuthorizedEvent) {
    event.publish(e);
}

pub fn emit_funds_recovered(e: &Env, event: FundsRecoveredEvent) {
    event.publish(e);
}

pub fn emit_whitelist_updated(e: &Env, event: WhitelistUpdatedEvent) {
    event.publish(e);
}
