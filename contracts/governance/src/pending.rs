//! Pending-proposal index and the creation-ordered proposal registry.
//!
//! A `Pending(target, kind)` entry points at the latest proposal of that
//! kind for that target. The slot counts as occupied only while that
//! proposal is unexecuted and unexpired; an expired entry is overwritten by
//! the next proposal for the pair, before anyone garbage-collects it.

use soroban_sdk::{BytesN, Env, Vec};

use crate::proposal::get_proposal;
use crate::types::{GovernanceDataKey, ProposalKind, ProposalTarget};

pub fn pending_id(env: &Env, target: &ProposalTarget, kind: ProposalKind) -> Option<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::Pending(target.clone(), kind))
}

/// True while the entry's proposal is stored, unexecuted and inside its window.
pub fn is_pending(env: &Env, target: &ProposalTarget, kind: ProposalKind) -> bool {
    let Some(id) = pending_id(env, target, kind) else {
        return false;
    };
    match get_proposal(env, &id) {
        Some(proposal) => !proposal.executed && env.ledger().timestamp() < proposal.expiry_time,
        None => false,
    }
}

/// Kinds with a live proposal for `target`.
pub fn pending_kinds(env: &Env, target: &ProposalTarget) -> Vec<ProposalKind> {
    let mut kinds = Vec::new(env);
    for kind in ProposalKind::ALL {
        if is_pending(env, target, kind) {
            kinds.push_back(kind);
        }
    }
    kinds
}

pub(crate) fn mark(env: &Env, target: &ProposalTarget, kind: ProposalKind, id: &BytesN<32>) {
    env.storage()
        .persistent()
        .set(&GovernanceDataKey::Pending(target.clone(), kind), id);
}

pub(crate) fn clear(env: &Env, target: &ProposalTarget, kind: ProposalKind) {
    env.storage()
        .persistent()
        .remove(&GovernanceDataKey::Pending(target.clone(), kind));
}

pub fn registry(env: &Env) -> Vec<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::ProposalRegistry)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn register(env: &Env, id: &BytesN<32>) {
    let mut ids = registry(env);
    ids.push_back(id.clone());
    env.storage()
        .persistent()
        .set(&GovernanceDataKey::ProposalRegistry, &ids);
}

pub(crate) fn unregister(env: &Env, id: &BytesN<32>) {
    let mut ids = registry(env);
    if let Some(index) = ids.first_index_of(id) {
        ids.remove(index);
        env.storage()
            .persistent()
            .set(&GovernanceDataKey::ProposalRegistry, &ids);
    }
}
