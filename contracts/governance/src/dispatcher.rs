//! # Execution Dispatcher
//!
//! Applies the effect of a matured proposal in three phases:
//!
//! 1. **Validate**: check the effect's preconditions against current state,
//!    including read-only queries to collaborator contracts.
//! 2. **Commit**: mark the proposal executed and clear its pending entry.
//! 3. **Apply**: mutate roles, call the collaborator, or move funds.
//!
//! No collaborator is mutated before phase 2 has been written, and the
//! proposal's execution lock is held throughout, so a collaborator calling
//! back into the engine observes the proposal as executed.

use soroban_sdk::{log, token, Address, Env, IntoVal, Symbol};

use crate::config;
use crate::errors::GovernanceError;
use crate::events::{
    emit_funds_recovered, emit_proposal_executed, emit_whitelist_updated, FundsRecoveredEvent,
    ProposalExecutedEvent, WhitelistUpdatedEvent,
};
use crate::pending;
use crate::proposal::store_proposal;
use crate::reentrancy::ExecutionGuard;
use crate::roles;
use crate::types::{GovernanceDataKey, Proposal, ProposalKind};

/// Validated effect, ready to apply once the proposal is committed.
enum Effect {
    Grant(Symbol, Address),
    Revoke(Symbol, Address),
    AddWallet {
        distribution: Address,
        wallet: Address,
        asset: Address,
        amount: i128,
    },
    RemoveWallet {
        distribution: Address,
        wallet: Address,
        asset: Address,
    },
    Recover {
        asset: Address,
        recipient: Address,
        amount: i128,
    },
    Whitelist(Address, bool),
}

pub fn is_whitelisted(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&GovernanceDataKey::Whitelisted(account.clone()))
        .unwrap_or(false)
}

/// Queries the distribution contract for a wallet's allocation of `asset`.
fn allocation_of(env: &Env, distribution: &Address, wallet: &Address, asset: &Address) -> i128 {
    env.invoke_contract(
        distribution,
        &Symbol::new(env, "allocation"),
        (wallet.clone(), asset.clone()).into_val(env),
    )
}

fn prepare(env: &Env, proposal: &Proposal) -> Result<Option<Effect>, GovernanceError> {
    if proposal.kind == ProposalKind::Upgrade {
        return Ok(None);
    }
    let account = proposal
        .target
        .account()
        .ok_or(GovernanceError::InvalidProposal)?;

    let effect = match proposal.kind {
        ProposalKind::RoleChange => {
            let role = proposal
                .role
                .clone()
                .ok_or(GovernanceError::InvalidProposal)?;
            if proposal.is_add {
                if roles::has_role(env, &role, &account) {
                    return Err(GovernanceError::RoleAlreadyGranted);
                }
                Effect::Grant(role, account)
            } else {
                roles::ensure_can_revoke(env, &role, &account)?;
                Effect::Revoke(role, account)
            }
        }
        ProposalKind::WalletAdd | ProposalKind::WalletRemove => {
            let distribution = config::get_config(env)?
                .distribution
                .ok_or(GovernanceError::CollaboratorNotSet)?;
            let asset = proposal
                .asset
                .clone()
                .ok_or(GovernanceError::InvalidProposal)?;
            let current = allocation_of(env, &distribution, &account, &asset);

            if proposal.kind == ProposalKind::WalletAdd {
                if current != 0 {
                    return Err(GovernanceError::AllocationExists);
                }
                Effect::AddWallet {
                    distribution,
                    wallet: account,
                    asset,
                    amount: proposal.amount.ok_or(GovernanceError::InvalidProposal)?,
                }
            } else {
                if current == 0 {
                    return Err(GovernanceError::AllocationNotFound);
                }
                Effect::RemoveWallet {
                    distribution,
                    wallet: account,
                    asset,
                }
            }
        }
        ProposalKind::Recovery => {
            let asset = proposal
                .asset
                .clone()
                .ok_or(GovernanceError::InvalidProposal)?;
            let amount = proposal.amount.ok_or(GovernanceError::InvalidProposal)?;
            let balance =
                token::TokenClient::new(env, &asset).balance(&env.current_contract_address());
            if balance < amount {
                return Err(GovernanceError::InsufficientBalance);
            }
            Effect::Recover {
                asset,
                recipient: account,
                amount,
            }
        }
        ProposalKind::Whitelist => Effect::Whitelist(account, proposal.is_add),
        ProposalKind::Upgrade => return Ok(None),
    };
    Ok(Some(effect))
}

/// Marks the proposal executed and releases its (target, kind) entry.
pub(crate) fn commit(env: &Env, executor: &Address, proposal: &Proposal) {
    let mut executed = proposal.clone();
    executed.executed = true;
    store_proposal(env, &executed);
    pending::clear(env, &proposal.target, proposal.kind);

    log!(env, "proposal executed {}", proposal.id);
    emit_proposal_executed(
        env,
        ProposalExecutedEvent {
            proposal_id: proposal.id.clone(),
            kind: proposal.kind,
            executor: executor.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

fn apply(env: &Env, effect: Effect) {
    match effect {
        Effect::Grant(role, account) => roles::grant_role(env, &role, &account),
        Effect::Revoke(role, account) => roles::revoke_role(env, &role, &account),
        Effect::AddWallet {
            distribution,
            wallet,
            asset,
            amount,
        } => {
            env.invoke_contract::<()>(
                &distribution,
                &Symbol::new(env, "add_wallet"),
                (env.current_contract_address(), wallet, asset, amount).into_val(env),
            );
        }
        Effect::RemoveWallet {
            distribution,
            wallet,
            asset,
        } => {
            env.invoke_contract::<()>(
                &distribution,
                &Symbol::new(env, "remove_wallet"),
                (env.current_contract_address(), wallet, asset).into_val(env),
            );
        }
        Effect::Recover {
            asset,
            recipient,
            amount,
        } => {
            token::TokenClient::new(env, &asset).transfer(
                &env.current_contract_address(),
                &recipient,
                &amount,
            );
            emit_funds_recovered(
                env,
                FundsRecoveredEvent {
                    asset,
                    recipient,
                    amount,
                },
            );
        }
        Effect::Whitelist(account, whitelisted) => {
            let key = GovernanceDataKey::Whitelisted(account.clone());
            if whitelisted {
                env.storage().persistent().set(&key, &true);
            } else {
                env.storage().persistent().remove(&key);
            }
            emit_whitelist_updated(
                env,
                WhitelistUpdatedEvent {
                    account,
                    whitelisted,
                },
            );
        }
    }
}

/// Runs a proposal that already passed `ensure_executable`.
pub(crate) fn execute(
    env: &Env,
    executor: &Address,
    proposal: &Proposal,
) -> Result<(), GovernanceError> {
    let _guard = ExecutionGuard::acquire(env, &proposal.id)?;
    let effect = prepare(env, proposal)?;
    commit(env, executor, proposal);
    if let Some(effect) = effect {
        apply(env, effect);
    }
    Ok(())
}
