//! # Proposal Lifecycle Tests
//!
//! ## Test Coverage
//! - Creation: identifiers, windows, first approval, request validation
//! - Approval: distinct approvers, counting invariant, inline execution
//! - Explicit execution: quorum, delay, expiry, replay
//! - Views and pagination

#![cfg(test)]

use soroban_sdk::{testutils::Address as _, Address, BytesN};

use super::test_helpers::*;
use crate::config::{DEFAULT_MIN_EXECUTION_DELAY, DEFAULT_PROPOSAL_TIMEOUT};
use crate::proposal::{derive_id, get_proposal};
use crate::roles::ADMIN_ROLE;
use crate::{GovernanceError, ProposalKind, ProposalTarget};

// ============================================================================
// Create
// ============================================================================

#[test]
fn test_create_proposal_records_window_and_first_approval() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    let id = propose_whitelist(&ctx, &ctx.admin_a, &target);

    let details = ctx.client.get_proposal_details(&id, &ctx.admin_a);
    assert_eq!(details.kind, ProposalKind::Whitelist);
    assert_eq!(details.target, account(&target));
    assert_eq!(details.approvals, 1);
    assert_eq!(details.execution_time, START + DEFAULT_MIN_EXECUTION_DELAY);
    assert_eq!(details.expiry_time, START + DEFAULT_PROPOSAL_TIMEOUT);
    assert!(!details.executed);
    assert!(details.caller_has_approved);

    let other_view = ctx.client.get_proposal_details(&id, &ctx.admin_b);
    assert!(!other_view.caller_has_approved);
    assert!(ctx.client.has_approved_proposal(&id, &ctx.admin_a));
    assert!(!ctx.client.has_approved_proposal(&id, &ctx.admin_b));
}

#[test]
fn test_proposal_id_is_derived_from_content_and_time() {
    let ctx = setup();
    let wallet = Address::generate(&ctx.env);
    let asset = Address::generate(&ctx.env);
    let id = propose_wallet_add(&ctx, &ctx.admin_a, &wallet, &asset, 500);

    let expected = ctx.env.as_contract(&ctx.contract_id, || {
        derive_id(
            &ctx.env,
            ProposalKind::WalletAdd,
            &account(&wallet),
            &None,
            Some(500),
            &Some(asset.clone()),
            START,
        )
    });
    assert_eq!(id, expected);
}

#[test]
fn test_create_marks_target_pending() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    propose_whitelist(&ctx, &ctx.admin_a, &target);

    let kinds = ctx.client.pending_kinds(&account(&target));
    assert_eq!(kinds.len(), 1);
    assert_eq!(kinds.get_unchecked(0), ProposalKind::Whitelist);
}

#[test]
fn test_create_by_non_admin_unauthorized() {
    let ctx = setup();
    let outsider = Address::generate(&ctx.env);
    let result = ctx.client.try_create_proposal(
        &outsider,
        &ProposalKind::Whitelist,
        &account(&outsider),
        &None,
        &None,
        &None,
        &true,
    );
    assert_eq!(result, Err(Ok(GovernanceError::Unauthorized)));
}

#[test]
fn test_duplicate_target_and_kind_rejected() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    propose_whitelist(&ctx, &ctx.admin_a, &target);

    let result = ctx.client.try_create_proposal(
        &ctx.admin_b,
        &ProposalKind::Whitelist,
        &account(&target),
        &None,
        &None,
        &None,
        &false,
    );
    assert_eq!(result, Err(Ok(GovernanceError::DuplicateProposal)));

    // A different kind for the same target is independent.
    let operator = role(&ctx.env, "OPERATOR");
    propose_grant(&ctx, &ctx.admin_b, &operator, &target);
    assert_eq!(ctx.client.pending_kinds(&account(&target)).len(), 2);
}

#[test]
fn test_create_rejects_malformed_requests() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    let asset = Address::generate(&ctx.env);

    // Role change without a role.
    assert_eq!(
        ctx.client.try_create_proposal(
            &ctx.admin_a,
            &ProposalKind::RoleChange,
            &account(&target),
            &None,
            &None,
            &None,
            &true,
        ),
        Err(Ok(GovernanceError::InvalidProposal))
    );
    // Upgrade pointing at an account.
    assert_eq!(
        ctx.client.try_create_proposal(
            &ctx.admin_a,
            &ProposalKind::Upgrade,
            &account(&target),
            &None,
            &None,
            &None,
            &true,
        ),
        Err(Ok(GovernanceError::InvalidProposal))
    );
    // Wallet proposal pointing at code.
    assert_eq!(
        ctx.client.try_create_proposal(
            &ctx.admin_a,
            &ProposalKind::WalletAdd,
            &ProposalTarget::Code(wasm_hash(&ctx.env, 1)),
            &None,
            &Some(10),
            &Some(asset.clone()),
            &true,
        ),
        Err(Ok(GovernanceError::InvalidProposal))
    );
    // Wallet allocation without an amount.
    assert_eq!(
        ctx.client.try_create_proposal(
            &ctx.admin_a,
            &ProposalKind::WalletAdd,
            &account(&target),
            &None,
            &None,
            &Some(asset),
            &true,
        ),
        Err(Ok(GovernanceError::InvalidProposal))
    );
}

#[test]
fn test_create_rejects_invalid_amounts() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    let asset = Address::generate(&ctx.env);

    for amount in [0_i128, -5] {
        assert_eq!(
            ctx.client.try_create_proposal(
                &ctx.admin_a,
                &ProposalKind::WalletAdd,
                &account(&target),
                &None,
                &Some(amount),
                &Some(asset.clone()),
                &true,
            ),
            Err(Ok(GovernanceError::InvalidAmount))
        );
    }
}

#[test]
fn test_create_rejects_amount_above_supply_cap() {
    let (env, client) = setup_uninitialized();
    let admin_a = Address::generate(&env);
    let admins = soroban_sdk::vec![&env, admin_a.clone(), Address::generate(&env)];
    client.initialize(&admins, &2, &None, &Some(1_000));

    let result = client.try_create_proposal(
        &admin_a,
        &ProposalKind::Recovery,
        &account(&Address::generate(&env)),
        &None,
        &Some(1_001),
        &Some(Address::generate(&env)),
        &true,
    );
    assert_eq!(result, Err(Ok(GovernanceError::InvalidAmount)));
}

#[test]
fn test_create_enforces_role_ceiling() {
    let ctx = setup();
    ctx.client.set_role_limit(&ctx.admin_a, &ADMIN_ROLE, &1_000);
    let wallet = Address::generate(&ctx.env);
    let asset = Address::generate(&ctx.env);

    let result = ctx.client.try_create_proposal(
        &ctx.admin_a,
        &ProposalKind::WalletAdd,
        &account(&wallet),
        &None,
        &Some(1_001),
        &Some(asset.clone()),
        &true,
    );
    assert_eq!(result, Err(Ok(GovernanceError::AmountExceedsRoleLimit)));

    propose_wallet_add(&ctx, &ctx.admin_a, &wallet, &asset, 1_000);
}

#[test]
fn test_create_checks_current_membership() {
    let ctx = setup();
    let outsider = Address::generate(&ctx.env);

    assert_eq!(
        ctx.client.try_create_proposal(
            &ctx.admin_a,
            &ProposalKind::RoleChange,
            &account(&ctx.admin_b),
            &Some(ADMIN_ROLE),
            &None,
            &None,
            &true,
        ),
        Err(Ok(GovernanceError::RoleAlreadyGranted))
    );
    assert_eq!(
        ctx.client.try_create_proposal(
            &ctx.admin_a,
            &ProposalKind::RoleChange,
            &account(&outsider),
            &Some(ADMIN_ROLE),
            &None,
            &None,
            &false,
        ),
        Err(Ok(GovernanceError::RoleNotGranted))
    );
}

// ============================================================================
// Approve
// ============================================================================

#[test]
fn test_approve_counts_distinct_admins_once() {
    let ctx = setup();
    ctx.client.set_quorum(&ctx.admin_a, &ADMIN_ROLE, &3);
    let id = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));

    assert_eq!(
        ctx.client.try_approve_proposal(&ctx.admin_a, &id),
        Err(Ok(GovernanceError::AlreadyApproved))
    );

    let receipt = ctx.client.approve_proposal(&ctx.admin_b, &id);
    assert_eq!(receipt.approvals, 2);
    assert!(!receipt.execution_attempted);
    assert!(!receipt.expired);

    assert_eq!(
        ctx.client.try_approve_proposal(&ctx.admin_b, &id),
        Err(Ok(GovernanceError::AlreadyApproved))
    );

    let stored = ctx
        .env
        .as_contract(&ctx.contract_id, || get_proposal(&ctx.env, &id))
        .unwrap();
    assert_eq!(stored.approval_count, stored.approvers.len());
    assert_eq!(stored.approval_count, 2);
}

#[test]
fn test_approve_unknown_proposal() {
    let ctx = setup();
    let unknown = BytesN::from_array(&ctx.env, &[7u8; 32]);
    assert_eq!(
        ctx.client.try_approve_proposal(&ctx.admin_b, &unknown),
        Err(Ok(GovernanceError::ProposalNotFound))
    );
}

#[test]
fn test_final_approval_executes_inline() {
    let ctx = setup();
    ctx.client.set_quorum(&ctx.admin_a, &ADMIN_ROLE, &3);
    let target = Address::generate(&ctx.env);
    let id = propose_whitelist(&ctx, &ctx.admin_a, &target);

    ctx.client.approve_proposal(&ctx.admin_b, &id);
    advance(&ctx.env, DAY);
    assert!(!ctx.client.is_whitelisted(&target));

    let receipt = ctx.client.approve_proposal(&ctx.admin_c, &id);
    assert_eq!(receipt.approvals, 3);
    assert!(receipt.execution_attempted);
    assert!(ctx.client.is_whitelisted(&target));
    assert!(ctx.client.get_proposal_details(&id, &ctx.admin_c).executed);
    assert_eq!(ctx.client.pending_kinds(&account(&target)).len(), 0);
}

#[test]
fn test_approve_after_execution_rejected() {
    let ctx = setup();
    let id = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));
    advance(&ctx.env, DAY);
    ctx.client.approve_proposal(&ctx.admin_b, &id);

    assert_eq!(
        ctx.client.try_approve_proposal(&ctx.admin_c, &id),
        Err(Ok(GovernanceError::AlreadyExecuted))
    );
}

// ============================================================================
// Execute
// ============================================================================

#[test]
fn test_execute_requires_quorum() {
    let ctx = setup();
    let id = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));
    advance(&ctx.env, DAY);

    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_a, &id),
        Err(Ok(GovernanceError::InsufficientApprovals))
    );
}

#[test]
fn test_execute_waits_for_delay() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    let id = propose_whitelist(&ctx, &ctx.admin_a, &target);

    let receipt = ctx.client.approve_proposal(&ctx.admin_b, &id);
    assert!(!receipt.execution_attempted);
    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_c, &id),
        Err(Ok(GovernanceError::ExecutionDelayNotMet))
    );

    advance(&ctx.env, DEFAULT_MIN_EXECUTION_DELAY - 1);
    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_c, &id),
        Err(Ok(GovernanceError::ExecutionDelayNotMet))
    );

    advance(&ctx.env, 1);
    ctx.client.execute_proposal(&ctx.admin_c, &id);
    assert!(ctx.client.is_whitelisted(&target));

    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_c, &id),
        Err(Ok(GovernanceError::AlreadyExecuted))
    );
}

#[test]
fn test_execute_after_expiry_fails() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    let id = propose_whitelist(&ctx, &ctx.admin_a, &target);
    ctx.client.approve_proposal(&ctx.admin_b, &id);

    advance(&ctx.env, DEFAULT_PROPOSAL_TIMEOUT);
    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_c, &id),
        Err(Ok(GovernanceError::ProposalExpired))
    );
    assert!(!ctx.client.is_whitelisted(&target));
}

#[test]
fn test_execute_unknown_proposal() {
    let ctx = setup();
    let unknown = BytesN::from_array(&ctx.env, &[9u8; 32]);
    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_a, &unknown),
        Err(Ok(GovernanceError::ProposalNotFound))
    );
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_get_details_unknown_proposal() {
    let ctx = setup();
    let unknown = BytesN::from_array(&ctx.env, &[1u8; 32]);
    assert_eq!(
        ctx.client.try_get_proposal_details(&unknown, &ctx.admin_a),
        Err(Ok(GovernanceError::ProposalNotFound))
    );
    assert!(!ctx.client.has_approved_proposal(&unknown, &ctx.admin_a));
}

#[test]
fn test_pending_proposals_pagination() {
    let ctx = setup();
    let first = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));
    let second = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));
    let third = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));

    let page = ctx.client.get_pending_proposals(&0, &2);
    assert_eq!(page.total, 3);
    assert_eq!(page.ids.len(), 2);
    assert_eq!(page.ids.get_unchecked(0), first);
    assert_eq!(page.ids.get_unchecked(1), second);
    assert_eq!(page.kinds.get_unchecked(0), ProposalKind::Whitelist);

    let page = ctx.client.get_pending_proposals(&2, &20);
    assert_eq!(page.ids.len(), 1);
    assert_eq!(page.ids.get_unchecked(0), third);
    assert_eq!(page.expiry_times.get_unchecked(0), START + DEFAULT_PROPOSAL_TIMEOUT);

    let page = ctx.client.get_pending_proposals(&5, &10);
    assert_eq!(page.ids.len(), 0);
    assert_eq!(page.total, 3);
}

#[test]
fn test_pending_proposals_limit_too_high() {
    let ctx = setup();
    assert_eq!(
        ctx.client.try_get_pending_proposals(&0, &21),
        Err(Ok(GovernanceError::LimitTooHigh))
    );
}

#[test]
fn test_pending_proposals_reports_executed_flag() {
    let ctx = setup();
    let id = propose_whitelist(&ctx, &ctx.admin_a, &Address::generate(&ctx.env));
    advance(&ctx.env, DAY);
    ctx.client.approve_proposal(&ctx.admin_b, &id);

    let page = ctx.client.get_pending_proposals(&0, &20);
    assert_eq!(page.ids.get_unchecked(0), id);
    assert!(page.executed.get_unchecked(0));
}

#[test]
fn test_revoked_admin_approval_no_longer_counts() {
    let ctx = setup();
    let target = Address::generate(&ctx.env);
    let id = propose_whitelist(&ctx, &ctx.admin_a, &target);
    ctx.client.approve_proposal(&ctx.admin_c, &id);

    let revoke = propose_revoke(&ctx, &ctx.admin_a, &ADMIN_ROLE, &ctx.admin_c);
    advance(&ctx.env, DAY);
    ctx.client.approve_proposal(&ctx.admin_b, &revoke);
    assert!(!ctx.client.is_admin(&ctx.admin_c));

    // Two approvals are recorded, but only one comes from a current admin.
    assert_eq!(ctx.client.get_proposal_details(&id, &ctx.admin_a).approvals, 2);
    assert_eq!(
        ctx.client.try_execute_proposal(&ctx.admin_a, &id),
        Err(Ok(GovernanceError::InsufficientApprovals))
    );

    let receipt = ctx.client.approve_proposal(&ctx.admin_b, &id);
    assert_eq!(receipt.approvals, 3);
    assert!(receipt.execution_attempted);
    assert!(ctx.client.is_whitelisted(&target));
}
