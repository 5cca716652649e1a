//! # Proposal Manager
//!
//! Multi-admin proposal governance for the ledger-resident modules (token,
//! staking, storage marketplace, proof-of-storage, distribution, liquidity
//! pool). Role grants, code upgrades, wallet allocations and fund recovery
//! all go through a proposal that needs a quorum of distinct admin
//! approvals and matures inside a fixed execution window.
//!
//! ## Lifecycle
//! `Created → Approving → ReadyForExecution → Executed`, with `Expired`
//! reachable from every non-terminal state once the proposal times out.
//! An expired proposal is deleted by the next approval that touches it.
//!
//! ## Modules
//! - [`roles`]: role membership, quorum and value ceilings
//! - [`timelock`]: per-admin rate limiting
//! - [`proposal`]: store and lifecycle
//! - [`pending`]: one active proposal per (target, kind)
//! - [`dispatcher`]: type-specific effects
//! - [`upgrade`]: the upgrade authorization gate

#![no_std]
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Symbol, Vec};

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod pending;
pub mod proposal;
pub mod reentrancy;
pub mod roles;
pub mod timelock;
pub mod types;
pub mod upgrade;

pub use errors::{ErrorCategory, GovernanceError};
pub use types::{
    AdminTimeConfig, ApprovalReceipt, GovernanceConfig, PendingProposals, Proposal,
    ProposalDetails, ProposalKind, ProposalTarget, RoleConfig,
};

#[cfg(test)]
mod tests;

#[contract]
pub struct ProposalManager;

#[contractimpl]
impl ProposalManager {
    /// Initialize the engine
    ///
    /// # Arguments
    /// * `admins` - Initial admin set (no duplicates)
    /// * `admin_quorum` - Approvals required for proposals without a role (>= 2)
    /// * `distribution` - Allocation collaborator used by wallet proposals
    /// * `supply_cap` - Upper bound for proposal amounts (defaults to `i128::MAX`)
    pub fn initialize(
        env: Env,
        admins: Vec<Address>,
        admin_quorum: u32,
        distribution: Option<Address>,
        supply_cap: Option<i128>,
    ) -> Result<(), GovernanceError> {
        config::initialize(&env, admins, admin_quorum, distribution, supply_cap)
    }

    // ========================================================================
    // Proposal lifecycle
    // ========================================================================

    /// Create a proposal (admin only)
    ///
    /// The caller becomes the first approver.
    ///
    /// # Arguments
    /// * `caller` - Proposing admin (must authorize)
    /// * `kind` - What the proposal does once executed
    /// * `target` - Account or code pointer the proposal acts on
    /// * `role` - Role granted or revoked; selects the quorum
    /// * `amount` - Allocation or recovery amount
    /// * `asset` - Token the amount refers to
    /// * `is_add` - Grant/add (true) or revoke/remove (false)
    ///
    /// # Returns
    /// The proposal identifier
    ///
    /// # Errors
    /// - `Unauthorized` / `TimeLockActive` - Caller may not act
    /// - `DuplicateProposal` - (target, kind) already has an active proposal
    /// - `InvalidProposal` / `InvalidAmount` / `AmountExceedsRoleLimit` - Malformed request
    #[allow(clippy::too_many_arguments)]
    pub fn create_proposal(
        env: Env,
        caller: Address,
        kind: ProposalKind,
        target: ProposalTarget,
        role: Option<Symbol>,
        amount: Option<i128>,
        asset: Option<Address>,
        is_add: bool,
    ) -> Result<BytesN<32>, GovernanceError> {
        caller.require_auth();
        proposal::create_proposal(&env, &caller, kind, target, role, amount, asset, is_add)
    }

    /// Approve a proposal (admin only)
    ///
    /// Executes the proposal inline when this approval makes it executable.
    /// Approving an expired proposal deletes it; the receipt reports `expired`.
    ///
    /// # Errors
    /// - `ProposalNotFound` / `AlreadyExecuted` / `AlreadyApproved`
    pub fn approve_proposal(
        env: Env,
        caller: Address,
        proposal_id: BytesN<32>,
    ) -> Result<ApprovalReceipt, GovernanceError> {
        caller.require_auth();
        proposal::approve_proposal(&env, &caller, &proposal_id)
    }

    /// Execute a proposal whose quorum and delay are satisfied (admin only)
    ///
    /// # Errors
    /// - `InsufficientApprovals` / `ExecutionDelayNotMet` - Not ready yet
    /// - `AlreadyExecuted` / `ProposalExpired` / `ProposalNotFound`
    /// - `UpgradeRequiresGate` - Upgrade proposals go through `upgrade`
    pub fn execute_proposal(
        env: Env,
        caller: Address,
        proposal_id: BytesN<32>,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        proposal::execute_proposal(&env, &caller, &proposal_id)
    }

    /// Upgrade the contract code through the authorization gate (admin only)
    ///
    /// # Errors
    /// - `ProposalNotFound` - No active Upgrade proposal for this hash
    /// - `InsufficientApprovals` / `ExecutionDelayNotMet` - Not matured
    pub fn upgrade(
        env: Env,
        caller: Address,
        new_wasm_hash: BytesN<32>,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        upgrade::upgrade(&env, &caller, new_wasm_hash)
    }

    pub fn get_proposal_details(
        env: Env,
        proposal_id: BytesN<32>,
        caller: Address,
    ) -> Result<ProposalDetails, GovernanceError> {
        proposal::get_proposal_details(&env, &proposal_id, &caller)
    }

    /// List stored proposals, at most 20 per page
    pub fn get_pending_proposals(
        env: Env,
        offset: u32,
        limit: u32,
    ) -> Result<PendingProposals, GovernanceError> {
        proposal::get_pending_proposals(&env, offset, limit)
    }

    pub fn has_approved_proposal(env: Env, proposal_id: BytesN<32>, account: Address) -> bool {
        proposal::has_approved_proposal(&env, &proposal_id, &account)
    }

    /// Kinds with an outstanding proposal for `target`
    pub fn pending_kinds(env: Env, target: ProposalTarget) -> Vec<ProposalKind> {
        pending::pending_kinds(&env, &target)
    }

    // ========================================================================
    // Role registry
    // ========================================================================

    pub fn get_quorum(env: Env, role: Symbol) -> u32 {
        roles::get_quorum(&env, &role)
    }

    /// Set the quorum of a role (admin only, >= 2)
    pub fn set_quorum(
        env: Env,
        caller: Address,
        role: Symbol,
        quorum: u32,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        roles::set_quorum(&env, &caller, &role, quorum)
    }

    /// Set the per-role amount ceiling (admin only, 0 = unlimited)
    pub fn set_role_limit(
        env: Env,
        caller: Address,
        role: Symbol,
        max_amount: i128,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        roles::set_role_limit(&env, &caller, &role, max_amount)
    }

    pub fn get_role_config(env: Env, role: Symbol) -> RoleConfig {
        roles::get_role_config(&env, &role)
    }

    pub fn has_role(env: Env, role: Symbol, account: Address) -> bool {
        roles::has_role(&env, &role, &account)
    }

    pub fn is_admin(env: Env, account: Address) -> bool {
        roles::is_admin(&env, &account)
    }

    pub fn role_members(env: Env, role: Symbol) -> Vec<Address> {
        roles::role_members(&env, &role)
    }

    pub fn get_admin_time(env: Env, account: Address) -> AdminTimeConfig {
        timelock::get_admin_time(&env, &account)
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn get_config(env: Env) -> Result<GovernanceConfig, GovernanceError> {
        config::get_config(&env)
    }

    /// Set the lifetime of new proposals in seconds (admin only)
    pub fn set_proposal_timeout(
        env: Env,
        caller: Address,
        seconds: u64,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        config::set_proposal_timeout(&env, &caller, seconds)
    }

    /// Set the minimum delay before new proposals may execute (admin only)
    pub fn set_min_execution_delay(
        env: Env,
        caller: Address,
        seconds: u64,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        config::set_min_execution_delay(&env, &caller, seconds)
    }

    // ========================================================================
    // Effect views
    // ========================================================================

    pub fn is_whitelisted(env: Env, account: Address) -> bool {
        dispatcher::is_whitelisted(&env, &account)
    }

    pub fn current_wasm_hash(env: Env) -> Option<BytesN<32>> {
        upgrade::current_wasm_hash(&env)
    }
}
