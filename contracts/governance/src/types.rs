//! Data model shared by every governance module.

use soroban_sdk::{contracttype, Address, BytesN, Symbol, Vec};

/// Storage keys for governance data
#[contracttype]
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum GovernanceDataKey {
    /// Set once by `initialize`
    Initialized,
    /// GovernanceConfig
    Config,
    /// Code pointer recorded by the upgrade gate
    CurrentWasmHash,
    /// Proposal record by identifier
    Proposal(BytesN<32>),
    /// Creation-ordered identifiers of stored proposals
    ProposalRegistry,
    /// Identifier of the active proposal for a (target, kind) pair
    Pending(ProposalTarget, ProposalKind),
    /// Role membership: RoleMember(role, account) -> bool
    RoleMember(Symbol, Address),
    /// Members of a role: Vec<Address>
    RoleMembers(Symbol),
    /// RoleConfig per role tag
    RoleConfig(Symbol),
    /// AdminTimeConfig per identity
    AdminTime(Address),
    /// Whitelist flag per account
    Whitelisted(Address),
    /// Temporary marker held while a proposal executes
    ExecutionLock(BytesN<32>),
}

/// What a proposal does once it executes.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProposalKind {
    /// Grant or revoke `role` on an account
    RoleChange,
    /// Authorize a code pointer swap
    Upgrade,
    /// Add a wallet allocation in the distribution contract
    WalletAdd,
    /// Remove a wallet allocation in the distribution contract
    WalletRemove,
    /// Return tokens held by the engine to an account
    Recovery,
    /// Add or remove an account from the whitelist
    Whitelist,
}

impl ProposalKind {
    pub const ALL: [ProposalKind; 6] = [
        ProposalKind::RoleChange,
        ProposalKind::Upgrade,
        ProposalKind::WalletAdd,
        ProposalKind::WalletRemove,
        ProposalKind::Recovery,
        ProposalKind::Whitelist,
    ];
}

/// Entity a proposal acts on.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalTarget {
    /// An identity: admin, wallet, or recovery recipient
    Account(Address),
    /// A code pointer (Wasm hash)
    Code(BytesN<32>),
}

impl ProposalTarget {
    pub fn account(&self) -> Option<Address> {
        match self {
            ProposalTarget::Account(address) => Some(address.clone()),
            ProposalTarget::Code(_) => None,
        }
    }
}

/// Proposal record
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    /// Deterministic identifier
    pub id: BytesN<32>,
    pub kind: ProposalKind,
    pub target: ProposalTarget,
    pub role: Option<Symbol>,
    pub amount: Option<i128>,
    pub asset: Option<Address>,
    pub is_add: bool,
    pub proposer: Address,
    /// Always equal to `approvers.len()`
    pub approval_count: u32,
    pub approvers: Vec<Address>,
    pub created_at: u64,
    pub earliest_execution_time: u64,
    pub expiry_time: u64,
    pub executed: bool,
}

/// Read-only view returned by `get_proposal_details`
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalDetails {
    pub kind: ProposalKind,
    pub target: ProposalTarget,
    pub role: Option<Symbol>,
    pub amount: Option<i128>,
    pub asset: Option<Address>,
    pub is_add: bool,
    pub approvals: u32,
    pub expiry_time: u64,
    pub execution_time: u64,
    pub executed: bool,
    pub caller_has_approved: bool,
}

/// One page of the proposal registry
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct PendingProposals {
    pub ids: Vec<BytesN<32>>,
    pub kinds: Vec<ProposalKind>,
    pub targets: Vec<ProposalTarget>,
    pub expiry_times: Vec<u64>,
    pub executed: Vec<bool>,
    pub total: u32,
}

/// Result of an approval call
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalReceipt {
    pub proposal_id: BytesN<32>,
    /// Approval count after the call; 0 when the proposal expired
    pub approvals: u32,
    /// The approval made the proposal executable and it executed inline
    pub execution_attempted: bool,
    /// The proposal had expired and was garbage-collected instead
    pub expired: bool,
}

/// Per-role quorum and value ceiling
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoleConfig {
    /// Minimum distinct approvals; below 2 means not configured
    pub quorum: u32,
    /// Largest amount a proposal of this role may carry; 0 means unlimited
    pub max_amount: i128,
}

/// Per-identity rate limiting state
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AdminTimeConfig {
    pub timelock_expiry: u64,
    pub last_activity: u64,
}

/// Engine-wide settings
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceConfig {
    /// Seconds from creation until a proposal expires
    pub proposal_timeout: u64,
    /// Seconds from creation until a proposal may execute
    pub min_execution_delay: u64,
    /// Upper bound for proposal amounts
    pub supply_cap: i128,
    /// Allocation collaborator for wallet proposals
    pub distribution: Option<Address>,
}
