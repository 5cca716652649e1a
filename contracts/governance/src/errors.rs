use soroban_sdk::contracterror;

/// Errors that can occur during governance operations
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GovernanceError {
    /// Caller does not hold the admin role
    Unauthorized = 1,
    /// Engine has already been initialized
    AlreadyInitialized = 2,
    /// Engine has not been initialized
    NotInitialized = 3,
    /// Caller is still inside their personal timelock
    TimeLockActive = 4,
    /// Quorum below the minimum, above the admin count, or not configured
    InvalidQuorum = 5,
    /// Revocation would breach the admin floor
    MinimumRoleCount = 6,
    /// An active proposal already exists for this (target, kind)
    DuplicateProposal = 7,
    /// Proposal not found
    ProposalNotFound = 8,
    /// Caller already approved this proposal
    AlreadyApproved = 9,
    /// Proposal already executed
    AlreadyExecuted = 10,
    /// Proposal expired
    ProposalExpired = 11,
    /// Not enough approvals for the proposal's role
    InsufficientApprovals = 12,
    /// Earliest execution time not reached
    ExecutionDelayNotMet = 13,
    /// Page size above the maximum
    LimitTooHigh = 14,
    /// Proposal fields do not match its kind
    InvalidProposal = 15,
    /// Amount is not positive or exceeds the supply cap
    InvalidAmount = 16,
    /// Amount exceeds the per-role ceiling
    AmountExceedsRoleLimit = 17,
    /// Target already holds the role
    RoleAlreadyGranted = 18,
    /// Target does not hold the role
    RoleNotGranted = 19,
    /// Wallet already has an allocation for the asset
    AllocationExists = 20,
    /// Wallet has no allocation for the asset
    AllocationNotFound = 21,
    /// No distribution contract configured
    CollaboratorNotSet = 22,
    /// Proposal is already being executed
    ExecutionInProgress = 23,
    /// Upgrade proposals are consumed by the upgrade gate only
    UpgradeRequiresGate = 24,
    /// Invalid configuration value
    InvalidConfig = 25,
    /// Contract balance too low for the recovery
    InsufficientBalance = 26,
}

/// Coarse classification used by callers to decide whether to retry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Caller lacks the role or is timelocked. Never retried automatically.
    Authorization,
    /// The requested transition is not possible from the current state.
    State,
    /// Expected to resolve with time or further approvals.
    Temporal,
    /// The action would break a registry invariant.
    Invariant,
}

impl GovernanceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GovernanceError::Unauthorized | GovernanceError::TimeLockActive => {
                ErrorCategory::Authorization
            }
            GovernanceError::ProposalExpired
            | GovernanceError::ExecutionDelayNotMet
            | GovernanceError::InsufficientApprovals => ErrorCategory::Temporal,
            GovernanceError::InvalidQuorum
            | GovernanceError::MinimumRoleCount
            | GovernanceError::InvalidConfig => ErrorCategory::Invariant,
            _ => ErrorCategory::State,
        }
    }

    /// True for readiness failures that leave an approved proposal pending
    /// rather than failing the approval that observed them.
    pub fn defers_execution(&self) -> bool {
        matches!(
            self,
            GovernanceError::InsufficientApprovals
                | GovernanceError::ExecutionDelayNotMet
                | GovernanceError::InvalidQuorum
                | GovernanceError::UpgradeRequiresGate
        )
    }
}
