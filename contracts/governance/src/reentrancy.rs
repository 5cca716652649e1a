use soroban_sdk::{BytesN, Env};

use crate::errors::GovernanceError;
use crate::types::GovernanceDataKey;

/// Holds the execution lock of one proposal until dropped.
pub struct ExecutionGuard<'a> {
    env: &'a Env,
    proposal_id: BytesN<32>,
}

impl<'a> ExecutionGuard<'a> {
    pub fn acquire(env: &'a Env, proposal_id: &BytesN<32>) -> Result<Self, GovernanceError> {
        let key = GovernanceDataKey::ExecutionLock(proposal_id.clone());
        if env.storage().temporary().has(&key) {
            return Err(GovernanceError::ExecutionInProgress);
        }
        env.storage().temporary().set(&key, &true);
        Ok(Self {
            env,
            proposal_id: proposal_id.clone(),
        })
    }
}

impl<'a> Drop for ExecutionGuard<'a> {
    fn drop(&mut self) {
        let key = GovernanceDataKey::ExecutionLock(self.proposal_id.clone());
        self.env.storage().temporary().remove(&key);
    }
}
