use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, log, symbol_short, Address,
    Env, Symbol,
};

// ── Error type ────────────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DistributionError {
    AlreadyInitialised = 1,
    NotInitialised = 2,
    Unauthorised = 3,
    AmountNotPositive = 4,
    AllocationExists = 5,
    AllocationNotFound = 6,
    Overflow = 7,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct WalletAddedEvent {
    pub wallet: Address,
    pub asset: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct WalletRemovedEvent {
    pub wallet: Address,
    pub asset: Address,
    pub amount: i128,
}

// ── Constants ─────────────────────────────────────────────────────────────────

const GOVERNANCE_KEY: Symbol = symbol_short!("GOV");

// ── Storage types ─────────────────────────────────────────────────────────────

#[contracttype]
pub enum DataKey {
    Allocation(Address, Address),
    TotalAllocated(Address),
}

/// Allocation bookkeeping for vesting and airdrop distributions.
///
/// Wallet allocations are only mutated by the governance engine after a
/// WalletAdd / WalletRemove proposal has executed. Release schedules are
/// computed by the vesting module from these allocations.
#[contract]
pub struct DistributionContract;

#[contractimpl]
impl DistributionContract {
    pub fn init(env: Env, governance: Address) -> Result<(), DistributionError> {
        if env.storage().instance().has(&GOVERNANCE_KEY) {
            return Err(DistributionError::AlreadyInitialised);
        }
        env.storage().instance().set(&GOVERNANCE_KEY, &governance);
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn load_governance(env: &Env) -> Result<Address, DistributionError> {
        env.storage()
            .instance()
            .get(&GOVERNANCE_KEY)
            .ok_or(DistributionError::NotInitialised)
    }

    fn require_governance(env: &Env, caller: &Address) -> Result<(), DistributionError> {
        caller.require_auth();
        if *caller != Self::load_governance(env)? {
            return Err(DistributionError::Unauthorised);
        }
        Ok(())
    }

    fn set_total(env: &Env, asset: &Address, total: i128) {
        env.storage()
            .persistent()
            .set(&DataKey::TotalAllocated(asset.clone()), &total);
    }

    // ── Governance-driven mutations ───────────────────────────────────────────

    /// Records a new allocation of `amount` of `asset` for `wallet`.
    pub fn add_wallet(
        env: Env,
        caller: Address,
        wallet: Address,
        asset: Address,
        amount: i128,
    ) -> Result<(), DistributionError> {
        Self::require_governance(&env, &caller)?;
        if amount <= 0 {
            return Err(DistributionError::AmountNotPositive);
        }
        let key = DataKey::Allocation(wallet.clone(), asset.clone());
        if env.storage().persistent().has(&key) {
            return Err(DistributionError::AllocationExists);
        }

        let total = Self::total_allocated(env.clone(), asset.clone())
            .checked_add(amount)
            .ok_or(DistributionError::Overflow)?;
        env.storage().persistent().set(&key, &amount);
        Self::set_total(&env, &asset, total);

        WalletAddedEvent {
            wallet: wallet.clone(),
            asset,
            amount,
        }
        .publish(&env);
        log!(&env, "add_wallet {} amount={}", wallet, amount);
        Ok(())
    }

    /// Drops the allocation of `asset` for `wallet`.
    pub fn remove_wallet(
        env: Env,
        caller: Address,
        wallet: Address,
        asset: Address,
    ) -> Result<(), DistributionError> {
        Self::require_governance(&env, &caller)?;
        let key = DataKey::Allocation(wallet.clone(), asset.clone());
        let amount: i128 = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(DistributionError::AllocationNotFound)?;

        env.storage().persistent().remove(&key);
        let total = Self::total_allocated(env.clone(), asset.clone()) - amount;
        Self::set_total(&env, &asset, total);

        WalletRemovedEvent {
            wallet: wallet.clone(),
            asset,
            amount,
        }
        .publish(&env);
        log!(&env, "remove_wallet {} amount={}", wallet, amount);
        Ok(())
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    pub fn allocation(env: Env, wallet: Address, asset: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Allocation(wallet, asset))
            .unwrap_or(0)
    }

    pub fn total_allocated(env: Env, asset: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::TotalAllocated(asset))
            .unwrap_or(0)
    }

    pub fn get_governance(env: Env) -> Result<Address, DistributionError> {
        Self::load_governance(&env)
    }
}
