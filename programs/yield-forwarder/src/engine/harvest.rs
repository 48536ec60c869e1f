use anchor_lang::prelude::*;

use crate::{constants::REWARD_INDEX_SCALE, errors::VaultError, state::VaultState};

/// What a harvest will swap, fixed before any external call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarvestPlan {
    pub price: u128,
    /// Base-asset units taken from the reserve and swapped to reward
    pub amount_in: u64,
    /// `total_shares` at the start of the harvest; reward is split over this
    pub shares_snapshot: u64,
}

impl HarvestPlan {
    pub fn is_empty(&self) -> bool {
        self.amount_in == 0 || self.shares_snapshot == 0
    }
}

/// Base-asset yield waiting in the reserve for the current holders
///
/// Share appreciation is not included: it belongs to each depositor and is
/// realized at their redeem. What sits in the reserve is out-of-band yield
/// and redeem dust, minus the fenced idle part.
pub fn harvestable(vault: &VaultState, reserve: u64) -> u64 {
    reserve.saturating_sub(vault.idle_reserve)
}

pub fn plan(vault: &VaultState, price: u128, reserve: u64) -> HarvestPlan {
    HarvestPlan {
        price,
        amount_in: harvestable(vault, reserve),
        shares_snapshot: vault.total_shares,
    }
}

pub fn check_output(reward_out: u64, min_reward_out: u64) -> Result<()> {
    require!(reward_out >= min_reward_out, VaultError::SlippageExceeded);
    Ok(())
}

/// Credit `reward_out` pro rata to every share in the snapshot
///
/// Each position later accrues `shares * Δindex / SCALE`; the remainder of
/// both divisions stays in the vault unattributed.
pub fn distribute(
    vault: &mut VaultState,
    plan: &HarvestPlan,
    reward_out: u64,
    now: i64,
) -> Result<u128> {
    require!(plan.shares_snapshot > 0, VaultError::DivisionByZero);

    let delta = (reward_out as u128)
        .checked_mul(REWARD_INDEX_SCALE)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(plan.shares_snapshot as u128)
        .ok_or(error!(VaultError::DivisionByZero))?;

    vault.reward_index = vault
        .reward_index
        .checked_add(delta)
        .ok_or(error!(VaultError::MathOverflow))?;
    vault.total_reward_harvested = vault
        .total_reward_harvested
        .checked_add(reward_out)
        .ok_or(error!(VaultError::MathOverflow))?;
    vault.last_harvest_ts = now;

    Ok(delta)
}

/// Finish a harvest from the reward balance measured around the swap.
pub fn complete(
    vault: &mut VaultState,
    plan: &HarvestPlan,
    reward_before: u64,
    reward_after: u64,
    min_reward_out: u64,
    now: i64,
) -> Result<u64> {
    let reward_out = reward_after
        .checked_sub(reward_before)
        .ok_or(VaultError::MathOverflow)?;
    check_output(reward_out, min_reward_out)?;
    distribute(vault, plan, reward_out, now)?;
    Ok(reward_out)
}
