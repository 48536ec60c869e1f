use anchor_lang::prelude::*;

use crate::{
    errors::VaultError,
    state::{Position, VaultState},
};

/// Settle and zero the depositor's reward balance, returning what to pay.
///
/// Zero is a valid result: claiming with nothing owed is a no-op.
pub fn take_reward(vault: &mut VaultState, position: &mut Position) -> Result<u64> {
    position.settle(vault.reward_index)?;

    let amount = position.reward_balance;
    position.reward_balance = 0;

    vault.total_reward_claimed = vault
        .total_reward_claimed
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    Ok(amount)
}

/// Give back a reward taken by `take_reward` when the transfer fails.
pub fn restore_reward(vault: &mut VaultState, position: &mut Position, amount: u64) -> Result<()> {
    position.reward_balance = position
        .reward_balance
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    vault.total_reward_claimed = vault
        .total_reward_claimed
        .checked_sub(amount)
        .ok_or(VaultError::MathOverflow)?;

    Ok(())
}
