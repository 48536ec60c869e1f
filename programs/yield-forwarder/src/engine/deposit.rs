use anchor_lang::prelude::*;

use crate::{
    errors::VaultError,
    state::{Position, VaultState},
};

/// Record a deposit before any token moves, returning the shares attributed.
///
/// `reserve` is the vault's base balance before the deposit is pulled in.
pub fn open(
    vault: &mut VaultState,
    position: &mut Position,
    amount: u64,
    price: u128,
    reserve: u64,
) -> Result<u64> {
    vault.fence_idle_reserve(reserve);
    vault.open_position(position, amount, price)
}

/// The yield vault must have minted at least the shares just recorded.
pub fn confirm_minted(
    vault: &VaultState,
    shares: u64,
    balance_before: u64,
    balance_after: u64,
) -> Result<()> {
    let minted = balance_after
        .checked_sub(balance_before)
        .ok_or(VaultError::ExternalDepositFailed)?;
    require!(minted >= shares, VaultError::ExternalDepositFailed);
    vault.assert_backed(balance_after)
}
