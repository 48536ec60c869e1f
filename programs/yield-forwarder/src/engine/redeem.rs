use anchor_lang::prelude::*;

use crate::{
    constants::PRICE_SCALE,
    engine::harvest,
    errors::VaultError,
    oracle,
    state::{ClosedPosition, Position, VaultState},
};

/// A closed position waiting for the external redeem and the payout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedeemTicket {
    pub closed: ClosedPosition,
    pub price: u128,
}

impl RedeemTicket {
    /// Base asset the closed shares are worth at the redeem price
    pub fn expected_proceeds(&self) -> Result<u64> {
        oracle::shares_to_assets(self.closed.shares, self.price)
    }
}

/// How the base asset returned for one depositor's shares is split
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedeemOutcome {
    /// Base asset attributed to the redeemed shares
    pub proceeds: u64,
    /// Paid to the depositor in base asset
    pub payout: u64,
    /// The depositor's own appreciation, swapped to reward on their behalf
    pub growth: u64,
}

/// Take the depositor's shares out of the ledger before any CPI.
pub fn begin(
    vault: &mut VaultState,
    position: &mut Position,
    price: u128,
) -> Result<RedeemTicket> {
    let closed = vault.close_position(position)?;
    Ok(RedeemTicket { closed, price })
}

/// Largest shortfall the reserve covers: the flooring of both share
/// conversions, worth at most one share plus one unit.
pub fn rounding_allowance(price: u128) -> Result<u64> {
    let one_share = price.div_ceil(PRICE_SCALE);
    u64::try_from(one_share)
        .ok()
        .and_then(|units| units.checked_add(1))
        .ok_or(error!(VaultError::MathOverflow))
}

/// Split what the external vault returned for the closed shares
///
/// `received` is the measured increase of the base reserve across the
/// external redeem and `reserve` the balance after it. Only the depositor's
/// own proceeds back the payout:
/// - at or above principal: principal is paid, the rest is their growth;
/// - short by rounding only: the reserve tops it up to principal;
/// - short by a real price loss: the proceeds are paid as they are.
pub fn settle(
    vault: &mut VaultState,
    ticket: &RedeemTicket,
    received: u64,
    reserve: u64,
) -> Result<RedeemOutcome> {
    let proceeds = received.min(ticket.expected_proceeds()?);
    let principal = ticket.closed.principal;

    let (payout, growth) = if proceeds >= principal {
        (principal, proceeds - principal)
    } else if principal - proceeds <= rounding_allowance(ticket.price)? && reserve >= principal {
        (principal, 0)
    } else {
        (proceeds, 0)
    };
    require!(reserve >= payout, VaultError::InsufficientReserve);

    vault.clamp_idle_reserve(reserve.saturating_sub(payout).saturating_sub(growth));

    Ok(RedeemOutcome {
        proceeds,
        payout,
        growth,
    })
}

/// Credit the reward bought with the depositor's growth to that depositor.
pub fn credit_growth(
    vault: &mut VaultState,
    position: &mut Position,
    reward_before: u64,
    reward_after: u64,
    min_reward_out: u64,
) -> Result<u64> {
    let reward_out = reward_after
        .checked_sub(reward_before)
        .ok_or(VaultError::MathOverflow)?;
    harvest::check_output(reward_out, min_reward_out)?;

    position.reward_balance = position
        .reward_balance
        .checked_add(reward_out)
        .ok_or(VaultError::MathOverflow)?;
    vault.total_reward_harvested = vault
        .total_reward_harvested
        .checked_add(reward_out)
        .ok_or(VaultError::MathOverflow)?;

    Ok(reward_out)
}

/// Put the shares back when the external redeem fails.
pub fn abort(vault: &mut VaultState, position: &mut Position, ticket: &RedeemTicket) -> Result<()> {
    vault.restore_position(position, ticket.closed)
}
