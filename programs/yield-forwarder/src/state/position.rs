use anchor_lang::prelude::*;

use crate::{constants::REWARD_INDEX_SCALE, errors::VaultError};

/// One depositor's record in the share ledger
///
/// Keyed by `[POSITION_SEED, vault, depositor]`. The account outlives the
/// open position: `shares` and `principal` are cleared on redeem while
/// `reward_balance` stays claimable.
#[account]
#[derive(Default)]
pub struct Position {
    /// Vault this position belongs to
    pub vault: Pubkey,              // 32 bytes

    /// Owner of the position
    pub depositor: Pubkey,          // 32 bytes

    /// Base-asset amount deposited for the open position
    pub principal: u64,             // 8 bytes

    /// Yield-vault shares attributed at deposit time
    pub shares: u64,                // 8 bytes

    /// Settled reward-asset units owed to the depositor
    pub reward_balance: u64,        // 8 bytes

    /// Vault reward index at the last settlement
    pub reward_index_snapshot: u128, // 16 bytes

    /// Bump seed for position PDA
    pub bump: u8,                   // 1 byte

    pub _reserved: [u8; 32],        // 32 bytes
}

impl Position {
    pub fn new(vault: Pubkey, depositor: Pubkey, bump: u8, reward_index: u128) -> Self {
        Self {
            vault,
            depositor,
            reward_index_snapshot: reward_index,
            bump,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.shares > 0
    }

    /// Reward accrued since the last settlement: `shares * Δindex / SCALE`
    pub fn pending_reward(&self, reward_index: u128) -> Result<u64> {
        let delta = reward_index
            .checked_sub(self.reward_index_snapshot)
            .ok_or(error!(VaultError::MathOverflow))?;

        let accrued = (self.shares as u128)
            .checked_mul(delta)
            .ok_or(error!(VaultError::MathOverflow))?
            .checked_div(REWARD_INDEX_SCALE)
            .ok_or(error!(VaultError::DivisionByZero))?;

        u64::try_from(accrued).map_err(|_| error!(VaultError::MathOverflow))
    }

    /// Move pending reward into `reward_balance` and advance the snapshot.
    pub fn settle(&mut self, reward_index: u128) -> Result<u64> {
        let accrued = self.pending_reward(reward_index)?;

        self.reward_balance = self
            .reward_balance
            .checked_add(accrued)
            .ok_or(error!(VaultError::MathOverflow))?;
        self.reward_index_snapshot = reward_index;

        Ok(accrued)
    }

    /// Settled plus pending reward, without mutating the record
    pub fn claimable(&self, reward_index: u128) -> Result<u64> {
        self.reward_balance
            .checked_add(self.pending_reward(reward_index)?)
            .ok_or(error!(VaultError::MathOverflow))
    }
}
