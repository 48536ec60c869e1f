use anchor_lang::prelude::*;

use super::Position;
use crate::{errors::VaultError, oracle};

/// Global vault state: configuration plus the pool side of the share ledger
///
/// Security considerations:
/// - Owner stored in state (not instruction args), checked with `has_one`
/// - Collaborator programs and accounts pinned at initialize
/// - `total_shares` must equal the vault's yield share balance between
///   instructions
#[account]
pub struct VaultState {
    /// Owner allowed to harvest
    pub authority: Pubkey,              // 32 bytes

    /// Mint of the asset users deposit
    pub base_mint: Pubkey,              // 32 bytes

    /// Mint of the asset harvested yield is paid in
    pub reward_mint: Pubkey,            // 32 bytes

    /// Mint of the external yield vault's shares
    pub yield_share_mint: Pubkey,       // 32 bytes

    /// External yield vault program
    pub yield_vault_program: Pubkey,    // 32 bytes

    /// External yield vault state account carrying `token_price`
    pub yield_reserve: Pubkey,          // 32 bytes

    /// Exchange program used to swap base asset into reward asset
    pub exchange_program: Pubkey,       // 32 bytes

    /// Σ Position.shares over all depositors
    pub total_shares: u64,              // 8 bytes

    /// Σ Position.principal over all depositors
    pub total_principal: u64,           // 8 bytes

    /// Reward units per share, scaled by REWARD_INDEX_SCALE
    pub reward_index: u128,             // 16 bytes

    /// Reward units credited by all harvests
    pub total_reward_harvested: u64,    // 8 bytes

    /// Reward units paid out by all claims
    pub total_reward_claimed: u64,      // 8 bytes

    /// Depositors currently holding shares
    pub open_positions: u32,            // 4 bytes

    pub last_harvest_ts: i64,           // 8 bytes

    /// Base reserve that arrived while no shares were open; never harvested
    pub idle_reserve: u64,              // 8 bytes

    /// Bump seed for vault state PDA
    pub bump: u8,                       // 1 byte

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,             // 1 byte

    pub _reserved: [u8; 56],            // 56 bytes
}

/// Shares and principal taken out of the ledger by `close_position`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClosedPosition {
    pub shares: u64,
    pub principal: u64,
}

impl VaultState {
    pub fn total_shares(&self) -> u64 {
        self.total_shares
    }

    /// Every ledger share must be held by the vault.
    ///
    /// Shares sent to the vault from outside the ledger are surplus and
    /// ignored.
    pub fn assert_backed(&self, yield_share_balance: u64) -> Result<()> {
        require!(
            yield_share_balance >= self.total_shares,
            VaultError::LedgerOutOfSync
        );
        Ok(())
    }

    /// Fence off whatever sits in the reserve when the pool is empty, so a
    /// new depositor cannot harvest yield earned while nobody held shares.
    pub fn fence_idle_reserve(&mut self, reserve: u64) {
        if self.total_shares == 0 {
            self.idle_reserve = reserve;
        }
    }

    /// Never fence more than the reserve actually holds.
    pub fn clamp_idle_reserve(&mut self, reserve: u64) {
        self.idle_reserve = self.idle_reserve.min(reserve);
    }

    /// Open a position worth `principal` at `price`
    ///
    /// shares = principal * PRICE_SCALE / price, rounded down.
    /// One open position per depositor; a second deposit before redeeming
    /// is rejected.
    pub fn open_position(
        &mut self,
        position: &mut Position,
        principal: u64,
        price: u128,
    ) -> Result<u64> {
        require!(principal > 0, VaultError::InvalidAmount);
        require!(!position.is_open(), VaultError::DuplicateOpenPosition);

        let shares = oracle::assets_to_shares(principal, price)?;
        require!(shares > 0, VaultError::InvalidAmount);

        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let total_principal = self
            .total_principal
            .checked_add(principal)
            .ok_or(VaultError::MathOverflow)?;
        let open_positions = self
            .open_positions
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;

        // Start accruing from the current index; reward earned by an earlier
        // position of this depositor is kept in `reward_balance`.
        position.settle(self.reward_index)?;
        position.principal = principal;
        position.shares = shares;

        self.total_shares = total_shares;
        self.total_principal = total_principal;
        self.open_positions = open_positions;

        Ok(shares)
    }

    /// Close a position, returning its shares and principal
    ///
    /// Pending reward is settled first so it survives the closure.
    pub fn close_position(&mut self, position: &mut Position) -> Result<ClosedPosition> {
        require!(position.is_open(), VaultError::NoRedeemableAmount);

        position.settle(self.reward_index)?;

        let closed = ClosedPosition {
            shares: position.shares,
            principal: position.principal,
        };
        position.shares = 0;
        position.principal = 0;

        self.total_shares = self
            .total_shares
            .checked_sub(closed.shares)
            .ok_or(VaultError::MathOverflow)?;
        self.total_principal = self
            .total_principal
            .checked_sub(closed.principal)
            .ok_or(VaultError::MathOverflow)?;
        self.open_positions = self
            .open_positions
            .checked_sub(1)
            .ok_or(VaultError::MathOverflow)?;

        Ok(closed)
    }

    /// Undo `close_position` after a failed interaction.
    pub fn restore_position(
        &mut self,
        position: &mut Position,
        closed: ClosedPosition,
    ) -> Result<()> {
        require!(!position.is_open(), VaultError::DuplicateOpenPosition);

        position.settle(self.reward_index)?;
        position.shares = closed.shares;
        position.principal = closed.principal;

        self.total_shares = self
            .total_shares
            .checked_add(closed.shares)
            .ok_or(VaultError::MathOverflow)?;
        self.total_principal = self
            .total_principal
            .checked_add(closed.principal)
            .ok_or(VaultError::MathOverflow)?;
        self.open_positions = self
            .open_positions
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;

        Ok(())
    }
}
