use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub base_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub yield_share_mint: Pubkey,
    pub yield_vault_program: Pubkey,
    pub exchange_program: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a depositor opens a position
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub depositor: Pubkey,
    pub principal: u64,
    pub shares: u64,
    pub price: u128,
    pub total_shares: u64,
    pub total_principal: u64,
    pub timestamp: i64,
}

/// Event emitted when the owner harvests yield into reward
#[event]
pub struct Harvested {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub price: u128,
    pub base_in: u64,
    pub reward_out: u64,
    pub shares_snapshot: u64,
    pub reward_index: u128,
    pub timestamp: i64,
}

/// Event emitted when a depositor redeems their principal
#[event]
pub struct Redeemed {
    pub vault: Pubkey,
    pub depositor: Pubkey,
    pub shares: u64,
    pub principal: u64,
    /// Value of the shares at `price`
    pub expected_proceeds: u64,
    pub proceeds: u64,
    /// Base asset sent to the depositor
    pub payout: u64,
    /// Appreciation swapped to reward for the depositor
    pub growth: u64,
    pub reward_out: u64,
    /// Reward still claimable after this redeem
    pub unclaimed_reward: u64,
    pub price: u128,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when a depositor claims reward
#[event]
pub struct Claimed {
    pub vault: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
