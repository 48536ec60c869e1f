// Constants for the Yield Forwarder program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the PDA that owns the vault's token accounts
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for per-depositor position PDAs
pub const POSITION_SEED: &[u8] = b"position";

/// Fixed-point scale of the external vault's `token_price`
/// (base-asset units per yield share).
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Fixed-point scale of the reward-per-share index.
pub const REWARD_INDEX_SCALE: u128 = 1_000_000_000_000_000_000;

/// Space for VaultState account (8 discriminator + 7 * 32 pubkeys +
/// 8 total_shares + 8 total_principal + 16 reward_index +
/// 8 total_reward_harvested + 8 total_reward_claimed + 4 open_positions +
/// 8 last_harvest_ts + 8 idle_reserve + 1 bump + 1 authority_bump +
/// 56 padding)
pub const VAULT_STATE_SIZE: usize =
    8 + (7 * 32) + 8 + 8 + 16 + 8 + 8 + 4 + 8 + 8 + 1 + 1 + 56;

/// Space for Position account (8 discriminator + 32 vault + 32 depositor +
/// 8 principal + 8 shares + 8 reward_balance + 16 reward_index_snapshot +
/// 1 bump + 32 padding)
pub const POSITION_SIZE: usize = 8 + 32 + 32 + 8 + 8 + 8 + 16 + 1 + 32;
