// Yield Forwarder - pooled deposits parked in an external yield vault,
// with harvested yield paid out in a separate reward asset.
// Security: checks-effects-interactions on every path that calls out.

use anchor_lang::prelude::*;

pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod external;
pub mod instructions;
pub mod oracle;
pub mod state;

use instructions::*;

declare_id!("GGPNEDZT2rjoB4dEwtD6XR7RT5bj62cy1w8RbjyV57yW");

#[program]
pub mod yield_forwarder {
    use super::*;

    /// Initialize a vault for a base asset, reward asset and yield vault
    ///
    /// Security considerations:
    /// - Owner is the signer, stored in state
    /// - Yield reserve must be owned by the yield vault program and quote a price
    /// - Token accounts are ATAs of the vault authority PDA
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// Deposit base asset and open a position
    ///
    /// Security considerations:
    /// - Price read fresh from the yield reserve
    /// - Position recorded before the transfer and yield vault CPI
    /// - Ledger re-checked against the share balance afterwards
    /// - One open position per depositor
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Swap harvestable yield into reward and credit depositors pro rata
    ///
    /// Security considerations:
    /// - Owner-only (has_one constraint)
    /// - `min_reward_out` and `deadline` bound the swap
    /// - Never touches depositor shares
    pub fn harvest<'info>(
        ctx: Context<'_, '_, '_, 'info, Harvest<'info>>,
        min_reward_out: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::harvest::handler(ctx, min_reward_out, deadline)
    }

    /// Redeem the caller's position and pay back the principal
    ///
    /// Security considerations:
    /// - Scoped to the signer's own position PDA
    /// - Position closed before the yield vault CPI
    /// - Paid from the caller's own proceeds; a price loss beyond rounding
    ///   is not covered by the pool
    /// - `min_reward_out` and `deadline` bound the swap of the caller's growth
    pub fn redeem<'info>(
        ctx: Context<'_, '_, '_, 'info, Redeem<'info>>,
        min_reward_out: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::redeem::handler(ctx, min_reward_out, deadline)
    }

    /// Pay out the caller's accrued reward
    ///
    /// Security considerations:
    /// - Scoped to the signer's own position PDA
    /// - Balance zeroed before the transfer; zero balance is a no-op
    pub fn claim(ctx: Context<Claim>) -> Result<()> {
        instructions::claim::handler(ctx)
    }
}
