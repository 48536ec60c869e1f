use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, oracle, state::*};

/// Initialize a vault forwarding `base_mint` yield into `reward_mint`
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Authority must be signer and becomes the owner
/// ✅ 2. ACCOUNT OWNERSHIP: Vault and authority PDAs derived from seeds
/// ✅ 3. MATH SAFETY: Yield reserve must quote a non-zero price
/// ✅ 4. TOKEN ACCOUNT VALIDATION: Vault ATAs created for the authority PDA
/// ✅ 5. BUSINESS LOGIC: Collaborator programs and accounts pinned in state
/// ✅ 6. EVENTS: Emits VaultInitialized event
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault owner - the only identity allowed to harvest
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA, one per base asset
    #[account(
        init,
        payer = authority,
        space = VAULT_STATE_SIZE,
        seeds = [VAULT_SEED, base_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    pub base_mint: Box<Account<'info, Mint>>,

    pub reward_mint: Box<Account<'info, Mint>>,

    /// Share mint of the external yield vault
    pub yield_share_mint: Box<Account<'info, Mint>>,

    /// Vault authority PDA - owns every vault token account
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Base-asset reserve: deposit transit, redeem proceeds and harvestable surplus
    #[account(
        init,
        payer = authority,
        associated_token::mint = base_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_base_account: Box<Account<'info, TokenAccount>>,

    /// Yield shares held on behalf of all depositors
    #[account(
        init,
        payer = authority,
        associated_token::mint = yield_share_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_share_account: Box<Account<'info, TokenAccount>>,

    /// Harvested reward waiting to be claimed
    #[account(
        init,
        payer = authority,
        associated_token::mint = reward_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_reward_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: only stored; CPIs are checked against this key
    #[account(executable)]
    pub yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: owner checked here, layout checked by the oracle read
    #[account(owner = yield_vault_program.key() @ VaultError::InvalidYieldReserve)]
    pub yield_reserve: UncheckedAccount<'info>,

    /// CHECK: only stored; CPIs are checked against this key
    #[account(executable)]
    pub exchange_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    // CHECKS: the reserve must quote a usable price for this share mint
    oracle::read_token_price(
        &ctx.accounts.yield_reserve.to_account_info(),
        &ctx.accounts.yield_vault_program.key(),
        &ctx.accounts.yield_share_mint.key(),
    )?;

    let vault_key = ctx.accounts.vault_state.key();
    let vault_state = &mut ctx.accounts.vault_state;

    // EFFECTS: Initialize vault state
    vault_state.authority = ctx.accounts.authority.key();
    vault_state.base_mint = ctx.accounts.base_mint.key();
    vault_state.reward_mint = ctx.accounts.reward_mint.key();
    vault_state.yield_share_mint = ctx.accounts.yield_share_mint.key();
    vault_state.yield_vault_program = ctx.accounts.yield_vault_program.key();
    vault_state.yield_reserve = ctx.accounts.yield_reserve.key();
    vault_state.exchange_program = ctx.accounts.exchange_program.key();
    vault_state.total_shares = 0;
    vault_state.total_principal = 0;
    vault_state.reward_index = 0;
    vault_state.total_reward_harvested = 0;
    vault_state.total_reward_claimed = 0;
    vault_state.open_positions = 0;
    vault_state.last_harvest_ts = 0;
    vault_state.idle_reserve = 0;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 56];

    emit!(VaultInitialized {
        vault: vault_key,
        authority: vault_state.authority,
        base_mint: vault_state.base_mint,
        reward_mint: vault_state.reward_mint,
        yield_share_mint: vault_state.yield_share_mint,
        yield_vault_program: vault_state.yield_vault_program,
        exchange_program: vault_state.exchange_program,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
