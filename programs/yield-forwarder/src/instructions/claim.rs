use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{constants::*, engine::claim, errors::*, events::*, state::*};

/// Pay out the caller's accrued reward
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Depositor must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Position PDA seeded by the signer, has_one depositor
/// ✅ 3. MATH SAFETY: Checked reward settlement
/// ✅ 4. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 5. BUSINESS LOGIC: Balance zeroed before the transfer
/// ✅ 6. EVENTS: Emits Claimed event
#[derive(Accounts)]
pub struct Claim<'info> {
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.base_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, vault_state.key().as_ref(), depositor.key().as_ref()],
        bump = position.bump,
        has_one = depositor @ VaultError::Unauthorized,
    )]
    pub position: Box<Account<'info, Position>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.key().as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = vault_reward_account.mint == vault_state.reward_mint @ VaultError::InvalidMint,
        constraint = vault_reward_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = depositor_reward_account.mint == vault_state.reward_mint @ VaultError::InvalidMint,
        constraint = depositor_reward_account.owner == depositor.key() @ VaultError::InvalidOwner,
    )]
    pub depositor_reward_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Claim>) -> Result<()> {
    let vault_key = ctx.accounts.vault_state.key();
    let vault_state = &mut ctx.accounts.vault_state;
    let position = &mut ctx.accounts.position;

    // EFFECTS: zero the balance before the transfer
    let amount = claim::take_reward(vault_state, position)?;
    if amount == 0 {
        msg!("Nothing to claim");
        return Ok(());
    }

    // INTERACTIONS
    let authority_bump = vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        vault_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_reward_account.to_account_info(),
            to: ctx.accounts.depositor_reward_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(Claimed {
        vault: vault_key,
        depositor: ctx.accounts.depositor.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
