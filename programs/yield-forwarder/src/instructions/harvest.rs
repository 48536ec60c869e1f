use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, engine::harvest, errors::*, events::*, external::ExchangeCpi, oracle, state::*};

/// Swap harvestable base asset into reward and credit it pro rata
///
/// Remaining accounts: the exchange route, forwarded as-is.
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Authority must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault PDA validated with seeds, has_one authority
/// ✅ 3. MATH SAFETY: Checked reward index arithmetic
/// ✅ 4. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 5. BUSINESS LOGIC: Shares snapshotted before the swap, slippage and deadline bounded
/// ✅ 6. EVENTS: Emits Harvested event
#[derive(Accounts)]
pub struct Harvest<'info> {
    /// Vault owner
    /// Security: Must be signer and match vault_state.authority
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.base_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.key().as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = vault_base_account.mint == vault_state.base_mint @ VaultError::InvalidMint,
        constraint = vault_base_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_base_account: Box<Account<'info, TokenAccount>>,

    #[account(
        constraint = vault_share_account.mint == vault_state.yield_share_mint @ VaultError::InvalidMint,
        constraint = vault_share_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = vault_reward_account.mint == vault_state.reward_mint @ VaultError::InvalidMint,
        constraint = vault_reward_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_reward_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: address pinned in vault state, layout checked by the oracle read
    #[account(address = vault_state.yield_reserve)]
    pub yield_reserve: UncheckedAccount<'info>,

    /// CHECK: address pinned in vault state
    #[account(address = vault_state.exchange_program)]
    pub exchange_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, Harvest<'info>>,
    min_reward_out: u64,
    deadline: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    // CHECKS: deadline, fresh price, ledger backed by holdings
    require!(now <= deadline, VaultError::DeadlineExpired);

    let price = oracle::read_token_price(
        &ctx.accounts.yield_reserve.to_account_info(),
        &ctx.accounts.vault_state.yield_vault_program,
        &ctx.accounts.vault_state.yield_share_mint,
    )?;
    ctx.accounts
        .vault_state
        .assert_backed(ctx.accounts.vault_share_account.amount)?;

    // Shares are snapshotted here; the distribution below uses this value
    let plan = harvest::plan(
        &ctx.accounts.vault_state,
        price,
        ctx.accounts.vault_base_account.amount,
    );

    let vault_key = ctx.accounts.vault_state.key();
    if plan.is_empty() {
        msg!("Nothing to harvest");
        emit!(Harvested {
            vault: vault_key,
            authority: ctx.accounts.authority.key(),
            price,
            base_in: 0,
            reward_out: 0,
            shares_snapshot: plan.shares_snapshot,
            reward_index: ctx.accounts.vault_state.reward_index,
            timestamp: now,
        });
        return Ok(());
    }

    // INTERACTIONS: swap base -> reward through the configured route
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        vault_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let reward_before = ctx.accounts.vault_reward_account.amount;

    let exchange = ExchangeCpi {
        program: ctx.accounts.exchange_program.to_account_info(),
        source: ctx.accounts.vault_base_account.to_account_info(),
        destination: ctx.accounts.vault_reward_account.to_account_info(),
        owner: ctx.accounts.vault_authority.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
        route: ctx.remaining_accounts.to_vec(),
    };
    exchange.swap_exact_input(plan.amount_in, min_reward_out, deadline, signer_seeds)?;

    ctx.accounts.vault_reward_account.reload()?;

    // EFFECTS: distribution needs the measured output, so it follows the swap
    let vault_state = &mut ctx.accounts.vault_state;
    let reward_out = harvest::complete(
        vault_state,
        &plan,
        reward_before,
        ctx.accounts.vault_reward_account.amount,
        min_reward_out,
        now,
    )?;

    ctx.accounts.vault_share_account.reload()?;
    vault_state.assert_backed(ctx.accounts.vault_share_account.amount)?;

    emit!(Harvested {
        vault: vault_key,
        authority: ctx.accounts.authority.key(),
        price,
        base_in: plan.amount_in,
        reward_out,
        shares_snapshot: plan.shares_snapshot,
        reward_index: vault_state.reward_index,
        timestamp: now,
    });

    Ok(())
}
