use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::{
    constants::*, engine::deposit, errors::*, events::*, external::YieldVaultCpi, oracle, state::*,
};

/// Deposit base asset and open a position backed by yield-vault shares
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Depositor must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault and position PDAs validated with seeds
/// ✅ 3. MATH SAFETY: Checked share conversion at the live token price
/// ✅ 4. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 5. BUSINESS LOGIC: Checks-effects-interactions, minted shares confirmed
/// ✅ 6. EVENTS: Emits Deposited event
#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.base_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Depositor's ledger record, created on first deposit
    #[account(
        init_if_needed,
        payer = depositor,
        space = POSITION_SIZE,
        seeds = [POSITION_SEED, vault_state.key().as_ref(), depositor.key().as_ref()],
        bump
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
        constraint = depositor_base_account.mint == vault_state.base_mint @ VaultError::InvalidMint,
        constraint = depositor_base_account.owner == depositor.key() @ VaultError::InvalidOwner,
    )]
    pub depositor_base_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = vault_base_account.mint == vault_state.base_mint @ VaultError::InvalidMint,
        constraint = vault_base_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_base_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = vault_share_account.mint == vault_state.yield_share_mint @ VaultError::InvalidMint,
        constraint = vault_share_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_share_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: address pinned in vault state, layout checked by the oracle read
    #[account(mut, address = vault_state.yield_reserve)]
    pub yield_reserve: UncheckedAccount<'info>,

    /// CHECK: validated by the yield vault program
    #[account(mut)]
    pub yield_liquidity_supply: UncheckedAccount<'info>,

    #[account(mut, address = vault_state.yield_share_mint)]
    pub yield_share_mint: Box<Account<'info, Mint>>,

    /// CHECK: address pinned in vault state
    #[account(address = vault_state.yield_vault_program)]
    pub yield_vault_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    // CHECKS: Validate amount, read a fresh price, ledger must be backed
    require!(amount > 0, VaultError::InvalidAmount);

    let price = oracle::read_token_price(
        &ctx.accounts.yield_reserve.to_account_info(),
        &ctx.accounts.vault_state.yield_vault_program,
        &ctx.accounts.vault_state.yield_share_mint,
    )?;
    let shares_before = ctx.accounts.vault_share_account.amount;
    ctx.accounts.vault_state.assert_backed(shares_before)?;

    let reserve = ctx.accounts.vault_base_account.amount;
    let vault_key = ctx.accounts.vault_state.key();
    let depositor_key = ctx.accounts.depositor.key();
    let vault_state = &mut ctx.accounts.vault_state;
    let position = &mut ctx.accounts.position;

    if position.depositor == Pubkey::default() {
        position.set_inner(Position::new(
            vault_key,
            depositor_key,
            ctx.bumps.position,
            vault_state.reward_index,
        ));
    }

    // EFFECTS: Record the position BEFORE external calls
    let shares = deposit::open(vault_state, position, amount, price, reserve)?;

    // INTERACTIONS: Pull the deposit, then place it in the yield vault
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.depositor_base_account.to_account_info(),
            to: ctx.accounts.vault_base_account.to_account_info(),
            authority: ctx.accounts.depositor.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    let authority_bump = vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        vault_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let yield_vault = YieldVaultCpi {
        program: ctx.accounts.yield_vault_program.to_account_info(),
        reserve: ctx.accounts.yield_reserve.to_account_info(),
        share_mint: ctx.accounts.yield_share_mint.to_account_info(),
        liquidity_supply: ctx.accounts.yield_liquidity_supply.to_account_info(),
        base_account: ctx.accounts.vault_base_account.to_account_info(),
        share_account: ctx.accounts.vault_share_account.to_account_info(),
        owner: ctx.accounts.vault_authority.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
    };
    yield_vault.deposit(amount, signer_seeds)?;

    ctx.accounts.vault_share_account.reload()?;
    deposit::confirm_minted(
        vault_state,
        shares,
        shares_before,
        ctx.accounts.vault_share_account.amount,
    )?;

    emit!(Deposited {
        vault: vault_key,
        depositor: depositor_key,
        principal: amount,
        shares,
        price,
        total_shares: vault_state.total_shares,
        total_principal: vault_state.total_principal,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
