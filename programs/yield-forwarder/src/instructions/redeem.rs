use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    engine::redeem,
    errors::*,
    events::*,
    external::{ExchangeCpi, YieldVaultCpi},
    oracle,
    state::*,
};

/// Redeem the caller's shares and pay back their principal
///
/// Appreciation on the caller's own shares is swapped to reward and
/// credited to their position. Remaining accounts: the exchange route.
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Depositor must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Position PDA seeded by the signer, has_one depositor
/// ✅ 3. MATH SAFETY: Checked conversion of the closed shares at the live price
/// ✅ 4. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 5. BUSINESS LOGIC: Position closed before any CPI, payout backed by own proceeds
/// ✅ 6. EVENTS: Emits Redeemed event
#[derive(Accounts)]
pub struct Redeem<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.base_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Security: seeds and has_one scope the call to the signer's own record
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

    #[account(
        mut,
        constraint = vault_reward_account.mint == vault_state.reward_mint @ VaultError::InvalidMint,
        constraint = vault_reward_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_reward_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: address pinned in vault state
    #[account(address = vault_state.exchange_program)]
    pub exchange_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, Redeem<'info>>,
    min_reward_out: u64,
    deadline: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    // CHECKS
    require!(ctx.accounts.position.is_open(), VaultError::NoRedeemableAmount);

    let price = oracle::read_token_price(
        &ctx.accounts.yield_reserve.to_account_info(),
        &ctx.accounts.vault_state.yield_vault_program,
        &ctx.accounts.vault_state.yield_share_mint,
    )?;
    ctx.accounts
        .vault_state
        .assert_backed(ctx.accounts.vault_share_account.amount)?;

    let vault_key = ctx.accounts.vault_state.key();
    let vault_state = &mut ctx.accounts.vault_state;
    let position = &mut ctx.accounts.position;

    // EFFECTS: close the position BEFORE the yield vault gets control
    let ticket = redeem::begin(vault_state, position, price)?;

    // INTERACTIONS
    let authority_bump = vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        vault_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let reserve_before = ctx.accounts.vault_base_account.amount;

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
    // A failed CPI aborts the transaction, which also reverts the closure
    yield_vault.redeem(ticket.closed.shares, signer_seeds)?;

    ctx.accounts.vault_base_account.reload()?;
    let reserve = ctx.accounts.vault_base_account.amount;
    let outcome = redeem::settle(
        vault_state,
        &ticket,
        reserve.saturating_sub(reserve_before),
        reserve,
    )?;

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_base_account.to_account_info(),
            to: ctx.accounts.depositor_base_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, outcome.payout)?;

    // The depositor's own appreciation becomes their reward
    let mut reward_out = 0;
    if outcome.growth > 0 {
        require!(now <= deadline, VaultError::DeadlineExpired);

        let reward_before = ctx.accounts.vault_reward_account.amount;
        let exchange = ExchangeCpi {
            program: ctx.accounts.exchange_program.to_account_info(),
            source: ctx.accounts.vault_base_account.to_account_info(),
            destination: ctx.accounts.vault_reward_account.to_account_info(),
            owner: ctx.accounts.vault_authority.to_account_info(),
            token_program: ctx.accounts.token_program.to_account_info(),
            route: ctx.remaining_accounts.to_vec(),
        };
        exchange.swap_exact_input(outcome.growth, min_reward_out, deadline, signer_seeds)?;

        ctx.accounts.vault_reward_account.reload()?;
        reward_out = redeem::credit_growth(
            vault_state,
            position,
            reward_before,
            ctx.accounts.vault_reward_account.amount,
            min_reward_out,
        )?;
    }

    ctx.accounts.vault_share_account.reload()?;
    vault_state.assert_backed(ctx.accounts.vault_share_account.amount)?;

    emit!(Redeemed {
        vault: vault_key,
        depositor: ctx.accounts.depositor.key(),
        shares: ticket.closed.shares,
        principal: ticket.closed.principal,
        expected_proceeds: ticket.expected_proceeds()?,
        proceeds: outcome.proceeds,
        payout: outcome.payout,
        growth: outcome.growth,
        reward_out,
        unclaimed_reward: position.claimable(vault_state.reward_index)?,
        price,
        total_shares: vault_state.total_shares,
        timestamp: now,
    });

    Ok(())
}
