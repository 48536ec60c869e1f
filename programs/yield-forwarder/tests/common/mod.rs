//! Host-side harness for the Yield Forwarder engine
//!
//! Drives the same `engine` steps as the instruction handlers, in the same
//! order (checks, effects, interactions, then the post-CPI step fed with
//! measured balances) against in-memory collaborators: a yield vault that
//! mints and burns shares at a settable price, an exchange with a fixed
//! rate, and token balances. Collaborators can be told to fail or to call
//! back into the vault before doing their own work, which is how
//! re-entrancy is exercised.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use yield_forwarder::{
    constants::PRICE_SCALE,
    engine::{claim, deposit, harvest, redeem},
    errors::VaultError,
    oracle,
    state::{Position, VaultState},
};

/// 1.0 in base-asset decimals (6)
pub const ONE: u64 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Asset {
    Base,
    Share,
    Reward,
}

/// Call a collaborator makes back into the vault
#[derive(Clone, Copy, Debug)]
pub enum Reentry {
    Redeem(Pubkey),
    Claim(Pubkey),
}

pub struct Ledger {
    pub vault: VaultState,
    pub positions: BTreeMap<Pubkey, Position>,
}

pub struct Harness {
    pub owner: Pubkey,
    /// Stands in for the vault authority PDA that holds every vault balance
    pub custody: Pubkey,
    pub ledger: RefCell<Ledger>,
    balances: RefCell<BTreeMap<(Asset, Pubkey), u64>>,
    price: Cell<u128>,
    /// Reward units out per base unit in, as (numerator, denominator)
    swap_rate: Cell<(u64, u64)>,
    now: Cell<i64>,

    pub fail_yield_redeem: Cell<bool>,
    pub fail_swap: Cell<bool>,
    pub fail_reward_transfer: Cell<bool>,

    pub on_yield_redeem: Cell<Option<Reentry>>,
    pub on_swap: Cell<Option<Reentry>>,
    pub on_reward_transfer: Cell<Option<Reentry>>,
    pub reentry_results: RefCell<Vec<Result<u64>>>,
}

impl Harness {
    pub fn new() -> Self {
        let owner = Pubkey::new_unique();
        let vault = VaultState {
            authority: owner,
            base_mint: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            yield_share_mint: Pubkey::new_unique(),
            yield_vault_program: Pubkey::new_unique(),
            yield_reserve: Pubkey::new_unique(),
            exchange_program: Pubkey::new_unique(),
            total_shares: 0,
            total_principal: 0,
            reward_index: 0,
            total_reward_harvested: 0,
            total_reward_claimed: 0,
            open_positions: 0,
            last_harvest_ts: 0,
            idle_reserve: 0,
            bump: 255,
            authority_bump: 254,
            _reserved: [0; 56],
        };

        Self {
            owner,
            custody: Pubkey::new_unique(),
            ledger: RefCell::new(Ledger {
                vault,
                positions: BTreeMap::new(),
            }),
            balances: RefCell::new(BTreeMap::new()),
            price: Cell::new(PRICE_SCALE),
            swap_rate: Cell::new((1, 2_000)),
            now: Cell::new(1_700_000_000),
            fail_yield_redeem: Cell::new(false),
            fail_swap: Cell::new(false),
            fail_reward_transfer: Cell::new(false),
            on_yield_redeem: Cell::new(None),
            on_swap: Cell::new(None),
            on_reward_transfer: Cell::new(None),
            reentry_results: RefCell::new(Vec::new()),
        }
    }

    // -------------------------------------------------------------------------
    // Collaborator state
    // -------------------------------------------------------------------------

    pub fn set_price(&self, price: u128) {
        self.price.set(price);
    }

    pub fn set_swap_rate(&self, numerator: u64, denominator: u64) {
        self.swap_rate.set((numerator, denominator));
    }

    pub fn now(&self) -> i64 {
        self.now.get()
    }

    pub fn balance(&self, asset: Asset, holder: Pubkey) -> u64 {
        self.balances
            .borrow()
            .get(&(asset, holder))
            .copied()
            .unwrap_or(0)
    }

    pub fn mint(&self, asset: Asset, holder: Pubkey, amount: u64) {
        *self.balances.borrow_mut().entry((asset, holder)).or_insert(0) += amount;
    }

    fn burn(&self, asset: Asset, holder: Pubkey, amount: u64) -> Result<()> {
        let mut balances = self.balances.borrow_mut();
        let balance = balances.entry((asset, holder)).or_insert(0);
        *balance = balance
            .checked_sub(amount)
            .ok_or(ProgramError::InsufficientFunds)?;
        Ok(())
    }

    fn transfer(&self, asset: Asset, from: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
        self.burn(asset, from, amount)?;
        self.mint(asset, to, amount);
        Ok(())
    }

    /// Out-of-band yield paid straight into the vault's base reserve
    pub fn fund_reserve(&self, amount: u64) {
        self.mint(Asset::Base, self.custody, amount);
    }

    pub fn position(&self, depositor: Pubkey) -> Position {
        self.ledger
            .borrow()
            .positions
            .get(&depositor)
            .cloned()
            .unwrap_or_default()
    }

    pub fn claimable(&self, depositor: Pubkey) -> u64 {
        let index = self.ledger.borrow().vault.reward_index;
        self.position(depositor).claimable(index).unwrap()
    }

    pub fn total_shares(&self) -> u64 {
        self.ledger.borrow().vault.total_shares()
    }

    pub fn assert_backed(&self) -> Result<()> {
        let held = self.balance(Asset::Share, self.custody);
        self.ledger.borrow().vault.assert_backed(held)
    }

    fn fire(&self, hook: &Cell<Option<Reentry>>) {
        if let Some(reentry) = hook.take() {
            let result = match reentry {
                Reentry::Redeem(depositor) => self.redeem(depositor),
                Reentry::Claim(depositor) => self.claim(depositor),
            };
            self.reentry_results.borrow_mut().push(result);
        }
    }

    fn yield_deposit(&self, amount: u64) -> Result<()> {
        let shares = oracle::assets_to_shares(amount, self.price.get())?;
        self.burn(Asset::Base, self.custody, amount)?;
        self.mint(Asset::Share, self.custody, shares);
        Ok(())
    }

    fn yield_redeem(&self, shares: u64) -> Result<()> {
        self.fire(&self.on_yield_redeem);
        if self.fail_yield_redeem.get() {
            return Err(ProgramError::Custom(1).into());
        }
        let proceeds = oracle::shares_to_assets(shares, self.price.get())?;
        self.burn(Asset::Share, self.custody, shares)?;
        self.mint(Asset::Base, self.custody, proceeds);
        Ok(())
    }

    fn swap_exact_input(&self, amount_in: u64, min_amount_out: u64, deadline: i64) -> Result<()> {
        self.fire(&self.on_swap);
        if self.fail_swap.get() || self.now.get() > deadline {
            return Err(ProgramError::Custom(2).into());
        }
        let (numerator, denominator) = self.swap_rate.get();
        let amount_out = (amount_in as u128 * numerator as u128 / denominator as u128) as u64;
        if amount_out < min_amount_out {
            return Err(ProgramError::Custom(3).into());
        }
        self.burn(Asset::Base, self.custody, amount_in)?;
        self.mint(Asset::Reward, self.custody, amount_out);
        Ok(())
    }

    fn pay_reward(&self, to: Pubkey, amount: u64) -> Result<()> {
        self.fire(&self.on_reward_transfer);
        if self.fail_reward_transfer.get() {
            return Err(ProgramError::Custom(4).into());
        }
        self.transfer(Asset::Reward, self.custody, to, amount)
    }

    // -------------------------------------------------------------------------
    // Instruction flows
    // -------------------------------------------------------------------------

    pub fn deposit(&self, depositor: Pubkey, amount: u64) -> Result<u64> {
        // CHECKS
        require!(amount > 0, VaultError::InvalidAmount);
        let price = self.price.get();
        let shares_before = self.balance(Asset::Share, self.custody);
        self.ledger.borrow().vault.assert_backed(shares_before)?;
        let reserve = self.balance(Asset::Base, self.custody);

        // EFFECTS
        let shares = {
            let mut ledger = self.ledger.borrow_mut();
            let Ledger { vault, positions } = &mut *ledger;
            let index = vault.reward_index;
            let position = positions
                .entry(depositor)
                .or_insert_with(|| Position::new(Pubkey::default(), depositor, 255, index));
            deposit::open(vault, position, amount, price, reserve)?
        };

        // INTERACTIONS
        self.transfer(Asset::Base, depositor, self.custody, amount)?;
        self.yield_deposit(amount)?;

        let shares_after = self.balance(Asset::Share, self.custody);
        deposit::confirm_minted(&self.ledger.borrow().vault, shares, shares_before, shares_after)?;
        Ok(shares)
    }

    pub fn harvest(&self, caller: Pubkey, min_reward_out: u64, deadline: i64) -> Result<u64> {
        // CHECKS
        let authority = self.ledger.borrow().vault.authority;
        require_keys_eq!(caller, authority, VaultError::Unauthorized);
        require!(self.now.get() <= deadline, VaultError::DeadlineExpired);
        let price = self.price.get();
        self.assert_backed()?;

        let reserve = self.balance(Asset::Base, self.custody);
        let plan = harvest::plan(&self.ledger.borrow().vault, price, reserve);
        if plan.is_empty() {
            return Ok(0);
        }

        // INTERACTIONS
        let reward_before = self.balance(Asset::Reward, self.custody);
        self.swap_exact_input(plan.amount_in, min_reward_out, deadline)
            .map_err(|_| error!(VaultError::ExternalSwapFailed))?;
        let reward_after = self.balance(Asset::Reward, self.custody);

        // EFFECTS
        let reward_out = harvest::complete(
            &mut self.ledger.borrow_mut().vault,
            &plan,
            reward_before,
            reward_after,
            min_reward_out,
            self.now.get(),
        )?;

        self.assert_backed()?;
        Ok(reward_out)
    }

    /// Redeem with no slippage floor and a deadline one minute out
    pub fn redeem(&self, depositor: Pubkey) -> Result<u64> {
        self.redeem_with(depositor, 0, self.now.get() + 60)
    }

    pub fn redeem_with(&self, depositor: Pubkey, min_reward_out: u64, deadline: i64) -> Result<u64> {
        // CHECKS
        let is_open = self
            .ledger
            .borrow()
            .positions
            .get(&depositor)
            .map(Position::is_open)
            .unwrap_or(false);
        require!(is_open, VaultError::NoRedeemableAmount);
        let price = self.price.get();
        self.assert_backed()?;

        // EFFECTS
        let ticket = {
            let mut ledger = self.ledger.borrow_mut();
            let Ledger { vault, positions } = &mut *ledger;
            let position = positions
                .get_mut(&depositor)
                .ok_or(VaultError::NoRedeemableAmount)?;
            redeem::begin(vault, position, price)?
        };

        // INTERACTIONS
        let reserve_before = self.balance(Asset::Base, self.custody);
        if self.yield_redeem(ticket.closed.shares).is_err() {
            let mut ledger = self.ledger.borrow_mut();
            let Ledger { vault, positions } = &mut *ledger;
            let position = positions
                .get_mut(&depositor)
                .ok_or(VaultError::NoRedeemableAmount)?;
            redeem::abort(vault, position, &ticket)?;
            return err!(VaultError::ExternalRedeemFailed);
        }

        let reserve = self.balance(Asset::Base, self.custody);
        let outcome = redeem::settle(
            &mut self.ledger.borrow_mut().vault,
            &ticket,
            reserve.saturating_sub(reserve_before),
            reserve,
        )?;
        self.transfer(Asset::Base, self.custody, depositor, outcome.payout)?;

        if outcome.growth > 0 {
            require!(self.now.get() <= deadline, VaultError::DeadlineExpired);

            let reward_before = self.balance(Asset::Reward, self.custody);
            self.swap_exact_input(outcome.growth, min_reward_out, deadline)
                .map_err(|_| error!(VaultError::ExternalSwapFailed))?;
            let reward_after = self.balance(Asset::Reward, self.custody);

            let mut ledger = self.ledger.borrow_mut();
            let Ledger { vault, positions } = &mut *ledger;
            let position = positions
                .get_mut(&depositor)
                .ok_or(VaultError::NoRedeemableAmount)?;
            redeem::credit_growth(vault, position, reward_before, reward_after, min_reward_out)?;
        }

        self.assert_backed()?;
        Ok(outcome.payout)
    }

    pub fn claim(&self, depositor: Pubkey) -> Result<u64> {
        // EFFECTS
        let amount = {
            let mut ledger = self.ledger.borrow_mut();
            let Ledger { vault, positions } = &mut *ledger;
            match positions.get_mut(&depositor) {
                Some(position) => claim::take_reward(vault, position)?,
                None => 0,
            }
        };
        if amount == 0 {
            return Ok(0);
        }

        // INTERACTIONS
        if let Err(err) = self.pay_reward(depositor, amount) {
            let mut ledger = self.ledger.borrow_mut();
            let Ledger { vault, positions } = &mut *ledger;
            if let Some(position) = positions.get_mut(&depositor) {
                claim::restore_reward(vault, position, amount)?;
            }
            return Err(err);
        }

        Ok(amount)
    }
}
