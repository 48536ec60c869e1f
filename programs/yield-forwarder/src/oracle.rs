use anchor_lang::prelude::*;

use crate::{constants::PRICE_SCALE, errors::VaultError};

/// Leading fields of the external yield vault's reserve account, after the
/// 8-byte discriminator. Trailing fields are ignored.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct YieldReserveQuote {
    pub base_mint: Pubkey,
    pub share_mint: Pubkey,
    /// Base-asset units per share, scaled by PRICE_SCALE
    pub token_price: u128,
}

/// Read the current `token_price` from the yield vault's reserve account
///
/// Never cached: every deposit, harvest and redeem reads it again.
pub fn read_token_price(
    reserve: &AccountInfo,
    yield_vault_program: &Pubkey,
    share_mint: &Pubkey,
) -> Result<u128> {
    require_keys_eq!(
        *reserve.owner,
        *yield_vault_program,
        VaultError::InvalidYieldReserve
    );

    let data = reserve.try_borrow_data()?;
    let quote = decode_quote(&data)?;

    require_keys_eq!(quote.share_mint, *share_mint, VaultError::InvalidYieldReserve);
    require!(quote.token_price > 0, VaultError::InvalidPrice);

    Ok(quote.token_price)
}

pub fn decode_quote(data: &[u8]) -> Result<YieldReserveQuote> {
    require!(data.len() > 8, VaultError::InvalidYieldReserve);

    let mut body = &data[8..];
    YieldReserveQuote::deserialize(&mut body).map_err(|_| error!(VaultError::InvalidYieldReserve))
}

/// shares = assets * PRICE_SCALE / price, rounded down
pub fn assets_to_shares(assets: u64, price: u128) -> Result<u64> {
    require!(price > 0, VaultError::InvalidPrice);

    let shares = (assets as u128)
        .checked_mul(PRICE_SCALE)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(price)
        .ok_or(error!(VaultError::DivisionByZero))?;

    u64::try_from(shares).map_err(|_| error!(VaultError::MathOverflow))
}

/// assets = shares * price / PRICE_SCALE, rounded down
pub fn shares_to_assets(shares: u64, price: u128) -> Result<u64> {
    let assets = (shares as u128)
        .checked_mul(price)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(PRICE_SCALE)
        .ok_or(error!(VaultError::DivisionByZero))?;

    u64::try_from(assets).map_err(|_| error!(VaultError::MathOverflow))
}
