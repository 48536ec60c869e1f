use anchor_lang::prelude::*;
use anchor_lang::solana_program::{instruction::Instruction, program::invoke_signed};

use super::{DEPOSIT_DISCRIMINATOR, REDEEM_DISCRIMINATOR};
use crate::errors::VaultError;

/// Accounts for the yield vault's `deposit` and `redeem` instructions
///
/// Both take the same account list:
/// reserve, share mint, liquidity supply, owner's base account,
/// owner's share account, owner (signer), token program.
pub struct YieldVaultCpi<'info> {
    pub program: AccountInfo<'info>,
    pub reserve: AccountInfo<'info>,
    pub share_mint: AccountInfo<'info>,
    pub liquidity_supply: AccountInfo<'info>,
    pub base_account: AccountInfo<'info>,
    pub share_account: AccountInfo<'info>,
    pub owner: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

impl<'info> YieldVaultCpi<'info> {
    /// Move `amount` base asset into the yield vault and mint shares to the owner
    pub fn deposit(&self, amount: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        self.invoke(DEPOSIT_DISCRIMINATOR, amount, signer_seeds)
            .map_err(|_| error!(VaultError::ExternalDepositFailed))
    }

    /// Burn `shares` and return their base-asset value at the current price
    pub fn redeem(&self, shares: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        self.invoke(REDEEM_DISCRIMINATOR, shares, signer_seeds)
            .map_err(|_| error!(VaultError::ExternalRedeemFailed))
    }

    fn invoke(
        &self,
        discriminator: [u8; 8],
        amount: u64,
        signer_seeds: &[&[&[u8]]],
    ) -> std::result::Result<(), ProgramError> {
        let mut data = discriminator.to_vec();
        data.extend_from_slice(&amount.to_le_bytes());

        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.reserve.key(), false),
                AccountMeta::new(self.share_mint.key(), false),
                AccountMeta::new(self.liquidity_supply.key(), false),
                AccountMeta::new(self.base_account.key(), false),
                AccountMeta::new(self.share_account.key(), false),
                AccountMeta::new_readonly(self.owner.key(), true),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data,
        };

        invoke_signed(
            &ix,
            &[
                self.reserve.clone(),
                self.share_mint.clone(),
                self.liquidity_supply.clone(),
                self.base_account.clone(),
                self.share_account.clone(),
                self.owner.clone(),
                self.token_program.clone(),
                self.program.clone(),
            ],
            signer_seeds,
        )
    }
}
