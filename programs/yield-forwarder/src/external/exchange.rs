use anchor_lang::prelude::*;
use anchor_lang::solana_program::{instruction::Instruction, program::invoke_signed};

use super::SWAP_EXACT_INPUT_DISCRIMINATOR;
use crate::errors::VaultError;

/// Accounts for the exchange's `swap_exact_input`
///
/// `route` holds the pool accounts for each hop (e.g. base -> wrapped
/// native -> reward) and is forwarded in order after the fixed accounts.
pub struct ExchangeCpi<'info> {
    pub program: AccountInfo<'info>,
    pub source: AccountInfo<'info>,
    pub destination: AccountInfo<'info>,
    pub owner: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub route: Vec<AccountInfo<'info>>,
}

impl<'info> ExchangeCpi<'info> {
    /// Swap exactly `amount_in` from `source`; the exchange reverts when the
    /// output is below `min_amount_out` or `deadline` has passed.
    pub fn swap_exact_input(
        &self,
        amount_in: u64,
        min_amount_out: u64,
        deadline: i64,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        let mut data = SWAP_EXACT_INPUT_DISCRIMINATOR.to_vec();
        data.extend_from_slice(&amount_in.to_le_bytes());
        data.extend_from_slice(&min_amount_out.to_le_bytes());
        data.extend_from_slice(&deadline.to_le_bytes());

        let mut accounts = vec![
            AccountMeta::new(self.source.key(), false),
            AccountMeta::new(self.destination.key(), false),
            AccountMeta::new_readonly(self.owner.key(), true),
            AccountMeta::new_readonly(self.token_program.key(), false),
        ];
        let mut infos = vec![
            self.source.clone(),
            self.destination.clone(),
            self.owner.clone(),
            self.token_program.clone(),
        ];
        for hop in &self.route {
            accounts.push(if hop.is_writable {
                AccountMeta::new(hop.key(), false)
            } else {
                AccountMeta::new_readonly(hop.key(), false)
            });
            infos.push(hop.clone());
        }
        infos.push(self.program.clone());

        let ix = Instruction {
            program_id: self.program.key(),
            accounts,
            data,
        };

        invoke_signed(&ix, &infos, signer_seeds).map_err(|_| error!(VaultError::ExternalSwapFailed))
    }
}
