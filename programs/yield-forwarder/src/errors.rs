use anchor_lang::prelude::*;

/// Custom error codes for the Yield Forwarder program
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Depositor already has an open position")]
    DuplicateOpenPosition,

    #[msg("No amount for redeem")]
    NoRedeemableAmount,

    #[msg("Unauthorized - only the vault owner can perform this action")]
    Unauthorized,

    #[msg("External yield vault rejected the deposit")]
    ExternalDepositFailed,

    #[msg("External yield vault rejected the redeem")]
    ExternalRedeemFailed,

    #[msg("Exchange rejected the swap")]
    ExternalSwapFailed,

    #[msg("Swap output below the requested minimum")]
    SlippageExceeded,

    #[msg("Swap deadline has passed")]
    DeadlineExpired,

    #[msg("Vault reserve cannot cover the principal being redeemed")]
    InsufficientReserve,

    #[msg("Ledger shares do not match the vault's yield share balance")]
    LedgerOutOfSync,

    #[msg("Yield vault token price must be greater than zero")]
    InvalidPrice,

    #[msg("Yield reserve account does not belong to the configured yield vault")]
    InvalidYieldReserve,

    #[msg("Invalid token mint - does not match vault configuration")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Cannot divide by zero")]
    DivisionByZero,
}
