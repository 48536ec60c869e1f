//! CPI bindings for the programs the vault composes with
//!
//! Neither program ships an Anchor crate we can link, so the instructions
//! are built by hand with Anchor-style discriminators.

pub mod exchange;
pub mod yield_vault;

pub use exchange::*;
pub use yield_vault::*;

// discriminator = sha256("global:deposit")[0..8]
pub const DEPOSIT_DISCRIMINATOR: [u8; 8] = [242, 35, 198, 137, 82, 225, 242, 182];

// discriminator = sha256("global:redeem")[0..8]
pub const REDEEM_DISCRIMINATOR: [u8; 8] = [184, 12, 86, 149, 70, 196, 97, 225];

// discriminator = sha256("global:swap_exact_input")[0..8]
pub const SWAP_EXACT_INPUT_DISCRIMINATOR: [u8; 8] = [194, 203, 142, 150, 137, 110, 81, 94];
