//! Settlement logic shared by the instruction handlers
//!
//! Every function here mutates only the ledger accounts passed in. The
//! handlers run the ledger effects before their CPIs
//! (checks-effects-interactions) so a collaborator that re-enters sees the
//! updated ledger, then hand the measured balances back here to finish.

pub mod claim;
pub mod deposit;
pub mod harvest;
pub mod redeem;
