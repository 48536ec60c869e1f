pub mod claim;
pub mod deposit;
pub mod harvest;
pub mod initialize;
pub mod redeem;

pub use claim::*;
pub use deposit::*;
pub use harvest::*;
pub use initialize::*;
pub use redeem::*;
