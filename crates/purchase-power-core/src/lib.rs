pub mod amortization;
pub mod error;
pub mod policy;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "regulation")]
pub mod regulation;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "purchase_power")]
pub mod purchase_power;

pub use error::PurchasePowerError;
pub use types::*;

/// Standard result type for all purchase-power computations
pub type PurchasePowerResult<T> = Result<T, PurchasePowerError>;
