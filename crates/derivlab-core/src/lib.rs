pub mod error;
pub mod math;
pub mod payoff;
pub mod types;

#[cfg(feature = "binomial")]
pub mod binomial;

#[cfg(feature = "analytic")]
pub mod analytic;

#[cfg(feature = "hedging")]
pub mod hedging;

pub use error::DerivLabError;
pub use types::*;

/// Standard result type for all derivlab operations
pub type DerivLabResult<T> = Result<T, DerivLabError>;
