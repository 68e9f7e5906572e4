pub mod error;
pub mod types;

#[cfg(feature = "import_costing")]
pub mod import_costing;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::LandedCostError;
pub use types::*;

/// Standard result type for all landed-cost operations
pub type LandedCostResult<T> = Result<T, LandedCostError>;
