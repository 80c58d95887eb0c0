//! `scope_core` — deterministic GHG emission calculation engine.
//!
//! Pure and synchronous. No IO; the factor table and constants are
//! passed in, and all arithmetic is exact decimal.

mod calc;
mod constants;
mod defaults;
mod error;
mod factor;
mod record;
mod strategy;
mod types;

pub use calc::{combustion_emissions, electricity_emissions, steam_emissions, GasEmissions};
pub use constants::{EngineConstants, GwpVintage, SteamFactorTable};
pub use error::{EngineError, EngineResult};
pub use factor::{
    FactorSource, FactorTable, FuelFactorRow, MobileFactors, PurposeFactors, ResolvedFactors,
};
pub use record::EmissionRecord;
pub use strategy::{calculate, Calculation, UsageSubmission};
pub use types::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

#[cfg(test)]
mod tests;
