//! Per-activity calculation strategies.
//!
//! Stateless dispatch: each submission is validated for its branch's
//! required inputs, factors are resolved, and the gas arithmetic runs.
//! Decimal overflow does not fail the submission — the outcome degrades
//! to all-zero outputs with the `degraded` flag set, and the caller
//! surfaces that as a non-successful result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calc::{self, GasEmissions};
use crate::constants::EngineConstants;
use crate::error::{EngineError, EngineResult};
use crate::factor::{FactorSource, FactorTable};
use crate::types::{ActivityData, ActivityType, FuelId};

/// One usage submission, as handed over by the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSubmission {
    pub fuel_id: FuelId,
    pub usage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_unit: Option<String>,
    pub reporting_year: i32,
    /// 1–12.
    pub reporting_month: u32,
    pub activity: ActivityData,
}

/// Outcome of one strategy run: the four quantities plus the audit trail
/// of the factors that actually produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub emissions: GasEmissions,
    pub fuel_name: String,
    /// `None` for the purchased-energy paths, which have no NCV step.
    pub used_ncv: Option<Decimal>,
    pub used_co2_factor: Decimal,
    pub used_ch4_factor: Decimal,
    pub used_n2o_factor: Decimal,
    pub factor_source: FactorSource,
    /// Set when arithmetic failed and the outputs were zeroed instead of
    /// losing the submission.
    pub degraded: bool,
}

/// Validates a submission and computes its emissions.
pub fn calculate(
    table: &FactorTable,
    constants: &EngineConstants,
    submission: &UsageSubmission,
) -> EngineResult<Calculation> {
    validate(submission)?;

    let activity = submission.activity.activity_type();
    match activity {
        ActivityType::StationaryCombustion | ActivityType::MobileCombustion => {
            let resolved = table.resolve(
                &submission.fuel_id,
                submission.reporting_year,
                activity,
                submission.activity.purpose(),
            )?;
            let emissions = calc::combustion_emissions(
                submission.usage,
                resolved.ncv,
                resolved.co2,
                resolved.ch4,
                resolved.n2o,
                constants.gwp_vintage,
            );
            Ok(finish(
                emissions,
                resolved.fuel_name,
                Some(resolved.ncv),
                resolved.co2,
                resolved.ch4,
                resolved.n2o,
                resolved.source,
            ))
        }
        ActivityType::Electricity => {
            let renewable = matches!(
                submission.activity,
                ActivityData::Electricity { renewable: true, .. }
            );
            let grid_factor = constants.grid_co2_factor;
            let emissions = if renewable {
                // Renewable supply carries no grid emissions, whatever the usage.
                Some(GasEmissions::ZERO)
            } else {
                calc::electricity_emissions(submission.usage, grid_factor)
            };
            Ok(finish(
                emissions,
                "Electricity".to_string(),
                None,
                grid_factor,
                Decimal::ZERO,
                Decimal::ZERO,
                FactorSource::Curated,
            ))
        }
        ActivityType::Steam => {
            let pressure = match submission.activity {
                ActivityData::Steam { pressure } => pressure,
                _ => None,
            };
            let steam_factor = constants.steam_factors.for_pressure(pressure);
            let emissions = calc::steam_emissions(submission.usage, steam_factor);
            Ok(finish(
                emissions,
                "Steam".to_string(),
                None,
                steam_factor,
                Decimal::ZERO,
                Decimal::ZERO,
                FactorSource::Curated,
            ))
        }
    }
}

fn finish(
    emissions: Option<GasEmissions>,
    fuel_name: String,
    used_ncv: Option<Decimal>,
    co2_factor: Decimal,
    ch4_factor: Decimal,
    n2o_factor: Decimal,
    source: FactorSource,
) -> Calculation {
    let (emissions, degraded) = match emissions {
        Some(e) => (e, false),
        None => (GasEmissions::ZERO, true),
    };
    Calculation {
        emissions,
        fuel_name,
        used_ncv,
        used_co2_factor: co2_factor,
        used_ch4_factor: ch4_factor,
        used_n2o_factor: n2o_factor,
        factor_source: source,
        degraded,
    }
}

/// Branch-specific required-input checks, rejected before any factor
/// lookup or computation. Zero usage is not an error — it yields zero
/// emissions downstream.
fn validate(submission: &UsageSubmission) -> EngineResult<()> {
    if submission.fuel_id.0.trim().is_empty() {
        return Err(EngineError::invalid("fuel_id", "must not be empty"));
    }
    if submission.usage < Decimal::ZERO {
        return Err(EngineError::invalid("usage", "must not be negative"));
    }
    if !(1..=12).contains(&submission.reporting_month) {
        return Err(EngineError::invalid(
            "reporting_month",
            format!("{} is outside 1-12", submission.reporting_month),
        ));
    }
    if !(1900..=2100).contains(&submission.reporting_year) {
        return Err(EngineError::invalid(
            "reporting_year",
            format!("{} is implausible", submission.reporting_year),
        ));
    }
    if let ActivityData::MobileCombustion {
        distance: Some(distance),
        ..
    } = &submission.activity
    {
        if *distance <= Decimal::ZERO {
            return Err(EngineError::invalid("distance", "must be positive"));
        }
    }
    Ok(())
}
