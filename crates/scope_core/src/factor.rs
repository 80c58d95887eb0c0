//! Fuel factor rows and the factor resolver.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{EngineError, EngineResult};
use crate::types::{ActivityType, FuelCategory, FuelId, PurposeCategory};

// ---------------------------------------------------------------------------
// Factor row
// ---------------------------------------------------------------------------

/// CH4 or N2O factors for one fuel, keyed by purpose category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurposeFactors {
    pub energy_industry: Decimal,
    pub manufacturing: Decimal,
    pub commercial: Decimal,
    pub domestic: Decimal,
}

impl PurposeFactors {
    pub fn get(&self, purpose: PurposeCategory) -> Decimal {
        match purpose {
            PurposeCategory::EnergyIndustry => self.energy_industry,
            PurposeCategory::Manufacturing => self.manufacturing,
            PurposeCategory::Commercial => self.commercial,
            PurposeCategory::Domestic => self.domestic,
        }
    }

    /// Same value for every purpose. Used by the default-factor fallback.
    pub fn uniform(value: Decimal) -> Self {
        Self {
            energy_industry: value,
            manufacturing: value,
            commercial: value,
            domestic: value,
        }
    }

    fn all_non_negative(&self) -> bool {
        PurposeCategory::ALL
            .iter()
            .all(|p| self.get(*p) >= Decimal::ZERO)
    }
}

/// Mobile-source factor triple, present only for mobile-eligible fuels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileFactors {
    pub co2: Decimal,
    pub ch4: Decimal,
    pub n2o: Decimal,
}

/// One fuel/energy source's physical constants for one applicability year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelFactorRow {
    pub fuel_id: FuelId,
    pub fuel_name: String,
    pub category: FuelCategory,
    /// Physical unit the usage is expressed in: kL, t, thousand m³, kWh, GJ.
    pub unit: String,
    pub applicable_year: i32,
    /// Gross calorific value, energy per physical unit.
    pub gcv: Decimal,
    /// Net calorific value — the one the combustion path consumes.
    pub ncv: Decimal,
    pub co2_factor: Decimal,
    pub ch4_factors: PurposeFactors,
    pub n2o_factors: PurposeFactors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_factors: Option<MobileFactors>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FuelFactorRow {
    fn factors_non_negative(&self) -> bool {
        self.gcv >= Decimal::ZERO
            && self.ncv >= Decimal::ZERO
            && self.co2_factor >= Decimal::ZERO
            && self.ch4_factors.all_non_negative()
            && self.n2o_factors.all_non_negative()
            && self.mobile_factors.as_ref().is_none_or(|m| {
                m.co2 >= Decimal::ZERO && m.ch4 >= Decimal::ZERO && m.n2o >= Decimal::ZERO
            })
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Whether the factors came from the curated table or the built-in
/// name-heuristic defaults. Defaulted results are valid but less
/// authoritative; callers surface the distinction instead of hiding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FactorSource {
    Curated,
    DefaultedFallback,
}

/// The concrete constants one combustion calculation runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFactors {
    pub fuel_name: String,
    pub ncv: Decimal,
    pub co2: Decimal,
    pub ch4: Decimal,
    pub n2o: Decimal,
    pub source: FactorSource,
}

/// In-memory factor store, keyed by `(fuel id, applicability year)`.
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    rows: HashMap<(FuelId, i32), FuelFactorRow>,
}

impl FactorTable {
    /// Builds the table, rejecting duplicate `(fuel_id, year)` keys and
    /// negative factors up front so resolution never has to re-check.
    pub fn new(rows: Vec<FuelFactorRow>) -> EngineResult<Self> {
        let mut map = HashMap::with_capacity(rows.len());
        for row in rows {
            if !row.factors_non_negative() {
                return Err(EngineError::invalid(
                    "fuel_factors",
                    format!(
                        "negative factor on '{}' year {}",
                        row.fuel_id, row.applicable_year
                    ),
                ));
            }
            let key = (row.fuel_id.clone(), row.applicable_year);
            if map.insert(key, row).is_some() {
                return Err(EngineError::invalid(
                    "fuel_factors",
                    "duplicate (fuel_id, year) row",
                ));
            }
        }
        Ok(Self { rows: map })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &FuelFactorRow> {
        self.rows.values()
    }

    /// Exact-year lookup. Inactive rows are never returned.
    pub fn get(&self, fuel_id: &FuelId, year: i32) -> Option<&FuelFactorRow> {
        self.rows
            .get(&(fuel_id.clone(), year))
            .filter(|row| row.active)
    }

    /// Selects the factor set for one combustion calculation.
    ///
    /// Exact year match only — no interpolation. Stationary combustion
    /// picks the CH4/N2O pair for the purpose category; mobile combustion
    /// substitutes the mobile triple. When no usable row exists (missing
    /// year, inactive row, or a mobile request against a fuel without
    /// mobile factors) the built-in defaults apply and the result is
    /// tagged `DefaultedFallback`.
    ///
    /// Not invoked for electricity or steam; those activities use the
    /// constants table directly.
    pub fn resolve(
        &self,
        fuel_id: &FuelId,
        year: i32,
        activity: ActivityType,
        purpose: Option<PurposeCategory>,
    ) -> EngineResult<ResolvedFactors> {
        match activity {
            ActivityType::StationaryCombustion => {
                let purpose = purpose.ok_or_else(|| {
                    EngineError::invalid(
                        "purpose_category",
                        "required for stationary combustion",
                    )
                })?;
                match self.get(fuel_id, year) {
                    Some(row) => Ok(ResolvedFactors {
                        fuel_name: row.fuel_name.clone(),
                        ncv: row.ncv,
                        co2: row.co2_factor,
                        ch4: row.ch4_factors.get(purpose),
                        n2o: row.n2o_factors.get(purpose),
                        source: FactorSource::Curated,
                    }),
                    None => Ok(Self::defaulted_stationary(fuel_id)),
                }
            }
            ActivityType::MobileCombustion => match self
                .get(fuel_id, year)
                .and_then(|row| row.mobile_factors.as_ref().map(|m| (row, m)))
            {
                Some((row, mobile)) => Ok(ResolvedFactors {
                    fuel_name: row.fuel_name.clone(),
                    ncv: row.ncv,
                    co2: mobile.co2,
                    ch4: mobile.ch4,
                    n2o: mobile.n2o,
                    source: FactorSource::Curated,
                }),
                None => Ok(Self::defaulted_mobile(fuel_id)),
            },
            ActivityType::Electricity | ActivityType::Steam => Err(EngineError::invalid(
                "activity_type",
                "factor resolution does not apply to purchased energy",
            )),
        }
    }

    fn defaulted_stationary(fuel_id: &FuelId) -> ResolvedFactors {
        let set = defaults::lookup(&fuel_id.0);
        ResolvedFactors {
            fuel_name: set.name.to_string(),
            ncv: set.ncv,
            co2: set.co2,
            ch4: set.ch4,
            n2o: set.n2o,
            source: FactorSource::DefaultedFallback,
        }
    }

    fn defaulted_mobile(fuel_id: &FuelId) -> ResolvedFactors {
        let set = defaults::lookup(&fuel_id.0);
        ResolvedFactors {
            fuel_name: set.name.to_string(),
            ncv: set.ncv,
            co2: set.mobile_co2,
            ch4: set.mobile_ch4,
            n2o: set.mobile_n2o,
            source: FactorSource::DefaultedFallback,
        }
    }
}
