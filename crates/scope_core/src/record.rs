//! The persisted outcome of one calculation.
//!
//! An `EmissionRecord` carries the inputs that produced it, the factors
//! that were actually applied, and the four computed outputs — always
//! together, so a record whose outputs disagree with its stored inputs
//! and factors is not constructible through this module. Updates are
//! pure-functional rebuilds (`with_usage`, `with_notes`) that preserve
//! identity and creation time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calc::{self, GasEmissions};
use crate::constants::EngineConstants;
use crate::factor::FactorSource;
use crate::strategy::{Calculation, UsageSubmission};
use crate::types::{ActivityData, ActivityType, CompanyId, FuelId, MemberId, RecordId, Scope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub id: RecordId,
    pub member_id: MemberId,
    pub company_id: CompanyId,
    pub reporting_year: i32,
    pub reporting_month: u32,
    pub activity: ActivityData,
    pub scope: Scope,
    pub fuel_id: FuelId,
    pub fuel_name: String,
    pub usage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_location: Option<String>,
    /// Factors actually applied, kept so later factor-table revisions
    /// never retroactively change historical totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_ncv: Option<Decimal>,
    pub used_co2_factor: Decimal,
    pub used_ch4_factor: Decimal,
    pub used_n2o_factor: Decimal,
    pub co2_emission: Decimal,
    pub ch4_emission: Decimal,
    pub n2o_emission: Decimal,
    pub total_emission: Decimal,
    pub factor_source: FactorSource,
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmissionRecord {
    /// Assembles a record from a validated submission and its computed
    /// calculation, as one atomic value.
    pub fn from_calculation(
        member_id: MemberId,
        company_id: CompanyId,
        submission: UsageSubmission,
        facility_location: Option<String>,
        notes: Option<String>,
        calculation: Calculation,
        now: DateTime<Utc>,
    ) -> Self {
        let scope = submission.activity.activity_type().scope();
        Self {
            id: RecordId::generate(),
            member_id,
            company_id,
            reporting_year: submission.reporting_year,
            reporting_month: submission.reporting_month,
            scope,
            activity: submission.activity,
            fuel_id: submission.fuel_id,
            fuel_name: calculation.fuel_name,
            usage: submission.usage,
            usage_unit: submission.usage_unit,
            facility_location,
            used_ncv: calculation.used_ncv,
            used_co2_factor: calculation.used_co2_factor,
            used_ch4_factor: calculation.used_ch4_factor,
            used_n2o_factor: calculation.used_n2o_factor,
            co2_emission: calculation.emissions.co2,
            ch4_emission: calculation.emissions.ch4,
            n2o_emission: calculation.emissions.n2o,
            total_emission: calculation.emissions.total,
            factor_source: calculation.factor_source,
            degraded: calculation.degraded,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy recomputed for a new usage quantity, applying the
    /// record's own stored factors. Identity and creation time survive;
    /// all four computed fields are replaced together.
    pub fn with_usage(
        &self,
        new_usage: Decimal,
        constants: &EngineConstants,
        now: DateTime<Utc>,
    ) -> Self {
        let emissions = self.recompute(new_usage, constants);
        let (emissions, degraded) = match emissions {
            Some(e) => (e, false),
            None => (GasEmissions::ZERO, true),
        };
        Self {
            usage: new_usage,
            co2_emission: emissions.co2,
            ch4_emission: emissions.ch4,
            n2o_emission: emissions.n2o,
            total_emission: emissions.total,
            degraded,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Returns a copy with only the notes replaced. Never recomputes;
    /// every emission field is left untouched.
    pub fn with_notes(&self, notes: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            notes,
            updated_at: now,
            ..self.clone()
        }
    }

    /// `total == co2 + ch4 + n2o` at the stored scale.
    pub fn additivity_holds(&self) -> bool {
        self.total_emission == self.co2_emission + self.ch4_emission + self.n2o_emission
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity.activity_type()
    }

    fn recompute(&self, usage: Decimal, constants: &EngineConstants) -> Option<GasEmissions> {
        match &self.activity {
            ActivityData::StationaryCombustion { .. } | ActivityData::MobileCombustion { .. } => {
                calc::combustion_emissions(
                    usage,
                    self.used_ncv.unwrap_or(Decimal::ZERO),
                    self.used_co2_factor,
                    self.used_ch4_factor,
                    self.used_n2o_factor,
                    constants.gwp_vintage,
                )
            }
            ActivityData::Electricity { renewable, .. } => {
                if *renewable {
                    Some(GasEmissions::ZERO)
                } else {
                    calc::electricity_emissions(usage, self.used_co2_factor)
                }
            }
            ActivityData::Steam { .. } => calc::steam_emissions(usage, self.used_co2_factor),
        }
    }
}
