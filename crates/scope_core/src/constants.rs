//! Versioned engine constants: GWP multipliers, the purchased-energy
//! factors, and the steam-pressure factor table.
//!
//! One table, shared by every strategy. Per-strategy copies of these
//! numbers drifted out of sync in earlier systems; they are centralized
//! here and selected through `EngineConstants`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::SteamPressure;

/// Global Warming Potential vintage, i.e. which IPCC assessment report's
/// CH4/N2O multipliers apply. Selected by content configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GwpVintage {
    /// Second assessment report: CH4 ×21, N2O ×310.
    #[default]
    Sar,
    /// Fourth assessment report: CH4 ×25, N2O ×298.
    Ar4,
}

impl GwpVintage {
    pub fn ch4(self) -> Decimal {
        match self {
            Self::Sar => dec!(21),
            Self::Ar4 => dec!(25),
        }
    }

    pub fn n2o(self) -> Decimal {
        match self {
            Self::Sar => dec!(310),
            Self::Ar4 => dec!(298),
        }
    }
}

/// CO2 factor per GJ of purchased steam, keyed by pressure class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamFactorTable {
    pub high: Decimal,
    pub medium: Decimal,
    pub low: Decimal,
}

impl SteamFactorTable {
    /// `None` (absent or unrecognized pressure label) resolves to the
    /// medium-pressure factor rather than failing the submission.
    pub fn for_pressure(&self, pressure: Option<SteamPressure>) -> Decimal {
        match pressure {
            Some(SteamPressure::High) => self.high,
            Some(SteamPressure::Medium) | None => self.medium,
            Some(SteamPressure::Low) => self.low,
        }
    }
}

impl Default for SteamFactorTable {
    fn default() -> Self {
        Self {
            high: dec!(0.073),
            medium: dec!(0.065),
            low: dec!(0.058),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConstants {
    #[serde(default)]
    pub gwp_vintage: GwpVintage,
    /// Grid emission factor, kgCO2 per kWh of purchased electricity.
    pub grid_co2_factor: Decimal,
    pub steam_factors: SteamFactorTable,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            gwp_vintage: GwpVintage::Sar,
            // National grid average, 2022 baseline.
            grid_co2_factor: dec!(0.4653),
            steam_factors: SteamFactorTable::default(),
        }
    }
}
