//! Type definitions for `scope_core`.
//!
//! Public enums, ID newtypes, and the per-activity input data carried by
//! every emission record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(FuelId);
string_id!(CompanyId);

/// Caller identity extracted from the gateway's `X-MEMBER-ID` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub u64);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub uuid::Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    StationaryCombustion,
    MobileCombustion,
    Electricity,
    Steam,
}

impl ActivityType {
    /// Reporting scope is fully determined by the activity: direct
    /// combustion is Scope 1, purchased energy is Scope 2.
    pub fn scope(self) -> Scope {
        match self {
            Self::StationaryCombustion | Self::MobileCombustion => Scope::Scope1,
            Self::Electricity | Self::Steam => Scope::Scope2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StationaryCombustion => "stationary_combustion",
            Self::MobileCombustion => "mobile_combustion",
            Self::Electricity => "electricity",
            Self::Steam => "steam",
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    /// Accepts both the wire form (`STATIONARY_COMBUSTION`) and the
    /// URL-path form (`stationary-combustion`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "STATIONARY_COMBUSTION" => Ok(Self::StationaryCombustion),
            "MOBILE_COMBUSTION" => Ok(Self::MobileCombustion),
            "ELECTRICITY" => Ok(Self::Electricity),
            "STEAM" => Ok(Self::Steam),
            other => Err(format!("unknown activity type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    Scope1,
    Scope2,
}

/// Usage-sector classification selecting which CH4/N2O factor pair applies
/// to stationary combustion. CO2 factors are purpose-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurposeCategory {
    EnergyIndustry,
    Manufacturing,
    Commercial,
    Domestic,
}

impl PurposeCategory {
    pub const ALL: [Self; 4] = [
        Self::EnergyIndustry,
        Self::Manufacturing,
        Self::Commercial,
        Self::Domestic,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelCategory {
    LiquidPetroleum,
    SolidPetroleum,
    GaseousPetroleum,
    /// Purchased energy carriers (electricity, steam).
    Energy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SteamPressure {
    High,
    Medium,
    Low,
}

impl SteamPressure {
    /// Parses a caller-supplied pressure label. Unrecognized labels yield
    /// `None`; the steam strategy then applies the medium-pressure factor.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity data
// ---------------------------------------------------------------------------

/// The activity-specific slice of a usage submission. Exactly one variant
/// per activity type; branch-required fields live inside the variant so an
/// electricity record can never carry a purpose category, and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityData {
    StationaryCombustion {
        purpose: PurposeCategory,
        /// Boiler, generator, heater... display metadata only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        combustion_type: Option<String>,
    },
    MobileCombustion {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vehicle_type: Option<String>,
        /// Distance travelled. Audit metadata; the formula consumes fuel usage.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance: Option<Decimal>,
    },
    Electricity {
        renewable: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        renewable_type: Option<String>,
    },
    Steam {
        /// `None` when the caller's label was absent or unrecognized; the
        /// medium-pressure factor applies in that case.
        pressure: Option<SteamPressure>,
    },
}

impl ActivityData {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            Self::StationaryCombustion { .. } => ActivityType::StationaryCombustion,
            Self::MobileCombustion { .. } => ActivityType::MobileCombustion,
            Self::Electricity { .. } => ActivityType::Electricity,
            Self::Steam { .. } => ActivityType::Steam,
        }
    }

    pub fn purpose(&self) -> Option<PurposeCategory> {
        match self {
            Self::StationaryCombustion { purpose, .. } => Some(*purpose),
            _ => None,
        }
    }
}
