//! Unit/energy conversion and gas emission arithmetic.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`. Reproducing the
//! reference figures bit-for-bit depends on the staging discipline: every
//! multiplication stage is rounded half-up to 6 fractional digits before
//! the next stage, and the stored per-gas quantities are quantized to 4.
//! The total is the plain sum of the stored gases, so additivity holds
//! exactly at the stored scale.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::GwpVintage;

/// Scale used for intermediate gas quantities.
const GAS_SCALE: u32 = 6;
/// Scale of the stored emission fields (tCO2eq).
const STORED_SCALE: u32 = 4;

/// Per-TJ combustion factors carry a mass scale that needs a 10⁻⁶
/// normalization down to tons.
const PER_ENERGY_NORMALIZATION: Decimal = dec!(0.000001);
/// kg → ton for the electricity path.
const KG_TO_TON: Decimal = dec!(0.001);

fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// The four computed quantities of one calculation, in tCO2eq at the
/// stored 4-digit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEmissions {
    pub co2: Decimal,
    pub ch4: Decimal,
    pub n2o: Decimal,
    pub total: Decimal,
}

impl GasEmissions {
    pub const ZERO: Self = Self {
        co2: Decimal::ZERO,
        ch4: Decimal::ZERO,
        n2o: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    fn from_gases(co2: Decimal, ch4: Decimal, n2o: Decimal) -> Self {
        let co2 = round_half_up(co2, STORED_SCALE);
        let ch4 = round_half_up(ch4, STORED_SCALE);
        let n2o = round_half_up(n2o, STORED_SCALE);
        Self {
            co2,
            ch4,
            n2o,
            total: co2 + ch4 + n2o,
        }
    }
}

/// Stationary/mobile combustion path.
///
/// `energy = usage × ncv`, then per gas `energy × factor (× GWP) × 10⁻⁶`.
/// Returns `None` on decimal overflow; the strategy layer turns that into
/// a degraded all-zero result instead of losing the submission.
pub fn combustion_emissions(
    usage: Decimal,
    ncv: Decimal,
    co2_factor: Decimal,
    ch4_factor: Decimal,
    n2o_factor: Decimal,
    gwp: GwpVintage,
) -> Option<GasEmissions> {
    let energy = round_half_up(usage.checked_mul(ncv)?, GAS_SCALE);

    let co2 = round_half_up(
        energy
            .checked_mul(co2_factor)?
            .checked_mul(PER_ENERGY_NORMALIZATION)?,
        GAS_SCALE,
    );
    let ch4 = round_half_up(
        energy
            .checked_mul(ch4_factor)?
            .checked_mul(gwp.ch4())?
            .checked_mul(PER_ENERGY_NORMALIZATION)?,
        GAS_SCALE,
    );
    let n2o = round_half_up(
        energy
            .checked_mul(n2o_factor)?
            .checked_mul(gwp.n2o())?
            .checked_mul(PER_ENERGY_NORMALIZATION)?,
        GAS_SCALE,
    );

    Some(GasEmissions::from_gases(co2, ch4, n2o))
}

/// Purchased electricity: `usage(kWh) × grid factor(kgCO2/kWh) × 10⁻³`.
/// CO2 only; CH4/N2O are defined as zero for purchased electricity.
pub fn electricity_emissions(usage: Decimal, grid_factor: Decimal) -> Option<GasEmissions> {
    let co2 = usage.checked_mul(grid_factor)?.checked_mul(KG_TO_TON)?;
    Some(GasEmissions::from_gases(co2, Decimal::ZERO, Decimal::ZERO))
}

/// Purchased steam: `usage(GJ) × steam factor(tCO2/GJ)`. CO2 only.
pub fn steam_emissions(usage: Decimal, steam_factor: Decimal) -> Option<GasEmissions> {
    let co2 = usage.checked_mul(steam_factor)?;
    Some(GasEmissions::from_gases(co2, Decimal::ZERO, Decimal::ZERO))
}
