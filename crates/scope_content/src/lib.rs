//! Factor-table content loading and validation shared between scope_cli
//! and scope_daemon.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use scope_core::{EngineConstants, FactorTable, FuelFactorRow};
use serde::Deserialize;

#[derive(Deserialize)]
struct FuelFactorsFile {
    content_version: String,
    fuels: Vec<FuelFactorRow>,
}

/// Everything the engine needs from the content directory: the curated
/// factor table plus the constants (GWP vintage, grid factor, steam
/// factors).
#[derive(Debug)]
pub struct FactorContent {
    pub content_version: String,
    pub constants: EngineConstants,
    pub table: FactorTable,
}

pub fn load_content(content_dir: &str) -> Result<FactorContent> {
    let dir = Path::new(content_dir);
    let constants: EngineConstants = serde_json::from_str(
        &std::fs::read_to_string(dir.join("constants.json")).context("reading constants.json")?,
    )
    .context("parsing constants.json")?;
    let fuels_file: FuelFactorsFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("fuel_factors.json"))
            .context("reading fuel_factors.json")?,
    )
    .context("parsing fuel_factors.json")?;

    let table = FactorTable::new(fuels_file.fuels).context("building factor table")?;

    Ok(FactorContent {
        content_version: fuels_file.content_version,
        constants,
        table,
    })
}

/// Validates authoring constraints on loaded content, panicking on any
/// authoring error.
///
/// `FactorTable::new` already rejects duplicate `(fuel_id, year)` keys
/// and negative factors; this catches the rest: empty identifiers, units,
/// implausible years, and calorific values that contradict each other.
pub fn validate_content(content: &FactorContent) {
    for row in content.table.rows() {
        validate_row(row);
    }

    let steam = &content.constants.steam_factors;
    assert!(
        steam.high >= steam.medium && steam.medium >= steam.low,
        "steam factors must be ordered high >= medium >= low",
    );
    assert!(
        content.constants.grid_co2_factor > Decimal::ZERO,
        "grid CO2 factor must be positive",
    );
}

fn validate_row(row: &FuelFactorRow) {
    assert!(
        !row.fuel_id.0.trim().is_empty(),
        "factor row has empty fuel_id"
    );
    assert!(
        !row.fuel_name.trim().is_empty(),
        "fuel '{}' has empty fuel_name",
        row.fuel_id,
    );
    assert!(
        !row.unit.trim().is_empty(),
        "fuel '{}' has empty unit",
        row.fuel_id,
    );
    assert!(
        (1990..=2100).contains(&row.applicable_year),
        "fuel '{}' has implausible applicable_year {}",
        row.fuel_id,
        row.applicable_year,
    );
    // Net calorific value can never exceed the gross value.
    assert!(
        row.ncv <= row.gcv,
        "fuel '{}' has ncv {} > gcv {}",
        row.fuel_id,
        row.ncv,
        row.gcv,
    );
}
