//! Content/schema validation tests for the factor-table JSON data.
//!
//! These tests load the actual `content/*.json` files and validate:
//! 1. Schema validity — all files deserialize without error
//! 2. Range constraints — no negative factors, no empty IDs
//! 3. Invariants the resolver depends on — gcv ordering, steam table ordering
//! 4. Malformed content is rejected at load, not at calculation time

use rust_decimal::Decimal;
use scope_content::{load_content, validate_content, FactorContent};
use scope_core::{FuelId, PurposeCategory};
use std::sync::OnceLock;

/// Helper: resolve the content directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn content_dir() -> String {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    format!("{manifest}/../../content")
}

/// Shared content loaded once across all tests in this module.
fn load_test_content() -> &'static FactorContent {
    static CONTENT: OnceLock<FactorContent> = OnceLock::new();
    CONTENT.get_or_init(|| {
        load_content(&content_dir()).expect("load_content should succeed for production content")
    })
}

// =========================================================================
// 1. Schema validation
// =========================================================================

#[test]
fn content_loads_successfully() {
    let _content = load_test_content();
}

#[test]
fn content_passes_validation() {
    validate_content(load_test_content());
}

#[test]
fn content_version_is_non_empty() {
    let content = load_test_content();
    assert!(!content.content_version.is_empty());
}

// =========================================================================
// 2. Range constraints
// =========================================================================

#[test]
fn fuel_ids_and_units_are_non_empty() {
    let content = load_test_content();
    for row in content.table.rows() {
        assert!(!row.fuel_id.0.is_empty(), "row has empty fuel_id");
        assert!(!row.unit.is_empty(), "fuel '{}' has empty unit", row.fuel_id);
    }
}

#[test]
fn calorific_values_are_positive() {
    let content = load_test_content();
    for row in content.table.rows() {
        assert!(
            row.ncv > Decimal::ZERO,
            "fuel '{}' has non-positive ncv",
            row.fuel_id
        );
        assert!(
            row.gcv >= row.ncv,
            "fuel '{}' has gcv below ncv",
            row.fuel_id
        );
    }
}

#[test]
fn gas_factors_are_non_negative() {
    let content = load_test_content();
    for row in content.table.rows() {
        assert!(
            row.co2_factor >= Decimal::ZERO,
            "fuel '{}' has negative co2_factor",
            row.fuel_id
        );
        for purpose in PurposeCategory::ALL {
            assert!(
                row.ch4_factors.get(purpose) >= Decimal::ZERO,
                "fuel '{}' has negative ch4 factor for {purpose:?}",
                row.fuel_id
            );
            assert!(
                row.n2o_factors.get(purpose) >= Decimal::ZERO,
                "fuel '{}' has negative n2o factor for {purpose:?}",
                row.fuel_id
            );
        }
    }
}

// =========================================================================
// 3. Resolver-facing invariants
// =========================================================================

#[test]
fn diesel_rows_exist_for_recent_years() {
    let content = load_test_content();
    let diesel = FuelId("DIESEL".to_string());
    for year in [2023, 2024] {
        assert!(
            content.table.get(&diesel, year).is_some(),
            "no curated diesel row for {year}"
        );
    }
}

#[test]
fn mobile_eligible_fuels_carry_full_triples() {
    // Serde makes a partial triple unrepresentable; this guards the data
    // being present at all for the fuels the UI offers as vehicle fuels.
    let content = load_test_content();
    for fuel in ["GASOLINE", "DIESEL", "LPG"] {
        let row = content
            .table
            .get(&FuelId(fuel.to_string()), 2024)
            .unwrap_or_else(|| panic!("no {fuel} row for 2024"));
        assert!(
            row.mobile_factors.is_some(),
            "{fuel} should be mobile-eligible"
        );
    }
}

#[test]
fn steam_factors_are_ordered() {
    let content = load_test_content();
    let steam = &content.constants.steam_factors;
    assert!(steam.high >= steam.medium, "high < medium");
    assert!(steam.medium >= steam.low, "medium < low");
}

#[test]
fn grid_factor_is_positive() {
    let content = load_test_content();
    assert!(content.constants.grid_co2_factor > Decimal::ZERO);
}

// =========================================================================
// 4. Malformed content is rejected at load
// =========================================================================

#[test]
fn missing_directory_fails_with_context() {
    let err = load_content("/nonexistent/content-dir").unwrap_err();
    assert!(
        err.to_string().contains("constants.json"),
        "error should say which file failed: {err}"
    );
}

#[test]
fn duplicate_rows_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("constants.json"),
        r#"{"grid_co2_factor": "0.4653", "steam_factors": {"high": "0.073", "medium": "0.065", "low": "0.058"}}"#,
    )
    .unwrap();
    let row = r#"{
        "fuel_id": "DIESEL", "fuel_name": "Diesel", "category": "LIQUID_PETROLEUM",
        "unit": "kL", "applicable_year": 2024, "gcv": "37.7", "ncv": "35.3",
        "co2_factor": "74100",
        "ch4_factors": {"energy_industry": "3", "manufacturing": "3", "commercial": "10", "domestic": "10"},
        "n2o_factors": {"energy_industry": "0.6", "manufacturing": "0.6", "commercial": "0.6", "domestic": "0.6"}
    }"#;
    std::fs::write(
        dir.path().join("fuel_factors.json"),
        format!(r#"{{"content_version": "test", "fuels": [{row}, {row}]}}"#),
    )
    .unwrap();

    let err = load_content(dir.path().to_str().unwrap()).unwrap_err();
    assert!(
        err.to_string().contains("building factor table"),
        "duplicate (fuel_id, year) should fail the build: {err}"
    );
}

#[test]
fn negative_factor_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("constants.json"),
        r#"{"grid_co2_factor": "0.4653", "steam_factors": {"high": "0.073", "medium": "0.065", "low": "0.058"}}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("fuel_factors.json"),
        r#"{"content_version": "test", "fuels": [{
            "fuel_id": "DIESEL", "fuel_name": "Diesel", "category": "LIQUID_PETROLEUM",
            "unit": "kL", "applicable_year": 2024, "gcv": "37.7", "ncv": "35.3",
            "co2_factor": "-74100",
            "ch4_factors": {"energy_industry": "3", "manufacturing": "3", "commercial": "10", "domestic": "10"},
            "n2o_factors": {"energy_industry": "0.6", "manufacturing": "0.6", "commercial": "0.6", "domestic": "0.6"}
        }]}"#,
    )
    .unwrap();

    assert!(load_content(dir.path().to_str().unwrap()).is_err());
}
