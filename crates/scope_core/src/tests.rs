use super::*;
use crate::test_fixtures::{base_constants, base_table, diesel_row};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// --- Test helpers -------------------------------------------------------

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn stationary_submission(usage: Decimal, purpose: PurposeCategory) -> UsageSubmission {
    UsageSubmission {
        fuel_id: FuelId("DIESEL".to_string()),
        usage,
        usage_unit: Some("kL".to_string()),
        reporting_year: 2024,
        reporting_month: 3,
        activity: ActivityData::StationaryCombustion {
            purpose,
            combustion_type: None,
        },
    }
}

fn mobile_submission(usage: Decimal) -> UsageSubmission {
    UsageSubmission {
        fuel_id: FuelId("DIESEL".to_string()),
        usage,
        usage_unit: Some("kL".to_string()),
        reporting_year: 2024,
        reporting_month: 3,
        activity: ActivityData::MobileCombustion {
            vehicle_type: Some("truck".to_string()),
            distance: Some(dec!(1200)),
        },
    }
}

fn electricity_submission(usage: Decimal, renewable: bool) -> UsageSubmission {
    UsageSubmission {
        fuel_id: FuelId("ELECTRICITY".to_string()),
        usage,
        usage_unit: Some("kWh".to_string()),
        reporting_year: 2024,
        reporting_month: 3,
        activity: ActivityData::Electricity {
            renewable,
            renewable_type: None,
        },
    }
}

fn steam_submission(usage: Decimal, pressure: Option<SteamPressure>) -> UsageSubmission {
    UsageSubmission {
        fuel_id: FuelId("STEAM".to_string()),
        usage,
        usage_unit: Some("GJ".to_string()),
        reporting_year: 2024,
        reporting_month: 3,
        activity: ActivityData::Steam { pressure },
    }
}

fn make_record(submission: UsageSubmission) -> EmissionRecord {
    let table = base_table();
    let constants = base_constants();
    let calculation = calculate(&table, &constants, &submission).expect("calculation succeeds");
    EmissionRecord::from_calculation(
        MemberId(7),
        CompanyId("company-a".to_string()),
        submission,
        Some("Plant 1".to_string()),
        None,
        calculation,
        now(),
    )
}

// --- Stationary combustion ----------------------------------------------

#[test]
fn test_stationary_diesel_reference_figures() {
    let table = base_table();
    let constants = base_constants();
    let submission = stationary_submission(dec!(1000), PurposeCategory::EnergyIndustry);

    let calc = calculate(&table, &constants, &submission).unwrap();

    // energy = 1000 × 35.3 = 35300
    // co2 = 35300 × 74100 × 1e-6, ch4 = 35300 × 3 × 21 × 1e-6,
    // n2o = 35300 × 0.6 × 310 × 1e-6
    assert_eq!(calc.emissions.co2, dec!(2615.7300));
    assert_eq!(calc.emissions.ch4, dec!(2.2239));
    assert_eq!(calc.emissions.n2o, dec!(6.5658));
    assert_eq!(calc.emissions.total, dec!(2624.5197));
    assert_eq!(calc.used_ncv, Some(dec!(35.3)));
    assert_eq!(calc.factor_source, FactorSource::Curated);
    assert!(!calc.degraded);
}

#[test]
fn test_stationary_purpose_selects_ch4_n2o_pair() {
    let table = base_table();
    let constants = base_constants();
    let submission = stationary_submission(dec!(1000), PurposeCategory::Commercial);

    let calc = calculate(&table, &constants, &submission).unwrap();

    // Commercial CH4 factor is 10 (vs 3 for energy industry); CO2 is
    // purpose-independent.
    assert_eq!(calc.used_ch4_factor, dec!(10));
    assert_eq!(calc.emissions.co2, dec!(2615.7300));
    assert_eq!(calc.emissions.ch4, dec!(7.4130));
    assert_eq!(calc.emissions.total, dec!(2629.7088));
}

#[test]
fn test_stationary_ar4_vintage_changes_gas_multipliers() {
    let table = base_table();
    let constants = EngineConstants {
        gwp_vintage: GwpVintage::Ar4,
        ..base_constants()
    };
    let submission = stationary_submission(dec!(1000), PurposeCategory::EnergyIndustry);

    let calc = calculate(&table, &constants, &submission).unwrap();

    // CH4 ×25, N2O ×298 under AR4.
    assert_eq!(calc.emissions.ch4, dec!(2.6475));
    assert_eq!(calc.emissions.n2o, dec!(6.3116));
}

// --- Mobile combustion --------------------------------------------------

#[test]
fn test_mobile_uses_mobile_factor_triple() {
    let table = base_table();
    let constants = base_constants();
    let submission = mobile_submission(dec!(100));

    let calc = calculate(&table, &constants, &submission).unwrap();

    assert_eq!(calc.used_ch4_factor, dec!(3.9), "mobile CH4, not stationary");
    assert_eq!(calc.emissions.co2, dec!(261.5730));
    assert_eq!(calc.emissions.ch4, dec!(0.2891));
    assert_eq!(calc.emissions.n2o, dec!(4.2678));
    assert_eq!(calc.emissions.total, dec!(266.1299));
}

#[test]
fn test_mobile_without_mobile_factors_falls_back_to_defaults() {
    let table = base_table();
    let constants = base_constants();
    let submission = UsageSubmission {
        fuel_id: FuelId("LNG".to_string()),
        activity: ActivityData::MobileCombustion {
            vehicle_type: None,
            distance: None,
        },
        ..mobile_submission(dec!(10))
    };

    let calc = calculate(&table, &constants, &submission).unwrap();

    // The curated LNG row has no mobile triple, so the built-in natural
    // gas defaults apply.
    assert_eq!(calc.factor_source, FactorSource::DefaultedFallback);
    assert_eq!(calc.used_co2_factor, dec!(56100));
    assert_eq!(calc.used_ch4_factor, dec!(92));
}

// --- Electricity --------------------------------------------------------

#[test]
fn test_electricity_reference_figure() {
    let table = base_table();
    let constants = base_constants();
    let submission = electricity_submission(dec!(1000), false);

    let calc = calculate(&table, &constants, &submission).unwrap();

    // 1000 kWh × 0.4653 kgCO2/kWh / 1000 = 0.4653 tCO2.
    assert_eq!(calc.emissions.co2, dec!(0.4653));
    assert_eq!(calc.emissions.ch4, Decimal::ZERO);
    assert_eq!(calc.emissions.n2o, Decimal::ZERO);
    assert_eq!(calc.emissions.total, dec!(0.4653));
    assert_eq!(calc.used_ncv, None, "no NCV step for purchased energy");
}

#[test]
fn test_renewable_electricity_is_zero_regardless_of_usage() {
    let table = base_table();
    let constants = base_constants();
    let submission = electricity_submission(dec!(999999999), true);

    let calc = calculate(&table, &constants, &submission).unwrap();

    assert_eq!(calc.emissions.total, Decimal::ZERO);
    assert_eq!(calc.emissions.co2, Decimal::ZERO);
}

// --- Steam --------------------------------------------------------------

#[test]
fn test_steam_pressure_factors() {
    let table = base_table();
    let constants = base_constants();

    let high = calculate(
        &table,
        &constants,
        &steam_submission(dec!(10), Some(SteamPressure::High)),
    )
    .unwrap();
    let low = calculate(
        &table,
        &constants,
        &steam_submission(dec!(10), Some(SteamPressure::Low)),
    )
    .unwrap();

    assert_eq!(high.emissions.total, dec!(0.7300));
    assert_eq!(low.emissions.total, dec!(0.5800));
}

#[test]
fn test_steam_unrecognized_pressure_falls_back_to_medium() {
    // `from_label` yields None for anything outside high/medium/low...
    assert_eq!(SteamPressure::from_label("superheated"), None);
    assert_eq!(SteamPressure::from_label("HIGH"), Some(SteamPressure::High));

    // ...and a None pressure computes with the medium factor.
    let table = base_table();
    let constants = base_constants();
    let calc = calculate(&table, &constants, &steam_submission(dec!(10), None)).unwrap();

    assert_eq!(calc.used_co2_factor, dec!(0.065));
    assert_eq!(calc.emissions.total, dec!(0.6500));
}

#[test]
fn test_steam_rounding_is_half_up() {
    let table = base_table();
    let constants = base_constants();

    // 0.01 × 0.065 = 0.00065 — an exact midpoint at the stored scale.
    // Half-up keeps it at 0.0007; banker's rounding would give 0.0006.
    let calc = calculate(&table, &constants, &steam_submission(dec!(0.01), None)).unwrap();
    assert_eq!(calc.emissions.co2, dec!(0.0007));
}

// --- Zero usage and determinism -----------------------------------------

#[test]
fn test_zero_usage_yields_zero_for_every_activity() {
    let table = base_table();
    let constants = base_constants();
    let submissions = [
        stationary_submission(Decimal::ZERO, PurposeCategory::Manufacturing),
        mobile_submission(Decimal::ZERO),
        electricity_submission(Decimal::ZERO, false),
        steam_submission(Decimal::ZERO, Some(SteamPressure::High)),
    ];

    for submission in submissions {
        let calc = calculate(&table, &constants, &submission).unwrap();
        assert_eq!(
            calc.emissions,
            GasEmissions::ZERO,
            "zero usage must yield zero outputs for {:?}",
            submission.activity.activity_type()
        );
        assert!(!calc.degraded, "zero usage is a success, not a failure");
    }
}

#[test]
fn test_identical_inputs_are_idempotent() {
    let table = base_table();
    let constants = base_constants();
    let submission = stationary_submission(dec!(123.456), PurposeCategory::Domestic);

    let first = calculate(&table, &constants, &submission).unwrap();
    let second = calculate(&table, &constants, &submission).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_total_is_sum_of_gases_for_every_activity() {
    let table = base_table();
    let constants = base_constants();
    let submissions = [
        stationary_submission(dec!(777.77), PurposeCategory::Commercial),
        mobile_submission(dec!(31.9)),
        electricity_submission(dec!(48213), false),
        steam_submission(dec!(5.55), Some(SteamPressure::Low)),
    ];

    for submission in submissions {
        let calc = calculate(&table, &constants, &submission).unwrap();
        assert_eq!(
            calc.emissions.total,
            calc.emissions.co2 + calc.emissions.ch4 + calc.emissions.n2o,
            "additivity must hold for {:?}",
            submission.activity.activity_type()
        );
    }
}

// --- Factor resolution --------------------------------------------------

#[test]
fn test_resolver_exact_year_only() {
    let table = base_table();
    // 2022 has no curated diesel row — 2023/2024 must not be borrowed.
    let resolved = table
        .resolve(
            &FuelId("DIESEL".to_string()),
            2022,
            ActivityType::StationaryCombustion,
            Some(PurposeCategory::EnergyIndustry),
        )
        .unwrap();
    assert_eq!(resolved.source, FactorSource::DefaultedFallback);

    let resolved = table
        .resolve(
            &FuelId("DIESEL".to_string()),
            2023,
            ActivityType::StationaryCombustion,
            Some(PurposeCategory::EnergyIndustry),
        )
        .unwrap();
    assert_eq!(resolved.source, FactorSource::Curated);
}

#[test]
fn test_resolver_skips_inactive_rows() {
    let table = base_table();
    let resolved = table
        .resolve(
            &FuelId("ANTHRACITE".to_string()),
            2024,
            ActivityType::StationaryCombustion,
            Some(PurposeCategory::Manufacturing),
        )
        .unwrap();

    // The 2024 anthracite row exists but is inactive; the coal default
    // (CO2 94600) applies instead of the curated 98300.
    assert_eq!(resolved.source, FactorSource::DefaultedFallback);
    assert_eq!(resolved.co2, dec!(94600));
}

#[test]
fn test_resolver_rejects_purchased_energy() {
    let table = base_table();
    let result = table.resolve(
        &FuelId("ELECTRICITY".to_string()),
        2024,
        ActivityType::Electricity,
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_unresolvable_fuel_still_returns_a_result() {
    let table = base_table();
    let constants = base_constants();
    let submission = UsageSubmission {
        fuel_id: FuelId("MYSTERY_FUEL".to_string()),
        ..stationary_submission(dec!(5), PurposeCategory::Commercial)
    };

    let calc = calculate(&table, &constants, &submission).unwrap();

    assert_eq!(calc.factor_source, FactorSource::DefaultedFallback);
    assert!(calc.emissions.total > Decimal::ZERO);
}

#[test]
fn test_default_lookup_matches_name_substrings() {
    let table = FactorTable::new(vec![]).unwrap();
    let resolved = table
        .resolve(
            &FuelId("PREMIUM_GASOLINE_95".to_string()),
            2024,
            ActivityType::StationaryCombustion,
            Some(PurposeCategory::Commercial),
        )
        .unwrap();
    assert_eq!(resolved.co2, dec!(69300), "gasoline default should match");

    let resolved = table
        .resolve(
            &FuelId("CITY_GAS_SEOUL".to_string()),
            2024,
            ActivityType::StationaryCombustion,
            Some(PurposeCategory::Commercial),
        )
        .unwrap();
    assert_eq!(resolved.co2, dec!(56100), "city gas maps to natural gas");
}

#[test]
fn test_factor_table_rejects_duplicates_and_negatives() {
    let duplicate = FactorTable::new(vec![diesel_row(2024), diesel_row(2024)]);
    assert!(duplicate.is_err());

    let mut bad = diesel_row(2024);
    bad.co2_factor = dec!(-1);
    assert!(FactorTable::new(vec![bad]).is_err());
}

// --- Validation ---------------------------------------------------------

#[test]
fn test_negative_usage_rejected() {
    let table = base_table();
    let constants = base_constants();
    let submission = stationary_submission(dec!(-1), PurposeCategory::Commercial);

    let err = calculate(&table, &constants, &submission).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidField { field: "usage", .. }
    ));
}

#[test]
fn test_out_of_range_month_rejected() {
    let table = base_table();
    let constants = base_constants();
    for month in [0, 13] {
        let submission = UsageSubmission {
            reporting_month: month,
            ..stationary_submission(dec!(1), PurposeCategory::Commercial)
        };
        assert!(
            calculate(&table, &constants, &submission).is_err(),
            "month {month} should be rejected"
        );
    }
}

#[test]
fn test_empty_fuel_id_rejected() {
    let table = base_table();
    let constants = base_constants();
    let submission = UsageSubmission {
        fuel_id: FuelId("  ".to_string()),
        ..stationary_submission(dec!(1), PurposeCategory::Commercial)
    };
    assert!(calculate(&table, &constants, &submission).is_err());
}

#[test]
fn test_non_positive_mobile_distance_rejected() {
    let table = base_table();
    let constants = base_constants();
    let submission = UsageSubmission {
        activity: ActivityData::MobileCombustion {
            vehicle_type: None,
            distance: Some(Decimal::ZERO),
        },
        ..mobile_submission(dec!(10))
    };
    assert!(calculate(&table, &constants, &submission).is_err());
}

// --- Record lifecycle ---------------------------------------------------

#[test]
fn test_record_carries_audit_factors_and_outputs_atomically() {
    let record = make_record(stationary_submission(
        dec!(1000),
        PurposeCategory::EnergyIndustry,
    ));

    assert_eq!(record.scope, Scope::Scope1);
    assert_eq!(record.used_ncv, Some(dec!(35.3)));
    assert_eq!(record.used_co2_factor, dec!(74100));
    assert_eq!(record.total_emission, dec!(2624.5197));
    assert!(record.additivity_holds());
}

#[test]
fn test_with_usage_recomputes_from_stored_factors() {
    let record = make_record(stationary_submission(
        dec!(1000),
        PurposeCategory::EnergyIndustry,
    ));
    let later = now() + chrono::Duration::hours(1);

    let updated = record.with_usage(dec!(500), &base_constants(), later);

    assert_eq!(updated.id, record.id, "identity survives the update");
    assert_eq!(updated.created_at, record.created_at);
    assert_eq!(updated.updated_at, later);
    // energy = 500 × 35.3 = 17650
    assert_eq!(updated.co2_emission, dec!(1307.8650));
    assert_eq!(updated.ch4_emission, dec!(1.1120));
    assert_eq!(updated.n2o_emission, dec!(3.2829));
    assert_eq!(updated.total_emission, dec!(1312.2599));
    assert!(updated.additivity_holds());
}

#[test]
fn test_with_usage_on_renewable_electricity_stays_zero() {
    let record = make_record(electricity_submission(dec!(100), true));
    let updated = record.with_usage(dec!(123456), &base_constants(), now());
    assert_eq!(updated.total_emission, Decimal::ZERO);
}

#[test]
fn test_with_notes_never_touches_emission_fields() {
    let record = make_record(steam_submission(dec!(10), Some(SteamPressure::High)));
    let later = now() + chrono::Duration::minutes(5);

    let updated = record.with_notes(Some("rechecked meter".to_string()), later);

    assert_eq!(updated.id, record.id);
    assert_eq!(updated.created_at, record.created_at);
    assert_eq!(updated.co2_emission, record.co2_emission);
    assert_eq!(updated.ch4_emission, record.ch4_emission);
    assert_eq!(updated.n2o_emission, record.n2o_emission);
    assert_eq!(updated.total_emission, record.total_emission);
    assert_eq!(updated.usage, record.usage);
    assert_eq!(updated.notes.as_deref(), Some("rechecked meter"));
}

#[test]
fn test_scope_derivation() {
    assert_eq!(ActivityType::StationaryCombustion.scope(), Scope::Scope1);
    assert_eq!(ActivityType::MobileCombustion.scope(), Scope::Scope1);
    assert_eq!(ActivityType::Electricity.scope(), Scope::Scope2);
    assert_eq!(ActivityType::Steam.scope(), Scope::Scope2);
}

// --- Serialization ------------------------------------------------------

#[test]
fn test_activity_data_serde_roundtrip() {
    let activity = ActivityData::StationaryCombustion {
        purpose: PurposeCategory::Manufacturing,
        combustion_type: Some("boiler".to_string()),
    };
    let json = serde_json::to_string(&activity).unwrap();
    assert!(json.contains("\"STATIONARY_COMBUSTION\""));
    let back: ActivityData = serde_json::from_str(&json).unwrap();
    assert_eq!(back, activity);
}

#[test]
fn test_record_serde_roundtrip() {
    let record = make_record(mobile_submission(dec!(42)));
    let json = serde_json::to_string(&record).unwrap();
    let back: EmissionRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
