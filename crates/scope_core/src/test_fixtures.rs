//! Shared test fixtures for scope_core and downstream crates.
//!
//! `base_table()` provides a small curated factor table (diesel, LNG,
//! anthracite at 2024, diesel again at 2023) and `base_constants()` the
//! default constants, so engine and daemon tests run on the same data.

use rust_decimal_macros::dec;

use crate::{
    EngineConstants, FactorTable, FuelCategory, FuelFactorRow, FuelId, MobileFactors,
    PurposeFactors,
};

/// Diesel row used by most combustion tests. NCV 35.3, CO2 74100,
/// per-purpose CH4 3/3/10/10 and N2O 0.6/0.6/0.6/0.6, mobile triple
/// 74100/3.9/3.9.
pub fn diesel_row(year: i32) -> FuelFactorRow {
    FuelFactorRow {
        fuel_id: FuelId("DIESEL".to_string()),
        fuel_name: "Diesel".to_string(),
        category: FuelCategory::LiquidPetroleum,
        unit: "kL".to_string(),
        applicable_year: year,
        gcv: dec!(37.7),
        ncv: dec!(35.3),
        co2_factor: dec!(74100),
        ch4_factors: PurposeFactors {
            energy_industry: dec!(3),
            manufacturing: dec!(3),
            commercial: dec!(10),
            domestic: dec!(10),
        },
        n2o_factors: PurposeFactors::uniform(dec!(0.6)),
        mobile_factors: Some(MobileFactors {
            co2: dec!(74100),
            ch4: dec!(3.9),
            n2o: dec!(3.9),
        }),
        active: true,
    }
}

pub fn lng_row(year: i32) -> FuelFactorRow {
    FuelFactorRow {
        fuel_id: FuelId("LNG".to_string()),
        fuel_name: "LNG".to_string(),
        category: FuelCategory::GaseousPetroleum,
        unit: "t".to_string(),
        applicable_year: year,
        gcv: dec!(54.6),
        ncv: dec!(49.3),
        co2_factor: dec!(56100),
        ch4_factors: PurposeFactors {
            energy_industry: dec!(1),
            manufacturing: dec!(1),
            commercial: dec!(5),
            domestic: dec!(5),
        },
        n2o_factors: PurposeFactors::uniform(dec!(0.1)),
        mobile_factors: None,
        active: true,
    }
}

/// Anthracite row flagged inactive — the resolver must never select it.
pub fn inactive_anthracite_row(year: i32) -> FuelFactorRow {
    FuelFactorRow {
        fuel_id: FuelId("ANTHRACITE".to_string()),
        fuel_name: "Anthracite".to_string(),
        category: FuelCategory::SolidPetroleum,
        unit: "t".to_string(),
        applicable_year: year,
        gcv: dec!(26.7),
        ncv: dec!(25.8),
        co2_factor: dec!(98300),
        ch4_factors: PurposeFactors::uniform(dec!(10)),
        n2o_factors: PurposeFactors::uniform(dec!(1.5)),
        mobile_factors: None,
        active: false,
    }
}

pub fn base_table() -> FactorTable {
    FactorTable::new(vec![
        diesel_row(2024),
        diesel_row(2023),
        lng_row(2024),
        inactive_anthracite_row(2024),
    ])
    .expect("fixture factor table is valid")
}

pub fn base_constants() -> EngineConstants {
    EngineConstants::default()
}
