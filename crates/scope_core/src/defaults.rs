//! Built-in default fuel factors used when no curated row exists for a
//! `(fuel id, year)` pair.
//!
//! Selection is a substring heuristic over the fuel identifier: the first
//! entry whose any keyword occurs in the uppercased id wins, with a
//! generic petroleum fallback at the end. Results derived from this table
//! are tagged `FactorSource::DefaultedFallback` so callers can tell them
//! apart from curated figures — a submission is never blocked on a
//! missing factor row.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub(crate) struct DefaultFactorSet {
    keywords: &'static [&'static str],
    pub name: &'static str,
    pub ncv: Decimal,
    pub co2: Decimal,
    /// Single CH4/N2O value applied to every purpose category; the
    /// defaults carry no per-purpose split.
    pub ch4: Decimal,
    pub n2o: Decimal,
    pub mobile_co2: Decimal,
    pub mobile_ch4: Decimal,
    pub mobile_n2o: Decimal,
}

/// NCV in the per-unit convention of the curated table, gas factors per
/// unit energy. Ordering matters: first keyword hit wins.
const DEFAULT_FUEL_FACTORS: &[DefaultFactorSet] = &[
    DefaultFactorSet {
        keywords: &["GASOLINE", "PETROL"],
        name: "Gasoline (default)",
        ncv: dec!(30.3),
        co2: dec!(69300),
        ch4: dec!(3),
        n2o: dec!(0.6),
        mobile_co2: dec!(69300),
        mobile_ch4: dec!(25),
        mobile_n2o: dec!(8),
    },
    DefaultFactorSet {
        keywords: &["DIESEL", "LIGHT_OIL", "GAS_OIL"],
        name: "Diesel (default)",
        ncv: dec!(35.3),
        co2: dec!(74100),
        ch4: dec!(3),
        n2o: dec!(0.6),
        mobile_co2: dec!(74100),
        mobile_ch4: dec!(3.9),
        mobile_n2o: dec!(3.9),
    },
    DefaultFactorSet {
        keywords: &["KEROSENE", "JET"],
        name: "Kerosene (default)",
        ncv: dec!(34.1),
        co2: dec!(71900),
        ch4: dec!(3),
        n2o: dec!(0.6),
        mobile_co2: dec!(71900),
        mobile_ch4: dec!(3),
        mobile_n2o: dec!(0.6),
    },
    DefaultFactorSet {
        keywords: &["HEAVY", "BUNKER", "B_C"],
        name: "Heavy fuel oil (default)",
        ncv: dec!(39.2),
        co2: dec!(77400),
        ch4: dec!(3),
        n2o: dec!(0.6),
        mobile_co2: dec!(77400),
        mobile_ch4: dec!(7),
        mobile_n2o: dec!(2),
    },
    DefaultFactorSet {
        keywords: &["LPG", "PROPANE", "BUTANE"],
        name: "LPG (default)",
        ncv: dec!(50.4),
        co2: dec!(63100),
        ch4: dec!(1),
        n2o: dec!(0.1),
        mobile_co2: dec!(63100),
        mobile_ch4: dec!(62),
        mobile_n2o: dec!(0.2),
    },
    DefaultFactorSet {
        keywords: &["LNG", "NATURAL_GAS", "CITY_GAS"],
        name: "Natural gas (default)",
        ncv: dec!(54.6),
        co2: dec!(56100),
        ch4: dec!(1),
        n2o: dec!(0.1),
        mobile_co2: dec!(56100),
        mobile_ch4: dec!(92),
        mobile_n2o: dec!(3),
    },
    DefaultFactorSet {
        keywords: &["ANTHRACITE", "BITUMINOUS", "COAL", "COKE"],
        name: "Coal (default)",
        ncv: dec!(25.8),
        co2: dec!(94600),
        ch4: dec!(10),
        n2o: dec!(1.5),
        mobile_co2: dec!(94600),
        mobile_ch4: dec!(10),
        mobile_n2o: dec!(1.5),
    },
];

/// Catch-all when no keyword matches.
const GENERIC_PETROLEUM: DefaultFactorSet = DefaultFactorSet {
    keywords: &[],
    name: "Generic petroleum fuel (default)",
    ncv: dec!(35.3),
    co2: dec!(74100),
    ch4: dec!(3),
    n2o: dec!(0.6),
    mobile_co2: dec!(74100),
    mobile_ch4: dec!(3.9),
    mobile_n2o: dec!(3.9),
};

pub(crate) fn lookup(fuel_id: &str) -> &'static DefaultFactorSet {
    let needle = fuel_id.to_ascii_uppercase();
    DEFAULT_FUEL_FACTORS
        .iter()
        .find(|set| set.keywords.iter().any(|kw| needle.contains(kw)))
        .unwrap_or(&GENERIC_PETROLEUM)
}
