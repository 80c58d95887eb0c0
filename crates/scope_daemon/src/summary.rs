//! Dashboard aggregations over emission records.
//!
//! Plain sum/group operations: `total_emission` is treated as already
//! correct and only summed. Every view recomputes from the source
//! records it is given.

use rust_decimal::Decimal;
use scope_core::{ActivityType, EmissionRecord, Scope};
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNASSIGNED_FACILITY: &str = "UNASSIGNED";

#[derive(Debug, Clone, Serialize)]
pub struct ScopeSummary {
    pub scope1_total: Decimal,
    pub scope2_total: Decimal,
    pub total_emission: Decimal,
    pub by_activity: Vec<ActivityTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityTotal {
    pub activity_type: ActivityType,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearTrend {
    pub year: i32,
    pub scope1_total: Decimal,
    pub scope2_total: Decimal,
    pub total_emission: Decimal,
}

const ACTIVITY_ORDER: [ActivityType; 4] = [
    ActivityType::StationaryCombustion,
    ActivityType::MobileCombustion,
    ActivityType::Electricity,
    ActivityType::Steam,
];

/// Scope 1 / Scope 2 split plus per-activity detail.
pub fn scope_summary(records: &[&EmissionRecord]) -> ScopeSummary {
    let mut scope1_total = Decimal::ZERO;
    let mut scope2_total = Decimal::ZERO;
    for record in records {
        match record.scope {
            Scope::Scope1 => scope1_total += record.total_emission,
            Scope::Scope2 => scope2_total += record.total_emission,
        }
    }

    let by_activity = ACTIVITY_ORDER
        .iter()
        .map(|&activity_type| ActivityTotal {
            activity_type,
            total: records
                .iter()
                .filter(|r| r.activity_type() == activity_type)
                .map(|r| r.total_emission)
                .sum(),
        })
        .collect();

    ScopeSummary {
        scope1_total,
        scope2_total,
        total_emission: scope1_total + scope2_total,
        by_activity,
    }
}

/// Twelve buckets, one per reporting month, zeros included.
pub fn monthly_totals(records: &[&EmissionRecord]) -> Vec<MonthlyTotal> {
    (1..=12)
        .map(|month| MonthlyTotal {
            month,
            total: records
                .iter()
                .filter(|r| r.reporting_month == month)
                .map(|r| r.total_emission)
                .sum(),
        })
        .collect()
}

pub fn totals_by_fuel(records: &[&EmissionRecord]) -> Vec<CategoryTotal> {
    grouped(records, |r| r.fuel_id.0.clone())
}

pub fn totals_by_facility(records: &[&EmissionRecord]) -> Vec<CategoryTotal> {
    grouped(records, |r| {
        r.facility_location
            .clone()
            .unwrap_or_else(|| UNASSIGNED_FACILITY.to_string())
    })
}

/// Per-year scope split for multi-year trend charts. `records_by_year`
/// entries may overlap in company; callers pre-filter.
pub fn trend(records_by_year: &[(i32, Vec<&EmissionRecord>)]) -> Vec<YearTrend> {
    records_by_year
        .iter()
        .map(|(year, records)| {
            let summary = scope_summary(records);
            YearTrend {
                year: *year,
                scope1_total: summary.scope1_total,
                scope2_total: summary.scope2_total,
                total_emission: summary.total_emission,
            }
        })
        .collect()
}

fn grouped(
    records: &[&EmissionRecord],
    key: impl Fn(&EmissionRecord) -> String,
) -> Vec<CategoryTotal> {
    // BTreeMap keeps category ordering stable across calls.
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for record in records {
        *totals.entry(key(record)).or_default() += record.total_emission;
    }
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}
