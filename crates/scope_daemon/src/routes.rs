//! HTTP routes for the emission record API.
//!
//! Caller identity arrives from the upstream gateway as an `X-MEMBER-ID`
//! header plus a `companyId` parameter; nothing here authenticates, only
//! enforces that a record's owner matches the caller.

use crate::state::AppState;
use crate::store::{RecordFilter, StoreError};
use crate::summary;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use scope_core::{
    calculate, ActivityData, ActivityType, CompanyId, EmissionRecord, EngineError, FactorSource,
    FuelId, MemberId, PurposeCategory, RecordId, SteamPressure, UsageSubmission,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, "http://localhost:5173")
}

pub fn make_router_with_cors(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<axum::http::HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // `:key` is the activity type for POST (create) and the record id for
    // GET/PUT/DELETE, matching the gateway's URL scheme.
    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/fuels", get(fuels_handler))
        .route("/api/v1/emissions", get(list_handler))
        .route(
            "/api/v1/emissions/:key",
            get(get_handler)
                .post(create_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/api/v1/summary/scope", get(scope_summary_handler))
        .route("/api/v1/summary/monthly", get(monthly_handler))
        .route("/api/v1/summary/by-fuel", get(by_fuel_handler))
        .route("/api/v1/summary/by-facility", get(by_facility_handler))
        .route("/api/v1/summary/trend", get(trend_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Forbidden,
    NotFound,
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::Forbidden => Self::Forbidden,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "validation", message),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "record does not belong to the requesting member".to_string(),
            ),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "emission record not found".to_string(),
            ),
        };
        (
            status,
            Json(serde_json::json!({"error": error, "message": message})),
        )
            .into_response()
    }
}

fn member_id(headers: &HeaderMap) -> Result<MemberId, ApiError> {
    headers
        .get("x-member-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .map(MemberId)
        .ok_or_else(|| ApiError::BadRequest("missing or invalid X-MEMBER-ID header".to_string()))
}

fn parse_record_id(key: &str) -> Result<RecordId, ApiError> {
    key.parse::<uuid::Uuid>()
        .map(RecordId)
        .map_err(|_| ApiError::BadRequest(format!("not a record id: {key}")))
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionRequest {
    pub fuel_id: String,
    pub usage: Decimal,
    #[serde(default)]
    pub usage_unit: Option<String>,
    pub reporting_year: i32,
    pub reporting_month: u32,
    #[serde(default)]
    pub purpose_category: Option<PurposeCategory>,
    #[serde(default)]
    pub combustion_type: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub distance: Option<Decimal>,
    #[serde(default)]
    pub is_renewable: Option<bool>,
    #[serde(default)]
    pub renewable_type: Option<String>,
    #[serde(default)]
    pub steam_type: Option<String>,
    #[serde(default)]
    pub facility_location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionUpdateRequest {
    #[serde(default)]
    pub fuel_id: Option<String>,
    #[serde(default)]
    pub usage: Option<Decimal>,
    #[serde(default)]
    pub usage_unit: Option<String>,
    #[serde(default)]
    pub purpose_category: Option<PurposeCategory>,
    #[serde(default)]
    pub steam_type: Option<String>,
    #[serde(default)]
    pub is_renewable: Option<bool>,
    #[serde(default)]
    pub distance: Option<Decimal>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub facility_location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EmissionUpdateRequest {
    /// A notes-only change must not trigger recomputation.
    fn is_notes_only(&self) -> bool {
        self.fuel_id.is_none()
            && self.usage.is_none()
            && self.usage_unit.is_none()
            && self.purpose_category.is_none()
            && self.steam_type.is_none()
            && self.is_renewable.is_none()
            && self.distance.is_none()
            && self.vehicle_type.is_none()
            && self.facility_location.is_none()
    }
}

fn build_activity(
    activity_type: ActivityType,
    req: &EmissionRequest,
) -> Result<ActivityData, ApiError> {
    match activity_type {
        ActivityType::StationaryCombustion => {
            let purpose = req.purpose_category.ok_or_else(|| {
                ApiError::BadRequest(
                    "purposeCategory is required for stationary combustion".to_string(),
                )
            })?;
            Ok(ActivityData::StationaryCombustion {
                purpose,
                combustion_type: req.combustion_type.clone(),
            })
        }
        ActivityType::MobileCombustion => Ok(ActivityData::MobileCombustion {
            vehicle_type: req.vehicle_type.clone(),
            distance: req.distance,
        }),
        ActivityType::Electricity => Ok(ActivityData::Electricity {
            renewable: req.is_renewable.unwrap_or(false),
            renewable_type: req.renewable_type.clone(),
        }),
        ActivityType::Steam => Ok(ActivityData::Steam {
            pressure: req.steam_type.as_deref().and_then(SteamPressure::from_label),
        }),
    }
}

/// Carries forward the record's activity data, overridden by whatever the
/// update supplies for its branch.
fn merge_activity(existing: &ActivityData, req: &EmissionUpdateRequest) -> ActivityData {
    match existing {
        ActivityData::StationaryCombustion {
            purpose,
            combustion_type,
        } => ActivityData::StationaryCombustion {
            purpose: req.purpose_category.unwrap_or(*purpose),
            combustion_type: combustion_type.clone(),
        },
        ActivityData::MobileCombustion {
            vehicle_type,
            distance,
        } => ActivityData::MobileCombustion {
            vehicle_type: req.vehicle_type.clone().or_else(|| vehicle_type.clone()),
            distance: req.distance.or(*distance),
        },
        ActivityData::Electricity {
            renewable,
            renewable_type,
        } => ActivityData::Electricity {
            renewable: req.is_renewable.unwrap_or(*renewable),
            renewable_type: renewable_type.clone(),
        },
        ActivityData::Steam { pressure } => ActivityData::Steam {
            pressure: match &req.steam_type {
                Some(label) => SteamPressure::from_label(label),
                None => *pressure,
            },
        },
    }
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    company_id: String,
}

async fn create_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<CreateParams>,
    headers: HeaderMap,
    Json(req): Json<EmissionRequest>,
) -> Result<(StatusCode, Json<EmissionRecord>), ApiError> {
    let member = member_id(&headers)?;
    let activity_type: ActivityType = key.parse().map_err(ApiError::BadRequest)?;
    let activity = build_activity(activity_type, &req)?;

    let submission = UsageSubmission {
        fuel_id: FuelId(req.fuel_id),
        usage: req.usage,
        usage_unit: req.usage_unit,
        reporting_year: req.reporting_year,
        reporting_month: req.reporting_month,
        activity,
    };
    let calculation = calculate(&state.content.table, &state.content.constants, &submission)?;
    if calculation.factor_source == FactorSource::DefaultedFallback {
        tracing::warn!(
            fuel = %submission.fuel_id,
            year = submission.reporting_year,
            "no curated factor row; default factors applied"
        );
    }
    if calculation.degraded {
        tracing::warn!(fuel = %submission.fuel_id, "calculation degraded to zero outputs");
    }

    let record = EmissionRecord::from_calculation(
        member,
        CompanyId(params.company_id),
        submission,
        req.facility_location,
        req.notes,
        calculation,
        Utc::now(),
    );
    state.store.write().insert(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<EmissionRecord>, ApiError> {
    let member = member_id(&headers)?;
    let id = parse_record_id(&key)?;
    let store = state.store.read();
    Ok(Json(store.get_owned(member, id)?.clone()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    activity_type: Option<String>,
    #[serde(default)]
    reporting_year: Option<i32>,
    #[serde(default)]
    reporting_month: Option<u32>,
}

async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<EmissionRecord>>, ApiError> {
    let member = member_id(&headers)?;
    let activity_type = params
        .activity_type
        .as_deref()
        .map(str::parse::<ActivityType>)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let filter = RecordFilter {
        company_id: params.company_id.map(CompanyId),
        activity_type,
        reporting_year: params.reporting_year,
        reporting_month: params.reporting_month,
    };
    let store = state.store.read();
    let records = store
        .query(member, &filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(records))
}

async fn update_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(req): Json<EmissionUpdateRequest>,
) -> Result<Json<EmissionRecord>, ApiError> {
    let member = member_id(&headers)?;
    let id = parse_record_id(&key)?;
    let now = Utc::now();

    let mut store = state.store.write();
    let existing = store.get_owned(member, id)?.clone();

    let updated = if req.is_notes_only() {
        existing.with_notes(req.notes, now)
    } else {
        // Re-run the strategy with the new usage and the record's existing
        // (or newly supplied) purpose/fuel; identity and creation time
        // survive, all four computed fields are replaced together.
        let activity = merge_activity(&existing.activity, &req);
        let submission = UsageSubmission {
            fuel_id: req
                .fuel_id
                .map(FuelId)
                .unwrap_or_else(|| existing.fuel_id.clone()),
            usage: req.usage.unwrap_or(existing.usage),
            usage_unit: req.usage_unit.or_else(|| existing.usage_unit.clone()),
            reporting_year: existing.reporting_year,
            reporting_month: existing.reporting_month,
            activity,
        };
        let calculation =
            calculate(&state.content.table, &state.content.constants, &submission)?;
        let mut rebuilt = EmissionRecord::from_calculation(
            member,
            existing.company_id.clone(),
            submission,
            req.facility_location
                .or_else(|| existing.facility_location.clone()),
            req.notes.or_else(|| existing.notes.clone()),
            calculation,
            now,
        );
        rebuilt.id = existing.id;
        rebuilt.created_at = existing.created_at;
        rebuilt
    };

    store.replace(updated.clone());
    Ok(Json(updated))
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let member = member_id(&headers)?;
    let id = parse_record_id(&key)?;
    state.store.write().remove(member, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Catalog and meta handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct FuelCatalogEntry {
    fuel_id: FuelId,
    fuel_name: String,
    category: scope_core::FuelCategory,
    unit: String,
    applicable_year: i32,
    mobile_eligible: bool,
}

async fn fuels_handler(State(state): State<AppState>) -> Json<Vec<FuelCatalogEntry>> {
    let mut entries: Vec<FuelCatalogEntry> = state
        .content
        .table
        .rows()
        .filter(|row| row.active)
        .map(|row| FuelCatalogEntry {
            fuel_id: row.fuel_id.clone(),
            fuel_name: row.fuel_name.clone(),
            category: row.category,
            unit: row.unit.clone(),
            applicable_year: row.applicable_year,
            mobile_eligible: row.mobile_factors.is_some(),
        })
        .collect();
    entries.sort_by(|a, b| (&a.fuel_id.0, a.applicable_year).cmp(&(&b.fuel_id.0, b.applicable_year)));
    Json(entries)
}

async fn meta_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let record_count = state.store.read().len();
    Json(serde_json::json!({
        "content_version": state.content.content_version,
        "fuel_rows": state.content.table.len(),
        "records": record_count,
    }))
}

// ---------------------------------------------------------------------------
// Summary handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryParams {
    company_id: String,
    year: i32,
}

fn company_year_records(
    state: &AppState,
    member: MemberId,
    company_id: &str,
    year: i32,
) -> Vec<EmissionRecord> {
    let filter = RecordFilter {
        company_id: Some(CompanyId(company_id.to_string())),
        reporting_year: Some(year),
        ..RecordFilter::default()
    };
    state
        .store
        .read()
        .query(member, &filter)
        .into_iter()
        .cloned()
        .collect()
}

async fn scope_summary_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
    headers: HeaderMap,
) -> Result<Json<summary::ScopeSummary>, ApiError> {
    let member = member_id(&headers)?;
    let records = company_year_records(&state, member, &params.company_id, params.year);
    let refs: Vec<&EmissionRecord> = records.iter().collect();
    Ok(Json(summary::scope_summary(&refs)))
}

async fn monthly_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<summary::MonthlyTotal>>, ApiError> {
    let member = member_id(&headers)?;
    let records = company_year_records(&state, member, &params.company_id, params.year);
    let refs: Vec<&EmissionRecord> = records.iter().collect();
    Ok(Json(summary::monthly_totals(&refs)))
}

async fn by_fuel_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<summary::CategoryTotal>>, ApiError> {
    let member = member_id(&headers)?;
    let records = company_year_records(&state, member, &params.company_id, params.year);
    let refs: Vec<&EmissionRecord> = records.iter().collect();
    Ok(Json(summary::totals_by_fuel(&refs)))
}

async fn by_facility_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<summary::CategoryTotal>>, ApiError> {
    let member = member_id(&headers)?;
    let records = company_year_records(&state, member, &params.company_id, params.year);
    let refs: Vec<&EmissionRecord> = records.iter().collect();
    Ok(Json(summary::totals_by_facility(&refs)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendParams {
    company_id: String,
    /// Comma-separated, e.g. `2022,2023,2024`.
    years: String,
}

async fn trend_handler(
    State(state): State<AppState>,
    Query(params): Query<TrendParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<summary::YearTrend>>, ApiError> {
    let member = member_id(&headers)?;
    let years: Vec<i32> = params
        .years
        .split(',')
        .map(|y| {
            y.trim()
                .parse::<i32>()
                .map_err(|_| ApiError::BadRequest(format!("not a year: {y}")))
        })
        .collect::<Result<_, _>>()?;

    let per_year: Vec<(i32, Vec<EmissionRecord>)> = years
        .into_iter()
        .map(|year| {
            (
                year,
                company_year_records(&state, member, &params.company_id, year),
            )
        })
        .collect();
    let by_year: Vec<(i32, Vec<&EmissionRecord>)> = per_year
        .iter()
        .map(|(year, records)| (*year, records.iter().collect()))
        .collect();
    Ok(Json(summary::trend(&by_year)))
}
