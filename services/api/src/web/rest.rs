//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the shiur endpoints and the master definition
//! for the OpenAPI specification.

use crate::web::davening;
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use portal_core::domain::{ActiveDay, NewShiur, Shiur, WeekDay};
use portal_core::draft::ScheduleDraft;
use portal_core::grouping::{day_options, filter_by_day, group_by_primary_day};
use portal_core::ports::PortError;
use portal_core::schedule::{encode_schedule, Recurring};
use portal_core::summary::{format_time_range, summarize};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        list_shiurim_handler,
        shiur_calendar_handler,
        shiur_days_handler,
        get_shiur_handler,
        create_shiur_handler,
        replace_shiur_handler,
        delete_shiur_handler,
        davening::list_davening_handler,
        davening::create_davening_handler,
        davening::replace_davening_handler,
        davening::delete_davening_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ActiveDayView,
            ShiurSummary,
            ShiurDetail,
            CalendarBucket,
            DayOption,
            ShiurPayload,
            DayInput,
            davening::DaveningPayload,
            davening::DaveningView,
        )
    ),
    tags(
        (name = "Community Portal API", description = "Shiur listings and shul davening schedules.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// One active day of a shiur, with its time window rendered for display.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDayView {
    day: u8,
    day_name: &'static str,
    start: String,
    end: Option<String>,
    notes: Option<String>,
    display: String,
}

impl From<&ActiveDay> for ActiveDayView {
    fn from(active: &ActiveDay) -> Self {
        Self {
            day: active.day.index(),
            day_name: active.day.name(),
            start: active.entry.start.clone(),
            end: active.entry.end.clone(),
            notes: active.entry.notes.clone(),
            display: format_time_range(&active.entry.start, active.entry.end.as_deref()),
        }
    }
}

/// A shiur as shown in a list or table row.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiurSummary {
    id: Uuid,
    title: String,
    teacher: String,
    location: Option<String>,
    summary: String,
    active_days: Vec<ActiveDayView>,
    duration: Option<String>,
}

impl From<&Shiur> for ShiurSummary {
    fn from(shiur: &Shiur) -> Self {
        let active = shiur.active_days();
        Self {
            id: shiur.id,
            title: shiur.title.clone(),
            teacher: shiur.teacher_display(),
            location: shiur.location.clone(),
            summary: summarize(&active),
            active_days: active.iter().map(ActiveDayView::from).collect(),
            duration: match shiur.schedule {
                Some(_) => None,
                None => shiur.legacy.duration_label(),
            },
        }
    }
}

/// The full shiur record, including the stored schedule in its wire shape.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiurDetail {
    id: Uuid,
    title: String,
    teacher_title: Option<String>,
    teacher_name: String,
    teacher: String,
    location: Option<String>,
    description: Option<String>,
    #[schema(value_type = Option<Object>)]
    schedule: Option<Value>,
    day_of_week: Option<u8>,
    time: Option<String>,
    duration: Option<i32>,
    summary: String,
    active_days: Vec<ActiveDayView>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Shiur> for ShiurDetail {
    fn from(shiur: &Shiur) -> Self {
        let active = shiur.active_days();
        Self {
            id: shiur.id,
            title: shiur.title.clone(),
            teacher_title: shiur.teacher_title.clone(),
            teacher_name: shiur.teacher_name.clone(),
            teacher: shiur.teacher_display(),
            location: shiur.location.clone(),
            description: shiur.description.clone(),
            schedule: shiur.schedule.as_ref().map(encode_schedule),
            day_of_week: shiur.legacy.day_of_week.map(WeekDay::index),
            time: shiur.legacy.time.clone(),
            duration: shiur.legacy.duration_minutes,
            summary: summarize(&active),
            active_days: active.iter().map(ActiveDayView::from).collect(),
            created_at: shiur.created_at,
            updated_at: shiur.updated_at,
        }
    }
}

/// One calendar column. `day` is `-1` for shiurim without any scheduled day.
#[derive(Serialize, ToSchema)]
pub struct CalendarBucket {
    day: i8,
    label: &'static str,
    shiurim: Vec<ShiurSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct DayOption {
    day: u8,
    label: &'static str,
}

/// A day the shiur meets on. `end` and `notes` may be blank.
#[derive(Deserialize, ToSchema)]
pub struct DayInput {
    pub day: i64,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create/replace payload. Omitting `days` stores no schedule at all; an empty
/// list stores an explicitly empty one.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiurPayload {
    pub title: String,
    #[serde(default)]
    pub teacher_title: Option<String>,
    pub teacher_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Option<Vec<DayInput>>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only shiurim meeting on this weekday (0 = Sunday).
    pub day: Option<i64>,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Maps a port failure onto a response, logging anything that is not a 404.
pub(crate) fn port_failure(context: &str, e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        other => {
            error!("{}: {:?}", context, other);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

pub(crate) fn parse_day(raw: i64) -> Result<WeekDay, (StatusCode, String)> {
    WeekDay::from_index(raw).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid day {}: expected 0 (Sunday) through 6 (Saturday)", raw),
        )
    })
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates a payload and runs its days through a `ScheduleDraft`.
fn new_shiur_from_payload(payload: ShiurPayload) -> Result<NewShiur, (StatusCode, String)> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Title is required".to_string()));
    }
    let teacher_name = payload.teacher_name.trim().to_string();
    if teacher_name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Teacher name is required".to_string()));
    }

    let schedule = match payload.days {
        None => None,
        Some(days) => {
            let mut draft = ScheduleDraft::new();
            for input in days {
                let day = parse_day(input.day)?;
                draft
                    .enable(day)
                    .set_start(day, input.start)
                    .set_end(day, input.end.unwrap_or_default())
                    .set_notes(day, input.notes.unwrap_or_default());
            }
            let schedule = draft
                .commit()
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            Some(schedule)
        }
    };

    Ok(NewShiur {
        title,
        teacher_title: blank_to_none(payload.teacher_title),
        teacher_name,
        location: blank_to_none(payload.location),
        description: blank_to_none(payload.description),
        schedule,
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// List shiurim with their schedule summaries.
#[utoipa::path(
    get,
    path = "/shiurim",
    params(ListQuery),
    responses(
        (status = 200, description = "Shiurim in creation order", body = [ShiurSummary]),
        (status = 400, description = "Day filter out of range"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_shiurim_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let day = query.day.map(parse_day).transpose()?;
    let shiurim = app_state
        .repo
        .list_shiurim()
        .await
        .map_err(|e| port_failure("Failed to list shiurim", e))?;

    let rows: Vec<ShiurSummary> = match day {
        Some(day) => filter_by_day(&shiurim, day)
            .into_iter()
            .map(ShiurSummary::from)
            .collect(),
        None => shiurim.iter().map(ShiurSummary::from).collect(),
    };
    Ok(Json(rows))
}

/// Shiurim bucketed by the first weekday they meet on.
#[utoipa::path(
    get,
    path = "/shiurim/calendar",
    responses(
        (status = 200, description = "Sunday through Saturday, then the flexible-schedule bucket", body = [CalendarBucket]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn shiur_calendar_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let shiurim = app_state
        .repo
        .list_shiurim()
        .await
        .map_err(|e| port_failure("Failed to load shiur calendar", e))?;

    let buckets: Vec<CalendarBucket> = group_by_primary_day(shiurim.iter())
        .into_buckets()
        .into_iter()
        .map(|(bucket, items)| CalendarBucket {
            day: bucket.index(),
            label: bucket.label(),
            shiurim: items.into_iter().map(ShiurSummary::from).collect(),
        })
        .collect();
    Ok(Json(buckets))
}

/// Weekdays that at least one shiur meets on, for the day filter dropdown.
#[utoipa::path(
    get,
    path = "/shiurim/days",
    responses(
        (status = 200, description = "Days in ascending order", body = [DayOption]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn shiur_days_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let shiurim = app_state
        .repo
        .list_shiurim()
        .await
        .map_err(|e| port_failure("Failed to load shiur days", e))?;

    let options: Vec<DayOption> = day_options(&shiurim)
        .into_iter()
        .map(|day| DayOption {
            day: day.index(),
            label: day.name(),
        })
        .collect();
    Ok(Json(options))
}

#[utoipa::path(
    get,
    path = "/shiurim/{id}",
    params(("id" = Uuid, Path, description = "The shiur's ID.")),
    responses(
        (status = 200, description = "The shiur", body = ShiurDetail),
        (status = 404, description = "No such shiur")
    )
)]
pub async fn get_shiur_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let shiur = app_state
        .repo
        .get_shiur(id)
        .await
        .map_err(|e| port_failure("Failed to load shiur", e))?;
    Ok(Json(ShiurDetail::from(&shiur)))
}

/// Create a shiur. Every listed day must carry a start time.
#[utoipa::path(
    post,
    path = "/shiurim",
    request_body = ShiurPayload,
    responses(
        (status = 201, description = "Shiur created", body = ShiurDetail),
        (status = 400, description = "Missing field, invalid day, or a day without a start time"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_shiur_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ShiurPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let new_shiur = new_shiur_from_payload(payload)?;
    let shiur = app_state
        .repo
        .create_shiur(new_shiur)
        .await
        .map_err(|e| port_failure("Failed to create shiur", e))?;
    info!("Created shiur {}", shiur.id);
    Ok((StatusCode::CREATED, Json(ShiurDetail::from(&shiur))))
}

/// Replace a shiur's editable fields and schedule wholesale.
#[utoipa::path(
    put,
    path = "/shiurim/{id}",
    params(("id" = Uuid, Path, description = "The shiur's ID.")),
    request_body = ShiurPayload,
    responses(
        (status = 200, description = "Shiur replaced", body = ShiurDetail),
        (status = 400, description = "Missing field, invalid day, or a day without a start time"),
        (status = 404, description = "No such shiur")
    )
)]
pub async fn replace_shiur_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ShiurPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let new_shiur = new_shiur_from_payload(payload)?;
    let shiur = app_state
        .repo
        .replace_shiur(id, new_shiur)
        .await
        .map_err(|e| port_failure("Failed to update shiur", e))?;
    info!("Replaced shiur {}", shiur.id);
    Ok(Json(ShiurDetail::from(&shiur)))
}

#[utoipa::path(
    delete,
    path = "/shiurim/{id}",
    params(("id" = Uuid, Path, description = "The shiur's ID.")),
    responses(
        (status = 204, description = "Shiur deleted"),
        (status = 404, description = "No such shiur")
    )
)]
pub async fn delete_shiur_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .repo
        .delete_shiur(id)
        .await
        .map_err(|e| port_failure("Failed to delete shiur", e))?;
    info!("Deleted shiur {}", id);
    Ok(StatusCode::NO_CONTENT)
}
