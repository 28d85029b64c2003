//! services/api/src/web/davening.rs
//!
//! Handlers for a shul's davening timetable. Rows are created, replaced and
//! deleted one at a time.

use crate::web::rest::{parse_day, port_failure};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use portal_core::domain::{DaveningSchedule, NewDavening, SeasonFlags, TefilahType, WeekDay};
use portal_core::season::sort_for_display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payload and Response Structs
//=========================================================================================

/// A davening row as submitted by the shul's manager. A null `dayOfWeek` means
/// every day; null season flags mean unset.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaveningPayload {
    #[schema(value_type = String, example = "mincha")]
    pub tefilah_type: TefilahType,
    #[serde(default)]
    pub day_of_week: Option<i64>,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_winter: Option<bool>,
    #[serde(default)]
    pub is_summer: Option<bool>,
    #[serde(default)]
    pub is_shabbos: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaveningView {
    id: Uuid,
    shul_id: Uuid,
    #[schema(value_type = String)]
    tefilah_type: TefilahType,
    tefilah_name: &'static str,
    day_of_week: Option<u8>,
    day_label: &'static str,
    time: String,
    time_display: String,
    notes: Option<String>,
    is_winter: bool,
    is_summer: bool,
    is_shabbos: bool,
    badges: Vec<&'static str>,
}

impl From<&DaveningSchedule> for DaveningView {
    fn from(row: &DaveningSchedule) -> Self {
        Self {
            id: row.id,
            shul_id: row.shul_id,
            tefilah_type: row.tefilah_type,
            tefilah_name: row.tefilah_type.name(),
            day_of_week: row.day_of_week.map(WeekDay::index),
            day_label: row.day_label(),
            time: row.time.clone(),
            time_display: row.time_display(),
            notes: row.notes.clone(),
            is_winter: row.seasons.is_winter,
            is_summer: row.seasons.is_summer,
            is_shabbos: row.seasons.is_shabbos,
            badges: row.seasons.labels(),
        }
    }
}

fn new_davening_from_payload(
    shul_id: Uuid,
    payload: DaveningPayload,
) -> Result<NewDavening, (StatusCode, String)> {
    let time = payload.time.trim().to_string();
    if time.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Time is required".to_string()));
    }
    let day_of_week = payload.day_of_week.map(parse_day).transpose()?;

    Ok(NewDavening {
        shul_id,
        tefilah_type: payload.tefilah_type,
        day_of_week,
        time,
        notes: payload
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        seasons: SeasonFlags::from_nullable(payload.is_winter, payload.is_summer, payload.is_shabbos),
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// A shul's timetable in display order.
#[utoipa::path(
    get,
    path = "/shuls/{shul_id}/davening",
    params(("shul_id" = Uuid, Path, description = "The shul's ID.")),
    responses(
        (status = 200, description = "Rows ordered by tefilah, day, then time", body = [DaveningView]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_davening_handler(
    State(app_state): State<Arc<AppState>>,
    Path(shul_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut rows = app_state
        .repo
        .list_davening_for_shul(shul_id)
        .await
        .map_err(|e| port_failure("Failed to list davening schedule", e))?;
    sort_for_display(&mut rows);
    Ok(Json(rows.iter().map(DaveningView::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    post,
    path = "/shuls/{shul_id}/davening",
    params(("shul_id" = Uuid, Path, description = "The shul's ID.")),
    request_body = DaveningPayload,
    responses(
        (status = 201, description = "Row created", body = DaveningView),
        (status = 400, description = "Missing time or invalid day"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_davening_handler(
    State(app_state): State<Arc<AppState>>,
    Path(shul_id): Path<Uuid>,
    Json(payload): Json<DaveningPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let row = new_davening_from_payload(shul_id, payload)?;
    let created = app_state
        .repo
        .create_davening(row)
        .await
        .map_err(|e| port_failure("Failed to create davening schedule", e))?;
    info!("Created davening row {} for shul {}", created.id, shul_id);
    Ok((StatusCode::CREATED, Json(DaveningView::from(&created))))
}

#[utoipa::path(
    put,
    path = "/shuls/{shul_id}/davening/{id}",
    params(
        ("shul_id" = Uuid, Path, description = "The shul's ID."),
        ("id" = Uuid, Path, description = "The davening row's ID.")
    ),
    request_body = DaveningPayload,
    responses(
        (status = 200, description = "Row replaced", body = DaveningView),
        (status = 400, description = "Missing time or invalid day"),
        (status = 404, description = "No such row for this shul")
    )
)]
pub async fn replace_davening_handler(
    State(app_state): State<Arc<AppState>>,
    Path((shul_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DaveningPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let row = new_davening_from_payload(shul_id, payload)?;
    let replaced = app_state
        .repo
        .replace_davening(id, row)
        .await
        .map_err(|e| port_failure("Failed to update davening schedule", e))?;
    info!("Replaced davening row {}", id);
    Ok(Json(DaveningView::from(&replaced)))
}

#[utoipa::path(
    delete,
    path = "/shuls/{shul_id}/davening/{id}",
    params(
        ("shul_id" = Uuid, Path, description = "The shul's ID."),
        ("id" = Uuid, Path, description = "The davening row's ID.")
    ),
    responses(
        (status = 204, description = "Row deleted"),
        (status = 404, description = "No such row for this shul")
    )
)]
pub async fn delete_davening_handler(
    State(app_state): State<Arc<AppState>>,
    Path((shul_id, id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .repo
        .delete_davening(shul_id, id)
        .await
        .map_err(|e| port_failure("Failed to delete davening schedule", e))?;
    info!("Deleted davening row {}", id);
    Ok(StatusCode::NO_CONTENT)
}
