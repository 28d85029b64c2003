//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the Postgres implementation of the
//! `ListingRepository` port from the `core` crate, built on `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::domain::{
    DaveningSchedule, LegacyRecurrence, NewDavening, NewShiur, SeasonFlags, Shiur, TefilahType,
    WeekDay,
};
use portal_core::ports::{ListingRepository, PortError, PortResult};
use portal_core::schedule::{decode_schedule, encode_schedule};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

const SHIUR_COLUMNS: &str = "id, title, teacher_title, teacher_name, location, description, \
     schedule, day_of_week, meeting_time, duration_minutes, created_at, updated_at";

const DAVENING_COLUMNS: &str = "id, shul_id, tefilah_type, day_of_week, davening_time, notes, \
     is_winter, is_summer, is_shabbos";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ListingRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ShiurRecord {
    id: Uuid,
    title: String,
    teacher_title: Option<String>,
    teacher_name: String,
    location: Option<String>,
    description: Option<String>,
    schedule: Option<Value>,
    day_of_week: Option<i32>,
    meeting_time: Option<String>,
    duration_minutes: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShiurRecord {
    fn to_domain(self) -> Shiur {
        let legacy_day = self.day_of_week.and_then(|d| {
            let day = WeekDay::from_index(i64::from(d));
            if day.is_none() {
                warn!("Shiur {} has out-of-range day_of_week {}", self.id, d);
            }
            day
        });
        Shiur {
            id: self.id,
            title: self.title,
            teacher_title: self.teacher_title,
            teacher_name: self.teacher_name,
            location: self.location,
            description: self.description,
            schedule: self.schedule.as_ref().and_then(decode_schedule),
            legacy: LegacyRecurrence {
                day_of_week: legacy_day,
                time: self.meeting_time,
                duration_minutes: self.duration_minutes,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct DaveningRecord {
    id: Uuid,
    shul_id: Uuid,
    tefilah_type: String,
    day_of_week: Option<i32>,
    davening_time: String,
    notes: Option<String>,
    is_winter: Option<bool>,
    is_summer: Option<bool>,
    is_shabbos: Option<bool>,
}

impl DaveningRecord {
    fn to_domain(self) -> PortResult<DaveningSchedule> {
        let tefilah_type = TefilahType::parse(&self.tefilah_type).ok_or_else(|| {
            PortError::Unexpected(format!(
                "Davening row {} has unknown tefilah type '{}'",
                self.id, self.tefilah_type
            ))
        })?;
        Ok(DaveningSchedule {
            id: self.id,
            shul_id: self.shul_id,
            tefilah_type,
            day_of_week: self
                .day_of_week
                .and_then(|d| WeekDay::from_index(i64::from(d))),
            time: self.davening_time,
            notes: self.notes,
            seasons: SeasonFlags::from_nullable(self.is_winter, self.is_summer, self.is_shabbos),
        })
    }
}

fn day_column(day: Option<WeekDay>) -> Option<i32> {
    day.map(|d| i32::from(d.index()))
}

//=========================================================================================
// `ListingRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ListingRepository for DbAdapter {
    async fn list_shiurim(&self) -> PortResult<Vec<Shiur>> {
        let records = sqlx::query_as::<_, ShiurRecord>(&format!(
            "SELECT {} FROM shiurim ORDER BY created_at ASC, id ASC",
            SHIUR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_shiur(&self, id: Uuid) -> PortResult<Shiur> {
        let record = sqlx::query_as::<_, ShiurRecord>(&format!(
            "SELECT {} FROM shiurim WHERE id = $1",
            SHIUR_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Shiur {} not found", id)),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_shiur(&self, shiur: NewShiur) -> PortResult<Shiur> {
        let record = sqlx::query_as::<_, ShiurRecord>(&format!(
            "INSERT INTO shiurim (id, title, teacher_title, teacher_name, location, description, schedule) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            SHIUR_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&shiur.title)
        .bind(&shiur.teacher_title)
        .bind(&shiur.teacher_name)
        .bind(&shiur.location)
        .bind(&shiur.description)
        .bind(shiur.schedule.as_ref().map(encode_schedule))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn replace_shiur(&self, id: Uuid, shiur: NewShiur) -> PortResult<Shiur> {
        let record = sqlx::query_as::<_, ShiurRecord>(&format!(
            "UPDATE shiurim SET title = $2, teacher_title = $3, teacher_name = $4, location = $5, \
             description = $6, schedule = $7, updated_at = now() WHERE id = $1 RETURNING {}",
            SHIUR_COLUMNS
        ))
        .bind(id)
        .bind(&shiur.title)
        .bind(&shiur.teacher_title)
        .bind(&shiur.teacher_name)
        .bind(&shiur.location)
        .bind(&shiur.description)
        .bind(shiur.schedule.as_ref().map(encode_schedule))
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Shiur {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn delete_shiur(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM shiurim WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Shiur {} not found", id)));
        }
        Ok(())
    }

    async fn list_davening_for_shul(&self, shul_id: Uuid) -> PortResult<Vec<DaveningSchedule>> {
        let records = sqlx::query_as::<_, DaveningRecord>(&format!(
            "SELECT {} FROM davening_schedules WHERE shul_id = $1 ORDER BY created_at ASC, id ASC",
            DAVENING_COLUMNS
        ))
        .bind(shul_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn create_davening(&self, row: NewDavening) -> PortResult<DaveningSchedule> {
        let record = sqlx::query_as::<_, DaveningRecord>(&format!(
            "INSERT INTO davening_schedules \
             (id, shul_id, tefilah_type, day_of_week, davening_time, notes, is_winter, is_summer, is_shabbos) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            DAVENING_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(row.shul_id)
        .bind(row.tefilah_type.as_str())
        .bind(day_column(row.day_of_week))
        .bind(&row.time)
        .bind(&row.notes)
        .bind(row.seasons.is_winter)
        .bind(row.seasons.is_summer)
        .bind(row.seasons.is_shabbos)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn replace_davening(&self, id: Uuid, row: NewDavening) -> PortResult<DaveningSchedule> {
        let record = sqlx::query_as::<_, DaveningRecord>(&format!(
            "UPDATE davening_schedules SET tefilah_type = $3, day_of_week = $4, \
             davening_time = $5, notes = $6, is_winter = $7, is_summer = $8, is_shabbos = $9 \
             WHERE id = $1 AND shul_id = $2 RETURNING {}",
            DAVENING_COLUMNS
        ))
        .bind(id)
        .bind(row.shul_id)
        .bind(row.tefilah_type.as_str())
        .bind(day_column(row.day_of_week))
        .bind(&row.time)
        .bind(&row.notes)
        .bind(row.seasons.is_winter)
        .bind(row.seasons.is_summer)
        .bind(row.seasons.is_shabbos)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Davening schedule {} not found", id)))?;
        record.to_domain()
    }

    async fn delete_davening(&self, shul_id: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM davening_schedules WHERE id = $1 AND shul_id = $2")
            .bind(id)
            .bind(shul_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Davening schedule {} not found", id)));
        }
        Ok(())
    }
}
