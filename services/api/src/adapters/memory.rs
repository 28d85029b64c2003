//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `ListingRepository` port. Used when no
//! database is configured and by the integration tests.

use async_trait::async_trait;
use chrono::Utc;
use portal_core::domain::{DaveningSchedule, LegacyRecurrence, NewDavening, NewShiur, Shiur};
use portal_core::ports::{ListingRepository, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records are kept in insertion order, which is also the listing order.
#[derive(Default)]
pub struct InMemoryAdapter {
    shiurim: RwLock<Vec<Shiur>>,
    davening: RwLock<Vec<DaveningSchedule>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a complete record as-is, including legacy single-day fields that
    /// the port's create operation never writes.
    pub async fn insert_shiur_record(&self, shiur: Shiur) {
        self.shiurim.write().await.push(shiur);
    }
}

fn shiur_not_found(id: Uuid) -> PortError {
    PortError::NotFound(format!("Shiur {} not found", id))
}

fn davening_not_found(id: Uuid) -> PortError {
    PortError::NotFound(format!("Davening schedule {} not found", id))
}

#[async_trait]
impl ListingRepository for InMemoryAdapter {
    async fn list_shiurim(&self) -> PortResult<Vec<Shiur>> {
        Ok(self.shiurim.read().await.clone())
    }

    async fn get_shiur(&self, id: Uuid) -> PortResult<Shiur> {
        self.shiurim
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| shiur_not_found(id))
    }

    async fn create_shiur(&self, shiur: NewShiur) -> PortResult<Shiur> {
        let now = Utc::now();
        let record = Shiur {
            id: Uuid::new_v4(),
            title: shiur.title,
            teacher_title: shiur.teacher_title,
            teacher_name: shiur.teacher_name,
            location: shiur.location,
            description: shiur.description,
            schedule: shiur.schedule,
            legacy: LegacyRecurrence::default(),
            created_at: now,
            updated_at: now,
        };
        self.shiurim.write().await.push(record.clone());
        Ok(record)
    }

    async fn replace_shiur(&self, id: Uuid, shiur: NewShiur) -> PortResult<Shiur> {
        let mut shiurim = self.shiurim.write().await;
        let existing = shiurim
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| shiur_not_found(id))?;

        existing.title = shiur.title;
        existing.teacher_title = shiur.teacher_title;
        existing.teacher_name = shiur.teacher_name;
        existing.location = shiur.location;
        existing.description = shiur.description;
        existing.schedule = shiur.schedule;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_shiur(&self, id: Uuid) -> PortResult<()> {
        let mut shiurim = self.shiurim.write().await;
        let before = shiurim.len();
        shiurim.retain(|s| s.id != id);
        if shiurim.len() == before {
            return Err(shiur_not_found(id));
        }
        Ok(())
    }

    async fn list_davening_for_shul(&self, shul_id: Uuid) -> PortResult<Vec<DaveningSchedule>> {
        Ok(self
            .davening
            .read()
            .await
            .iter()
            .filter(|row| row.shul_id == shul_id)
            .cloned()
            .collect())
    }

    async fn create_davening(&self, row: NewDavening) -> PortResult<DaveningSchedule> {
        let record = DaveningSchedule {
            id: Uuid::new_v4(),
            shul_id: row.shul_id,
            tefilah_type: row.tefilah_type,
            day_of_week: row.day_of_week,
            time: row.time,
            notes: row.notes,
            seasons: row.seasons,
        };
        self.davening.write().await.push(record.clone());
        Ok(record)
    }

    async fn replace_davening(&self, id: Uuid, row: NewDavening) -> PortResult<DaveningSchedule> {
        let mut davening = self.davening.write().await;
        let existing = davening
            .iter_mut()
            .find(|r| r.id == id && r.shul_id == row.shul_id)
            .ok_or_else(|| davening_not_found(id))?;

        *existing = DaveningSchedule {
            id,
            shul_id: row.shul_id,
            tefilah_type: row.tefilah_type,
            day_of_week: row.day_of_week,
            time: row.time,
            notes: row.notes,
            seasons: row.seasons,
        };
        Ok(existing.clone())
    }

    async fn delete_davening(&self, shul_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut davening = self.davening.write().await;
        let before = davening.len();
        davening.retain(|r| !(r.id == id && r.shul_id == shul_id));
        if davening.len() == before {
            return Err(davening_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use portal_core::domain::{ScheduleEntry, SeasonFlags, TefilahType, WeekDay, WeeklySchedule};

    fn new_shiur(title: &str, schedule: Option<WeeklySchedule>) -> NewShiur {
        NewShiur {
            title: title.to_string(),
            teacher_title: None,
            teacher_name: "Levi".to_string(),
            location: None,
            description: None,
            schedule,
        }
    }

    #[tokio::test]
    async fn replace_swaps_whole_record_but_keeps_legacy_fields() {
        let repo = InMemoryAdapter::new();
        let now = Utc::now();
        let id = Uuid::new_v4();
        repo.insert_shiur_record(Shiur {
            id,
            title: "Old".to_string(),
            teacher_title: None,
            teacher_name: "Levi".to_string(),
            location: Some("Main shul".to_string()),
            description: None,
            schedule: None,
            legacy: LegacyRecurrence {
                day_of_week: Some(WeekDay::Monday),
                time: Some("20:00".to_string()),
                duration_minutes: Some(60),
            },
            created_at: now,
            updated_at: now,
        })
        .await;

        let schedule = WeeklySchedule::new().with(WeekDay::Thursday, ScheduleEntry::at("21:00"));
        let updated = repo
            .replace_shiur(id, new_shiur("New", Some(schedule.clone())))
            .await
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.location, None);
        assert_eq!(updated.schedule, Some(schedule));
        assert_eq!(updated.legacy.day_of_week, Some(WeekDay::Monday));
        assert_eq!(repo.list_shiurim().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_records_report_not_found() {
        let repo = InMemoryAdapter::new();
        let id = Uuid::new_v4();
        assert_matches!(repo.get_shiur(id).await, Err(PortError::NotFound(_)));
        assert_matches!(repo.replace_shiur(id, new_shiur("x", None)).await, Err(PortError::NotFound(_)));
        assert_matches!(repo.delete_shiur(id).await, Err(PortError::NotFound(_)));
        assert_matches!(repo.delete_davening(Uuid::new_v4(), id).await, Err(PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn davening_rows_are_scoped_to_their_shul() {
        let repo = InMemoryAdapter::new();
        let (shul_a, shul_b) = (Uuid::new_v4(), Uuid::new_v4());
        let maariv = |shul_id| NewDavening {
            shul_id,
            tefilah_type: TefilahType::Maariv,
            day_of_week: None,
            time: "21:30".to_string(),
            notes: None,
            seasons: SeasonFlags::default(),
        };
        let mut ids = Vec::new();
        for shul_id in [shul_a, shul_a, shul_b] {
            ids.push(repo.create_davening(maariv(shul_id)).await.unwrap().id);
        }

        assert_eq!(repo.list_davening_for_shul(shul_a).await.unwrap().len(), 2);
        assert_eq!(repo.list_davening_for_shul(shul_b).await.unwrap().len(), 1);
        assert!(repo.list_davening_for_shul(Uuid::new_v4()).await.unwrap().is_empty());

        // Shul B cannot reach shul A's rows.
        assert_matches!(repo.replace_davening(ids[0], maariv(shul_b)).await, Err(PortError::NotFound(_)));
        assert_matches!(repo.delete_davening(shul_b, ids[0]).await, Err(PortError::NotFound(_)));
        assert_eq!(repo.list_davening_for_shul(shul_a).await.unwrap().len(), 2);

        repo.delete_davening(shul_a, ids[0]).await.unwrap();
        assert_eq!(repo.list_davening_for_shul(shul_a).await.unwrap().len(), 1);
    }
}
