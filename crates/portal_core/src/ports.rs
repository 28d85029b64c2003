//! crates/portal_core/src/ports.rs
//!
//! Defines the storage contract the core depends on. Listings live in an external
//! store; the core only ever sees whole, already-decoded records.

use crate::domain::{DaveningSchedule, NewDavening, NewShiur, Shiur};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the backing store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Whole-record storage for listings. Writes replace the entire record and the
/// last write wins; there is no conflict detection.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    // --- Shiurim ---
    /// All shiurim in creation order.
    async fn list_shiurim(&self) -> PortResult<Vec<Shiur>>;

    async fn get_shiur(&self, id: Uuid) -> PortResult<Shiur>;

    async fn create_shiur(&self, shiur: NewShiur) -> PortResult<Shiur>;

    /// Replaces the editable fields. Legacy single-day fields are left untouched.
    async fn replace_shiur(&self, id: Uuid, shiur: NewShiur) -> PortResult<Shiur>;

    async fn delete_shiur(&self, id: Uuid) -> PortResult<()>;

    // --- Davening schedules ---
    async fn list_davening_for_shul(&self, shul_id: Uuid) -> PortResult<Vec<DaveningSchedule>>;

    async fn create_davening(&self, row: NewDavening) -> PortResult<DaveningSchedule>;

    /// Replaces a row owned by `row.shul_id`. A row belonging to another shul is
    /// reported as `NotFound`.
    async fn replace_davening(&self, id: Uuid, row: NewDavening) -> PortResult<DaveningSchedule>;

    async fn delete_davening(&self, shul_id: Uuid, id: Uuid) -> PortResult<()>;
}
