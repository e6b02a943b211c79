//! Persistence gateway: the owner-scoped contract for storing resumes.
//!
//! Backends:
//! - `PgGateway`: the server's Postgres table.
//! - `HttpGateway`: the wizard's client of the `/api/v1/resumes` endpoints.
//! - `InMemoryGateway`: process-local map, used in tests and local runs.
//!
//! The wizard store holds an `Arc<dyn ResumeGateway>`, so it never knows
//! which backend sits behind it.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::record::StoredResume;
use crate::models::resume::ResumeDocument;

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::HttpGateway;
pub use memory::InMemoryGateway;
pub use postgres::PgGateway;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Resume not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Every call is scoped by `owner`. A record owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait ResumeGateway: Send + Sync {
    /// Owner's resumes, most recently updated first.
    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, GatewayError>;

    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, GatewayError>;

    /// Stores a new resume; identity and owner are assigned here, never taken
    /// from the caller's document.
    async fn create(
        &self,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError>;

    /// Full-document replace.
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError>;

    /// Hard delete.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), GatewayError>;
}
