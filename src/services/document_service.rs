//! Domain service for lost-item report letters.
//!
//! Covers resident lookup, numbering, the create/update/delete transactions,
//! ownership checks and the read-time archival status.

use serde::Serialize;
use thiserror::Error;

use crate::db::{DocumentRecord, User};
use crate::domain::status::derive_status;
use crate::domain::{DocumentId, ListFilter, UserId};
use crate::domain::clock::parse_timestamp;
use crate::entities::lost_documents::DocumentStatus;
use crate::entities::users::Role;
use crate::models::document::DocumentInput;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document {0} not found")]
    NotFound(DocumentId),

    #[error("You do not have access to this document")]
    AccessDenied,

    #[error("Unknown or inactive user {0}")]
    InvalidActor(UserId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DocumentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DocumentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Short reference to an account shown on a letter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OfficialDto {
    pub id: i32,
    pub full_name: String,
    pub nrp: String,
    pub rank: String,
    pub position: String,
}

impl From<User> for OfficialDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            nrp: user.nrp,
            rank: user.rank,
            position: user.position,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidentDto {
    pub id: i32,
    pub national_id: String,
    pub full_name: String,
    pub birth_place: String,
    pub birth_date: String,
    pub sex: String,
    pub religion: String,
    pub occupation: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LostItemDto {
    pub id: i32,
    pub item_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LostDocumentDetail {
    pub id: DocumentId,
    pub document_number: String,
    pub report_date: String,
    /// Recomputed on every read.
    pub status: DocumentStatus,
    pub loss_location: String,
    pub resident: Option<ResidentDto>,
    pub items: Vec<LostItemDto>,
    pub operator: Option<OfficialDto>,
    pub reporting_officer: Option<OfficialDto>,
    pub approving_official: Option<OfficialDto>,
    pub last_updated_by: Option<OfficialDto>,
    pub approved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl LostDocumentDetail {
    /// Builds the response shape and derives the status as of `now`.
    pub fn from_record(
        record: DocumentRecord,
        now: chrono::DateTime<chrono::Utc>,
        archive_days: i64,
    ) -> Result<Self, DocumentError> {
        let reported = parse_timestamp(&record.document.report_date)?;
        let doc = record.document;

        Ok(Self {
            id: DocumentId::new(doc.id),
            document_number: doc.document_number,
            report_date: doc.report_date,
            status: derive_status(reported, now, archive_days),
            loss_location: doc.loss_location,
            resident: record.resident.map(|r| ResidentDto {
                id: r.id,
                national_id: r.national_id,
                full_name: r.full_name,
                birth_place: r.birth_place,
                birth_date: r.birth_date,
                sex: r.sex,
                religion: r.religion,
                occupation: r.occupation,
                address: r.address,
            }),
            items: record
                .items
                .into_iter()
                .map(|item| LostItemDto {
                    id: item.id,
                    item_name: item.item_name,
                    description: item.description,
                })
                .collect(),
            operator: record.operator.map(OfficialDto::from),
            reporting_officer: record.reporting_officer.map(OfficialDto::from),
            approving_official: record.approving_official.map(OfficialDto::from),
            last_updated_by: record.last_updated_by.map(OfficialDto::from),
            approved_at: doc.approved_at,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// Super-admins may touch any letter; operators only their own.
#[must_use]
pub fn can_access(role: Role, actor_id: i32, operator_id: i32) -> bool {
    role == Role::SuperAdmin || actor_id == operator_id
}

#[async_trait::async_trait]
pub trait DocumentService: Send + Sync {
    /// Registers a new letter, creating the resident when no one with the
    /// same name and birth date exists yet.
    async fn create(
        &self,
        input: DocumentInput,
        operator: UserId,
    ) -> Result<LostDocumentDetail, DocumentError>;

    async fn update(
        &self,
        id: DocumentId,
        input: DocumentInput,
        actor: UserId,
    ) -> Result<LostDocumentDetail, DocumentError>;

    /// Renames the number out of the way and soft-deletes the letter.
    async fn delete(&self, id: DocumentId, actor: UserId) -> Result<(), DocumentError>;

    async fn find_by_id(
        &self,
        id: DocumentId,
        actor: UserId,
    ) -> Result<LostDocumentDetail, DocumentError>;

    async fn find_all(
        &self,
        query: Option<String>,
        filter: ListFilter,
    ) -> Result<Vec<LostDocumentDetail>, DocumentError>;

    /// Searches active and archived letters. An empty query returns nothing.
    async fn search_global(&self, query: &str) -> Result<Vec<LostDocumentDetail>, DocumentError>;

    /// The number the next letter would receive right now.
    async fn preview_next_number(&self) -> Result<String, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_rule() {
        assert!(can_access(Role::SuperAdmin, 1, 99));
        assert!(can_access(Role::Operator, 7, 7));
        assert!(!can_access(Role::Operator, 7, 8));
    }
}
