//! `SeaORM` implementation of the `DocumentService` trait.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use chrono_tz::Tz;
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

use crate::db::repositories::document::{DocumentChanges, DocumentRepository, NewDocument, ReportWindow};
use crate::db::repositories::resident::ResidentRepository;
use crate::db::{Store, User};
use crate::domain::calendar::year_range;
use crate::domain::clock::{Clock, format_timestamp};
use crate::domain::numbering::{
    deleted_number, format_document_number, next_running_number, parse_running_number,
};
use crate::domain::status::archive_cutoff;
use crate::domain::{DocumentId, ListFilter, UserId};
use crate::entities::lost_documents;
use crate::models::document::DocumentInput;
use crate::services::audit::{AuditSink, actions};
use crate::services::config_cache::{AppSettings, ConfigCache};
use crate::services::document_service::{
    DocumentError, DocumentService, LostDocumentDetail, can_access,
};

pub struct SeaOrmDocumentService {
    store: Store,
    config: Arc<ConfigCache>,
    audit: AuditSink,
    clock: Arc<dyn Clock>,
}

impl SeaOrmDocumentService {
    #[must_use]
    pub fn new(
        store: Store,
        config: Arc<ConfigCache>,
        audit: AuditSink,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            config,
            audit,
            clock,
        }
    }

    /// Stored timestamps have second precision; comparisons use the same.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(0)
    }

    async fn active_actor(&self, actor: UserId) -> Result<User, DocumentError> {
        self.store
            .get_user(actor.value())
            .await?
            .filter(User::is_active)
            .ok_or(DocumentError::InvalidActor(actor))
    }

    async fn ensure_official_exists(&self, id: i32, label: &str) -> Result<(), DocumentError> {
        if self.store.get_user(id).await?.is_none() {
            return Err(DocumentError::Validation(format!(
                "The selected {label} ({id}) does not exist"
            )));
        }
        Ok(())
    }

    async fn validate_input(&self, input: &DocumentInput) -> Result<(), DocumentError> {
        input.validate().map_err(DocumentError::Validation)?;
        self.ensure_official_exists(input.reporting_officer_id, "reporting officer")
            .await?;
        if let Some(id) = input.approving_official_id {
            self.ensure_official_exists(id, "approving official").await?;
        }
        Ok(())
    }

    /// Next number for the current year in the office timezone.
    async fn next_number<C: ConnectionTrait>(
        db: &C,
        now: DateTime<Utc>,
        tz: Tz,
        settings: &AppSettings,
    ) -> Result<String, DocumentError> {
        let local = now.with_timezone(&tz);
        let (start, end) = year_range(tz, local.year())?;

        let last = DocumentRepository::last_number_between(
            db,
            &format_timestamp(start),
            &format_timestamp(end),
        )
        .await?;
        let from_db = last.as_deref().and_then(parse_running_number).unwrap_or(0);
        let running = next_running_number(from_db, settings.last_number);

        Ok(format_document_number(
            &settings.number_format,
            running,
            local.month(),
            local.year(),
        ))
    }

    async fn load_detail(
        &self,
        id: DocumentId,
        now: DateTime<Utc>,
        archive_days: i64,
    ) -> Result<LostDocumentDetail, DocumentError> {
        let record = self
            .store
            .document_repo()
            .get(id.value())
            .await?
            .ok_or(DocumentError::NotFound(id))?;

        LostDocumentDetail::from_record(record, now, archive_days)
    }

    fn to_details(
        records: Vec<crate::db::DocumentRecord>,
        now: DateTime<Utc>,
        archive_days: i64,
    ) -> Result<Vec<LostDocumentDetail>, DocumentError> {
        records
            .into_iter()
            .map(|record| LostDocumentDetail::from_record(record, now, archive_days))
            .collect()
    }
}

fn authorize(actor: &User, document: &lost_documents::Model) -> Result<(), DocumentError> {
    if can_access(actor.role, actor.id, document.operator_id) {
        Ok(())
    } else {
        warn!(
            actor_id = actor.id,
            document_id = document.id,
            "Access to document denied"
        );
        Err(DocumentError::AccessDenied)
    }
}

static PLACEHOLDER_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Residents registered through a report have no national id yet. The
/// sequence keeps ids unique when the clock does not move between reports.
fn placeholder_national_id(now: DateTime<Utc>) -> String {
    let sequence = PLACEHOLDER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("TEMP{}-{sequence}", now.timestamp())
}

#[async_trait]
impl DocumentService for SeaOrmDocumentService {
    async fn create(
        &self,
        input: DocumentInput,
        operator: UserId,
    ) -> Result<LostDocumentDetail, DocumentError> {
        let input = input.normalized();
        self.active_actor(operator).await?;
        self.validate_input(&input).await?;

        let now = self.now();
        let stamp = format_timestamp(now);
        let settings = self.config.get().await?;
        let tz = self.config.location_or_utc().await;

        let txn = self.store.conn.begin().await?;

        let resident = match ResidentRepository::find_by_identity_in(
            &txn,
            &input.resident.full_name,
            &input.resident.birth_date,
        )
        .await?
        {
            Some(existing) => existing,
            None => {
                ResidentRepository::insert(&txn, placeholder_national_id(now), &input.resident, &stamp)
                    .await?
            }
        };

        let number = Self::next_number(&txn, now, tz, &settings).await?;

        let document = DocumentRepository::insert(
            &txn,
            NewDocument {
                document_number: number.clone(),
                loss_location: input.loss_location.clone(),
                resident_id: resident.id,
                reporting_officer_id: input.reporting_officer_id,
                approving_official_id: input.approving_official_id,
                operator_id: operator.value(),
            },
            &stamp,
        )
        .await?;

        DocumentRepository::insert_items(&txn, document.id, &input.items).await?;

        txn.commit().await?;

        info!(document_id = document.id, number = %number, operator = %operator, "Document created");
        self.audit.log(
            operator,
            actions::CREATE_DOCUMENT,
            format!(
                "Created letter {number} for {}",
                input.resident.full_name
            ),
        );

        self.load_detail(DocumentId::new(document.id), now, settings.archive_duration_days)
            .await
    }

    async fn update(
        &self,
        id: DocumentId,
        input: DocumentInput,
        actor: UserId,
    ) -> Result<LostDocumentDetail, DocumentError> {
        let input = input.normalized();
        let user = self.active_actor(actor).await?;
        self.validate_input(&input).await?;

        let now = self.now();
        let stamp = format_timestamp(now);
        let settings = self.config.get().await?;

        let txn = self.store.conn.begin().await?;

        let existing = DocumentRepository::find_live(&txn, id.value())
            .await?
            .ok_or(DocumentError::NotFound(id))?;
        authorize(&user, &existing)?;

        ResidentRepository::update(&txn, existing.resident_id, &input.resident, &stamp).await?;

        let number = existing.document_number.clone();
        DocumentRepository::update_details(
            &txn,
            existing,
            DocumentChanges {
                loss_location: input.loss_location.clone(),
                reporting_officer_id: input.reporting_officer_id,
                approving_official_id: input.approving_official_id,
                last_updated_by_id: actor.value(),
            },
            &stamp,
        )
        .await?;

        DocumentRepository::replace_items(&txn, id.value(), &input.items).await?;

        txn.commit().await?;

        info!(document_id = %id, number = %number, actor = %actor, "Document updated");
        self.audit.log(
            actor,
            actions::UPDATE_DOCUMENT,
            format!("Updated letter {number}"),
        );

        self.load_detail(id, now, settings.archive_duration_days).await
    }

    async fn delete(&self, id: DocumentId, actor: UserId) -> Result<(), DocumentError> {
        let user = self.active_actor(actor).await?;

        let existing = DocumentRepository::find_live(&self.store.conn, id.value())
            .await?
            .ok_or(DocumentError::NotFound(id))?;
        authorize(&user, &existing)?;

        let now = self.now();
        let stamp = format_timestamp(now);
        let renamed = deleted_number(&existing.document_number, now.timestamp());

        let txn = self.store.conn.begin().await?;
        DocumentRepository::rename(&txn, existing.id, &renamed, &stamp).await?;
        DocumentRepository::soft_delete(&txn, existing.id, &stamp).await?;
        txn.commit().await?;

        info!(document_id = %id, number = %existing.document_number, actor = %actor, "Document deleted");
        self.audit.log(
            actor,
            actions::DELETE_DOCUMENT,
            format!("Deleted letter {}", existing.document_number),
        );

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: DocumentId,
        actor: UserId,
    ) -> Result<LostDocumentDetail, DocumentError> {
        let user = self.active_actor(actor).await?;

        let record = self
            .store
            .document_repo()
            .get(id.value())
            .await?
            .ok_or(DocumentError::NotFound(id))?;
        authorize(&user, &record.document)?;

        let settings = self.config.get().await?;
        LostDocumentDetail::from_record(record, self.now(), settings.archive_duration_days)
    }

    async fn find_all(
        &self,
        query: Option<String>,
        filter: ListFilter,
    ) -> Result<Vec<LostDocumentDetail>, DocumentError> {
        let settings = self.config.get().await?;
        let now = self.now();
        let cutoff = format_timestamp(archive_cutoff(now, settings.archive_duration_days));

        let window = match filter {
            ListFilter::Active => ReportWindow::Since(cutoff),
            ListFilter::Archived => ReportWindow::Before(cutoff),
        };

        let records = self
            .store
            .document_repo()
            .list(query.as_deref(), &window)
            .await?;

        Self::to_details(records, now, settings.archive_duration_days)
    }

    async fn search_global(&self, query: &str) -> Result<Vec<LostDocumentDetail>, DocumentError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let settings = self.config.get().await?;
        let records = self
            .store
            .document_repo()
            .list(Some(query), &ReportWindow::All)
            .await?;

        Self::to_details(records, self.now(), settings.archive_duration_days)
    }

    async fn preview_next_number(&self) -> Result<String, DocumentError> {
        let settings = self.config.get().await?;
        let tz = self.config.location_or_utc().await;
        Self::next_number(&self.store.conn, self.now(), tz, &settings).await
    }
}
