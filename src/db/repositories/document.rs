use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::LikeExpr,
};
use std::collections::HashMap;

use super::user::User;
use crate::domain::numbering::DELETED_PREFIX;
use crate::entities::{lost_documents, lost_items, residents, users};
use crate::models::document::LostItemInput;

const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `query` anywhere, with its wildcards taken literally.
fn contains_pattern(query: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape(LIKE_ESCAPE)
}

/// A letter with everything needed to render it.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub document: lost_documents::Model,
    pub resident: Option<residents::Model>,
    pub items: Vec<lost_items::Model>,
    pub operator: Option<User>,
    pub reporting_officer: Option<User>,
    pub approving_official: Option<User>,
    pub last_updated_by: Option<User>,
}

/// Report-date window applied to listings. Timestamps use the stored text
/// format, so comparisons happen in SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportWindow {
    All,
    /// Reported at or after the cutoff.
    Since(String),
    /// Reported strictly before the cutoff.
    Before(String),
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub document_number: String,
    pub loss_location: String,
    pub resident_id: i32,
    pub reporting_officer_id: i32,
    pub approving_official_id: Option<i32>,
    pub operator_id: i32,
}

#[derive(Debug, Clone)]
pub struct DocumentChanges {
    pub loss_location: String,
    pub reporting_officer_id: i32,
    pub approving_official_id: Option<i32>,
    pub last_updated_by_id: i32,
}

pub struct DocumentRepository {
    conn: DatabaseConnection,
}

impl DocumentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Letter by id, ignoring soft-deleted rows.
    pub async fn find_live<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<lost_documents::Model>> {
        lost_documents::Entity::find_by_id(id)
            .filter(lost_documents::Column::DeletedAt.is_null())
            .one(db)
            .await
            .context("Failed to query document by ID")
    }

    pub async fn get(&self, id: i32) -> Result<Option<DocumentRecord>> {
        let Some(document) = Self::find_live(&self.conn, id).await? else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![document]).await?.into_iter().next())
    }

    /// Live letters, newest report first, optionally narrowed by a free-text
    /// match on number or resident name.
    pub async fn list(&self, query: Option<&str>, window: &ReportWindow) -> Result<Vec<DocumentRecord>> {
        let mut select = lost_documents::Entity::find()
            .join(JoinType::InnerJoin, lost_documents::Relation::Residents.def())
            .filter(lost_documents::Column::DeletedAt.is_null());

        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(lost_documents::Column::DocumentNumber.like(contains_pattern(q)))
                    .add(residents::Column::FullName.like(contains_pattern(q))),
            );
        }

        select = match window {
            ReportWindow::All => select,
            ReportWindow::Since(cutoff) => {
                select.filter(lost_documents::Column::ReportDate.gte(cutoff.as_str()))
            }
            ReportWindow::Before(cutoff) => {
                select.filter(lost_documents::Column::ReportDate.lt(cutoff.as_str()))
            }
        };

        let documents = select
            .order_by_desc(lost_documents::Column::ReportDate)
            .order_by_desc(lost_documents::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list documents")?;

        self.hydrate(documents).await
    }

    /// Number of the most recently inserted letter reported in
    /// `[start, end)`. Soft-deleted rows count, renamed ones do not.
    pub async fn last_number_between<C: ConnectionTrait>(
        db: &C,
        start: &str,
        end: &str,
    ) -> Result<Option<String>> {
        let last = lost_documents::Entity::find()
            .filter(lost_documents::Column::ReportDate.gte(start))
            .filter(lost_documents::Column::ReportDate.lt(end))
            .filter(lost_documents::Column::DocumentNumber.not_like(format!("{DELETED_PREFIX}%")))
            .order_by_desc(lost_documents::Column::Id)
            .one(db)
            .await
            .context("Failed to query last document number")?;

        Ok(last.map(|doc| doc.document_number))
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        new_document: NewDocument,
        now: &str,
    ) -> Result<lost_documents::Model> {
        let active = lost_documents::ActiveModel {
            document_number: Set(new_document.document_number),
            report_date: Set(now.to_string()),
            status: Set(lost_documents::DocumentStatus::Issued),
            loss_location: Set(new_document.loss_location),
            resident_id: Set(new_document.resident_id),
            reporting_officer_id: Set(new_document.reporting_officer_id),
            approving_official_id: Set(new_document.approving_official_id),
            operator_id: Set(new_document.operator_id),
            last_updated_by_id: Set(None),
            approved_at: Set(Some(now.to_string())),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            deleted_at: Set(None),
            ..Default::default()
        };

        active.insert(db).await.context("Failed to insert document")
    }

    pub async fn insert_items<C: ConnectionTrait>(
        db: &C,
        document_id: i32,
        items: &[LostItemInput],
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let rows = items.iter().map(|item| lost_items::ActiveModel {
            lost_document_id: Set(document_id),
            item_name: Set(item.item_name.clone()),
            description: Set(item.description.clone()),
            ..Default::default()
        });

        lost_items::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await
            .context("Failed to insert lost items")?;

        Ok(())
    }

    pub async fn replace_items<C: ConnectionTrait>(
        db: &C,
        document_id: i32,
        items: &[LostItemInput],
    ) -> Result<()> {
        lost_items::Entity::delete_many()
            .filter(lost_items::Column::LostDocumentId.eq(document_id))
            .exec(db)
            .await
            .context("Failed to delete lost items")?;

        Self::insert_items(db, document_id, items).await
    }

    pub async fn update_details<C: ConnectionTrait>(
        db: &C,
        document: lost_documents::Model,
        changes: DocumentChanges,
        now: &str,
    ) -> Result<()> {
        let mut active: lost_documents::ActiveModel = document.into();
        active.loss_location = Set(changes.loss_location);
        active.reporting_officer_id = Set(changes.reporting_officer_id);
        active.approving_official_id = Set(changes.approving_official_id);
        active.last_updated_by_id = Set(Some(changes.last_updated_by_id));
        active.updated_at = Set(now.to_string());
        active.update(db).await.context("Failed to update document")?;

        Ok(())
    }

    pub async fn rename<C: ConnectionTrait>(db: &C, id: i32, new_number: &str, now: &str) -> Result<()> {
        lost_documents::Entity::update_many()
            .col_expr(
                lost_documents::Column::DocumentNumber,
                sea_orm::sea_query::Expr::value(new_number),
            )
            .col_expr(
                lost_documents::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(lost_documents::Column::Id.eq(id))
            .exec(db)
            .await
            .context("Failed to rename document number")?;

        Ok(())
    }

    pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: i32, now: &str) -> Result<()> {
        lost_documents::Entity::update_many()
            .col_expr(
                lost_documents::Column::DeletedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(lost_documents::Column::Id.eq(id))
            .exec(db)
            .await
            .context("Failed to soft-delete document")?;

        Ok(())
    }

    pub async fn count_reported_between(&self, start: &str, end: &str) -> Result<u64> {
        lost_documents::Entity::find()
            .filter(lost_documents::Column::DeletedAt.is_null())
            .filter(lost_documents::Column::ReportDate.gte(start))
            .filter(lost_documents::Column::ReportDate.lt(end))
            .count(&self.conn)
            .await
            .context("Failed to count documents")
    }

    pub async fn report_dates_between(&self, start: &str, end: &str) -> Result<Vec<String>> {
        let rows = lost_documents::Entity::find()
            .filter(lost_documents::Column::DeletedAt.is_null())
            .filter(lost_documents::Column::ReportDate.gte(start))
            .filter(lost_documents::Column::ReportDate.lt(end))
            .all(&self.conn)
            .await
            .context("Failed to load report dates")?;

        Ok(rows.into_iter().map(|doc| doc.report_date).collect())
    }

    /// Names of every item on a live letter.
    pub async fn live_item_names(&self) -> Result<Vec<String>> {
        let rows = lost_items::Entity::find()
            .join(JoinType::InnerJoin, lost_items::Relation::LostDocuments.def())
            .filter(lost_documents::Column::DeletedAt.is_null())
            .all(&self.conn)
            .await
            .context("Failed to load lost items")?;

        Ok(rows.into_iter().map(|item| item.item_name).collect())
    }

    /// The operator's live letters reported in `[start, end]`, oldest first.
    pub async fn operator_documents_between(
        &self,
        operator_id: i32,
        start: &str,
        end: &str,
    ) -> Result<Vec<DocumentRecord>> {
        let documents = lost_documents::Entity::find()
            .filter(lost_documents::Column::DeletedAt.is_null())
            .filter(lost_documents::Column::OperatorId.eq(operator_id))
            .filter(lost_documents::Column::ReportDate.gte(start))
            .filter(lost_documents::Column::ReportDate.lte(end))
            .order_by_asc(lost_documents::Column::ReportDate)
            .all(&self.conn)
            .await
            .context("Failed to query expiring documents")?;

        self.hydrate(documents).await
    }

    async fn hydrate(&self, documents: Vec<lost_documents::Model>) -> Result<Vec<DocumentRecord>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let document_ids: Vec<i32> = documents.iter().map(|d| d.id).collect();

        let mut resident_ids: Vec<i32> = documents.iter().map(|d| d.resident_id).collect();
        resident_ids.sort_unstable();
        resident_ids.dedup();

        let mut user_ids: Vec<i32> = documents
            .iter()
            .flat_map(|d| {
                [
                    Some(d.operator_id),
                    Some(d.reporting_officer_id),
                    d.approving_official_id,
                    d.last_updated_by_id,
                ]
            })
            .flatten()
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let residents: HashMap<i32, residents::Model> = residents::Entity::find()
            .filter(residents::Column::Id.is_in(resident_ids))
            .all(&self.conn)
            .await
            .context("Failed to load residents")?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let mut items: HashMap<i32, Vec<lost_items::Model>> = HashMap::new();
        for item in lost_items::Entity::find()
            .filter(lost_items::Column::LostDocumentId.is_in(document_ids))
            .order_by_asc(lost_items::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load lost items")?
        {
            items.entry(item.lost_document_id).or_default().push(item);
        }

        let users: HashMap<i32, User> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.conn)
            .await
            .context("Failed to load document users")?
            .into_iter()
            .map(|u| (u.id, User::from(u)))
            .collect();

        let lookup = |id: Option<i32>| id.and_then(|id| users.get(&id).cloned());

        Ok(documents
            .into_iter()
            .map(|document| DocumentRecord {
                resident: residents.get(&document.resident_id).cloned(),
                items: items.remove(&document.id).unwrap_or_default(),
                operator: lookup(Some(document.operator_id)),
                reporting_officer: lookup(Some(document.reporting_officer_id)),
                approving_official: lookup(document.approving_official_id),
                last_updated_by: lookup(document.last_updated_by_id),
                document,
            })
            .collect())
    }
}
