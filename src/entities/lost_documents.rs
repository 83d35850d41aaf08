use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored letters are always `Issued`; `Archived` is derived when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "DITERBITKAN")]
    #[serde(rename = "DITERBITKAN")]
    Issued,
    #[sea_orm(string_value = "DIARSIPKAN")]
    #[serde(rename = "DIARSIPKAN")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lost_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub document_number: String,

    pub report_date: String,

    pub status: DocumentStatus,

    pub loss_location: String,

    pub resident_id: i32,

    pub reporting_officer_id: i32,

    pub approving_official_id: Option<i32>,

    /// Account that created the letter; owner for access checks.
    pub operator_id: i32,

    pub last_updated_by_id: Option<i32>,

    pub approved_at: Option<String>,

    pub created_at: String,

    pub updated_at: String,

    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::residents::Entity",
        from = "Column::ResidentId",
        to = "super::residents::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Residents,
    #[sea_orm(has_many = "super::lost_items::Entity")]
    LostItems,
}

impl Related<super::residents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Residents.def()
    }
}

impl Related<super::lost_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
