use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "residents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Real national id, or a `TEMP<nanos>` placeholder for residents
    /// registered through a report.
    #[sea_orm(unique)]
    pub national_id: String,

    pub full_name: String,
    pub birth_place: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub sex: String,
    pub religion: String,
    pub occupation: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lost_documents::Entity")]
    LostDocuments,
}

impl Related<super::lost_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
