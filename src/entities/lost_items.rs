use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lost_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lost_document_id: i32,
    pub item_name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lost_documents::Entity",
        from = "Column::LostDocumentId",
        to = "super::lost_documents::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    LostDocuments,
}

impl Related<super::lost_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
