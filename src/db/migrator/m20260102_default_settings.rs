use crate::entities::configurations;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::OnConflict;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Settings present before the setup wizard runs.
const DEFAULTS: [(&str, &str); 11] = [
    ("is_setup_complete", "false"),
    ("header_line_1", ""),
    ("header_line_2", ""),
    ("header_line_3", ""),
    ("office_name", ""),
    ("letter_place", ""),
    ("number_format", "SKH/%03d/%s/%d"),
    ("last_number", "0"),
    ("timezone", "Asia/Jakarta"),
    ("backup_path", "./backups"),
    ("archive_duration_days", "15"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Configurations)
            .columns([configurations::Column::Key, configurations::Column::Value])
            .on_conflict(
                OnConflict::column(configurations::Column::Key)
                    .do_nothing()
                    .to_owned(),
            );

        for (key, value) in DEFAULTS {
            insert.values_panic([key.into(), value.into()]);
        }

        manager.exec_stmt(insert.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let keys: Vec<&str> = DEFAULTS.iter().map(|(key, _)| *key).collect();
        let delete = Query::delete()
            .from_table(Configurations)
            .and_where(Expr::col(configurations::Column::Key).is_in(keys))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
