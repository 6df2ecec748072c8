//! Create `versions` table with FK to `services`.
//!
//! Release records; immutable once inserted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Version::Table)
                    .if_not_exists()
                    .col(pk_auto(Version::Id))
                    .col(integer(Version::ServiceId).not_null())
                    .col(string_len(Version::Number, 128).not_null())
                    .col(timestamp_with_time_zone(Version::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_version_service")
                            .from(Version::Table, Version::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Version::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Version {
    #[sea_orm(iden = "versions")]
    Table,
    Id,
    ServiceId,
    Number,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Service {
    #[sea_orm(iden = "services")]
    Table,
    Id,
}
