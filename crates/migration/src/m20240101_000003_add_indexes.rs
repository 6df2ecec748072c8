use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Services: index on deleted_at for the default soft-delete filter
        manager
            .create_index(
                Index::create()
                    .name("idx_service_deleted_at")
                    .table(Service::Table)
                    .col(Service::DeletedAt)
                    .to_owned(),
            )
            .await?;

        // Versions: index on service_id for joins and per-service listings
        manager
            .create_index(
                Index::create()
                    .name("idx_version_service")
                    .table(Version::Table)
                    .col(Version::ServiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_deleted_at").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_version_service").table(Version::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service {
    #[sea_orm(iden = "services")]
    Table,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Version {
    #[sea_orm(iden = "versions")]
    Table,
    ServiceId,
}
