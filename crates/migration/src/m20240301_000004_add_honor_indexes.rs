//! Lookup indexes for the honor list screens: by student and by name.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_honor_person_id")
                    .table(Honor::Table)
                    .col(Honor::PersonId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_honor_honor_name")
                    .table(Honor::Table)
                    .col(Honor::HonorName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_honor_honor_name").table(Honor::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_honor_person_id").table(Honor::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Honor { Table, PersonId, HonorName }
