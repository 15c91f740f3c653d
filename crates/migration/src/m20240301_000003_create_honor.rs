//! Create `honor` table.
//! One row per awarded honor; the student link is optional at the data level.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Honor::Table)
                    .if_not_exists()
                    .col(pk_auto(Honor::HonorId))
                    .col(integer_null(Honor::PersonId))
                    .col(string_len_null(Honor::HonorName, 100))
                    .col(string_len_null(Honor::ObtainTime, 20))
                    .col(string_len_null(Honor::HonorLevel, 20))
                    .col(string_len_null(Honor::IssuingOrganization, 100))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_honor_student")
                            .from(Honor::Table, Honor::PersonId)
                            .to(Student::Table, Student::PersonId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Honor::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Honor {
    Table,
    HonorId,
    PersonId,
    HonorName,
    ObtainTime,
    HonorLevel,
    IssuingOrganization,
}

#[derive(DeriveIden)]
enum Student { Table, PersonId }
