//! Create `student` table.
//! Shares its primary key with `person` (one student per person).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(integer(Student::PersonId).primary_key())
                    .col(string_len_null(Student::Major, 20))
                    .col(string_len_null(Student::ClassName, 50))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_person")
                            .from(Student::Table, Student::PersonId)
                            .to(Person::Table, Person::PersonId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Student::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Student { Table, PersonId, Major, ClassName }

#[derive(DeriveIden)]
enum Person { Table, PersonId }
