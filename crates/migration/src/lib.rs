//! Migrator registering the campus tables in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_person;
mod m20240301_000002_create_student;
mod m20240301_000003_create_honor;
mod m20240301_000004_add_honor_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_person::Migration),
            Box::new(m20240301_000002_create_student::Migration),
            Box::new(m20240301_000003_create_honor::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000004_add_honor_indexes::Migration),
        ]
    }
}
