#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};

/// Fresh in-memory database with every migration applied.
pub async fn migrated_db() -> DatabaseConnection {
    let db = models::db::connect_in_memory().await.expect("connect sqlite");
    migration::Migrator::up(&db, None).await.expect("migrate up");
    db
}

/// Insert a person row and the student row that points at it.
pub async fn seed_student(db: &DatabaseConnection, person_id: i32, name: Option<&str>, major: &str, class_name: &str) {
    models::person::ActiveModel {
        person_id: Set(person_id),
        num: Set(Some(format!("S{person_id:04}"))),
        name: Set(name.map(str::to_string)),
    }
    .insert(db)
    .await
    .expect("insert person");
    models::student::ActiveModel {
        person_id: Set(person_id),
        major: Set(Some(major.to_string())),
        class_name: Set(Some(class_name.to_string())),
    }
    .insert(db)
    .await
    .expect("insert student");
}
