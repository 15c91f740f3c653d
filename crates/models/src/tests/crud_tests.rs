use crate::{honor, person, student};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set, NotSet};
use anyhow::Result;

use super::setup_test_db;

async fn seed_student(db: &sea_orm::DatabaseConnection, name: &str) -> Result<student::Model> {
    let p = person::ActiveModel {
        person_id: NotSet,
        num: Set(Some("2023001".into())),
        name: Set(Some(name.into())),
    }
    .insert(db)
    .await?;
    let s = student::ActiveModel {
        person_id: Set(p.person_id),
        major: Set(Some("Software".into())),
        class_name: Set(Some("SE-1".into())),
    }
    .insert(db)
    .await?;
    Ok(s)
}

#[tokio::test]
async fn test_honor_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let stu = seed_student(&db, "Alice").await?;

    // Create: id is generated by the database
    let created = honor::ActiveModel {
        honor_id: NotSet,
        person_id: Set(Some(stu.person_id)),
        honor_name: Set(Some("Excellence Award".into())),
        obtain_time: Set(Some("2023-06".into())),
        honor_level: Set(Some("A".into())),
        issuing_organization: Set(Some("Dept X".into())),
    }
    .insert(&db)
    .await?;
    assert!(created.honor_id > 0);

    // Read
    let found = honor::Entity::find_by_id(created.honor_id).one(&db).await?;
    assert_eq!(found.as_ref(), Some(&created));

    // Update a single column in place
    let mut am: honor::ActiveModel = created.clone().into();
    am.honor_level = Set(Some("B".into()));
    let updated = am.update(&db).await?;
    assert_eq!(updated.honor_id, created.honor_id);
    assert_eq!(updated.honor_level.as_deref(), Some("B"));
    assert_eq!(updated.honor_name.as_deref(), Some("Excellence Award"));

    // Filter by student
    let by_student = honor::Entity::find()
        .filter(honor::Column::PersonId.eq(stu.person_id))
        .all(&db)
        .await?;
    assert_eq!(by_student.len(), 1);

    // Delete
    honor::Entity::delete_by_id(created.honor_id).exec(&db).await?;
    assert!(honor::Entity::find_by_id(created.honor_id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_honor_student_person_relations() -> Result<()> {
    let db = setup_test_db().await?;
    let stu = seed_student(&db, "Bob").await?;

    let h = honor::ActiveModel {
        person_id: Set(Some(stu.person_id)),
        honor_name: Set(Some("Service Award".into())),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let linked = h.find_related(student::Entity).one(&db).await?;
    assert_eq!(linked.as_ref().map(|s| s.person_id), Some(stu.person_id));

    let (s, p) = student::Entity::find_by_id(stu.person_id)
        .find_also_related(person::Entity)
        .one(&db)
        .await?
        .expect("student row");
    assert_eq!(s.class_name.as_deref(), Some("SE-1"));
    assert_eq!(p.and_then(|p| p.name).as_deref(), Some("Bob"));
    Ok(())
}

#[tokio::test]
async fn test_honor_without_student_is_allowed() -> Result<()> {
    let db = setup_test_db().await?;
    let h = honor::ActiveModel { honor_name: Set(Some("Orphan".into())), ..Default::default() }
        .insert(&db)
        .await?;
    assert_eq!(h.person_id, None);
    assert_eq!(h.obtain_time, None);
    Ok(())
}
