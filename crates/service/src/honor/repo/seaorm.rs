use async_trait::async_trait;
use sea_orm::sea_query::{BinOper, Expr, Func, Order, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, TransactionTrait,
};

use models::{honor, person, student};

use crate::errors::ServiceError;
use crate::honor::domain::{HonorRecord, HonorSortField, PageQuery, PersonRef, StudentProfile};
use crate::honor::repository::HonorRepository;
use crate::pagination::{Direction, Page};

pub struct SeaOrmHonorRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmHonorRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// `%kw%` with LIKE metacharacters escaped by `\`.
fn like_pattern(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len() + 2);
    out.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// `LOWER(col) LIKE LOWER(pattern) ESCAPE '\'`, folded by the database on both sides.
fn lower_like(col: honor::Column, pattern: &str) -> SimpleExpr {
    let rhs = SimpleExpr::from(Func::lower(Expr::val(pattern)))
        .binary(BinOper::Escape, Expr::cust(r"'\'"));
    Expr::expr(Func::lower(Expr::col((honor::Entity, col)))).binary(BinOper::Like, rhs)
}

fn keyword_filter(keyword: Option<&str>) -> Condition {
    let Some(kw) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return Condition::all();
    };
    let pattern = like_pattern(kw);
    Condition::any()
        .add(lower_like(honor::Column::HonorName, &pattern))
        .add(lower_like(honor::Column::IssuingOrganization, &pattern))
}

fn sort_column(field: HonorSortField) -> honor::Column {
    match field {
        HonorSortField::HonorId => honor::Column::HonorId,
        HonorSortField::HonorName => honor::Column::HonorName,
        HonorSortField::ObtainTime => honor::Column::ObtainTime,
        HonorSortField::HonorLevel => honor::Column::HonorLevel,
        HonorSortField::IssuingOrganization => honor::Column::IssuingOrganization,
    }
}

fn ordered(select: Select<honor::Entity>, query: &PageQuery) -> Select<honor::Entity> {
    let order = match query.direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    };
    let select = select.order_by(sort_column(query.field), order);
    if query.field == HonorSortField::HonorId {
        select
    } else {
        select.order_by_asc(honor::Column::HonorId)
    }
}

impl SeaOrmHonorRepository {
    async fn fetch_page(&self, select: Select<honor::Entity>, query: &PageQuery) -> Result<Page<HonorRecord>, ServiceError> {
        let paginator = ordered(select, query).paginate(&self.db, query.size);
        let totals = paginator.num_items_and_pages().await?;
        let rows = paginator.fetch_page(query.page).await?;
        Ok(Page {
            content: rows.into_iter().map(HonorRecord::from).collect(),
            total_elements: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }
}

#[async_trait]
impl HonorRepository for SeaOrmHonorRepository {
    type Tx = DatabaseTransaction;

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        Ok(self.db.begin().await?)
    }

    async fn commit(&self, tx: DatabaseTransaction) -> Result<(), ServiceError> {
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: DatabaseTransaction) -> Result<(), ServiceError> {
        Ok(tx.rollback().await?)
    }

    async fn find_by_id(&self, honor_id: i32) -> Result<Option<HonorRecord>, ServiceError> {
        let row = honor::Entity::find_by_id(honor_id).one(&self.db).await?;
        Ok(row.map(HonorRecord::from))
    }

    async fn find_all(&self) -> Result<Vec<HonorRecord>, ServiceError> {
        let rows = honor::Entity::find()
            .order_by_asc(honor::Column::HonorId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(HonorRecord::from).collect())
    }

    async fn find_by_student(&self, person_id: i32) -> Result<Vec<HonorRecord>, ServiceError> {
        let rows = honor::Entity::find()
            .filter(honor::Column::PersonId.eq(person_id))
            .order_by_asc(honor::Column::HonorId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(HonorRecord::from).collect())
    }

    async fn search(&self, keyword: Option<&str>) -> Result<Vec<HonorRecord>, ServiceError> {
        let rows = honor::Entity::find()
            .filter(keyword_filter(keyword))
            .order_by_asc(honor::Column::HonorId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(HonorRecord::from).collect())
    }

    async fn search_paged(&self, keyword: Option<&str>, query: &PageQuery) -> Result<Page<HonorRecord>, ServiceError> {
        let select = honor::Entity::find().filter(keyword_filter(keyword));
        self.fetch_page(select, query).await
    }

    async fn search_paged_for_student(
        &self,
        person_id: i32,
        keyword: Option<&str>,
        query: &PageQuery,
    ) -> Result<Page<HonorRecord>, ServiceError> {
        let select = honor::Entity::find()
            .filter(honor::Column::PersonId.eq(person_id))
            .filter(keyword_filter(keyword));
        self.fetch_page(select, query).await
    }

    async fn student_profile(&self, person_id: i32) -> Result<Option<StudentProfile>, ServiceError> {
        let found = student::Entity::find_by_id(person_id)
            .find_also_related(person::Entity)
            .one(&self.db)
            .await?;
        Ok(found.map(|(s, p)| StudentProfile {
            person_id: s.person_id,
            major: s.major,
            class_name: s.class_name,
            person: p.map(|p| PersonRef { name: p.name }),
        }))
    }

    async fn find_by_id_in(&self, tx: &mut DatabaseTransaction, honor_id: i32) -> Result<Option<HonorRecord>, ServiceError> {
        let row = honor::Entity::find_by_id(honor_id).one(&*tx).await?;
        Ok(row.map(HonorRecord::from))
    }

    async fn save(&self, tx: &mut DatabaseTransaction, record: HonorRecord) -> Result<HonorRecord, ServiceError> {
        let am = honor::ActiveModel {
            honor_id: record.honor_id.map(ActiveValue::Set).unwrap_or(ActiveValue::NotSet),
            person_id: ActiveValue::Set(record.person_id),
            honor_name: ActiveValue::Set(record.honor_name),
            obtain_time: ActiveValue::Set(record.obtain_time),
            honor_level: ActiveValue::Set(record.honor_level),
            issuing_organization: ActiveValue::Set(record.issuing_organization),
        };
        let saved = if record.honor_id.is_some() {
            am.update(&*tx).await?
        } else {
            am.insert(&*tx).await?
        };
        Ok(HonorRecord::from(saved))
    }

    async fn delete(&self, tx: &mut DatabaseTransaction, honor_id: i32) -> Result<bool, ServiceError> {
        let Some(row) = honor::Entity::find_by_id(honor_id).one(&*tx).await? else {
            return Ok(false);
        };
        let res = row.delete(&*tx).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{PageRequest, Sort};
    use crate::test_support::{migrated_db, seed_student};

    async fn repo_with(names: &[(&str, &str)]) -> SeaOrmHonorRepository {
        let repo = SeaOrmHonorRepository::new(migrated_db().await);
        let mut tx = repo.begin().await.unwrap();
        for (name, org) in names {
            repo.save(&mut tx, HonorRecord {
                honor_name: Some((*name).into()),
                issuing_organization: Some((*org).into()),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        repo.commit(tx).await.unwrap();
        repo
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("a"), "%a%");
        assert_eq!(like_pattern("50%_x\\"), "%50\\%\\_x\\\\%");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_both_columns() {
        let repo = repo_with(&[("Excellence Award", "Dept X"), ("Service Award", "Dept Y"), ("Chess", "Club")]).await;
        let all = repo.search(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(repo.search(Some("  ")).await.unwrap().len(), 3);

        let hits = repo.search(Some("AWARD")).await.unwrap();
        assert_eq!(hits.len(), 2);
        let hits = repo.search(Some("dept y")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].honor_name.as_deref(), Some("Service Award"));
    }

    #[tokio::test]
    async fn search_treats_percent_literally() {
        let repo = repo_with(&[("Top 5% Student", "Dept X"), ("Top Student", "Dept X")]).await;
        let hits = repo.search(Some("5%")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(repo.search(Some("_")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_non_ascii_keywords() {
        let repo = repo_with(&[("Ärzte Preis", "Verein"), ("Chess", "Club")]).await;
        let hits = repo.search(Some("Ärzte")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].honor_name.as_deref(), Some("Ärzte Preis"));
        assert_eq!(repo.search(Some("PREIS")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn paging_covers_every_match_once() {
        let repo = repo_with(&[("a1", "o"), ("a2", "o"), ("a3", "o"), ("a4", "o"), ("a5", "o")]).await;
        let mut seen = Vec::new();
        for page in 0..3 {
            let q = PageQuery::from_request(&PageRequest::new(page, 2)).unwrap();
            let p = repo.search_paged(Some("A"), &q).await.unwrap();
            assert_eq!(p.total_elements, 5);
            assert_eq!(p.total_pages, 3);
            seen.extend(p.content.into_iter().filter_map(|r| r.honor_id));
        }
        let all: Vec<i32> = repo.search(Some("a")).await.unwrap().into_iter().filter_map(|r| r.honor_id).collect();
        assert_eq!(seen, all);
    }

    #[tokio::test]
    async fn oversized_page_index_is_rejected_before_querying() {
        let repo = repo_with(&[("a1", "o")]).await;
        let err = PageQuery::from_request(&PageRequest::new(u64::MAX, 20)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(PageQuery::from_request(&PageRequest::new(i64::MAX as u64 / 20 + 1, 20)).is_err());

        let q = PageQuery::from_request(&PageRequest::new(1_000, 20)).unwrap();
        let p = repo.search_paged(None, &q).await.unwrap();
        assert!(p.content.is_empty());
        assert_eq!(p.total_elements, 1);
    }

    #[tokio::test]
    async fn paging_honors_sort_direction() {
        let repo = repo_with(&[("b", "o"), ("c", "o"), ("a", "o")]).await;
        let q = PageQuery::from_request(&PageRequest::new(0, 10).with_sort(Sort::parse("honorName,desc").unwrap())).unwrap();
        let names: Vec<_> = repo.search_paged(None, &q).await.unwrap().content.into_iter().filter_map(|r| r.honor_name).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn student_scoped_queries() {
        let repo = SeaOrmHonorRepository::new(migrated_db().await);
        seed_student(&repo.db, 7, Some("Alice"), "CS", "C1").await;
        let mut tx = repo.begin().await.unwrap();
        repo.save(&mut tx, HonorRecord { person_id: Some(7), honor_name: Some("Mine".into()), ..Default::default() }).await.unwrap();
        repo.save(&mut tx, HonorRecord { honor_name: Some("Other".into()), ..Default::default() }).await.unwrap();
        repo.commit(tx).await.unwrap();

        assert_eq!(repo.find_by_student(7).await.unwrap().len(), 1);
        let q = PageQuery::from_request(&PageRequest::default()).unwrap();
        let page = repo.search_paged_for_student(7, None, &q).await.unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].honor_name.as_deref(), Some("Mine"));

        let profile = repo.student_profile(7).await.unwrap().unwrap();
        assert_eq!(profile.person.and_then(|p| p.name).as_deref(), Some("Alice"));
        assert!(repo.student_profile(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rollback_discards_writes_and_delete_reports_presence() {
        let repo = repo_with(&[("keep", "o")]).await;
        let mut tx = repo.begin().await.unwrap();
        repo.save(&mut tx, HonorRecord { honor_name: Some("temp".into()), ..Default::default() }).await.unwrap();
        repo.rollback(tx).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);

        let id = repo.find_all().await.unwrap()[0].honor_id.unwrap();
        let mut tx = repo.begin().await.unwrap();
        assert!(repo.delete(&mut tx, id).await.unwrap());
        assert!(!repo.delete(&mut tx, id).await.unwrap());
        repo.commit(tx).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }
}
