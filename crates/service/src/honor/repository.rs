use async_trait::async_trait;

use super::domain::{HonorRecord, PageQuery, StudentProfile};
use crate::errors::ServiceError;
use crate::pagination::Page;

/// Persistence for honor records.
///
/// Reads go straight to the store. Mutations need a unit of work obtained
/// from [`HonorRepository::begin`]; nothing is visible to readers until
/// [`HonorRepository::commit`].
#[async_trait]
pub trait HonorRepository: Send + Sync {
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, ServiceError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), ServiceError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), ServiceError>;

    async fn find_by_id(&self, honor_id: i32) -> Result<Option<HonorRecord>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<HonorRecord>, ServiceError>;
    async fn find_by_student(&self, person_id: i32) -> Result<Vec<HonorRecord>, ServiceError>;
    /// `keyword` is normalized; `None` returns every row.
    async fn search(&self, keyword: Option<&str>) -> Result<Vec<HonorRecord>, ServiceError>;
    async fn search_paged(&self, keyword: Option<&str>, query: &PageQuery) -> Result<Page<HonorRecord>, ServiceError>;
    async fn search_paged_for_student(
        &self,
        person_id: i32,
        keyword: Option<&str>,
        query: &PageQuery,
    ) -> Result<Page<HonorRecord>, ServiceError>;
    async fn student_profile(&self, person_id: i32) -> Result<Option<StudentProfile>, ServiceError>;

    async fn find_by_id_in(&self, tx: &mut Self::Tx, honor_id: i32) -> Result<Option<HonorRecord>, ServiceError>;
    /// Insert when `honor_id` is `None`, otherwise update that row in place.
    async fn save(&self, tx: &mut Self::Tx, record: HonorRecord) -> Result<HonorRecord, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, tx: &mut Self::Tx, honor_id: i32) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod memory {
    use super::*;
    use std::cmp::Ordering;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicI32, Ordering as AtomicOrdering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use crate::honor::domain::{HonorSortField, PersonRef};
    use crate::pagination::Direction;

    /// Writes staged by one unit of work; `None` marks a delete.
    #[derive(Default)]
    pub struct MemoryTx {
        staged: BTreeMap<i32, Option<HonorRecord>>,
    }

    pub struct InMemoryHonorRepository {
        rows: Mutex<BTreeMap<i32, HonorRecord>>,
        students: Mutex<HashMap<i32, StudentProfile>>,
        next_id: AtomicI32,
        fail_on_save: Mutex<Option<usize>>,
    }

    impl Default for InMemoryHonorRepository {
        fn default() -> Self {
            Self {
                rows: Mutex::new(BTreeMap::new()),
                students: Mutex::new(HashMap::new()),
                next_id: AtomicI32::new(1),
                fail_on_save: Mutex::new(None),
            }
        }
    }

    impl InMemoryHonorRepository {
        /// Register a student; `person_name` `None` simulates a missing person row.
        pub fn with_student(self, person_id: i32, major: &str, class_name: &str, person_name: Option<&str>) -> Self {
            lock(&self.students).insert(
                person_id,
                StudentProfile {
                    person_id,
                    major: Some(major.to_string()),
                    class_name: Some(class_name.to_string()),
                    person: person_name.map(|n| PersonRef { name: Some(n.to_string()) }),
                },
            );
            self
        }

        /// Make the n-th `save` (0-based, counted from now) fail with a db error.
        pub fn fail_on_nth_save(&self, n: usize) {
            *lock(&self.fail_on_save) = Some(n);
        }

        pub fn len(&self) -> usize { lock(&self.rows).len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn snapshot(&self) -> Vec<HonorRecord> {
            lock(&self.rows).values().cloned().collect()
        }

        fn page_of(mut rows: Vec<HonorRecord>, query: &PageQuery) -> Page<HonorRecord> {
            rows.sort_by(|a, b| {
                let ord = compare_by(a, b, query.field);
                let ord = if query.direction == Direction::Desc { ord.reverse() } else { ord };
                ord.then_with(|| a.honor_id.cmp(&b.honor_id))
            });
            let total = rows.len() as u64;
            let start = query.page.saturating_mul(query.size) as usize;
            let content = rows.into_iter().skip(start).take(query.size as usize).collect();
            Page::new(content, total, query.size)
        }
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn compare_by(a: &HonorRecord, b: &HonorRecord, field: HonorSortField) -> Ordering {
        match field {
            HonorSortField::HonorId => a.honor_id.cmp(&b.honor_id),
            HonorSortField::HonorName => a.honor_name.cmp(&b.honor_name),
            HonorSortField::ObtainTime => a.obtain_time.cmp(&b.obtain_time),
            HonorSortField::HonorLevel => a.honor_level.cmp(&b.honor_level),
            HonorSortField::IssuingOrganization => a.issuing_organization.cmp(&b.issuing_organization),
        }
    }

    #[async_trait]
    impl HonorRepository for InMemoryHonorRepository {
        type Tx = MemoryTx;

        async fn begin(&self) -> Result<MemoryTx, ServiceError> { Ok(MemoryTx::default()) }

        async fn commit(&self, tx: MemoryTx) -> Result<(), ServiceError> {
            let mut rows = lock(&self.rows);
            for (id, op) in tx.staged {
                match op {
                    Some(rec) => { rows.insert(id, rec); }
                    None => { rows.remove(&id); }
                }
            }
            Ok(())
        }

        async fn rollback(&self, _tx: MemoryTx) -> Result<(), ServiceError> { Ok(()) }

        async fn find_by_id(&self, honor_id: i32) -> Result<Option<HonorRecord>, ServiceError> {
            Ok(lock(&self.rows).get(&honor_id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<HonorRecord>, ServiceError> { Ok(self.snapshot()) }

        async fn find_by_student(&self, person_id: i32) -> Result<Vec<HonorRecord>, ServiceError> {
            Ok(self.snapshot().into_iter().filter(|r| r.person_id == Some(person_id)).collect())
        }

        async fn search(&self, keyword: Option<&str>) -> Result<Vec<HonorRecord>, ServiceError> {
            Ok(self.snapshot().into_iter().filter(|r| r.matches_keyword(keyword)).collect())
        }

        async fn search_paged(&self, keyword: Option<&str>, query: &PageQuery) -> Result<Page<HonorRecord>, ServiceError> {
            let rows = self.search(keyword).await?;
            Ok(Self::page_of(rows, query))
        }

        async fn search_paged_for_student(
            &self,
            person_id: i32,
            keyword: Option<&str>,
            query: &PageQuery,
        ) -> Result<Page<HonorRecord>, ServiceError> {
            let rows = self
                .search(keyword)
                .await?
                .into_iter()
                .filter(|r| r.person_id == Some(person_id))
                .collect();
            Ok(Self::page_of(rows, query))
        }

        async fn student_profile(&self, person_id: i32) -> Result<Option<StudentProfile>, ServiceError> {
            Ok(lock(&self.students).get(&person_id).cloned())
        }

        async fn find_by_id_in(&self, tx: &mut MemoryTx, honor_id: i32) -> Result<Option<HonorRecord>, ServiceError> {
            if let Some(staged) = tx.staged.get(&honor_id) {
                return Ok(staged.clone());
            }
            self.find_by_id(honor_id).await
        }

        async fn save(&self, tx: &mut MemoryTx, mut record: HonorRecord) -> Result<HonorRecord, ServiceError> {
            {
                let mut fail = lock(&self.fail_on_save);
                match *fail {
                    Some(0) => {
                        *fail = None;
                        return Err(ServiceError::Db("injected save failure".into()));
                    }
                    Some(n) => *fail = Some(n - 1),
                    None => {}
                }
            }
            let id = match record.honor_id {
                Some(id) => id,
                None => self.next_id.fetch_add(1, AtomicOrdering::SeqCst),
            };
            record.honor_id = Some(id);
            tx.staged.insert(id, Some(record.clone()));
            Ok(record)
        }

        async fn delete(&self, tx: &mut MemoryTx, honor_id: i32) -> Result<bool, ServiceError> {
            let exists = self.find_by_id_in(tx, honor_id).await?.is_some();
            if exists {
                tx.staged.insert(honor_id, None);
            }
            Ok(exists)
        }
    }
}
