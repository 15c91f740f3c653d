use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::{
    normalize_keyword, ExportFile, HonorDetail, HonorRecord, HonorView, ImportContext, ImportSummary,
    PageQuery, SaveHonorInput, SaveOutcome, StudentSummary,
};
use super::mapper::{to_plain_map, to_view};
use super::repository::HonorRepository;
use crate::errors::ServiceError;
use crate::observability::{
    HONOR_DELETED_TOTAL, HONOR_EXPORTS_TOTAL, HONOR_IMPORTED_ROWS_TOTAL, HONOR_IMPORT_FAILURES_TOTAL,
    HONOR_SAVED_TOTAL,
};
use crate::pagination::{Page, PageRequest};
use crate::spreadsheet;

pub const EXPORT_FILE_NAME: &str = "honor_list.xlsx";
pub const EXPORT_CONTENT_TYPE: &str = "application/octet-stream";

/// Honor use cases, independent of the web framework.
pub struct HonorService<R: HonorRepository> {
    repo: Arc<R>,
}

impl<R: HonorRepository> Clone for HonorService<R> {
    fn clone(&self) -> Self { Self { repo: self.repo.clone() } }
}

impl<R: HonorRepository> HonorService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    /// Every honor whose name or issuing organization contains `keyword`.
    ///
    /// # Examples
    /// ```
    /// use service::honor::{HonorService, repository::memory::InMemoryHonorRepository};
    /// use service::honor::domain::{HonorForm, SaveHonorInput};
    /// use std::sync::Arc;
    /// let svc = HonorService::new(Arc::new(InMemoryHonorRepository::default()));
    /// let form = HonorForm { honor_name: Some("Excellence Award".into()), ..Default::default() };
    /// tokio_test::block_on(svc.save(SaveHonorInput { honor_id: None, form })).unwrap();
    /// let found = tokio_test::block_on(svc.list(Some("excel"))).unwrap();
    /// assert_eq!(found.len(), 1);
    /// ```
    #[instrument(skip(self))]
    pub async fn list(&self, keyword: Option<&str>) -> Result<Vec<HonorView>, ServiceError> {
        let kw = normalize_keyword(keyword);
        let rows = self.repo.search(kw.as_deref()).await?;
        Ok(rows.iter().map(to_view).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_by_student(&self, person_id: i32) -> Result<Vec<HonorView>, ServiceError> {
        let rows = self.repo.find_by_student(person_id).await?;
        Ok(rows.iter().map(to_view).collect())
    }

    /// Honor plus student fields. Missing student or person links leave the
    /// student fields out.
    #[instrument(skip(self))]
    pub async fn detail(&self, honor_id: Option<i32>) -> Result<HonorDetail, ServiceError> {
        let id = honor_id.ok_or_else(|| ServiceError::not_found("honor"))?;
        let record = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("honor"))?;
        let student = match record.person_id {
            Some(pid) => self.repo.student_profile(pid).await?.as_ref().and_then(StudentSummary::from_profile),
            None => None,
        };
        Ok(HonorDetail { honor: to_view(&record), student })
    }

    /// Idempotent: unknown or absent ids succeed without touching the store.
    #[instrument(skip(self))]
    pub async fn delete(&self, honor_id: Option<i32>) -> Result<(), ServiceError> {
        let Some(id) = honor_id else { return Ok(()) };
        let mut tx = self.repo.begin().await?;
        let res = self.repo.delete(&mut tx, id).await;
        let removed = self.finish(tx, res).await?;
        if removed {
            HONOR_DELETED_TOTAL.inc();
            info!(event = "honor_deleted", honor_id = id);
        }
        Ok(())
    }

    /// Update in place when `honor_id` names an existing row, otherwise insert.
    /// Only fields present in the form are copied.
    ///
    /// # Examples
    /// ```
    /// use service::honor::{HonorService, repository::memory::InMemoryHonorRepository};
    /// use service::honor::domain::{HonorForm, SaveHonorInput};
    /// use std::sync::Arc;
    /// let svc = HonorService::new(Arc::new(InMemoryHonorRepository::default()));
    /// let form = HonorForm { honor_name: Some("Award".into()), honor_level: Some("A".into()), ..Default::default() };
    /// let created = tokio_test::block_on(svc.save(SaveHonorInput { honor_id: None, form })).unwrap();
    /// let patch = HonorForm { honor_level: Some("B".into()), ..Default::default() };
    /// tokio_test::block_on(svc.save(SaveHonorInput { honor_id: Some(created.honor_id), form: patch })).unwrap();
    /// let detail = tokio_test::block_on(svc.detail(Some(created.honor_id))).unwrap();
    /// assert_eq!(detail.honor.honor_name.as_deref(), Some("Award"));
    /// assert_eq!(detail.honor.honor_level.as_deref(), Some("B"));
    /// ```
    #[instrument(skip(self, input), fields(honor_id = ?input.honor_id))]
    pub async fn save(&self, input: SaveHonorInput) -> Result<SaveOutcome, ServiceError> {
        if let Some(pid) = input.form.person_id {
            if self.repo.student_profile(pid).await?.is_none() {
                return Err(ServiceError::Validation(format!("student {pid} does not exist")));
            }
        }
        let mut tx = self.repo.begin().await?;
        let res = self.save_in(&mut tx, &input).await;
        let saved = self.finish(tx, res).await?;
        let honor_id = saved.honor_id.ok_or_else(|| ServiceError::Db("store returned no honor id".into()))?;
        HONOR_SAVED_TOTAL.inc();
        info!(event = "honor_saved", honor_id, created = input.honor_id != Some(honor_id));
        Ok(SaveOutcome { honor_id })
    }

    async fn save_in(&self, tx: &mut R::Tx, input: &SaveHonorInput) -> Result<HonorRecord, ServiceError> {
        let mut record = match input.honor_id {
            Some(id) => self.repo.find_by_id_in(tx, id).await?.unwrap_or_default(),
            None => HonorRecord::default(),
        };
        input.form.apply_to(&mut record);
        record.validate()?;
        self.repo.save(tx, record).await
    }

    #[instrument(skip(self))]
    pub async fn page(&self, keyword: Option<&str>, request: PageRequest) -> Result<Page<HonorView>, ServiceError> {
        let query = PageQuery::from_request(&request)?;
        let kw = normalize_keyword(keyword);
        let page = self.repo.search_paged(kw.as_deref(), &query).await?;
        Ok(page.map(|r| to_view(&r)))
    }

    #[instrument(skip(self))]
    pub async fn page_for_student(
        &self,
        person_id: i32,
        keyword: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<HonorView>, ServiceError> {
        let query = PageQuery::from_request(&request)?;
        let kw = normalize_keyword(keyword);
        let page = self.repo.search_paged_for_student(person_id, kw.as_deref(), &query).await?;
        Ok(page.map(|r| to_view(&r)))
    }

    /// Parse every row first, then persist all of them in one unit of work.
    /// Any failure leaves the store untouched.
    #[instrument(skip(self, bytes, ctx), fields(size = bytes.len(), uploader = ?ctx.uploader, file_name = ?ctx.file_name))]
    pub async fn import_xlsx(&self, bytes: &[u8], ctx: ImportContext) -> Result<ImportSummary, ServiceError> {
        let result = self.import_rows(bytes).await;
        match &result {
            Ok(summary) => {
                HONOR_IMPORTED_ROWS_TOTAL.inc_by(summary.imported as u64);
                info!(event = "honor_imported", imported = summary.imported, honor_id = ?ctx.honor_id);
            }
            Err(e) => {
                HONOR_IMPORT_FAILURES_TOTAL.inc();
                warn!(event = "honor_import_failed", error = %e);
            }
        }
        result
    }

    async fn import_rows(&self, bytes: &[u8]) -> Result<ImportSummary, ServiceError> {
        let rows = spreadsheet::read_honor_rows(bytes)?;
        for row in &rows {
            row.record.validate()?;
        }
        let mut tx = self.repo.begin().await?;
        let res = async {
            for row in rows.iter() {
                self.repo.save(&mut tx, row.record.clone()).await?;
            }
            Ok::<_, ServiceError>(rows.len())
        }
        .await;
        let imported = self.finish(tx, res).await?;
        Ok(ImportSummary { imported })
    }

    /// Matching honors as an xlsx attachment.
    #[instrument(skip(self))]
    pub async fn export_xlsx(&self, keyword: Option<&str>) -> Result<ExportFile, ServiceError> {
        let kw = normalize_keyword(keyword);
        let rows = self.repo.search(kw.as_deref()).await?;
        let maps: Vec<_> = rows.iter().map(|r| to_plain_map(Some(r))).collect();
        let bytes = spreadsheet::write_honor_workbook(&maps)?;
        HONOR_EXPORTS_TOTAL.inc();
        info!(event = "honor_exported", rows = maps.len(), bytes = bytes.len());
        Ok(ExportFile { file_name: EXPORT_FILE_NAME, content_type: EXPORT_CONTENT_TYPE, bytes })
    }

    /// Commit on success, roll back on error.
    async fn finish<T>(&self, tx: R::Tx, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
        match result {
            Ok(v) => {
                self.repo.commit(tx).await?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = self.repo.rollback(tx).await {
                    warn!(error = %rb, "rollback failed");
                }
                Err(e)
            }
        }
    }
}
