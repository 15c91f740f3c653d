use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::types::DataResponse;
use serde::Deserialize;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

use service::errors::ServiceError;
use service::honor::domain::{HonorForm, ImportContext, SaveHonorInput};
use service::pagination::{PageRequest, Sort, DEFAULT_PAGE_SIZE};

use crate::errors::{JsonApiError, MSG_DELETE_FAILED, MSG_IMPORT_FAILED, MSG_QUERY_FAILED, MSG_SAVE_FAILED};
use crate::routes::auth::ServerState;

type ApiResult = Result<Json<DataResponse>, JsonApiError>;

/// Search text matched against honor name or issuing organization.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRequest {
    #[serde(default, alias = "keyword")]
    pub name_or_organization: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HonorIdRequest {
    #[serde(default)]
    pub honor_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HonorEditRequest {
    /// Absent for a new honor.
    #[serde(default)]
    pub honor_id: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub form: HonorForm,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonIdRequest {
    pub person_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentKeywordRequest {
    pub person_id: i32,
    #[serde(default, alias = "keyword")]
    pub name_or_organization: Option<String>,
}

/// `?page=0&size=20&sort=honorName,desc`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn to_request(&self) -> Result<PageRequest, ServiceError> {
        let req = PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE));
        match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Ok(req.with_sort(Sort::parse(s)?)),
            None => Ok(req),
        }
    }
}

/// Upload metadata; only logged.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ImportParams {
    pub uploader: Option<String>,
    pub honor_id: Option<String>,
    pub file_name: Option<String>,
}

#[utoipa::path(
    post, path = "/api/honor/getHonorList", tag = "honor",
    request_body = KeywordRequest,
    responses((status = 200, description = "Honor list"), (status = 500, description = "Query failed"))
)]
pub async fn get_honor_list(State(state): State<ServerState>, Json(req): Json<KeywordRequest>) -> ApiResult {
    let list = state
        .honor
        .list(req.name_or_organization.as_deref())
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    Ok(Json(DataResponse::ok(list)))
}

#[utoipa::path(
    post, path = "/api/honor/honorDelete", tag = "honor",
    request_body = HonorIdRequest,
    responses((status = 200, description = "Deleted or already absent"), (status = 500, description = "Delete failed"))
)]
pub async fn honor_delete(State(state): State<ServerState>, Json(req): Json<HonorIdRequest>) -> ApiResult {
    state
        .honor
        .delete(req.honor_id)
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_DELETE_FAILED))?;
    Ok(Json(DataResponse::ok_message()))
}

#[utoipa::path(
    post, path = "/api/honor/getHonorInfo", tag = "honor",
    request_body = HonorIdRequest,
    responses((status = 200, description = "Honor detail, or code 1 when not found"))
)]
pub async fn get_honor_info(State(state): State<ServerState>, Json(req): Json<HonorIdRequest>) -> ApiResult {
    let detail = state
        .honor
        .detail(req.honor_id)
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    Ok(Json(DataResponse::ok(detail)))
}

#[utoipa::path(
    post, path = "/api/honor/honorEditSave", tag = "honor",
    request_body = HonorEditRequest,
    responses((status = 200, description = "Saved; data is {honorId}"), (status = 400, description = "Validation error"))
)]
pub async fn honor_edit_save(State(state): State<ServerState>, Json(req): Json<HonorEditRequest>) -> ApiResult {
    let outcome = state
        .honor
        .save(SaveHonorInput { honor_id: req.honor_id, form: req.form })
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_SAVE_FAILED))?;
    Ok(Json(DataResponse::ok(outcome)))
}

#[utoipa::path(
    post, path = "/api/honor/importHonorData", tag = "honor",
    params(ImportParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses((status = 200, description = "Imported, or code 1 on a rejected file"))
)]
pub async fn import_honor_data(
    State(state): State<ServerState>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> ApiResult {
    let ctx = ImportContext { uploader: params.uploader, honor_id: params.honor_id, file_name: params.file_name };
    let summary = state
        .honor
        .import_xlsx(&body, ctx)
        .await
        .map_err(JsonApiError::from_import)?;
    Ok(Json(DataResponse::ok(summary)))
}

#[utoipa::path(
    post, path = "/api/honor/getHonorListExcl", tag = "honor",
    request_body = KeywordRequest,
    responses((status = 200, description = "honor_list.xlsx attachment"), (status = 500, description = "Export failed"))
)]
pub async fn get_honor_list_excl(State(state): State<ServerState>, Json(req): Json<KeywordRequest>) -> Response {
    match state.honor.export_xlsx(req.name_or_organization.as_deref()).await {
        Ok(file) => {
            let disposition = format!("attachment; filename=\"{}\"", file.file_name);
            let mut resp = file.bytes.into_response();
            let headers = resp.headers_mut();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(file.content_type));
            if let Ok(v) = HeaderValue::from_str(&disposition) {
                headers.insert(header::CONTENT_DISPOSITION, v);
            }
            resp
        }
        Err(e) => {
            error!(error = %e, "honor export failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post, path = "/api/honor/getHonorPageList", tag = "honor",
    params(PageParams),
    request_body = KeywordRequest,
    responses((status = 200, description = "{content, totalElements, totalPages}"), (status = 400, description = "Bad paging"))
)]
pub async fn get_honor_page_list(
    State(state): State<ServerState>,
    Query(params): Query<PageParams>,
    Json(req): Json<KeywordRequest>,
) -> ApiResult {
    let page_req = params.to_request().map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    let page = state
        .honor
        .page(req.name_or_organization.as_deref(), page_req)
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    Ok(Json(DataResponse::ok(page)))
}

#[utoipa::path(
    post, path = "/api/honor/getHonorPageListByStudent", tag = "honor",
    params(PageParams),
    request_body = StudentKeywordRequest,
    responses((status = 200, description = "{content, totalElements, totalPages}"), (status = 400, description = "Bad paging"))
)]
pub async fn get_honor_page_list_by_student(
    State(state): State<ServerState>,
    Query(params): Query<PageParams>,
    Json(req): Json<StudentKeywordRequest>,
) -> ApiResult {
    let page_req = params.to_request().map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    let page = state
        .honor
        .page_for_student(req.person_id, req.name_or_organization.as_deref(), page_req)
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    Ok(Json(DataResponse::ok(page)))
}

#[utoipa::path(
    post, path = "/api/honor/getHonorListByStudentId", tag = "honor",
    request_body = PersonIdRequest,
    responses((status = 200, description = "Honors of one student"))
)]
pub async fn get_honor_list_by_student_id(State(state): State<ServerState>, Json(req): Json<PersonIdRequest>) -> ApiResult {
    let list = state
        .honor
        .list_by_student(req.person_id)
        .await
        .map_err(|e| JsonApiError::from_service(e, MSG_QUERY_FAILED))?;
    info!(person_id = req.person_id, count = list.len(), "honor list by student");
    Ok(Json(DataResponse::ok(list)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_params_default_and_sort() {
        let r = PageParams::default().to_request().unwrap();
        assert_eq!((r.page, r.size), (0, DEFAULT_PAGE_SIZE));
        assert!(r.sort.is_none());
        let r = PageParams { page: Some(2), size: Some(5), sort: Some("obtainTime,desc".into()) }.to_request().unwrap();
        assert_eq!(r.sort.unwrap().field, "obtainTime");
        assert!(PageParams { sort: Some("x,up".into()), ..Default::default() }.to_request().is_err());
    }

    #[test]
    fn keyword_accepts_both_names() {
        let a: KeywordRequest = serde_json::from_value(json!({"nameOrOrganization": "x"})).unwrap();
        let b: KeywordRequest = serde_json::from_value(json!({"keyword": "y"})).unwrap();
        let c: KeywordRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(a.name_or_organization.as_deref(), Some("x"));
        assert_eq!(b.name_or_organization.as_deref(), Some("y"));
        assert!(c.name_or_organization.is_none());
    }

    #[test]
    fn edit_request_nests_form() {
        let r: HonorEditRequest = serde_json::from_value(json!({"honorId": 4, "form": {"honorLevel": "A"}})).unwrap();
        assert_eq!(r.honor_id, Some(4));
        assert_eq!(r.form.honor_level.as_deref(), Some("A"));
        assert!(r.form.honor_name.is_none());
    }
}
