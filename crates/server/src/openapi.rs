use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::honor::{HonorEditRequest, HonorIdRequest, KeywordRequest, PersonIdRequest, StudentKeywordRequest};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `{code, data, msg}`: `code` 0 on success, 1 on failure.
#[derive(ToSchema)]
pub struct DataResponseDoc {
    pub code: i32,
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
    pub msg: Option<String>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct HonorFormDoc {
    pub honorName: Option<String>,
    pub obtainTime: Option<String>,
    pub honorLevel: Option<String>,
    pub issuingOrganization: Option<String>,
    pub personId: Option<i32>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::honor::get_honor_list,
        crate::routes::honor::honor_delete,
        crate::routes::honor::get_honor_info,
        crate::routes::honor::honor_edit_save,
        crate::routes::honor::import_honor_data,
        crate::routes::honor::get_honor_list_excl,
        crate::routes::honor::get_honor_page_list,
        crate::routes::honor::get_honor_page_list_by_student,
        crate::routes::honor::get_honor_list_by_student_id,
    ),
    components(
        schemas(
            HealthResponse,
            DataResponseDoc,
            HonorFormDoc,
            KeywordRequest,
            HonorIdRequest,
            HonorEditRequest,
            PersonIdRequest,
            StudentKeywordRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "honor")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_honor_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.iter().any(|p| p == "/health"));
        assert_eq!(paths.iter().filter(|p| p.starts_with("/api/honor/")).count(), 9);
    }
}
