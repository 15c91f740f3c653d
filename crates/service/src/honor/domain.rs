use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::pagination::{Direction, PageRequest};

/// A stored honor as the service layer sees it. `honor_id` is `None` until
/// the store assigns one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HonorRecord {
    pub honor_id: Option<i32>,
    pub person_id: Option<i32>,
    pub honor_name: Option<String>,
    pub obtain_time: Option<String>,
    pub honor_level: Option<String>,
    pub issuing_organization: Option<String>,
}

impl HonorRecord {
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::honor::validate_lengths(
            self.honor_name.as_deref(),
            self.obtain_time.as_deref(),
            self.honor_level.as_deref(),
            self.issuing_organization.as_deref(),
        )?;
        Ok(())
    }

    /// Case-insensitive substring match on name or issuing organization.
    /// `keyword` must already be normalized (see [`normalize_keyword`]).
    pub fn matches_keyword(&self, keyword: Option<&str>) -> bool {
        let Some(kw) = keyword else { return true };
        let hit = |v: &Option<String>| v.as_deref().is_some_and(|s| s.to_lowercase().contains(kw));
        hit(&self.honor_name) || hit(&self.issuing_organization)
    }
}

impl From<models::honor::Model> for HonorRecord {
    fn from(m: models::honor::Model) -> Self {
        Self {
            honor_id: Some(m.honor_id),
            person_id: m.person_id,
            honor_name: m.honor_name,
            obtain_time: m.obtain_time,
            honor_level: m.honor_level,
            issuing_organization: m.issuing_organization,
        }
    }
}

/// Trimmed, lower-cased keyword; blank input means "match everything".
pub fn normalize_keyword(keyword: Option<&str>) -> Option<String> {
    keyword.map(str::trim).filter(|k| !k.is_empty()).map(str::to_lowercase)
}

/// Student joined with its person row, for detail enrichment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentProfile {
    pub person_id: i32,
    pub major: Option<String>,
    pub class_name: Option<String>,
    /// `None` when the upstream person row is missing.
    pub person: Option<PersonRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonRef {
    pub name: Option<String>,
}

/// Incoming edit form. Absent or `null` fields leave stored values untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HonorForm {
    #[serde(default)]
    pub honor_name: Option<String>,
    #[serde(default)]
    pub obtain_time: Option<String>,
    #[serde(default)]
    pub honor_level: Option<String>,
    #[serde(default)]
    pub issuing_organization: Option<String>,
    /// Student link (`student.person_id`).
    #[serde(default)]
    pub person_id: Option<i32>,
}

impl HonorForm {
    pub fn apply_to(&self, record: &mut HonorRecord) {
        if let Some(v) = &self.honor_name { record.honor_name = Some(v.clone()); }
        if let Some(v) = &self.obtain_time { record.obtain_time = Some(v.clone()); }
        if let Some(v) = &self.honor_level { record.honor_level = Some(v.clone()); }
        if let Some(v) = &self.issuing_organization { record.issuing_organization = Some(v.clone()); }
        if let Some(v) = self.person_id { record.person_id = Some(v); }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveHonorInput {
    pub honor_id: Option<i32>,
    pub form: HonorForm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub honor_id: i32,
}

/// Plain transport shape of one honor. Missing values serialize as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonorView {
    pub honor_id: Option<i32>,
    pub honor_name: Option<String>,
    pub obtain_time: Option<String>,
    pub honor_level: Option<String>,
    pub issuing_organization: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_name: Option<String>,
    pub student_id: i32,
    pub major: Option<String>,
    pub class_name: Option<String>,
}

impl StudentSummary {
    /// Only built when the student row and its person row both exist.
    pub fn from_profile(profile: &StudentProfile) -> Option<Self> {
        let person = profile.person.as_ref()?;
        Some(Self {
            student_name: person.name.clone(),
            student_id: profile.person_id,
            major: profile.major.clone(),
            class_name: profile.class_name.clone(),
        })
    }
}

/// Detail payload: the honor plus student fields when the links resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HonorDetail {
    #[serde(flatten)]
    pub honor: HonorView,
    #[serde(flatten)]
    pub student: Option<StudentSummary>,
}

/// Sortable honor columns, addressed by their transport names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HonorSortField {
    HonorId,
    HonorName,
    ObtainTime,
    HonorLevel,
    IssuingOrganization,
}

impl HonorSortField {
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "honorId" | "honor_id" => Some(Self::HonorId),
            "honorName" | "honor_name" => Some(Self::HonorName),
            "obtainTime" | "obtain_time" => Some(Self::ObtainTime),
            "honorLevel" | "honor_level" => Some(Self::HonorLevel),
            "issuingOrganization" | "issuing_organization" => Some(Self::IssuingOrganization),
            _ => None,
        }
    }
}

/// Normalized paging handed to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u64,
    pub size: u64,
    pub field: HonorSortField,
    pub direction: Direction,
}

impl PageQuery {
    pub fn from_request(req: &PageRequest) -> Result<Self, ServiceError> {
        let (page, size) = req.normalize();
        match page.checked_mul(size) {
            Some(offset) if offset <= i64::MAX as u64 => {}
            _ => return Err(ServiceError::Validation(format!("page out of range: {page}"))),
        }
        let (field, direction) = match &req.sort {
            None => (HonorSortField::HonorId, Direction::Asc),
            Some(sort) => {
                let field = HonorSortField::parse(&sort.field)
                    .ok_or_else(|| ServiceError::Validation(format!("unknown sort field: {}", sort.field)))?;
                (field, sort.direction)
            }
        };
        Ok(Self { page, size, field, direction })
    }
}

/// Upload metadata; logged, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportContext {
    pub uploader: Option<String>,
    pub honor_id: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
}

/// Binary attachment produced by export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
