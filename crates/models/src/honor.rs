use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, student};

pub const HONOR_NAME_MAX: usize = 100;
pub const OBTAIN_TIME_MAX: usize = 20;
pub const HONOR_LEVEL_MAX: usize = 20;
pub const ISSUING_ORGANIZATION_MAX: usize = 100;

/// One awarded honor. Every text column is optional but length-bounded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "honor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub honor_id: i32,
    pub person_id: Option<i32>,
    pub honor_name: Option<String>,
    pub obtain_time: Option<String>,
    pub honor_level: Option<String>,
    pub issuing_organization: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Student }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(student::Entity)
                .from(Column::PersonId)
                .to(student::Column::PersonId)
                .into(),
        }
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl ActiveModelBehavior for ActiveModel {}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), errors::ModelError> {
    match value {
        Some(v) if v.chars().count() > max => Err(errors::ModelError::Validation(format!(
            "{field} exceeds {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Column length bounds, counted in characters.
pub fn validate_lengths(
    honor_name: Option<&str>,
    obtain_time: Option<&str>,
    honor_level: Option<&str>,
    issuing_organization: Option<&str>,
) -> Result<(), errors::ModelError> {
    check_len("honorName", honor_name, HONOR_NAME_MAX)?;
    check_len("obtainTime", obtain_time, OBTAIN_TIME_MAX)?;
    check_len("honorLevel", honor_level, HONOR_LEVEL_MAX)?;
    check_len("issuingOrganization", issuing_organization, ISSUING_ORGANIZATION_MAX)?;
    Ok(())
}
