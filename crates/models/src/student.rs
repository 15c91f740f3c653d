use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::person;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub person_id: i32,
    pub major: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Person }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Person => Entity::belongs_to(person::Entity)
                .from(Column::PersonId)
                .to(person::Column::PersonId)
                .into(),
        }
    }
}

impl Related<person::Entity> for Entity {
    fn to() -> RelationDef { Relation::Person.def() }
}

impl ActiveModelBehavior for ActiveModel {}
