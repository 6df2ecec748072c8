use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::version;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    // Soft-delete marker; never serialized in responses
    #[serde(skip)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Versions,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Versions => Entity::has_many(version::Entity).into(),
        }
    }
}

impl Related<version::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Versions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Response projection: service fields plus the derived version count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub versions: i64,
}

impl Model {
    pub fn to_response(&self, version_count: i64) -> ServiceResponse {
        ServiceResponse {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            versions: version_count,
        }
    }
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Model {
        let now = Utc::now().into();
        Model {
            id: 7,
            name: "Locate Us".into(),
            description: "Location of works".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn to_response_carries_version_count() {
        let resp = sample().to_response(3);
        assert_eq!(resp.id, 7);
        assert_eq!(resp.name, "Locate Us");
        assert_eq!(resp.versions, 3);
    }

    #[test]
    fn deleted_at_is_not_serialized() {
        let mut m = sample();
        m.deleted_at = Some(Utc::now().into());
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["name"], "Locate Us");
    }
}
