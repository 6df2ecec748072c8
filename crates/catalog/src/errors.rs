use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("query deadline exceeded")]
    Timeout,
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl CatalogError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<DbErr> for CatalogError {
    fn from(e: DbErr) -> Self {
        Self::Query(e.to_string())
    }
}
