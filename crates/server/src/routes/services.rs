use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use catalog::errors::CatalogError;
use catalog::query::{ListParams, SortBy, SortDir, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use catalog::services::{self, ServicePage};
use models::service::ServiceResponse;
use models::version;

use crate::errors::ApiError;
use crate::routes::AppState;
use crate::validation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort_by: String,
    #[serde(default)]
    pub sort_dir: String,
    #[serde(default)]
    pub show_deleted: bool,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl ListQuery {
    fn into_params(self) -> ListParams {
        ListParams {
            page: self.page,
            page_size: self.page_size,
            search: self.search,
            sort_by: SortBy::parse(&self.sort_by),
            sort_dir: SortDir::parse(&self.sort_dir),
            show_deleted: self.show_deleted,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuery {
    #[serde(default)]
    pub show_deleted: bool,
}

/// GET /services
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ServicePage>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request("bad request", Some(e.to_string())))?;
    match services::list_services(&state.db, q.into_params(), None).await {
        Ok(page) => {
            info!(count = page.services.len(), total = page.total_count, "list services");
            Ok(Json(page))
        }
        Err(e) => {
            error!(err = %e, "list services failed");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch services",
                Some(e.to_string()),
            ))
        }
    }
}

/// GET /services/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<GetQuery>, QueryRejection>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request("bad request", Some(e.to_string())))?;
    let id = validation::parse_service_id(&id)?;
    match services::get_service(&state.db, id, q.show_deleted, None).await {
        Ok(resp) => Ok(Json(resp)),
        Err(CatalogError::NotFound(_)) => {
            Err(ApiError::new(StatusCode::NOT_FOUND, "service not found", None))
        }
        Err(e) => {
            error!(err = %e, service_id = id, "get service failed");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch service",
                Some(e.to_string()),
            ))
        }
    }
}

/// GET /services/:id/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<version::Model>>, ApiError> {
    let id = validation::parse_service_id(&id)?;
    match services::list_versions(&state.db, id, None).await {
        Ok(versions) => {
            info!(service_id = id, count = versions.len(), "list versions");
            Ok(Json(versions))
        }
        Err(e) => {
            error!(err = %e, service_id = id, "list versions failed");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch versions",
                Some(e.to_string()),
            ))
        }
    }
}

/// DELETE /services/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = validation::parse_service_id(&id)?;
    match services::delete_service(&state.db, id, None).await {
        // An id that matched nothing still reports 204; asymmetric with the
        // read paths but part of the established API contract.
        Ok(rows) => {
            info!(service_id = id, rows, "soft-deleted service");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!(err = %e, service_id = id, "delete service failed");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to delete service",
                Some(e.to_string()),
            ))
        }
    }
}
