//! Read and soft-delete operations over the service catalog.
//!
//! Every entry point takes the pooled connection explicitly and bounds its
//! execution with the caller's deadline (or [`DEFAULT_QUERY_TIMEOUT`]).

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use tracing::instrument;

use models::service::{self, ServiceResponse};
use models::version;

use crate::errors::CatalogError;
use crate::query::{ListParams, DEFAULT_QUERY_TIMEOUT};

/// One page of the service listing plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ServicePage {
    pub services: Vec<ServiceResponse>,
    pub total_count: u64,
    pub current_page: u64,
    pub page_size: u64,
}

/// Joined row shape: service fields plus the aggregated version count.
#[derive(Debug, FromQueryResult)]
struct ServiceRow {
    id: i32,
    name: String,
    description: String,
    version_count: i64,
}

/// Run `fut` under the caller's deadline, falling back to the default bound.
async fn bounded<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    let limit = deadline.unwrap_or(DEFAULT_QUERY_TIMEOUT);
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(CatalogError::Timeout),
    }
}

/// List services with search, sort, soft-delete visibility and pagination.
///
/// The total count is computed over the filtered base query before the
/// versions join and pagination are applied; a write landing between the two
/// statements can skew `total_count` against the returned page.
#[instrument(skip(db))]
pub async fn list_services(
    db: &DatabaseConnection,
    params: ListParams,
    deadline: Option<Duration>,
) -> Result<ServicePage, CatalogError> {
    let params = params.normalized();
    bounded(deadline, async {
        let mut query = service::Entity::find();

        if !params.show_deleted {
            query = query.filter(service::Column::DeletedAt.is_null());
        }

        // Case-insensitive match on name or description
        if !params.search.is_empty() {
            let pattern = format!("%{}%", params.search);
            query = query.filter(
                Condition::any()
                    .add(Expr::col((service::Entity, service::Column::Name)).ilike(pattern.as_str()))
                    .add(
                        Expr::col((service::Entity, service::Column::Description))
                            .ilike(pattern.as_str()),
                    ),
            );
        }

        let total_count = query.clone().count(db).await?;

        let rows = query
            .select_only()
            .columns([
                service::Column::Id,
                service::Column::Name,
                service::Column::Description,
            ])
            .column_as(
                Expr::col((version::Entity, version::Column::Id)).count(),
                "version_count",
            )
            .left_join(version::Entity)
            .group_by(service::Column::Id)
            .order_by(params.sort_by.column(), params.sort_dir.order())
            .offset(params.offset())
            .limit(params.page_size)
            .into_model::<ServiceRow>()
            .all(db)
            .await?;

        let services = rows
            .into_iter()
            .map(|row| ServiceResponse {
                id: row.id,
                name: row.name,
                description: row.description,
                versions: row.version_count,
            })
            .collect();

        Ok(ServicePage {
            services,
            total_count,
            current_page: params.page,
            page_size: params.page_size,
        })
    })
    .await
}

/// Fetch a single service with its version count.
pub async fn get_service(
    db: &DatabaseConnection,
    id: i32,
    show_deleted: bool,
    deadline: Option<Duration>,
) -> Result<ServiceResponse, CatalogError> {
    bounded(deadline, async {
        let mut query = service::Entity::find_by_id(id);
        if !show_deleted {
            query = query.filter(service::Column::DeletedAt.is_null());
        }
        let svc = query
            .one(db)
            .await?
            .ok_or_else(|| CatalogError::not_found("service"))?;

        let version_count = version::Entity::find()
            .filter(version::Column::ServiceId.eq(id))
            .count(db)
            .await?;

        Ok(svc.to_response(version_count as i64))
    })
    .await
}

/// All versions belonging to a service, in storage-native order.
/// A service without versions yields an empty vec, not an error.
pub async fn list_versions(
    db: &DatabaseConnection,
    service_id: i32,
    deadline: Option<Duration>,
) -> Result<Vec<version::Model>, CatalogError> {
    bounded(deadline, async {
        let versions = version::Entity::find()
            .filter(version::Column::ServiceId.eq(service_id))
            .all(db)
            .await?;
        Ok(versions)
    })
    .await
}

/// Soft-delete a service by stamping `deleted_at`.
///
/// Returns the number of rows touched. An id that matches nothing (absent or
/// already deleted) yields 0 and is not treated as an error; callers decide
/// how to surface that.
#[instrument(skip(db))]
pub async fn delete_service(
    db: &DatabaseConnection,
    id: i32,
    deadline: Option<Duration>,
) -> Result<u64, CatalogError> {
    bounded(deadline, async {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let res = service::Entity::update_many()
            .col_expr(service::Column::DeletedAt, Expr::value(now))
            .filter(service::Column::Id.eq(id))
            .filter(service::Column::DeletedAt.is_null())
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    })
    .await
}
