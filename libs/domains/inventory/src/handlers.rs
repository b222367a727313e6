use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::{Query, QueryRejection};
use axum_helpers::{
    errors::responses::{
        BadRequestIdResponse, BadRequestQueryResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    AppError, IdPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::InventoryResult;
use crate::models::{
    CategoryMetric, InventoryMetrics, InventoryQueryParams, InventoryRecord, PageResponse,
    Product, ProductPayload, RecordPayload, StockStatus,
};
use crate::repository::InventoryRepository;
use crate::service::InventoryService;

const TAG: &str = "inventory";

/// OpenAPI documentation for the Inventory API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_records,
        create_record,
        get_record,
        update_record,
        delete_record,
        mark_out_of_stock,
        mark_in_stock,
        list_categories,
        get_metrics,
    ),
    components(
        schemas(
            InventoryRecord,
            Product,
            StockStatus,
            RecordPayload,
            ProductPayload,
            PageResponse,
            InventoryMetrics,
            CategoryMetric
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Inventory records, stock status and metrics")
    )
)]
pub struct ApiDoc;

/// Create the inventory router with all HTTP endpoints
pub fn router<R: InventoryRepository + 'static>(service: InventoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/categories", get(list_categories))
        .route("/metrics", get(get_metrics))
        .route(
            "/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/{id}/outofstock", post(mark_out_of_stock))
        .route("/{id}/instock", put(mark_in_stock))
        .with_state(shared_service)
}

/// List records with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(InventoryQueryParams),
    responses(
        (status = 200, description = "One page of matching records", body = PageResponse),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_records<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    query: Result<Query<InventoryQueryParams>, QueryRejection>,
) -> Result<Json<PageResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::InvalidQuery(e.to_string()))?;
    let page = service.list_records(params).await?;
    Ok(Json(page))
}

/// Create a new record
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = RecordPayload,
    responses(
        (status = 201, description = "Record created", body = InventoryRecord),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_record<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    ValidatedJson(input): ValidatedJson<RecordPayload>,
) -> InventoryResult<impl IntoResponse> {
    let record = service.create_record(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get a record by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = InventoryRecord),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_record<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
) -> InventoryResult<Json<InventoryRecord>> {
    let record = service.get_record(id).await?;
    Ok(Json(record))
}

/// Replace a record
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Record ID")
    ),
    request_body = RecordPayload,
    responses(
        (status = 200, description = "Record updated", body = InventoryRecord),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_record<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<RecordPayload>,
) -> InventoryResult<Json<InventoryRecord>> {
    let record = service.update_record(id, input).await?;
    Ok(Json(record))
}

/// Delete a record. Deleting an unknown ID also succeeds.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Record ID")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_record<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
) -> InventoryResult<StatusCode> {
    service.delete_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a record out of stock (quantity becomes 0)
#[utoipa::path(
    post,
    path = "/{id}/outofstock",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record marked out of stock", body = InventoryRecord),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn mark_out_of_stock<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
) -> InventoryResult<Json<InventoryRecord>> {
    let record = service.mark_out_of_stock(id).await?;
    Ok(Json(record))
}

/// Mark a record in stock (quantity becomes 10)
#[utoipa::path(
    put,
    path = "/{id}/instock",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record marked in stock", body = InventoryRecord),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn mark_in_stock<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    IdPath(id): IdPath,
) -> InventoryResult<Json<InventoryRecord>> {
    let record = service.mark_in_stock(id).await?;
    Ok(Json(record))
}

/// List every category ever stored, ascending
#[utoipa::path(
    get,
    path = "/categories",
    tag = TAG,
    responses(
        (status = 200, description = "Category names", body = Vec<String>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
) -> InventoryResult<Json<Vec<String>>> {
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// In-stock value and average price, globally and per category
#[utoipa::path(
    get,
    path = "/metrics",
    tag = TAG,
    responses(
        (status = 200, description = "Inventory metrics", body = InventoryMetrics),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_metrics<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
) -> InventoryResult<Json<InventoryMetrics>> {
    let metrics = service.metrics().await?;
    Ok(Json(metrics))
}
