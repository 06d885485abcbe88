use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::products::{CategoryList, ProductDto, ProductList},
    error::AppResult,
    models::ProductId,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name or category"),
        ("category" = Option<String>, Query, description = "Category slug or name, `all` for every category"),
        ("min_price" = Option<i64>, Query, description = "Lowest price in minor units"),
        ("max_price" = Option<i64>, Query, description = "Highest price in minor units"),
        ("sort_by" = Option<String>, Query, description = "name | price, default name"),
        ("sort_order" = Option<String>, Query, description = "asc | desc, default asc"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ApiResponse<ProductList>> {
    Json(product_service::list_products(&state, query))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<ProductId>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    let resp = product_service::get_product(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Products"
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<ApiResponse<CategoryList>> {
    Json(product_service::list_categories(&state))
}
