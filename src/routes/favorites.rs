use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};

use crate::{
    dto::favorites::{AddFavoriteRequest, FavoriteProductList, FavoriteStatus},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ProductId,
    response::{ApiResponse, Empty},
    routes::params::Pagination,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite).delete(clear_favorites))
        .route("/{product_id}", delete(remove_favorite))
        .route("/{product_id}/toggle", post(toggle_favorite))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List favorites", body = ApiResponse<FavoriteProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<FavoriteProductList>>> {
    let resp = favorite_service::list_favorites(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = AddFavoriteRequest,
    responses(
        (status = 200, description = "Added to favorites", body = ApiResponse<FavoriteStatus>),
        (status = 400, description = "Bad Request")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddFavoriteRequest>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let resp = favorite_service::add_favorite(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = ApiResponse<FavoriteStatus>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<ProductId>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let resp = favorite_service::remove_favorite(&state, &user, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favorites/{product_id}/toggle",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "New favorite state", body = ApiResponse<FavoriteStatus>),
        (status = 400, description = "Bad Request")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<ProductId>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let resp = favorite_service::toggle_favorite(&state, &user, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorites cleared", body = ApiResponse<Empty>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn clear_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Empty>>> {
    let resp = favorite_service::clear_favorites(&state, &user).await?;
    Ok(Json(resp))
}
