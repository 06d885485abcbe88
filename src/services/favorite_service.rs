use crate::{
    audit::log_audit,
    dto::{
        favorites::{AddFavoriteRequest, FavoriteProductList, FavoriteStatus},
        products::ProductDto,
    },
    error::{AppError, AppResult},
    favorites::Favorites,
    middleware::auth::AuthUser,
    models::ProductId,
    response::{ApiResponse, Empty, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteProductList>> {
    let (page, limit, offset) = pagination.normalize();
    let favorites = state.user_storage(&user.email).load_favorites().await?;
    let products = favorites.resolve(&state.catalog);
    let total = products.len() as i64;

    let items = products
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .map(ProductDto::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", FavoriteProductList { items }, Some(meta)))
}

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    ensure_product(state, payload.product_id)?;
    update_favorites(state, user, |favs| favs.add(payload.product_id)).await?;

    log_audit(
        Some(&user.email),
        "favorite_add",
        Some("favorites"),
        Some(serde_json::json!({ "product_id": payload.product_id })),
    );
    Ok(ApiResponse::success(
        "Added to favorites",
        FavoriteStatus {
            product_id: payload.product_id,
            favorite: true,
        },
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    product_id: ProductId,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    update_favorites(state, user, |favs| favs.remove(product_id)).await?;

    log_audit(
        Some(&user.email),
        "favorite_remove",
        Some("favorites"),
        Some(serde_json::json!({ "product_id": product_id })),
    );
    Ok(ApiResponse::success(
        "Removed from favorites",
        FavoriteStatus {
            product_id,
            favorite: false,
        },
        Some(Meta::empty()),
    ))
}

pub async fn toggle_favorite(
    state: &AppState,
    user: &AuthUser,
    product_id: ProductId,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    ensure_product(state, product_id)?;
    let mut favorite = false;
    update_favorites(state, user, |favs| favorite = favs.toggle(product_id)).await?;

    let action = if favorite { "favorite_add" } else { "favorite_remove" };
    log_audit(
        Some(&user.email),
        action,
        Some("favorites"),
        Some(serde_json::json!({ "product_id": product_id })),
    );
    Ok(ApiResponse::success(
        "OK",
        FavoriteStatus {
            product_id,
            favorite,
        },
        Some(Meta::empty()),
    ))
}

pub async fn clear_favorites(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Empty>> {
    update_favorites(state, user, Favorites::clear).await?;
    log_audit(Some(&user.email), "favorite_clear", Some("favorites"), None);
    Ok(ApiResponse::success(
        "Favorites cleared",
        Empty {},
        Some(Meta::empty()),
    ))
}

fn ensure_product(state: &AppState, product_id: ProductId) -> AppResult<()> {
    if state.catalog.get(product_id).is_none() {
        return Err(AppError::BadRequest("Product not found".into()));
    }
    Ok(())
}

async fn update_favorites<F>(state: &AppState, user: &AuthUser, apply: F) -> AppResult<()>
where
    F: FnOnce(&mut Favorites),
{
    let _guard = state.write_guard().await;
    let storage = state.user_storage(&user.email);
    let mut favorites = storage.load_favorites().await?;
    apply(&mut favorites);
    storage.save_favorites(&favorites).await?;
    Ok(())
}
