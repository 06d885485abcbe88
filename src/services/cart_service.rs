use crate::{
    audit::log_audit,
    cart::Cart,
    dto::cart::{AddToCartRequest, CartView, UpdateQuantityRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::ProductId,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = state.user_storage(&user.email).load_cart().await?;
    Ok(cart_response("OK", state, &cart))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let product = state
        .catalog
        .get(payload.product_id)
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;
    let quantity = payload.quantity.unwrap_or(1);

    let cart = update_cart(state, user, |cart| cart.add_item(product, quantity)).await?;

    log_audit(
        Some(&user.email),
        "cart_add",
        Some("cart"),
        Some(serde_json::json!({ "product_id": product.id, "quantity": quantity })),
    );
    Ok(cart_response("Added to cart", state, &cart))
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: ProductId,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartView>> {
    let cart = update_cart(state, user, |cart| {
        cart.update_quantity(product_id, payload.quantity)
    })
    .await?;

    log_audit(
        Some(&user.email),
        "cart_update",
        Some("cart"),
        Some(serde_json::json!({ "product_id": product_id, "quantity": payload.quantity })),
    );
    Ok(cart_response("Cart updated", state, &cart))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: ProductId,
) -> AppResult<ApiResponse<CartView>> {
    let cart = update_cart(state, user, |cart| cart.remove_item(product_id)).await?;

    log_audit(
        Some(&user.email),
        "cart_remove",
        Some("cart"),
        Some(serde_json::json!({ "product_id": product_id })),
    );
    Ok(cart_response("Removed from cart", state, &cart))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = update_cart(state, user, Cart::clear).await?;
    log_audit(Some(&user.email), "cart_clear", Some("cart"), None);
    Ok(cart_response("Cart cleared", state, &cart))
}

async fn update_cart<F>(state: &AppState, user: &AuthUser, apply: F) -> AppResult<Cart>
where
    F: FnOnce(&mut Cart),
{
    let _guard = state.write_guard().await;
    let storage = state.user_storage(&user.email);
    let mut cart = storage.load_cart().await?;
    apply(&mut cart);
    storage.save_cart(&cart).await?;
    Ok(cart)
}

fn cart_response(message: &str, state: &AppState, cart: &Cart) -> ApiResponse<CartView> {
    let view = CartView::build(cart, &state.catalog);
    let meta = Meta::total(cart.lines().len() as i64);
    ApiResponse::success(message, view, Some(meta))
}
