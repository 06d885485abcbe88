use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/categories", products::categories_router())
        .nest("/cart", cart::router())
        .nest("/favorites", favorites::router())
        .nest("/notifications", notifications::router())
        .nest("/orders", orders::route())
}
