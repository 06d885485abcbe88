use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartLine,
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{AddToCartRequest, CartItemDto, CartView, UpdateQuantityRequest},
        favorites::{AddFavoriteRequest, FavoriteProductList, FavoriteStatus},
        notifications::{CreateNotificationRequest, NotificationList},
        orders::{CheckoutRequest, OrderList},
        products::{CategoryList, ProductDto, ProductList},
    },
    models::{Category, Notification, NotificationType, Order, OrderItem, OrderStatus, User},
    response::{ApiResponse, Empty, Meta},
    routes::{auth, cart, favorites, health, notifications, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        products::list_products,
        products::get_product,
        products::list_categories,
        cart::cart_view,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        favorites::toggle_favorite,
        favorites::clear_favorites,
        notifications::list_notifications,
        notifications::add_notification,
        notifications::mark_as_read,
        notifications::mark_all_as_read,
        notifications::clear_notifications,
        orders::list_orders,
        orders::checkout,
        orders::confirmation,
        orders::get_order
    ),
    components(
        schemas(
            User,
            Category,
            CartLine,
            Order,
            OrderItem,
            OrderStatus,
            Notification,
            NotificationType,
            LoginRequest,
            LoginResponse,
            ProductDto,
            ProductList,
            CategoryList,
            AddToCartRequest,
            UpdateQuantityRequest,
            CartItemDto,
            CartView,
            AddFavoriteRequest,
            FavoriteProductList,
            FavoriteStatus,
            CreateNotificationRequest,
            NotificationList,
            CheckoutRequest,
            OrderList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            Empty,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<NotificationList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Simulated login and sessions"),
        (name = "Products", description = "Catalog browsing"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Notifications", description = "Notification feed"),
        (name = "Orders", description = "Checkout and purchase history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
