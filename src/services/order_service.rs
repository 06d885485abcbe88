use chrono::{DateTime, Utc};

use crate::{
    audit::log_audit,
    cart::Cart,
    catalog::Catalog,
    dto::orders::{CheckoutRequest, OrderList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{NotificationType, Order, OrderItem, OrderStatus},
    notifications::NewNotification,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let history = {
        let _guard = state.write_guard().await;
        state
            .user_storage(&user.email)
            .load_history(state.config.seed_demo_data)
            .await?
    };

    let found = history.search(query.q.as_deref());
    let total = found.len() as i64;
    let items = found
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .cloned()
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ApiResponse<Order>> {
    let history = {
        let _guard = state.write_guard().await;
        state
            .user_storage(&user.email)
            .load_history(state.config.seed_demo_data)
            .await?
    };
    let order = history.get(id).cloned().ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn last_confirmation(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Order>> {
    let order = state
        .user_storage(&user.email)
        .load_confirmation()
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

/// Turns the current cart into an order after the simulated submission
/// delay, then empties the cart.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    let name = payload.name.trim();
    let phone = payload.phone.trim();
    let missing: Vec<&str> = [("name", name), ("phone", phone)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    if state.user_storage(&user.email).load_cart().await?.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let delay = state.config.checkout_delay;
    if !delay.is_zero() {
        tracing::debug!(ms = %delay.as_millis(), "simulating order submission");
        tokio::time::sleep(delay).await;
    }

    let _guard = state.write_guard().await;
    let storage = state.user_storage(&user.email);
    let seed = state.config.seed_demo_data;

    // The cart may have changed while the submission was pending.
    let mut cart = storage.load_cart().await?;
    let now = Utc::now();
    let mut history = storage.load_history(seed).await?;
    let order = build_order(
        history.next_order_id(now),
        name,
        phone,
        &cart,
        &state.catalog,
        now,
    );
    if order.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    history.record(order.clone());
    storage.save_history(&history).await?;
    storage.save_confirmation(&order).await?;
    cart.clear();
    storage.save_cart(&cart).await?;

    let mut feed = storage.load_notifications(seed, now).await?;
    feed.add(
        NewNotification {
            kind: NotificationType::OrderStatus,
            title: "Order received".into(),
            message: format!("Your order {} is being processed.", order.id),
            product_id: None,
            order_id: Some(order.id.clone()),
            image_url: None,
        },
        now,
    );
    storage.save_notifications(&feed).await?;

    log_audit(
        Some(&user.email),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_price": order.total_price })),
    );

    Ok(ApiResponse::success("Checkout success", order, Some(Meta::empty())))
}

/// Snapshots current catalog prices; lines for vanished products are skipped.
pub fn build_order(
    id: String,
    name: &str,
    phone: &str,
    cart: &Cart,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Order {
    let items: Vec<OrderItem> = cart
        .lines()
        .iter()
        .filter_map(|line| {
            catalog.get(line.product_id).map(|product| OrderItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity: line.quantity,
                line_total: product.price * i64::from(line.quantity),
            })
        })
        .collect();

    Order {
        id,
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        total_items: items.iter().map(|i| i64::from(i.quantity)).sum(),
        total_price: items.iter().map(|i| i.line_total).sum(),
        items,
        status: OrderStatus::Processing,
        created_at: now,
    }
}
