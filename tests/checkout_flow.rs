mod common;

use storefront_api::{
    dto::{
        cart::{AddToCartRequest, UpdateQuantityRequest},
        orders::CheckoutRequest,
    },
    error::AppError,
    models::{NotificationType, OrderStatus},
    routes::params::OrderListQuery,
    services::{cart_service, notification_service, order_service},
};

use common::{login, test_state};

// Shopper flow: fill the cart -> adjust -> checkout -> confirmation and history.
#[tokio::test]
async fn checkout_snapshots_cart_and_clears_it() -> anyhow::Result<()> {
    let state = test_state();
    let (_, user) = login(&state, "ana@example.com").await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: 2,
            quantity: Some(2),
        },
    )
    .await?;
    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: 10,
            quantity: None,
        },
    )
    .await?;
    let cart = cart_service::update_quantity(&state, &user, 10, UpdateQuantityRequest { quantity: 3 })
        .await?
        .data
        .expect("cart");
    assert_eq!(cart.total_items, 5);
    assert_eq!(cart.total_price, 2 * 12990 + 3 * 3990);

    let order = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            name: "  Ana Souza ".into(),
            phone: "(11) 91234-5678".into(),
        },
    )
    .await?
    .data
    .expect("order");

    assert!(order.id.starts_with("ORD-"));
    assert!(order.id.ends_with("-001"));
    assert_eq!(order.customer_name, "Ana Souza");
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_items, 5);
    assert_eq!(order.total_price, 2 * 12990 + 3 * 3990);

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(cart.total_items, 0);
    assert_eq!(cart.total_price, 0);

    let confirmation = order_service::last_confirmation(&state, &user)
        .await?
        .data
        .expect("confirmation");
    assert_eq!(confirmation, order);

    let history = order_service::list_orders(&state, &user, OrderListQuery::default())
        .await?
        .data
        .expect("history");
    assert_eq!(history.items, vec![order.clone()]);

    let fetched = order_service::get_order(&state, &user, &order.id.to_lowercase())
        .await?
        .data
        .expect("order");
    assert_eq!(fetched.id, order.id);

    let feed = notification_service::list_notifications(&state, &user)
        .await?
        .data
        .expect("feed");
    assert_eq!(feed.unread_count, 1);
    assert_eq!(feed.items[0].kind, NotificationType::OrderStatus);
    assert_eq!(feed.items[0].order_id.as_deref(), Some(order.id.as_str()));

    Ok(())
}

#[tokio::test]
async fn second_checkout_gets_next_sequence_number() -> anyhow::Result<()> {
    let state = test_state();
    let (_, user) = login(&state, "seq@example.com").await?;

    let mut ids = Vec::new();
    for _ in 0..2 {
        cart_service::add_to_cart(
            &state,
            &user,
            AddToCartRequest {
                product_id: 1,
                quantity: Some(1),
            },
        )
        .await?;
        let order = order_service::checkout(
            &state,
            &user,
            CheckoutRequest {
                name: "Seq".into(),
                phone: "123".into(),
            },
        )
        .await?
        .data
        .expect("order");
        ids.push(order.id);
    }

    assert!(ids[0].ends_with("-001"));
    assert!(ids[1].ends_with("-002"));
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_rejected_without_touching_cart() -> anyhow::Result<()> {
    let state = test_state();
    let (_, user) = login(&state, "bruno@example.com").await?;
    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: 4,
            quantity: Some(1),
        },
    )
    .await?;

    let err = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            name: "   ".into(),
            phone: String::new(),
        },
    )
    .await
    .expect_err("validation should fail");
    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, "missing required fields: name, phone"),
        other => panic!("unexpected error: {other:?}"),
    }

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.total_items, 1);
    assert!(matches!(
        order_service::last_confirmation(&state, &user).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_be_checked_out() -> anyhow::Result<()> {
    let state = test_state();
    let (_, user) = login(&state, "carla@example.com").await?;

    let err = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            name: "Carla".into(),
            phone: "555".into(),
        },
    )
    .await
    .expect_err("empty cart");
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Cart is empty"));
    Ok(())
}

#[tokio::test]
async fn checkout_waits_for_simulated_latency() -> anyhow::Result<()> {
    let mut config = storefront_api::config::AppConfig::for_tests();
    config.checkout_delay = std::time::Duration::from_millis(50);
    let state = common::state_with(config);
    let (_, user) = login(&state, "slow@example.com").await?;
    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: 6,
            quantity: Some(1),
        },
    )
    .await?;

    let started = std::time::Instant::now();
    order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            name: "Slow".into(),
            phone: "1".into(),
        },
    )
    .await?;
    assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    Ok(())
}

#[tokio::test]
async fn seeded_history_is_searchable() -> anyhow::Result<()> {
    let mut config = storefront_api::config::AppConfig::for_tests();
    config.seed_demo_data = true;
    let state = common::state_with(config);
    let (_, user) = login(&state, "demo@example.com").await?;

    let resp = order_service::list_orders(
        &state,
        &user,
        OrderListQuery {
            q: Some("2024".into()),
            ..Default::default()
        },
    )
    .await?;
    let ids: Vec<_> = resp.data.expect("orders").items.into_iter().map(|o| o.id).collect();
    assert_eq!(ids, ["ORD-2024-002", "ORD-2024-001"]);
    assert_eq!(resp.meta.and_then(|m| m.total), Some(2));
    Ok(())
}
