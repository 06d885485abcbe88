mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use storefront_api::app;
use tower::ServiceExt;

use common::{login, test_state};

async fn send(state: &storefront_api::state::AppState, request: Request<Body>) -> Response {
    app(state.clone())
        .oneshot(request)
        .await
        .expect("router is infallible")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn authed(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, token);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn unknown_path_gets_not_found_envelope() {
    let state = test_state();
    let response = send(
        &state,
        Request::builder()
            .uri("/api/nope")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn cart_requires_a_session() {
    let state = test_state();
    let response = send(
        &state,
        Request::builder()
            .uri("/api/cart")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn request_id_is_generated_or_echoed() {
    let state = test_state();

    let response = send(
        &state,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let response = send(
        &state,
        Request::builder()
            .uri("/health")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
}

#[tokio::test]
async fn confirmation_route_is_not_taken_for_an_order_id() -> anyhow::Result<()> {
    let state = test_state();
    let (token, _) = login(&state, "route@example.com").await?;

    let response = send(
        &state,
        authed(Method::GET, "/api/orders/confirmation", &token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &state,
        authed(
            Method::POST,
            "/api/cart",
            &token,
            Some(json!({ "product_id": 7, "quantity": 2 })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total_items"], 2);

    let response = send(
        &state,
        authed(
            Method::POST,
            "/api/orders/checkout",
            &token,
            Some(json!({ "name": "Route Tester", "phone": "555-0100" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .expect("order id")
        .to_string();

    let response = send(
        &state,
        authed(Method::GET, "/api/orders/confirmation", &token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], order_id.as_str());

    let response = send(
        &state,
        authed(Method::GET, &format!("/api/orders/{order_id}"), &token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["customer_name"], "Route Tester");
    Ok(())
}

#[tokio::test]
async fn nested_action_routes_are_wired() -> anyhow::Result<()> {
    let state = test_state();
    let (token, _) = login(&state, "wired@example.com").await?;

    let response = send(
        &state,
        authed(Method::POST, "/api/favorites/3/toggle", &token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["favorite"], true);

    let response = send(
        &state,
        authed(Method::POST, "/api/notifications/read-all", &token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["unread_count"], 0);

    let response = send(&state, authed(Method::POST, "/api/auth/logout", &token, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&state, authed(Method::GET, "/api/auth/me", &token, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
