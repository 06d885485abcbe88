use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::notifications::{CreateNotificationRequest, NotificationList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    notifications::NotificationFeed,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    let feed = {
        let _guard = state.write_guard().await;
        state
            .user_storage(&user.email)
            .load_notifications(state.config.seed_demo_data, Utc::now())
            .await?
    };
    Ok(feed_response("OK", &feed))
}

pub async fn add_notification(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNotificationRequest,
) -> AppResult<ApiResponse<Notification>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    let mut created = None;
    update_feed(state, user, |feed| {
        created = Some(feed.add(payload.into(), Utc::now()).clone());
    })
    .await?;
    let created = created.ok_or_else(|| AppError::Internal(anyhow::anyhow!("notification not stored")))?;
    tracing::info!(title = %created.title, "notification added");
    Ok(ApiResponse::success("Notification added", created, Some(Meta::empty())))
}

pub async fn mark_as_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<NotificationList>> {
    let feed = update_feed(state, user, |feed| {
        if !feed.mark_as_read(id) {
            tracing::debug!(notification_id = %id, "mark_as_read on unknown notification");
        }
    })
    .await?;
    Ok(feed_response("OK", &feed))
}

pub async fn mark_all_as_read(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    let feed = update_feed(state, user, NotificationFeed::mark_all_as_read).await?;
    Ok(feed_response("OK", &feed))
}

pub async fn clear_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    let feed = update_feed(state, user, NotificationFeed::clear).await?;
    Ok(feed_response("All notifications removed", &feed))
}

async fn update_feed<F>(state: &AppState, user: &AuthUser, apply: F) -> AppResult<NotificationFeed>
where
    F: FnOnce(&mut NotificationFeed),
{
    let _guard = state.write_guard().await;
    let storage = state.user_storage(&user.email);
    let mut feed = storage
        .load_notifications(state.config.seed_demo_data, Utc::now())
        .await?;
    apply(&mut feed);
    storage.save_notifications(&feed).await?;
    Ok(feed)
}

fn feed_response(message: &str, feed: &NotificationFeed) -> ApiResponse<NotificationList> {
    let data = NotificationList {
        items: feed.items().to_vec(),
        unread_count: feed.unread_count(),
    };
    let meta = Meta::total(data.items.len() as i64);
    ApiResponse::success(message, data, Some(meta))
}
