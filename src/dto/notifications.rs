use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Notification, NotificationType, ProductId},
    notifications::NewNotification,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub product_id: Option<ProductId>,
    pub order_id: Option<String>,
    pub image_url: Option<String>,
}

impl From<CreateNotificationRequest> for NewNotification {
    fn from(req: CreateNotificationRequest) -> Self {
        Self {
            kind: req.kind,
            title: req.title,
            message: req.message,
            product_id: req.product_id,
            order_id: req.order_id,
            image_url: req.image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub unread_count: usize,
}
