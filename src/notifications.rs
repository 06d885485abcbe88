use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Notification, NotificationType, ProductId};

/// Fields supplied by the caller; id, date and read state are assigned here.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub product_id: Option<ProductId>,
    pub order_id: Option<String>,
    pub image_url: Option<String>,
}

/// Notifications for one user, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn sample(now: DateTime<Utc>) -> Self {
        let image = Some("/uploads/ab795641-0b7b-4946-b1fc-cb5b0efe542d.png".to_string());
        Self {
            items: vec![
                Notification {
                    id: Uuid::new_v4(),
                    kind: NotificationType::StockUpdate,
                    title: "Back in stock".into(),
                    message: "A product you were interested in is available again!".into(),
                    date: now - Duration::hours(1),
                    read: false,
                    product_id: Some(1),
                    order_id: None,
                    image_url: image.clone(),
                },
                Notification {
                    id: Uuid::new_v4(),
                    kind: NotificationType::OrderStatus,
                    title: "Order update".into(),
                    message: "Your order #12345 has shipped and will arrive soon.".into(),
                    date: now - Duration::days(1),
                    read: false,
                    product_id: None,
                    order_id: Some("12345".into()),
                    image_url: None,
                },
                Notification {
                    id: Uuid::new_v4(),
                    kind: NotificationType::NewProduct,
                    title: "New product available".into(),
                    message: "Check out the new arrival in our store!".into(),
                    date: now - Duration::days(2),
                    read: true,
                    product_id: Some(2),
                    order_id: None,
                    image_url: image,
                },
            ],
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn add(&mut self, new: NewNotification, now: DateTime<Utc>) -> &Notification {
        self.items.insert(
            0,
            Notification {
                id: Uuid::new_v4(),
                kind: new.kind,
                title: new.title,
                message: new.message,
                date: now,
                read: false,
                product_id: new.product_id,
                order_id: new.order_id,
                image_url: new.image_url,
            },
        );
        &self.items[0]
    }

    /// Returns false when no notification has that id.
    pub fn mark_as_read(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(title: &str) -> NewNotification {
        NewNotification {
            kind: NotificationType::StockUpdate,
            title: title.into(),
            message: "msg".into(),
            product_id: Some(1),
            order_id: None,
            image_url: None,
        }
    }

    #[test]
    fn sample_feed_has_two_unread() {
        let feed = NotificationFeed::sample(Utc::now());
        assert_eq!(feed.items().len(), 3);
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn add_puts_unread_entry_first() {
        let mut feed = NotificationFeed::default();
        feed.add(stock("first"), Utc::now());
        let id = feed.add(stock("second"), Utc::now()).id;
        assert_eq!(feed.items()[0].id, id);
        assert_eq!(feed.items()[0].title, "second");
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn mark_read_updates_unread_count() {
        let mut feed = NotificationFeed::sample(Utc::now());
        let first = feed.items()[0].id;
        assert!(feed.mark_as_read(first));
        assert_eq!(feed.unread_count(), 1);
        assert!(!feed.mark_as_read(Uuid::new_v4()));

        feed.mark_all_as_read();
        assert_eq!(feed.unread_count(), 0);

        feed.clear();
        assert!(feed.items().is_empty());
    }
}
