use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderItem, OrderStatus};

/// Orders placed by one user, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseHistory {
    orders: Vec<Order>,
}

impl PurchaseHistory {
    /// Demo orders shown to a new user.
    pub fn sample() -> Self {
        let orders = SAMPLE_ORDERS
            .iter()
            .map(|(id, (y, m, d), items, total, status)| Order {
                id: (*id).to_string(),
                customer_name: "Demo Customer".into(),
                customer_phone: String::new(),
                items: Vec::<OrderItem>::new(),
                total_items: *items,
                total_price: *total,
                status: *status,
                created_at: NaiveDate::from_ymd_opt(*y, *m, *d)
                    .and_then(|date| date.and_hms_opt(12, 0, 0))
                    .map(|dt| dt.and_utc())
                    .unwrap_or_default(),
            })
            .collect();
        Self { orders }
    }

    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id.eq_ignore_ascii_case(id))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders whose id contains `term` (case-insensitive), newest first.
    pub fn search(&self, term: Option<&str>) -> Vec<&Order> {
        let term = term.map(|t| t.trim().to_lowercase()).unwrap_or_default();
        let mut found: Vec<&Order> = self
            .orders
            .iter()
            .filter(|o| o.id.to_lowercase().contains(&term))
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    pub fn next_order_id(&self, now: DateTime<Utc>) -> String {
        let year = now.year();
        let prefix = format!("ORD-{year}-");
        let seq = self
            .orders
            .iter()
            .filter(|o| o.id.starts_with(&prefix))
            .count()
            + 1;
        format!("{prefix}{seq:03}")
    }
}

const SAMPLE_ORDERS: &[(&str, (i32, u32, u32), i64, i64, OrderStatus)] = &[
    ("ORD-2023-001", (2023, 4, 10), 3, 25990, OrderStatus::Delivered),
    ("ORD-2023-002", (2023, 3, 22), 1, 8990, OrderStatus::Delivered),
    ("ORD-2023-003", (2023, 2, 15), 2, 12980, OrderStatus::Delivered),
    ("ORD-2024-001", (2024, 1, 5), 4, 32160, OrderStatus::Delivered),
    ("ORD-2024-002", (2024, 2, 18), 2, 15780, OrderStatus::Processing),
];

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ids(orders: &[&Order]) -> Vec<String> {
        orders.iter().map(|o| o.id.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_and_newest_first() {
        let history = PurchaseHistory::sample();
        assert_eq!(
            ids(&history.search(Some("ord-2023"))),
            ["ORD-2023-001", "ORD-2023-002", "ORD-2023-003"]
        );
        assert_eq!(history.search(None).len(), 5);
        assert_eq!(history.search(Some("  ")).len(), 5);
        assert!(history.search(Some("ORD-1999")).is_empty());
    }

    #[test]
    fn next_order_id_counts_per_year() {
        let history = PurchaseHistory::sample();
        let in_2024 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let in_2026 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(history.next_order_id(in_2024), "ORD-2024-003");
        assert_eq!(history.next_order_id(in_2026), "ORD-2026-001");
    }

    #[test]
    fn get_finds_recorded_order() {
        let mut history = PurchaseHistory::default();
        let mut order = PurchaseHistory::sample().search(None)[0].clone();
        order.id = "ORD-2026-001".into();
        history.record(order);
        assert!(history.get("ord-2026-001").is_some());
        assert!(history.get("ORD-2026-002").is_none());
    }
}
