use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Transitions are admin-driven and unconstrained; the enum only guards
/// against unknown status strings entering the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "shipped" => Some(Self::Shipped),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A purchase. `total` is computed and fixed at creation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Order joined with the buyer's name (admin listing)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderWithUser {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}

/// Line item as submitted by the client.
///
/// `unit_price` is a point-in-time snapshot supplied by the caller; it is
/// stored as-is and never re-derived from the catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Line item joined with the product name (order detail view)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!(OrderStatus::from_db("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_db("paid"), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::from_db("shipped"), Some(OrderStatus::Shipped));
        assert_eq!(
            OrderStatus::from_db("cancelled"),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(OrderStatus::from_db("refunded"), None);
    }

    #[test]
    fn status_serde_matches_db_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }
}
