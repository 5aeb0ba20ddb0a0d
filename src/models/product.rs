use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog item as stored
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product joined with its category name (LEFT JOIN — category may be gone)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product detail with its image URLs
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductSummary,
    /// URLs under /images served from the image directory
    pub images: Vec<String>,
}

/// One entry of the initial-stock specification submitted on product creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    pub store_id: i64,
    pub quantity: i32,
}
