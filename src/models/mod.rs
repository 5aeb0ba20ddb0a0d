//! Domain models shared between the db and api layers

pub mod catalog;
pub mod order;
pub mod product;
pub mod user;

pub use catalog::{Category, Store};
pub use order::{Order, OrderItemDetail, OrderItemInput, OrderStatus, OrderWithUser};
pub use product::{Product, ProductDetail, ProductSummary, StockEntry};
pub use user::{PublicUser, User};
