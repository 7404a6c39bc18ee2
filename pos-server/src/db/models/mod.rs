//! Database Models
//!
//! SurrealDB 实体与 API 载荷结构

pub mod dining_table;
pub mod dish;
pub mod order;
pub mod serde_helpers;

pub use dining_table::{
    DiningTable, TableDetail, TableStatus, TableWithOrders, TableCreate, TableUpdate,
};
pub use dish::{Dish, DishCreate, DishSnapshot, DishUpdate};
pub use order::{
    Order, OrderCreate, OrderCreateItem, OrderDetail, OrderItem, OrderPage, OrderStatusUpdate,
    Pagination, TAKEOUT_TABLE_ID,
};
