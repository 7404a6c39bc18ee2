//! Order Model
//!
//! 订单是定价快照：total_price / unit_price 在创建时一次算定，
//! 之后菜价变动不再影响。创建后只有状态和支付字段可变。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::models::DiningTable;
use crate::orders::{OrderStatus, PayMethod};

/// 外带哨兵值：tableId 传此值时跳过桌台查找和桌台状态副作用
pub const TAKEOUT_TABLE_ID: &str = "takeout";

// =============================================================================
// Order (主表)
// =============================================================================

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 人可读订单号，全店唯一
    pub order_no: String,
    /// 桌台引用；None = 外带
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table_id: Option<RecordId>,
    pub status: OrderStatus,
    /// 创建时算定的总价，之后不再重算
    pub total_price: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_method: Option<PayMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 下单员工标识 (外部身份系统给出的主体标签)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Unix millis
    pub created_at: i64,
}

// =============================================================================
// Order Item (订单行)
// =============================================================================

/// Order line — 创建后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub dish_id: RecordId,
    /// 菜名快照，菜品后续改名不影响历史订单展示
    pub name: String,
    pub quantity: i64,
    /// 创建时从 Dish.price 拷贝的单价快照
    pub unit_price: Decimal,
    /// unit_price × quantity，落库不重算
    pub subtotal: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    /// "dining_table:xxx" 或外带哨兵 "takeout"
    pub table_id: String,
    pub items: Vec<OrderCreateItem>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub pay_method: Option<PayMethod>,
}

/// Create order line payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreateItem {
    pub dish_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// 合并的状态 + 支付更新payload (PATCH /api/orders/:id/status)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub pay_method: Option<PayMethod>,
    #[serde(default)]
    pub paid_amount: Option<Decimal>,
    #[serde(default)]
    pub is_paid: Option<bool>,
}

// =============================================================================
// API Response Types
// =============================================================================

/// 完整订单视图：订单 + 桌台 + 订单行
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    /// 外带订单为 None
    pub table: Option<DiningTable>,
    pub items: Vec<OrderItem>,
}

/// 分页元数据
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// 订单列表响应
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub orders: Vec<OrderDetail>,
    pub pagination: Pagination,
}
