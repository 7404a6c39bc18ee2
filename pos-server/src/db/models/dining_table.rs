//! Dining Table Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::models::Order;

/// Table status enum (桌台状态)
///
/// occupied / available 由订单生命周期自动维护；
/// reserved / cleaning / disabled 由员工手工设置，订单活动不覆盖。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
    Disabled,
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 人面桌号，全店唯一
    pub number: String,
    pub capacity: i32,
    /// 区域标签 (如 "大厅" / "包间")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub number: String,
    pub capacity: i32,
    pub area: Option<String>,
    pub note: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 列表视图：桌台 + 是否有未完结订单
#[derive(Debug, Clone, Serialize)]
pub struct TableWithOrders {
    #[serde(flatten)]
    pub table: DiningTable,
    pub has_orders: bool,
}

/// 详情视图：桌台 + 最近的未完结订单
#[derive(Debug, Clone, Serialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub table: DiningTable,
    pub orders: Vec<Order>,
}
