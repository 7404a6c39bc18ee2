//! Dish Model (菜品)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Dish entity
///
/// 目录本身 (分类等) 属于外部 catalog 服务；菜品行保留在核心里
/// 是因为可点性开关和删除保护在这里生效。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// 外部目录的分类引用
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 上架开关 (员工控制)
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    /// 临时沽清
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_sold_out: bool,
    /// 可选库存计数，本核心不自动扣减
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl Dish {
    /// 可点 = 上架且未沽清
    pub fn is_orderable(&self) -> bool {
        self.is_available && !self.is_sold_out
    }
}

/// 目录快照：下单瞬间读取的 {id, name, price, 可点性}
///
/// 订单按此快照定价，之后菜价变动不影响已建订单。
pub type DishSnapshot = Dish;

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
    pub price: Decimal,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_sold_out: bool,
    pub stock: Option<i64>,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub category: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sold_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}
