//! Cart Aggregate (购物车)
//!
//! 下单前的客户端工作集：每个菜品至多一行，数量归零即删行，
//! 金额每次读取现算，不缓存。Cart 是显式传递的值对象，
//! 由调用方 (UI / session 层) 持有，不做任何共享全局状态。

#[cfg(test)]
mod tests;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::models::{OrderCreate, OrderCreateItem};
use crate::orders::PayMethod;

/// 加入购物车所需的菜品视图 (目录快照的客户端投影)
#[derive(Debug, Clone)]
pub struct CartDish {
    pub dish_id: String,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// 购物车行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub dish_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub notes: Option<String>,
}

impl CartLine {
    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// 购物车聚合
#[derive(Debug, Clone)]
pub struct Cart {
    tax_rate: Decimal,
    lines: Vec<CartLine>,
    order_notes: String,
}

impl Cart {
    /// 创建空购物车；税率为政策配置 (可为 0)
    pub fn new(tax_rate: Decimal) -> Self {
        Self {
            tax_rate,
            lines: Vec::new(),
            order_notes: String::new(),
        }
    }

    /// 加一份：行已存在则数量 +1，否则新建数量为 1 的行
    pub fn add_item(&mut self, dish: &CartDish) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.dish_id == dish.dish_id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine {
            dish_id: dish.dish_id.clone(),
            name: dish.name.clone(),
            price: dish.price,
            quantity: 1,
            image: dish.image.clone(),
            notes: None,
        });
    }

    /// 整行移除，无论数量多少
    pub fn remove_item(&mut self, dish_id: &str) {
        self.lines.retain(|l| l.dish_id != dish_id);
    }

    /// 数量增减：new = max(0, current + delta)，归零即删行
    pub fn update_quantity(&mut self, dish_id: &str, delta: i32) {
        for line in &mut self.lines {
            if line.dish_id == dish_id {
                line.quantity = line.quantity.saturating_add_signed(delta);
            }
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    /// 行级备注，自由文本
    pub fn set_notes(&mut self, dish_id: &str, notes: impl Into<String>) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.dish_id == dish_id) {
            line.notes = Some(notes.into());
        }
    }

    /// 订单级备注
    pub fn set_order_notes(&mut self, notes: impl Into<String>) {
        self.order_notes = notes.into();
    }

    /// 清空所有行和备注
    pub fn clear(&mut self) {
        self.lines.clear();
        self.order_notes.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn order_notes(&self) -> &str {
        &self.order_notes
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ(price × quantity)，每次读取现算
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// subtotal × tax_rate
    pub fn tax(&self) -> Decimal {
        self.subtotal() * self.tax_rate
    }

    /// subtotal + tax
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.tax()
    }

    /// 转换为订单创建请求 (提交即清空由调用方负责)
    pub fn to_order_create(
        &self,
        table_id: impl Into<String>,
        pay_method: Option<PayMethod>,
    ) -> OrderCreate {
        OrderCreate {
            table_id: table_id.into(),
            items: self
                .lines
                .iter()
                .map(|l| OrderCreateItem {
                    dish_id: l.dish_id.clone(),
                    quantity: l.quantity,
                    notes: l.notes.clone(),
                })
                .collect(),
            notes: (!self.order_notes.is_empty()).then(|| self.order_notes.clone()),
            pay_method,
        }
    }
}
