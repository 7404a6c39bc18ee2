//! Payment Reconciliation
//!
//! 支付方式 / 实付金额 / 已付标记的对账规则。
//! 与状态迁移解耦：可以只改支付字段不动状态。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// Payment method enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayMethod {
    Cash,
    Card,
    Alipay,
    Wechat,
}

/// 一次支付对账请求携带的可选字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentUpdate {
    pub pay_method: Option<PayMethod>,
    pub paid_amount: Option<Decimal>,
    pub is_paid: Option<bool>,
}

impl PaymentUpdate {
    pub fn is_empty(&self) -> bool {
        self.pay_method.is_none() && self.paid_amount.is_none() && self.is_paid.is_none()
    }

    /// paid_amount 不允许为负
    pub fn validate(&self) -> Result<(), String> {
        if let Some(amount) = self.paid_amount
            && amount < Decimal::ZERO
        {
            return Err("paid_amount must be >= 0".to_string());
        }
        Ok(())
    }
}

/// 推导 is_paid 的新值，`None` 表示保持原值
///
/// 优先级：
/// 1. 显式传入 is_paid（员工覆写）直接生效
/// 2. 目标状态为 completed 时：
///    - 带 paid_amount ⇒ is_paid = paid_amount >= total_price（欠付不算已付）
///    - 不带 paid_amount ⇒ is_paid = true（默认视为已结清）
/// 3. 其它目标状态不动 is_paid
pub fn resolve_is_paid(
    update: &PaymentUpdate,
    target_status: OrderStatus,
    total_price: Decimal,
) -> Option<bool> {
    if let Some(explicit) = update.is_paid {
        return Some(explicit);
    }

    if target_status != OrderStatus::Completed {
        return None;
    }

    match update.paid_amount {
        Some(paid) => Some(paid >= total_price),
        None => Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn full_payment_marks_paid_on_completion() {
        let update = PaymentUpdate {
            paid_amount: Some(dec("100.00")),
            ..Default::default()
        };
        assert_eq!(
            resolve_is_paid(&update, OrderStatus::Completed, dec("100.00")),
            Some(true)
        );
    }

    #[test]
    fn underpayment_does_not_mark_paid() {
        let update = PaymentUpdate {
            paid_amount: Some(dec("50.00")),
            ..Default::default()
        };
        assert_eq!(
            resolve_is_paid(&update, OrderStatus::Completed, dec("100.00")),
            Some(false)
        );
    }

    #[test]
    fn completion_without_amount_defaults_to_paid() {
        let update = PaymentUpdate::default();
        assert_eq!(
            resolve_is_paid(&update, OrderStatus::Completed, dec("100.00")),
            Some(true)
        );
    }

    #[test]
    fn explicit_flag_wins_over_derivation() {
        let update = PaymentUpdate {
            paid_amount: Some(dec("100.00")),
            is_paid: Some(false),
            ..Default::default()
        };
        assert_eq!(
            resolve_is_paid(&update, OrderStatus::Completed, dec("100.00")),
            Some(false)
        );
    }

    #[test]
    fn non_completed_target_leaves_flag_unchanged() {
        let update = PaymentUpdate {
            paid_amount: Some(dec("100.00")),
            ..Default::default()
        };
        assert_eq!(
            resolve_is_paid(&update, OrderStatus::Preparing, dec("100.00")),
            None
        );
    }

    #[test]
    fn overpayment_still_marks_paid() {
        let update = PaymentUpdate {
            paid_amount: Some(dec("120.00")),
            ..Default::default()
        };
        assert_eq!(
            resolve_is_paid(&update, OrderStatus::Completed, dec("100.00")),
            Some(true)
        );
    }

    #[test]
    fn negative_amount_fails_validation() {
        let update = PaymentUpdate {
            paid_amount: Some(dec("-1.00")),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(PaymentUpdate::default().validate().is_ok());
    }
}
