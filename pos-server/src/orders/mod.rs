//! 订单核心 - 订单号、状态机、支付对账
//!
//! # 模块结构
//!
//! - [`number`] - 订单号生成 (日期 + 毫秒 + 随机后缀)
//! - [`status`] - 订单状态机与取消策略
//! - [`payment`] - 支付字段对账规则

pub mod number;
pub mod payment;
pub mod status;

pub use number::generate_order_no;
pub use payment::{PayMethod, PaymentUpdate, resolve_is_paid};
pub use status::{CancelPolicy, OrderStatus, TransitionError, check_transition};
