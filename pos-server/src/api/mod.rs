//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`tables`] - 桌台管理接口
//! - [`dishes`] - 菜品管理接口
//! - [`orders`] - 订单管理接口

pub mod dishes;
pub mod health;
pub mod orders;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    health::router()
        .merge(tables::router())
        .merge(dishes::router())
        .merge(orders::router())
}
