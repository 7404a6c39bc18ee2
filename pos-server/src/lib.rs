//! POS Server - 单店餐厅订单管理服务
//!
//! # 架构概述
//!
//! 订单生命周期与桌台状态一致性引擎：
//!
//! - **购物车** (`cart`): 客户端持有的下单工作集，金额实时重算
//! - **订单核心** (`orders`): 订单号生成、状态机、支付对账
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储，单事务保证订单/桌台一致性
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── cart/          # 购物车聚合
//! ├── orders/        # 订单号、状态机、支付
//! ├── db/            # 数据库层 (models + repository)
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod cart;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use cart::Cart;
pub use core::{Config, Server, ServerState};
pub use orders::{CancelPolicy, OrderStatus, PayMethod};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
