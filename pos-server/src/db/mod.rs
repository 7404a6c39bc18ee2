//! Database Module
//!
//! 嵌入式 SurrealDB：二进制走 RocksDB 落盘，测试走内存引擎。
//! schema (含唯一索引兜底) 在连接建立后立即定义。

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "pos";
const DATABASE: &str = "pos";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// 打开落盘数据库 (RocksDB)
    pub async fn open(db_path: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::setup(db).await
    }

    /// 打开内存数据库 (测试用)
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory db: {}", e)))?;
        Self::setup(db).await
    }

    async fn setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db).await?;

        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);
        Ok(Self { db })
    }
}

/// 定义表结构和索引
///
/// 表默认 SCHEMALESS (模型层负责字段形状)；这里只声明必须由
/// 存储层硬保证的约束：
/// - dining_table.number 唯一 (人面桌号不可重复)
/// - order.order_no 唯一 (订单号生成方案之外的兜底)
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS dining_table;
        DEFINE INDEX IF NOT EXISTS dining_table_number ON dining_table FIELDS number UNIQUE;

        DEFINE TABLE IF NOT EXISTS dish;

        DEFINE TABLE IF NOT EXISTS order;
        DEFINE INDEX IF NOT EXISTS order_order_no ON order FIELDS order_no UNIQUE;
        DEFINE INDEX IF NOT EXISTS order_table ON order FIELDS table_id;
        DEFINE INDEX IF NOT EXISTS order_status ON order FIELDS status;

        DEFINE TABLE IF NOT EXISTS order_item;
        DEFINE INDEX IF NOT EXISTS order_item_order ON order_item FIELDS order_id;
        DEFINE INDEX IF NOT EXISTS order_item_dish ON order_item FIELDS dish_id;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    Ok(())
}
