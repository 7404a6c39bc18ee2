//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod dining_table;
pub mod dish;
pub mod order;


// Re-exports
pub use dining_table::DiningTableRepository;
pub use dish::DishRepository;
pub use order::{OrderFilter, OrderRepository};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// 各 repository 共享的数据库句柄封装
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// 解析 "table:id" 字符串为 RecordId，并校验表名
    pub fn parse_id(&self, table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
        let record: surrealdb::RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if record.table() != table {
            return Err(RepoError::Validation(format!(
                "Expected {} ID, got: {}",
                table, id
            )));
        }
        Ok(record)
    }
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "dish:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("dish", "abc");
//   - 获取表名: id.table()
