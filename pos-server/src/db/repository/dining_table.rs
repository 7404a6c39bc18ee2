//! Dining Table Repository
//!
//! 桌台 CRUD。status 的 occupied/available 翻转由订单生命周期
//! (OrderRepository) 在同一事务内完成，这里只做员工侧的增删改查。

use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    DiningTable, Order, TableCreate, TableDetail, TableStatus, TableUpdate, TableWithOrders,
    serde_helpers,
};

const TABLE: &str = "dining_table";

/// 非终态状态集，查询里反复用到
const ACTIVE_STATUSES: &str = "['pending', 'confirmed', 'preparing', 'ready']";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List tables (filterable by status / area), annotated with has_orders
    pub async fn find_all(
        &self,
        status: Option<TableStatus>,
        area: Option<String>,
    ) -> RepoResult<Vec<TableWithOrders>> {
        let mut sql = String::from("SELECT * FROM dining_table");
        let mut clauses = Vec::new();
        if status.is_some() {
            clauses.push("status = $status");
        }
        if area.is_some() {
            clauses.push("area = $area");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY number");

        let mut query = self.base.db().query(sql);
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        if let Some(area) = area {
            query = query.bind(("area", area));
        }
        let tables: Vec<DiningTable> = query.await?.take(0)?;

        // 一次查出所有有未完结订单的桌台，避免逐桌 count
        let occupied = self.tables_with_active_orders().await?;
        Ok(tables
            .into_iter()
            .map(|table| {
                let has_orders = table
                    .id
                    .as_ref()
                    .map(|id| occupied.contains(&id.to_string()))
                    .unwrap_or(false);
                TableWithOrders { table, has_orders }
            })
            .collect())
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = self.base.parse_id(TABLE, id)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// 详情：桌台 + 最近 5 笔未完结订单
    pub async fn get_detail(&self, id: &str) -> RepoResult<TableDetail> {
        let table = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        let thing = self.base.parse_id(TABLE, id)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM order WHERE table_id = $table AND status IN {} \
                 ORDER BY created_at DESC LIMIT 5",
                ACTIVE_STATUSES
            ))
            .bind(("table", thing))
            .await?
            .take(0)?;

        Ok(TableDetail { table, orders })
    }

    /// Find table by unique number
    pub async fn find_by_number(&self, number: &str) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE number = $number LIMIT 1")
            .bind(("number", number.to_string()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table (unique number enforced)
    pub async fn create(&self, data: TableCreate) -> RepoResult<DiningTable> {
        if data.number.trim().is_empty() {
            return Err(RepoError::Validation("Table number is required".into()));
        }
        if data.capacity <= 0 {
            return Err(RepoError::Validation(
                "Capacity must be a positive integer".into(),
            ));
        }

        // 先查重给出友好错误；UNIQUE 索引在并发下兜底
        if self.find_by_number(&data.number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table number '{}' already exists",
                data.number
            )));
        }

        let table = DiningTable {
            id: None,
            number: data.number,
            capacity: data.capacity,
            area: data.area,
            status: TableStatus::Available,
            note: data.note,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Update a dining table
    pub async fn update(&self, id: &str, data: TableUpdate) -> RepoResult<DiningTable> {
        let thing = self.base.parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        if let Some(capacity) = data.capacity
            && capacity <= 0
        {
            return Err(RepoError::Validation(
                "Capacity must be a positive integer".into(),
            ));
        }

        // 改桌号需要查重
        if let Some(new_number) = &data.number
            && new_number != &existing.number
            && self.find_by_number(new_number).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table number '{}' already exists",
                new_number
            )));
        }

        let number = data.number.unwrap_or(existing.number);
        let capacity = data.capacity.unwrap_or(existing.capacity);
        let area = data.area.or(existing.area);
        let status = data.status.unwrap_or(existing.status);
        let note = data.note.or(existing.note);

        self.base
            .db()
            .query(
                "UPDATE $thing SET number = $number, capacity = $capacity, \
                 area = $area, status = $status, note = $note",
            )
            .bind(("thing", thing))
            .bind(("number", number))
            .bind(("capacity", capacity))
            .bind(("area", area))
            .bind(("status", status))
            .bind(("note", note))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Delete a dining table — 有未完结订单时拒绝
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(TABLE, id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Table {} not found", id)));
        }

        let active = self.active_order_count(&thing).await?;
        if active > 0 {
            return Err(RepoError::BusinessRule(
                "Table has unfinished orders and cannot be deleted".to_string(),
            ));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?
            .check()?;
        Ok(true)
    }

    /// 桌台的未完结订单数
    pub async fn active_order_count(&self, table: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT count() FROM order WHERE table_id = $table AND status IN {} GROUP ALL",
                ACTIVE_STATUSES
            ))
            .bind(("table", table.clone()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// 所有存在未完结订单的桌台 id 集合 ("table:id" 字符串)
    async fn tables_with_active_orders(&self) -> RepoResult<std::collections::HashSet<String>> {
        #[derive(Deserialize)]
        struct Row {
            #[serde(with = "serde_helpers::record_id")]
            table_id: RecordId,
        }

        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT table_id FROM order WHERE table_id != NONE AND status IN {}",
                ACTIVE_STATUSES
            ))
            .await?;
        let rows: Vec<Row> = result.take(0)?;
        Ok(rows.into_iter().map(|r| r.table_id.to_string()).collect())
    }
}
