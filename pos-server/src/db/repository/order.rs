//! Order Repository
//!
//! 订单创建事务 / 状态迁移 / 支付对账 / 查询。
//!
//! 一致性约定：订单行与桌台状态的共同变更全部放在单个
//! SurrealDB 事务里 —— 创建时 (订单 + 订单行 + 桌台置 occupied)，
//! 终态迁移时 (状态写入 + 桌台置 available)。校验全部发生在
//! 任何写入之前，失败即整体放弃，不留半个订单。

use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    DiningTable, Order, OrderCreate, OrderDetail, OrderItem, OrderPage, OrderStatusUpdate,
    Pagination, TAKEOUT_TABLE_ID, TableStatus,
};
use crate::orders::{
    CancelPolicy, OrderStatus, PayMethod, PaymentUpdate, check_transition, generate_order_no,
    resolve_is_paid,
};
use crate::utils::time::now_millis;

const TABLE: &str = "order";
const DINING_TABLE: &str = "dining_table";

/// 强类型订单查询条件 —— 具名可选字段，不做动态字典拼接
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub table: Option<RecordId>,
    /// 创建时间下界 (Unix millis, 含)
    pub start_millis: Option<i64>,
    /// 创建时间上界 (Unix millis, 含)
    pub end_millis: Option<i64>,
    pub page: u32,
    pub limit: u32,
}

/// 把过滤条件绑定到查询上 (只绑定出现在 WHERE 子句里的参数)
fn bind_filter<'a>(
    filter: &OrderFilter,
    mut query: surrealdb::method::Query<'a, Db>,
) -> surrealdb::method::Query<'a, Db> {
    if let Some(status) = filter.status {
        query = query.bind(("status", status));
    }
    if let Some(table) = filter.table.clone() {
        query = query.bind(("table", table));
    }
    if let Some(start) = filter.start_millis {
        query = query.bind(("start", start));
    }
    if let Some(end) = filter.end_millis {
        query = query.bind(("end", end));
    }
    query
}

/// 入库用的订单行，链接字段保持原生 RecordId 绑定
/// (字符串化会破坏 record link 比较，见 serde_helpers)
#[derive(Debug, Serialize)]
struct OrderRow {
    order_no: String,
    table_id: Option<RecordId>,
    status: OrderStatus,
    total_price: Decimal,
    paid_amount: Decimal,
    is_paid: bool,
    pay_method: Option<PayMethod>,
    notes: Option<String>,
    created_by: Option<String>,
    created_at: i64,
}

#[derive(Debug, Serialize)]
struct ItemRow {
    order_id: RecordId,
    dish_id: RecordId,
    name: String,
    quantity: i64,
    unit_price: Decimal,
    subtotal: Decimal,
    notes: Option<String>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    cancel_policy: CancelPolicy,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, cancel_policy: CancelPolicy) -> Self {
        Self {
            base: BaseRepository::new(db),
            cancel_policy,
        }
    }

    // =========================================================================
    // Order Creation Transaction
    // =========================================================================

    /// 创建订单：校验 → 按目录快照定价 → 单事务落库 + 桌台置 occupied
    ///
    /// 外带哨兵 (`tableId == "takeout"`) 跳过桌台查找与状态副作用。
    pub async fn create(
        &self,
        data: OrderCreate,
        created_by: Option<String>,
    ) -> RepoResult<OrderDetail> {
        // 1. 行校验
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".into(),
            ));
        }
        if data.items.iter().any(|i| i.quantity < 1) {
            return Err(RepoError::Validation("Quantity must be >= 1".into()));
        }

        // 2. 桌台校验 (外带跳过)
        let table_thing = if data.table_id == TAKEOUT_TABLE_ID {
            None
        } else {
            let thing = self.base.parse_id(DINING_TABLE, &data.table_id)?;
            let table: Option<DiningTable> = self.base.db().select(thing.clone()).await?;
            let table = table
                .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", data.table_id)))?;
            // 停用的桌台不接新单
            if table.status == TableStatus::Disabled {
                return Err(RepoError::BusinessRule(format!(
                    "Table {} is disabled and cannot receive orders",
                    table.number
                )));
            }
            Some(thing)
        };

        // 3. 目录快照：全部 id 必须解析，缺一个就整单失败
        let mut dish_ids: Vec<RecordId> = Vec::new();
        for item in &data.items {
            let thing = self.base.parse_id("dish", &item.dish_id)?;
            if !dish_ids.contains(&thing) {
                dish_ids.push(thing);
            }
        }
        let snapshot = crate::db::repository::DishRepository::new(self.base.db().clone())
            .snapshot(&dish_ids)
            .await?;
        if snapshot.len() != dish_ids.len() {
            return Err(RepoError::NotFound("Some dishes do not exist".into()));
        }

        // 4. 可点性：列出不可点的菜名，不建半单
        let unavailable: Vec<&str> = snapshot
            .iter()
            .filter(|d| !d.is_orderable())
            .map(|d| d.name.as_str())
            .collect();
        if !unavailable.is_empty() {
            return Err(RepoError::BusinessRule(format!(
                "The following dishes are unavailable: {}",
                unavailable.join(", ")
            )));
        }

        // 5. 定价快照：单价取此刻的 Dish.price，之后永不重读
        let order_id = RecordId::from_table_key(TABLE, Uuid::new_v4().simple().to_string());
        let mut total_price = Decimal::ZERO;
        let mut items: Vec<ItemRow> = Vec::with_capacity(data.items.len());
        for item in &data.items {
            let dish_thing = self.base.parse_id("dish", &item.dish_id)?;
            let dish = snapshot
                .iter()
                .find(|d| d.id.as_ref() == Some(&dish_thing))
                .ok_or_else(|| RepoError::NotFound("Some dishes do not exist".into()))?;
            let unit_price = dish.price;
            let subtotal = unit_price * Decimal::from(item.quantity);
            total_price += subtotal;
            items.push(ItemRow {
                order_id: order_id.clone(),
                dish_id: dish_thing,
                name: dish.name.clone(),
                quantity: i64::from(item.quantity),
                unit_price,
                subtotal,
                notes: item.notes.clone(),
            });
        }

        // 6. 订单号：生成方案 + order_no UNIQUE 索引兜底
        let order = OrderRow {
            order_no: generate_order_no(),
            table_id: table_thing.clone(),
            status: OrderStatus::Pending,
            total_price,
            paid_amount: Decimal::ZERO,
            is_paid: false,
            pay_method: data.pay_method,
            notes: data.notes,
            created_by,
            created_at: now_millis(),
        };

        // 7+8. 单事务：订单 + 订单行落库，然后才翻桌台状态。
        // 任一语句失败整个事务回滚，桌台不会被孤立置为 occupied。
        let mut sql = String::from(
            "BEGIN TRANSACTION; \
             CREATE $order_id CONTENT $order; \
             FOR $item IN $items { CREATE order_item CONTENT $item; };",
        );
        if table_thing.is_some() {
            sql.push_str(" UPDATE $table SET status = 'occupied';");
        }
        sql.push_str(" COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("order_id", order_id.clone()))
            .bind(("order", order))
            .bind(("items", items));
        if let Some(table) = table_thing {
            query = query.bind(("table", table));
        }
        query.await?.check()?;

        tracing::info!(order = %order_id, "Order created");

        // 9. 返回完整订单视图
        self.get_detail(&order_id.to_string()).await
    }

    // =========================================================================
    // Status Transition + Payment Reconciliation
    // =========================================================================

    /// 合并的状态迁移 + 支付对账
    ///
    /// 终态迁移 (completed / cancelled) 与桌台释放在同一事务内。
    pub async fn update_status(
        &self,
        id: &str,
        update: OrderStatusUpdate,
    ) -> RepoResult<OrderDetail> {
        let thing = self.base.parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing.clone()).await?;
        let order =
            order.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let payment = PaymentUpdate {
            pay_method: update.pay_method,
            paid_amount: update.paid_amount,
            is_paid: update.is_paid,
        };
        payment.validate().map_err(RepoError::Validation)?;

        check_transition(order.status, update.status, self.cancel_policy)
            .map_err(|e| RepoError::BusinessRule(e.to_string()))?;

        let is_paid = resolve_is_paid(&payment, update.status, order.total_price);

        let mut sets = vec!["status = $status"];
        if payment.pay_method.is_some() {
            sets.push("pay_method = $pay_method");
        }
        if payment.paid_amount.is_some() {
            sets.push("paid_amount = $paid_amount");
        }
        if is_paid.is_some() {
            sets.push("is_paid = $is_paid");
        }

        // 只有真正从活跃态进入终态才释放桌台；对已完结订单重发同态
        // (例如补记支付) 不得动桌台，桌台可能已被新订单占用
        let release_table = !order.status.is_terminal()
            && update.status.is_terminal()
            && order.table_id.is_some();
        let mut sql = format!(
            "BEGIN TRANSACTION; UPDATE $order SET {};",
            sets.join(", ")
        );
        if release_table {
            sql.push_str(" UPDATE $table SET status = 'available';");
        }
        sql.push_str(" COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("order", thing.clone()))
            .bind(("status", update.status));
        if let Some(pay_method) = payment.pay_method {
            query = query.bind(("pay_method", pay_method));
        }
        if let Some(paid_amount) = payment.paid_amount {
            query = query.bind(("paid_amount", paid_amount));
        }
        if let Some(is_paid) = is_paid {
            query = query.bind(("is_paid", is_paid));
        }
        if release_table
            && let Some(table) = order.table_id.clone()
        {
            query = query.bind(("table", table));
        }
        query.await?.check()?;

        tracing::info!(order = %thing, status = %update.status, "Order status updated");

        self.get_detail(id).await
    }

    /// 取消订单 —— 同一状态机，目标态固定为 cancelled
    pub async fn cancel(&self, id: &str) -> RepoResult<OrderDetail> {
        self.update_status(
            id,
            OrderStatusUpdate {
                status: OrderStatus::Cancelled,
                pay_method: None,
                paid_amount: None,
                is_paid: None,
            },
        )
        .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get full order view (order + table + items)
    pub async fn get_detail(&self, id: &str) -> RepoResult<OrderDetail> {
        let thing = self.base.parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing.clone()).await?;
        let order =
            order.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let table = match &order.table_id {
            Some(table_id) => self.base.db().select(table_id.clone()).await?,
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order_id = $order")
            .bind(("order", thing))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;

        Ok(OrderDetail {
            order,
            table,
            items,
        })
    }

    /// 分页 + 条件查询，新单在前
    pub async fn find_page(&self, filter: OrderFilter) -> RepoResult<OrderPage> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 200);

        let mut clauses = Vec::new();
        if filter.status.is_some() {
            clauses.push("status = $status");
        }
        if filter.table.is_some() {
            clauses.push("table_id = $table");
        }
        if filter.start_millis.is_some() {
            clauses.push("created_at >= $start");
        }
        if filter.end_millis.is_some() {
            clauses.push("created_at <= $end");
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        // total
        let count_sql = format!("SELECT count() FROM order{} GROUP ALL", where_clause);
        let mut result = bind_filter(&filter, self.base.db().query(count_sql)).await?;
        let total: Option<i64> = result.take((0, "count"))?;
        let total = total.unwrap_or(0).max(0) as u64;

        // page of orders
        let start = (page - 1) * limit;
        let page_sql = format!(
            "SELECT * FROM order{} ORDER BY created_at DESC LIMIT {} START {}",
            where_clause, limit, start
        );
        let mut result = bind_filter(&filter, self.base.db().query(page_sql)).await?;
        let orders: Vec<Order> = result.take(0)?;

        let orders = self.join_details(orders).await?;

        let total_pages = total.div_ceil(u64::from(limit));
        Ok(OrderPage {
            orders,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages,
            },
        })
    }

    /// 批量拼接订单行与桌台，避免逐单往返
    async fn join_details(&self, orders: Vec<Order>) -> RepoResult<Vec<OrderDetail>> {
        let order_ids: Vec<RecordId> = orders.iter().filter_map(|o| o.id.clone()).collect();
        let table_ids: Vec<RecordId> = {
            let mut ids: Vec<RecordId> = orders.iter().filter_map(|o| o.table_id.clone()).collect();
            ids.dedup();
            ids
        };

        let items: Vec<OrderItem> = if order_ids.is_empty() {
            Vec::new()
        } else {
            self.base
                .db()
                .query("SELECT * FROM order_item WHERE order_id IN $ids")
                .bind(("ids", order_ids))
                .await?
                .take(0)?
        };

        let tables: Vec<DiningTable> = if table_ids.is_empty() {
            Vec::new()
        } else {
            self.base
                .db()
                .query("SELECT * FROM dining_table WHERE id IN $ids")
                .bind(("ids", table_ids))
                .await?
                .take(0)?
        };

        Ok(orders
            .into_iter()
            .map(|order| {
                let own_items = items
                    .iter()
                    .filter(|i| Some(&i.order_id) == order.id.as_ref())
                    .cloned()
                    .collect();
                let table = order
                    .table_id
                    .as_ref()
                    .and_then(|tid| tables.iter().find(|t| t.id.as_ref() == Some(tid)).cloned());
                OrderDetail {
                    order,
                    table,
                    items: own_items,
                }
            })
            .collect())
    }

    /// Find order by its human-readable number
    pub async fn find_by_order_no(&self, order_no: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_no = $order_no LIMIT 1")
            .bind(("order_no", order_no.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// 订单行直查 (测试与展示用；订单行创建后不可变)
    pub async fn find_items(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let thing = self.base.parse_id(TABLE, order_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order_id = $order")
            .bind(("order", thing))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;
        Ok(items)
    }

    #[cfg(test)]
    pub(crate) async fn count_all(&self) -> RepoResult<(i64, i64)> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?;
        let orders: Option<i64> = result.take((0, "count"))?;
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order_item GROUP ALL")
            .await?;
        let items: Option<i64> = result.take((0, "count"))?;
        Ok((orders.unwrap_or(0), items.unwrap_or(0)))
    }
}
