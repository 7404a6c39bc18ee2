//! Order API Handlers
//!
//! 下单员工通过 `X-Operator` 请求头标识 (身份系统在上游网关，
//! 这里只透传主体标签)。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{OrderCreate, OrderDetail, OrderPage, OrderStatusUpdate};
use crate::db::repository::{OrderFilter, OrderRepository};
use crate::orders::OrderStatus;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{AppError, AppResult};

const OPERATOR_HEADER: &str = "x-operator";

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// 列表过滤参数
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    /// "dining_table:xxx"
    pub table: Option<String>,
    /// YYYY-MM-DD (含当天)
    pub start_date: Option<String>,
    /// YYYY-MM-DD (含当天)
    pub end_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn repo(state: &ServerState) -> OrderRepository {
    OrderRepository::new(state.db.clone(), state.config.cancel_policy)
}

fn operator(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OPERATOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = repo(&state).create(payload, operator(&headers)).await?;
    Ok(Json(detail))
}

/// GET /api/orders - 订单列表 (过滤 + 分页)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<OrderPage>> {
    let table: Option<RecordId> = match query.table {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| AppError::validation(format!("Invalid table ID: {}", raw)))?,
        ),
        None => None,
    };
    let start_millis = match query.start_date {
        Some(d) => Some(day_start_millis(parse_date(&d)?)),
        None => None,
    };
    let end_millis = match query.end_date {
        Some(d) => Some(day_end_millis(parse_date(&d)?)),
        None => None,
    };

    let page = repo(&state)
        .find_page(OrderFilter {
            status: query.status,
            table,
            start_millis,
            end_millis,
            page: query.page,
            limit: query.limit,
        })
        .await?;
    Ok(Json(page))
}

/// GET /api/orders/:id - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = repo(&state).get_detail(&id).await?;
    Ok(Json(detail))
}

/// PATCH /api/orders/:id/status - 状态迁移 (可同时带支付字段)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = repo(&state).update_status(&id, payload).await?;
    Ok(Json(detail))
}

/// POST /api/orders/:id/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = repo(&state).cancel(&id).await?;
    Ok(Json(detail))
}
