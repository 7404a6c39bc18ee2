//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{
    DiningTable, TableCreate, TableDetail, TableStatus, TableUpdate, TableWithOrders,
};
use crate::db::repository::DiningTableRepository;
use crate::utils::AppResult;

/// 列表过滤参数
#[derive(Debug, Deserialize)]
pub struct TableListQuery {
    pub status: Option<TableStatus>,
    pub area: Option<String>,
}

/// GET /api/tables - 桌台列表 (带 has_orders 标注)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TableListQuery>,
) -> AppResult<Json<Vec<TableWithOrders>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let tables = repo.find_all(query.status, query.area).await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 桌台详情 (含未完结订单)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableDetail>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let detail = repo.get_detail(&id).await?;
    Ok(Json(detail))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.update(&id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台 (有未完结订单时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
