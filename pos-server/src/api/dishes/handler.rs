//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{Dish, DishCreate, DishUpdate};
use crate::db::repository::DishRepository;
use crate::utils::{AppError, AppResult};

/// 列表过滤参数
#[derive(Debug, Deserialize)]
pub struct DishListQuery {
    /// "category:xxx"
    pub category: Option<String>,
    /// true = 只列可点的 (上架且未沽清)
    #[serde(default)]
    pub available: bool,
    /// 按菜名模糊搜索
    pub search: Option<String>,
}

/// GET /api/dishes - 菜品列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DishListQuery>,
) -> AppResult<Json<Vec<Dish>>> {
    let category: Option<RecordId> = match query.category {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| AppError::validation(format!("Invalid category ID: {}", raw)))?,
        ),
        None => None,
    };
    let repo = DishRepository::new(state.db.clone());
    let dishes = repo.find_all(category, query.available, query.search).await?;
    Ok(Json(dishes))
}

/// GET /api/dishes/:id - 单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Dish>> {
    let repo = DishRepository::new(state.db.clone());
    let dish = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {} not found", id)))?;
    Ok(Json(dish))
}

/// POST /api/dishes - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    let repo = DishRepository::new(state.db.clone());
    let dish = repo.create(payload).await?;
    Ok(Json(dish))
}

/// PUT /api/dishes/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    let repo = DishRepository::new(state.db.clone());
    let dish = repo.update(&id, payload).await?;
    Ok(Json(dish))
}

/// DELETE /api/dishes/:id - 删除菜品 (被订单行引用时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = DishRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
