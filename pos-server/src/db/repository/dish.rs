//! Dish Repository
//!
//! 菜品行的增删改查 + 下单瞬间的目录快照读取。
//! 本核心从不在下单路径上写 dish 行。

use rust_decimal::Decimal;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Dish, DishCreate, DishSnapshot, DishUpdate};

const TABLE: &str = "dish";

#[derive(Clone)]
pub struct DishRepository {
    base: BaseRepository,
}

impl DishRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List dishes, filterable by category / availability / name search
    pub async fn find_all(
        &self,
        category: Option<RecordId>,
        available_only: bool,
        search: Option<String>,
    ) -> RepoResult<Vec<Dish>> {
        let mut sql = String::from("SELECT * FROM dish");
        let mut clauses = Vec::new();
        if category.is_some() {
            clauses.push("category = $category");
        }
        if available_only {
            clauses.push("is_available = true AND is_sold_out = false");
        }
        if search.is_some() {
            clauses.push("string::contains(name, $search)");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name");

        let mut query = self.base.db().query(sql);
        if let Some(category) = category {
            query = query.bind(("category", category));
        }
        if let Some(search) = search {
            query = query.bind(("search", search));
        }
        let dishes: Vec<Dish> = query.await?.take(0)?;
        Ok(dishes)
    }

    /// Find dish by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Dish>> {
        let thing = self.base.parse_id(TABLE, id)?;
        let dish: Option<Dish> = self.base.db().select(thing).await?;
        Ok(dish)
    }

    /// Catalog Snapshot Reader — 按 id 集合读取此刻的价格/可点性
    ///
    /// 返回集合可能小于请求集合 (存在未知 id 时)；
    /// 缺失检测由调用方负责，绝不静默丢行。
    pub async fn snapshot(&self, ids: &[RecordId]) -> RepoResult<Vec<DishSnapshot>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dish WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        let dishes: Vec<DishSnapshot> = result.take(0)?;
        Ok(dishes)
    }

    /// Create a new dish
    pub async fn create(&self, data: DishCreate) -> RepoResult<Dish> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Dish name is required".into()));
        }
        if data.price <= Decimal::ZERO {
            return Err(RepoError::Validation("Price must be greater than 0".into()));
        }
        if let Some(stock) = data.stock
            && stock < 0
        {
            return Err(RepoError::Validation("Stock must be non-negative".into()));
        }

        let dish = Dish {
            id: None,
            name: data.name,
            category: data.category,
            price: data.price,
            image: data.image,
            description: data.description,
            is_available: data.is_available,
            is_sold_out: data.is_sold_out,
            stock: data.stock,
        };

        let created: Option<Dish> = self.base.db().create(TABLE).content(dish).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dish".to_string()))
    }

    /// Update a dish — 已有订单引用的菜品改价只影响之后的订单
    pub async fn update(&self, id: &str, data: DishUpdate) -> RepoResult<Dish> {
        let thing = self.base.parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))?;

        if let Some(price) = data.price
            && price <= Decimal::ZERO
        {
            return Err(RepoError::Validation("Price must be greater than 0".into()));
        }
        if let Some(stock) = data.stock
            && stock < 0
        {
            return Err(RepoError::Validation("Stock must be non-negative".into()));
        }

        let name = data.name.unwrap_or(existing.name);
        let category = data.category.or(existing.category);
        let price = data.price.unwrap_or(existing.price);
        let image = data.image.or(existing.image);
        let description = data.description.or(existing.description);
        let is_available = data.is_available.unwrap_or(existing.is_available);
        let is_sold_out = data.is_sold_out.unwrap_or(existing.is_sold_out);
        let stock = data.stock.or(existing.stock);

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, category = $category, price = $price, \
                 image = $image, description = $description, is_available = $is_available, \
                 is_sold_out = $is_sold_out, stock = $stock",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("category", category))
            .bind(("price", price))
            .bind(("image", image))
            .bind(("description", description))
            .bind(("is_available", is_available))
            .bind(("is_sold_out", is_sold_out))
            .bind(("stock", stock))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))
    }

    /// Delete a dish — 被任何订单行引用时拒绝 (保留点餐历史)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(TABLE, id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Dish {} not found", id)));
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order_item WHERE dish_id = $dish GROUP ALL")
            .bind(("dish", thing.clone()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;

        if count.unwrap_or(0) > 0 {
            return Err(RepoError::BusinessRule(
                "Dish is referenced by order history and cannot be deleted".to_string(),
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
}
