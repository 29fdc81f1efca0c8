//! Menu repository: categories, items and the grouped public listing.

use crate::api::AppError;

use super::models::{MenuCategory, MenuCategoryWithItems, MenuItem, MenuItemPatch, NewMenuItem};
use super::store::{Result, Store};

/// Flat row of the category → item left join. Item columns are nullable
/// because empty categories still produce one row.
#[derive(sqlx::FromRow)]
struct MenuJoinRow {
    category_id: i64,
    category_name: String,
    category_order: i64,
    item_id: Option<i64>,
    item_name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    is_active: Option<bool>,
    item_order: Option<i64>,
}

impl Store {
    /// Full menu grouped by category. Categories without items appear
    /// with an empty item list; a category is never duplicated. The fold
    /// relies on the ORDER BY keeping each category's rows contiguous.
    pub async fn list_menu(&self) -> Result<Vec<MenuCategoryWithItems>> {
        let rows = sqlx::query_as::<_, MenuJoinRow>(
            "SELECT
                c.id AS category_id,
                c.name AS category_name,
                c.order_index AS category_order,
                m.id AS item_id,
                m.name AS item_name,
                m.description,
                m.image_url,
                m.is_active,
                m.order_index AS item_order
             FROM menu_categories c
             LEFT JOIN menu_items m ON c.id = m.category_id
             ORDER BY c.order_index, c.id, m.order_index, m.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("list_menu", e))?;

        let mut categories: Vec<MenuCategoryWithItems> = Vec::new();
        for row in rows {
            let start_new = categories
                .last()
                .map(|c| c.id != row.category_id)
                .unwrap_or(true);
            if start_new {
                categories.push(MenuCategoryWithItems {
                    id: row.category_id,
                    name: row.category_name.clone(),
                    order_index: row.category_order,
                    items: Vec::new(),
                });
            }

            if let (Some(id), Some(name), Some(description), Some(image_url)) =
                (row.item_id, row.item_name, row.description, row.image_url)
            {
                if let Some(category) = categories.last_mut() {
                    category.items.push(MenuItem {
                        id,
                        category_id: row.category_id,
                        name,
                        description,
                        image_url,
                        is_active: row.is_active.unwrap_or(true),
                        order_index: row.item_order.unwrap_or(0),
                    });
                }
            }
        }

        Ok(categories)
    }

    pub async fn list_categories(&self) -> Result<Vec<MenuCategory>> {
        sqlx::query_as::<_, MenuCategory>(
            "SELECT id, name, order_index FROM menu_categories ORDER BY order_index, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("list_categories", e))
    }

    pub async fn create_category(&self, name: &str, order_index: i64) -> Result<i64> {
        let result = sqlx::query("INSERT INTO menu_categories (name, order_index) VALUES (?, ?)")
            .bind(name)
            .bind(order_index)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("create_category", e))?;

        Ok(result.last_insert_rowid())
    }

    /// Deletes a category. Refused with `Conflict` while items still
    /// reference it; no cascade.
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        let item_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM menu_items WHERE category_id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("delete_category", e))?;

        if item_count > 0 {
            return Err(AppError::Conflict(format!(
                "category {id} still has {item_count} menu item(s)"
            )));
        }

        let result = sqlx::query("DELETE FROM menu_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("delete_category", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("menu category {id}")));
        }

        Ok(())
    }

    /// Inserts a new item under an existing category, `is_active` defaults
    /// to true; returns the generated id.
    pub async fn create_item(&self, new: &NewMenuItem) -> Result<i64> {
        let category_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM menu_categories WHERE id = ?",
        )
        .bind(new.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("create_item", e))?;

        if category_exists == 0 {
            return Err(AppError::NotFound(format!(
                "menu category {}",
                new.category_id
            )));
        }

        let result = sqlx::query(
            "INSERT INTO menu_items (category_id, name, description, image_url, is_active, order_index)
             VALUES (?, ?, ?, ?, 1, ?)",
        )
        .bind(new.category_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.image_url)
        .bind(new.order_index)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("create_item", e))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_item(&self, id: i64) -> Result<Option<MenuItem>> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT id, category_id, name, description, image_url, is_active, order_index
             FROM menu_items
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("get_item", e))
    }

    /// Coalesce-style partial update; returns the merged row.
    pub async fn update_item(&self, id: i64, patch: &MenuItemPatch) -> Result<MenuItem> {
        let mut row = self
            .get_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;

        patch.apply(&mut row);

        sqlx::query(
            "UPDATE menu_items
             SET name = ?, description = ?, image_url = ?, is_active = ?, order_index = ?
             WHERE id = ?",
        )
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.image_url)
        .bind(row.is_active)
        .bind(row.order_index)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("update_item", e))?;

        Ok(row)
    }

    pub async fn delete_item(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("delete_item", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("menu item {id}")));
        }

        Ok(())
    }
}
