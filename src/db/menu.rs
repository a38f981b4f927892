//! Persistencia de la carta (tabla `menu`)

use super::models::{MenuItem, MenuItemRow, NewMenuItem};
use super::sqlite::{Result, SqliteRepo};
use crate::api::middleware::ErrorLogExt;
use crate::api::AppError;
use crate::schedule::MealCategory;

const SELECT_ITEMS: &str =
    "SELECT id, category, name, description, price, image_url, available FROM menu WHERE available = 1";

impl SqliteRepo {
    /// Platos disponibles, opcionalmente de una categoría
    ///
    /// `None` no filtra por categoría. `Some(Closed)` no tiene carta y devuelve
    /// una lista vacía. El orden es el de inserción.
    pub async fn list_available_items(&self, category: Option<MealCategory>) -> Result<Vec<MenuItem>> {
        let rows = match category {
            Some(MealCategory::Closed) => return Ok(Vec::new()),
            Some(category) => {
                sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_ITEMS} AND category = ? ORDER BY id"))
                    .bind(category.as_str())
                    .fetch_all(self.pool())
                    .await
            }
            None => {
                sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_ITEMS} ORDER BY id"))
                    .fetch_all(self.pool())
                    .await
            }
        }
        .log_error_context("listing available menu items")
        .map_err(|e| AppError::database("list_available_items", e))?;

        rows.into_iter().map(MenuItem::try_from).collect()
    }

    /// Da de alta un plato y lo devuelve con su ID
    pub async fn create_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem> {
        let result = sqlx::query(
            "INSERT INTO menu (category, name, description, price, image_url, available) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(item.category.as_str())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(item.available)
        .execute(self.pool())
        .await
        .log_error_context("inserting menu item")
        .map_err(|e| AppError::database("create_menu_item", e))?;

        let id = result.last_insert_rowid();
        tracing::info!(item_id = id, name = %item.name, category = %item.category, "Plato creado");

        Ok(MenuItem {
            id,
            category: item.category,
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            image_url: item.image_url.clone(),
            available: item.available,
        })
    }

    /// Cambia la disponibilidad de un plato
    ///
    /// # Errores
    /// - `NotFoundWithId` si no existe un plato con ese ID
    pub async fn set_item_availability(&self, id: i64, available: bool) -> Result<()> {
        let result = sqlx::query("UPDATE menu SET available = ? WHERE id = ?")
            .bind(available)
            .bind(id)
            .execute(self.pool())
            .await
            .log_error_context("updating menu item availability")
            .map_err(|e| AppError::database("set_item_availability", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found_id("MenuItem", id));
        }

        tracing::info!(item_id = id, available, "Disponibilidad actualizada");
        Ok(())
    }

    /// Borra los platos con ese nombre; devuelve cuántos se borraron
    ///
    /// Un nombre que no existe no es un error.
    pub async fn delete_items_by_name(&self, name: &str) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM menu WHERE name = ?")
            .bind(name)
            .execute(self.pool())
            .await
            .log_error_context("deleting menu item by name")
            .map_err(|e| AppError::database("delete_items_by_name", e))?
            .rows_affected();

        if deleted == 0 {
            tracing::info!(name = %name, "Ningún plato con ese nombre, nada que borrar");
        } else {
            tracing::info!(name = %name, deleted, "Plato borrado");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn dish(category: MealCategory, name: &str, available: bool) -> NewMenuItem {
        NewMenuItem {
            category,
            name: name.to_string(),
            description: None,
            price: 45.0,
            image_url: Some("https://example.com/dish.jpg".to_string()),
            available,
        }
    }

    async fn stocked_repo() -> SqliteRepo {
        let repo = SqliteRepo::in_memory().await.unwrap();
        for item in [
            dish(MealCategory::Breakfast, "Masala Dosa", true),
            dish(MealCategory::Breakfast, "Upma", false),
            dish(MealCategory::Lunch, "Dal Tadka", true),
            dish(MealCategory::Dinner, "Butter Naan", true),
        ] {
            repo.create_menu_item(&item).await.unwrap();
        }
        repo
    }

    #[actix_web::test]
    async fn lists_only_available_items_of_category() {
        let repo = stocked_repo().await;

        let breakfast = assert_ok!(repo.list_available_items(Some(MealCategory::Breakfast)).await);
        let names: Vec<_> = breakfast.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Masala Dosa"]);

        for category in MealCategory::SERVING {
            let items = assert_ok!(repo.list_available_items(Some(category)).await);
            assert!(items.iter().all(|i| i.available && i.category == category));
        }
    }

    #[actix_web::test]
    async fn no_category_filter_lists_every_available_item() {
        let repo = stocked_repo().await;
        let items = assert_ok!(repo.list_available_items(None).await);
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.available));
    }

    #[actix_web::test]
    async fn closed_has_no_menu() {
        let repo = stocked_repo().await;
        let items = assert_ok!(repo.list_available_items(Some(MealCategory::Closed)).await);
        assert!(items.is_empty());
    }

    #[actix_web::test]
    async fn availability_toggle_and_missing_item() {
        let repo = stocked_repo().await;
        let lunch = assert_ok!(repo.list_available_items(Some(MealCategory::Lunch)).await);
        let id = lunch[0].id;

        assert_ok!(repo.set_item_availability(id, false).await);
        assert!(assert_ok!(repo.list_available_items(Some(MealCategory::Lunch)).await).is_empty());

        assert_ok!(repo.set_item_availability(id, true).await);
        assert_eq!(assert_ok!(repo.list_available_items(Some(MealCategory::Lunch)).await).len(), 1);

        let err = assert_err!(repo.set_item_availability(9999, true).await);
        assert!(matches!(err, AppError::NotFoundWithId { .. }));
    }

    #[actix_web::test]
    async fn deleting_unknown_name_is_a_no_op() {
        let repo = stocked_repo().await;
        let before = assert_ok!(repo.list_available_items(None).await);

        assert_eq!(assert_ok!(repo.delete_items_by_name("Nonexistent Item").await), 0);

        let after = assert_ok!(repo.list_available_items(None).await);
        assert_eq!(before, after);
    }

    #[actix_web::test]
    async fn delete_by_name_removes_matching_rows() {
        let repo = stocked_repo().await;
        assert_eq!(assert_ok!(repo.delete_items_by_name("Dal Tadka").await), 1);
        assert!(assert_ok!(repo.list_available_items(Some(MealCategory::Lunch)).await).is_empty());
    }
}
