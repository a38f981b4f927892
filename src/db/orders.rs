//! Persistencia de pedidos (tabla `orders`)
//!
//! Este almacén no valida: la mesa y los platos se comprueban antes en la capa
//! HTTP. Los cambios de estado no tienen restricciones (un pedido servido puede
//! volver a pendiente).

use chrono::NaiveDateTime;

use super::models::{Order, OrderRow, OrderStatus};
use super::sqlite::{Result, SqliteRepo};
use crate::api::middleware::ErrorLogExt;
use crate::api::AppError;
use crate::config::TIMESTAMP_FORMAT;

const SELECT_ORDERS: &str = "SELECT id, table_id, items, instructions, status, timestamp FROM orders";

impl SqliteRepo {
    /// Registra un pedido pendiente
    ///
    /// `items` se guarda como los nombres unidos por ", ". `placed_at` es la
    /// hora local del restaurante.
    pub async fn create_order(
        &self,
        table_id: &str,
        items: &[String],
        instructions: Option<&str>,
        placed_at: NaiveDateTime,
    ) -> Result<Order> {
        let item_names = items.join(", ");
        let timestamp = placed_at.format(TIMESTAMP_FORMAT).to_string();
        let status = OrderStatus::Pending;

        let result = sqlx::query(
            "INSERT INTO orders (table_id, items, instructions, status, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(table_id)
        .bind(&item_names)
        .bind(instructions)
        .bind(status.as_str())
        .bind(&timestamp)
        .execute(self.pool())
        .await
        .log_error_context("inserting order")
        .map_err(|e| AppError::database("create_order", e))?;

        let id = result.last_insert_rowid();
        tracing::info!(order_id = id, table_id = %table_id, items = %item_names, "Pedido registrado");

        Ok(Order {
            id,
            table_id: table_id.to_string(),
            items: item_names,
            instructions: instructions.map(str::to_string),
            status,
            timestamp,
        })
    }

    /// Pedidos del más reciente al más antiguo, opcionalmente por estado
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "{SELECT_ORDERS} WHERE status = ? ORDER BY timestamp DESC, id DESC"
                ))
                .bind(status.as_str())
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDERS} ORDER BY timestamp DESC, id DESC"))
                    .fetch_all(self.pool())
                    .await
            }
        }
        .log_error_context("listing orders")
        .map_err(|e| AppError::database("list_orders", e))?;

        rows.into_iter().map(Order::try_from).collect()
    }

    pub async fn find_order(&self, id: i64) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDERS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database("find_order", e))?;

        row.map(Order::try_from).transpose()
    }

    /// Sobrescribe el estado de un pedido
    ///
    /// # Errores
    /// - `NotFoundWithId` si el pedido no existe
    pub async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool())
            .await
            .log_error_context("updating order status")
            .map_err(|e| AppError::database("set_order_status", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found_id("Order", id));
        }

        tracing::info!(order_id = id, status = %status, "Estado del pedido actualizado");
        Ok(())
    }
}
