//! # API de pedidos
//!
//! - Crear pedidos desde la mesa (clientes, sin autenticación)
//! - Listar pedidos por estado (personal)
//! - Marcar pedidos como servidos (solo admin)

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::auth::{require_admin, require_staff};
use super::{AppError, AppResult};
use crate::config::ServingClock;
use crate::db::{OrderStatus, SqliteRepo};

/// Pedido enviado desde la carta
#[derive(Deserialize)]
struct PlaceOrder {
    /// Mesa, texto libre (por ejemplo "T3")
    table_id: String,
    /// Nombres de los platos elegidos
    items: Vec<String>,
    /// Instrucciones especiales (opcional)
    #[serde(default)]
    instructions: Option<String>,
}

#[derive(Deserialize)]
struct OrderQuery {
    status: Option<OrderStatus>,
}

#[derive(Deserialize)]
struct StatusUpdate {
    status: OrderStatus,
}

/// Valida un pedido y devuelve mesa, platos e instrucciones normalizados
fn validate_order(order: &PlaceOrder) -> AppResult<(String, Vec<String>, Option<String>)> {
    let table_id = order.table_id.trim();
    if table_id.is_empty() {
        return Err(AppError::validation_field("table_id", "Indique el número de mesa"));
    }

    if order.items.is_empty() {
        return Err(AppError::validation_field("items", "Seleccione al menos un plato"));
    }

    let items: Vec<String> = order.items.iter().map(|i| i.trim().to_string()).collect();
    if items.iter().any(|i| i.is_empty()) {
        return Err(AppError::validation_field("items", "El nombre del plato no puede estar vacío"));
    }

    let instructions = order
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(str::to_string);

    Ok((table_id.to_string(), items, instructions))
}

/// Crea un pedido para una mesa
///
/// # Validaciones
/// - La mesa no puede estar vacía
/// - Debe haber al menos un plato y ningún nombre vacío
///
/// Si la validación falla no se toca la base de datos.
///
/// # Respuesta
/// ```json
/// {
///   "id": 12,
///   "table_id": "T3",
///   "items": "Masala Dosa, Upma",
///   "instructions": null,
///   "status": "Pending",
///   "timestamp": "2024-06-01 08:15:00"
/// }
/// ```
#[post("/orders")]
async fn place_order(
    repo: web::Data<SqliteRepo>,
    clock: web::Data<ServingClock>,
    data: web::Json<PlaceOrder>,
) -> AppResult<impl Responder> {
    let (table_id, items, instructions) = validate_order(&data)?;

    let order = repo
        .create_order(&table_id, &items, instructions.as_deref(), clock.now())
        .await?;

    Ok(HttpResponse::Created().json(order))
}

/// Lista pedidos, del más reciente al más antiguo
///
/// # Autenticación
/// Requiere token Bearer del personal (admin o staff).
///
/// # Filtros
/// - `status`: `Pending` o `Served`
#[get("/orders")]
async fn list_orders(
    repo: web::Data<SqliteRepo>,
    query: web::Query<OrderQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_staff(&repo, &req).await?;

    let orders = repo.list_orders(query.status).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Cambia el estado de un pedido
///
/// El cambio no está restringido: un pedido servido puede volver a `Pending`.
/// Devuelve el pedido actualizado.
///
/// # Errores
/// - `404 Not Found`: El pedido no existe
#[post("/orders/{id}/status")]
async fn update_status(
    repo: web::Data<SqliteRepo>,
    path: web::Path<i64>,
    data: web::Json<StatusUpdate>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "update_order_status").await?;

    let id = path.into_inner();
    repo.set_order_status(id, data.status).await?;

    let order = repo
        .find_order(id)
        .await?
        .ok_or_else(|| AppError::not_found_id("Order", id))?;

    Ok(HttpResponse::Ok().json(order))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(place_order);
    cfg.service(list_orders);
    cfg.service(update_status);
}
