//! # Enlaces de mesa
//!
//! Cada mesa tiene un enlace a la carta con su identificador como parámetro.
//! El código QR impreso en la mesa codifica este enlace.

use actix_web::{get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};
use crate::config::AppConfig;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TableLink {
    table_id: String,
    url: String,
}

/// Construye `<base>/?table_id=<id>`, sin duplicar la barra final de la base
fn table_link(base_url: &str, table_id: &str) -> AppResult<TableLink> {
    let table_id = table_id.trim();
    if table_id.is_empty() {
        return Err(AppError::validation_field("table_id", "Indique el número de mesa"));
    }

    Ok(TableLink {
        table_id: table_id.to_string(),
        url: format!("{}/?table_id={}", base_url.trim_end_matches('/'), table_id),
    })
}

/// Enlace de la carta para una mesa
///
/// # Respuesta
/// ```json
/// { "table_id": "T3", "url": "http://localhost:8080/?table_id=T3" }
/// ```
#[get("/tables/{table_id}/link")]
async fn get_table_link(config: web::Data<AppConfig>, path: web::Path<String>) -> AppResult<impl Responder> {
    let link = table_link(&config.app_base_url, &path)?;
    tracing::debug!(table_id = %link.table_id, "Enlace de mesa generado");
    Ok(HttpResponse::Ok().json(link))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_table_link);
}
