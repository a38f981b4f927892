//! # Módulo API
//!
//! Este módulo contiene todas las rutas y controladores de la API REST.
//!
//! ## Módulos principales
//!
//! - [`auth`] - Login del personal y control de permisos
//! - [`menu`] - Carta actual y gestión de platos
//! - [`order`] - Pedidos desde la mesa y su seguimiento
//! - [`timing`] - Horario de apertura y sub-ventanas de comidas
//! - [`table`] - Enlaces de la carta para cada mesa
//! - [`errors`] - Manejo de errores de la aplicación

pub mod auth;
pub mod errors;
pub mod menu;
pub mod middleware;
pub mod order;
pub mod table;
pub mod timing;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ResultExt};

use actix_web::web;

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/auth/*` - Ver [`auth::routes`]
/// - `/menu/*` - Ver [`menu::routes`]
/// - `/orders/*` - Ver [`order::routes`]
/// - `/timings/*` - Ver [`timing::routes`]
/// - `/tables/*` - Ver [`table::routes`]
///
/// Los controladores esperan en `app_data` un [`crate::db::SqliteRepo`], un
/// [`crate::config::ServingClock`] y la [`crate::config::AppConfig`].
///
/// Los errores de los extractores (JSON, query, path) también responden con
/// el cuerpo `{ "error", "message" }` de [`AppError`].
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Cuerpo JSON no válido: {}", err)).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Parámetros no válidos: {}", err)).into()
    }));
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Ruta no válida: {}", err)).into()
    }));

    auth::routes(cfg);
    menu::routes(cfg);
    order::routes(cfg);
    timing::routes(cfg);
    table::routes(cfg);
}
