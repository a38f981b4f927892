//! # QR Menu Server
//!
//! Servidor de la carta digital de un restaurante: cada mesa tiene un código QR
//! que lleva a la carta que toca según la hora (desayuno, comida o cena) y desde
//! la que el cliente envía su pedido.
//!
//! ## Características principales
//!
//! - **Carta por horario**: La categoría se resuelve con el horario de apertura
//!   y las sub-ventanas de comidas guardadas en base de datos
//! - **Pedidos**: Los clientes piden desde la mesa y el personal los marca como servidos
//! - **Administración**: Platos, disponibilidad y horarios, con login de personal
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! DATABASE_URL=sqlite://menu.db?mode=rwc
//! BIND_ADDRESS=0.0.0.0:8080
//! SERVING_TIMEZONE=Asia/Kolkata
//! APP_BASE_URL=http://localhost:8080
//! SEED_MENU=true
//! RUST_LOG=qr_menu=debug,sqlx=warn
//! ```
//!
//! ## Arquitectura
//!
//! ```text
//! Carta / panel de admin
//!     ↓ HTTP/JSON
//! API REST (Actix Web)
//!     ↓ schedule (resolución de la categoría)
//!     ↓ sqlx
//! SQLite
//! ```

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod schedule;

use config::AppConfig;

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el logging con tracing
/// 3. Lee la configuración y abre la base de datos (esquema y datos iniciales)
/// 4. Arranca el servidor HTTP con las rutas de la API
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida, la base de datos
/// no se puede abrir o no se puede bindear la dirección.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qr_menu=debug,sqlx=warn")),
        )
        .init();

    tracing::info!("Iniciando QR Menu Server...");

    let config = AppConfig::load().map_err(|e| {
        tracing::error!("Configuración inválida: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let repo = match db::SqliteRepo::init(&config).await {
        Ok(repo) => {
            tracing::info!(database_url = %config.database_url, "Base de datos lista");
            repo
        }
        Err(e) => {
            tracing::error!("Error abriendo la base de datos: {}", e);
            return Err(std::io::Error::other(format!("Error de base de datos: {}", e)));
        }
    };

    let clock = config.clock();
    tracing::info!(
        timezone = %clock.timezone(),
        now = %clock.time_of_day(),
        "Reloj del restaurante configurado"
    );

    let bind_address = config.bind_address.clone();
    tracing::info!("Servidor iniciando en {}", bind_address);

    let repo = web::Data::new(repo);
    let clock = web::Data::new(clock);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .app_data(clock.clone())
            .app_data(config.clone())
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
