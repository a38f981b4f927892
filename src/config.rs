//! # Configuración
//!
//! Toda la configuración llega por variables de entorno (o el archivo `.env`).
//! Las variables ausentes usan su valor por defecto; un valor presente pero
//! mal formado es un error de arranque.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::schedule::TimeOfDay;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://menu.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:8080";

/// Formato de las marcas de tiempo de los pedidos
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
#[error("Valor no válido para {key}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

/// Configuración del servidor
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// URL de la base de datos SQLite
    pub database_url: String,
    /// Dirección y puerto del servidor HTTP
    pub bind_address: String,
    /// Zona horaria en la que se sirve (horarios y marcas de tiempo)
    pub timezone: Tz,
    /// URL pública de la app, base de los enlaces de mesa
    pub app_base_url: String,
    /// Cargar la carta de ejemplo si la tabla `menu` está vacía
    pub seed_menu: bool,
}

impl AppConfig {
    /// Lee la configuración del entorno
    ///
    /// # Variables de entorno
    ///
    /// - `DATABASE_URL` (default: `sqlite://menu.db?mode=rwc`)
    /// - `BIND_ADDRESS` (default: `0.0.0.0:8080`)
    /// - `SERVING_TIMEZONE`: nombre IANA (default: `Asia/Kolkata`)
    /// - `APP_BASE_URL` (default: `http://localhost:8080`)
    /// - `SEED_MENU`: `true`/`false` (default: `true`)
    pub fn load() -> Result<Self, ConfigError> {
        Ok(AppConfig {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_address: var_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            timezone: parse_var("SERVING_TIMEZONE", DEFAULT_TIMEZONE)?,
            app_base_url: var_or("APP_BASE_URL", DEFAULT_APP_BASE_URL),
            seed_menu: parse_var("SEED_MENU", "true")?,
        })
    }

    pub fn clock(&self) -> ServingClock {
        ServingClock::new(self.timezone)
    }
}

fn var_or(key: &'static str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        tracing::info!("{key} no definido, usando valor por defecto: {default}");
        default.to_string()
    })
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    var_or(key, default).trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        message: e.to_string(),
    })
}

/// Reloj en la zona horaria del restaurante
///
/// La variante congelada fija la hora; se usa en los tests.
#[derive(Debug, Clone, Copy)]
pub struct ServingClock {
    timezone: Tz,
    frozen: Option<NaiveDateTime>,
}

impl ServingClock {
    pub fn new(timezone: Tz) -> Self {
        ServingClock {
            timezone,
            frozen: None,
        }
    }

    #[cfg(test)]
    pub fn frozen(timezone: Tz, at: NaiveDateTime) -> Self {
        ServingClock {
            timezone,
            frozen: Some(at),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Fecha y hora local actual
    pub fn now(&self) -> NaiveDateTime {
        match self.frozen {
            Some(at) => at,
            None => Utc::now().with_timezone(&self.timezone).naive_local(),
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.now().time().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn frozen_clock_reports_fixed_time() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(8, 45, 30)
            .unwrap();
        let clock = ServingClock::frozen(chrono_tz::Asia::Kolkata, at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.time_of_day(), TimeOfDay::hm(8, 45));
        assert_eq!(clock.now().format(TIMESTAMP_FORMAT).to_string(), "2024-03-10 08:45:30");
    }

    #[test]
    fn timezone_names_parse() {
        assert!("Asia/Kolkata".parse::<Tz>().is_ok());
        assert!("Mars/Olympus".parse::<Tz>().is_err());
    }
}
