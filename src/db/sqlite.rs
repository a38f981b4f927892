use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
#[cfg(test)]
use std::time::Duration;

use crate::api::middleware::ErrorLogExt;
use crate::api::AppError;
use crate::config::AppConfig;
use crate::schedule::{MealCategory, MealWindowsRaw, OperatingWindowRaw};

pub type Result<T> = std::result::Result<T, AppError>;

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS menu (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        price REAL NOT NULL,
        image_url TEXT,
        available INTEGER DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_id TEXT NOT NULL,
        items TEXT NOT NULL,
        instructions TEXT,
        status TEXT DEFAULT 'Pending',
        timestamp TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL CHECK(role IN ('admin', 'staff')),
        access_token TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS timings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        open_time TEXT NOT NULL,
        close_time TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS meal_timings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        breakfast_start TEXT NOT NULL,
        breakfast_end TEXT NOT NULL,
        lunch_start TEXT NOT NULL,
        lunch_end TEXT NOT NULL,
        dinner_start TEXT NOT NULL,
        dinner_end TEXT NOT NULL
    )
    "#,
];

const DEFAULT_ADMIN: (&str, &str) = ("admin", "1234");

/// Carta de ejemplo: (categoría, nombre, descripción, precio, imagen)
const SAMPLE_MENU: [(MealCategory, &str, &str, f64, &str); 18] = [
    (MealCategory::Breakfast, "Masala Dosa", "Crispy dosa with spiced potato filling, served with chutney and sambar.", 50.0, "https://i.imgur.com/z9b1ulR.jpg"),
    (MealCategory::Breakfast, "Idli Vada Sambar", "Soft idlis with crispy vadas, served with sambar and chutney.", 40.0, "https://i.imgur.com/xsOvSBZ.jpg"),
    (MealCategory::Breakfast, "Upma", "South Indian semolina dish cooked with vegetables and spices.", 30.0, "https://i.imgur.com/DqOcHzo.jpg"),
    (MealCategory::Breakfast, "Medu Vada", "Crispy fried lentil doughnuts, served with sambar and chutney.", 35.0, "https://i.imgur.com/YvRaEzV.jpg"),
    (MealCategory::Breakfast, "Pongal", "Rice and lentil dish flavored with black pepper and ginger.", 45.0, "https://i.imgur.com/j2CcoBt.jpg"),
    (MealCategory::Breakfast, "Rava Kesari", "Sweet semolina dish with ghee, dry fruits, and cardamom.", 25.0, "https://i.imgur.com/xK9HOVF.jpg"),
    (MealCategory::Breakfast, "Poori Kurma", "Fried puffed bread served with a spicy vegetable curry.", 50.0, "https://i.imgur.com/PEQ5r5N.jpg"),
    (MealCategory::Breakfast, "Uttapam", "Thick pancake with toppings like onions, tomatoes, and chilies.", 40.0, "https://i.imgur.com/MzN7cWS.jpg"),
    (MealCategory::Lunch, "Vegetable Biryani", "Aromatic rice with mixed vegetables and spices, served with raita.", 80.0, "https://i.imgur.com/zUrr0Pi.jpg"),
    (MealCategory::Lunch, "Paneer Butter Masala", "Soft paneer cubes cooked in a rich and creamy tomato-based sauce.", 90.0, "https://i.imgur.com/WpS6Y5L.jpg"),
    (MealCategory::Lunch, "Chole Bhature", "Chickpea curry served with fluffy fried bread (bhature).", 75.0, "https://i.imgur.com/J67G7bq.jpg"),
    (MealCategory::Lunch, "Dal Tadka", "Yellow lentils cooked with tempering of garlic, cumin, and ghee.", 60.0, "https://i.imgur.com/zvHRh6T.jpg"),
    (MealCategory::Lunch, "Aloo Paratha", "Stuffed flatbread with spiced mashed potatoes, served with yogurt and pickle.", 50.0, "https://i.imgur.com/M61r4nT.jpg"),
    (MealCategory::Dinner, "Paneer Tikka", "Grilled paneer marinated with yogurt and spices, served with mint chutney.", 120.0, "https://i.imgur.com/jzUlGQo.jpg"),
    (MealCategory::Dinner, "Tandoori Roti", "Soft, unleavened flatbread baked in a clay oven.", 30.0, "https://i.imgur.com/hOtcjZh.jpg"),
    (MealCategory::Dinner, "Butter Naan", "Soft, buttery flatbread, baked in a tandoor, perfect with curries.", 35.0, "https://i.imgur.com/TLNNu6I.jpg"),
    (MealCategory::Dinner, "Mushroom Masala", "Mushrooms cooked in a spiced tomato gravy, served with naan or rice.", 100.0, "https://i.imgur.com/RoJhAN0.jpg"),
    (MealCategory::Dinner, "Pasta Alfredo", "Creamy white sauce pasta with garlic and parmesan cheese.", 150.0, "https://i.imgur.com/lZpgyke.jpg"),
];

#[derive(Debug, Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Conecta, crea el esquema y siembra los valores por defecto
    pub async fn init(config: &AppConfig) -> Result<SqliteRepo> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .log_error_context("connecting to SQLite")
            .map_err(|e| AppError::database("connect", e))?;

        let repo = SqliteRepo { pool };
        repo.ping().await?;
        repo.create_schema().await?;
        repo.seed_defaults().await?;

        if config.seed_menu {
            repo.seed_menu().await?;
        }

        tracing::info!(database_url = %config.database_url, "Base de datos inicializada");
        Ok(repo)
    }

    /// Base de datos en memoria con esquema y valores por defecto, sin carta
    #[cfg(test)]
    pub async fn in_memory() -> Result<SqliteRepo> {
        // Una sola conexión que nunca se recicla: cada conexión a
        // `sqlite::memory:` es una base de datos distinta
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::database("connect", e))?;

        let repo = SqliteRepo { pool };
        repo.create_schema().await?;
        repo.seed_defaults().await?;
        Ok(repo)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("ping", e))?;
        Ok(())
    }

    /// Crea las cinco tablas si no existen
    pub async fn create_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .log_error_context("creating schema")
                .map_err(|e| AppError::database("create_schema", e))?;
        }

        // Bases creadas antes de las sesiones no tienen la columna del token
        let columns = sqlx::query("PRAGMA table_info(users)")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("inspect_users", e))?;

        let has_token = columns
            .iter()
            .any(|c| c.try_get::<String, _>("name").is_ok_and(|n| n == "access_token"));

        if !has_token {
            sqlx::query("ALTER TABLE users ADD COLUMN access_token TEXT")
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database("migrate_users", e))?;
            tracing::info!("Añadida columna 'access_token' a la tabla 'users'");
        }

        Ok(())
    }

    /// Siembra horarios por defecto y el usuario admin si no existen
    pub async fn seed_defaults(&self) -> Result<()> {
        let operating = OperatingWindowRaw::default();
        sqlx::query("INSERT OR IGNORE INTO timings (id, open_time, close_time) VALUES (1, ?, ?)")
            .bind(&operating.open_time)
            .bind(&operating.close_time)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("seed_timings", e))?;

        let meals = MealWindowsRaw::default();
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO meal_timings
                (id, breakfast_start, breakfast_end, lunch_start, lunch_end, dinner_start, dinner_end)
            VALUES (1, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&meals.breakfast_start)
        .bind(&meals.breakfast_end)
        .bind(&meals.lunch_start)
        .bind(&meals.lunch_end)
        .bind(&meals.dinner_start)
        .bind(&meals.dinner_end)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("seed_meal_timings", e))?;

        let (username, password) = DEFAULT_ADMIN;
        let created = sqlx::query("INSERT OR IGNORE INTO users (username, password, role) VALUES (?, ?, 'admin')")
            .bind(username)
            .bind(password)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("seed_admin", e))?;

        if created.rows_affected() > 0 {
            tracing::warn!(username, "Usuario admin creado con la contraseña por defecto");
        }

        Ok(())
    }

    /// Inserta la carta de ejemplo si la tabla `menu` está vacía
    ///
    /// Devuelve el número de platos insertados.
    pub async fn seed_menu(&self) -> Result<u64> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database("count_menu", e))?;

        if existing > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for (category, name, description, price, image_url) in SAMPLE_MENU {
            sqlx::query(
                "INSERT INTO menu (category, name, description, price, image_url, available) VALUES (?, ?, ?, ?, ?, 1)",
            )
            .bind(category.as_str())
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(image_url)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("seed_menu", e))?;
            inserted += 1;
        }

        tracing::info!(inserted, "Carta de ejemplo cargada");
        Ok(inserted)
    }
}
