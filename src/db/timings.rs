//! Persistencia de horarios (tablas `timings` y `meal_timings`, fila única `id = 1`)
//!
//! Las horas se guardan tal cual llegan, como texto de 12 horas. Si la fila no
//! existe se devuelven los valores por defecto.

use super::sqlite::{Result, SqliteRepo};
use crate::api::middleware::ErrorLogExt;
use crate::api::AppError;
use crate::schedule::{MealWindowsRaw, OperatingWindowRaw};

#[derive(sqlx::FromRow)]
struct TimingsRow {
    open_time: String,
    close_time: String,
}

#[derive(sqlx::FromRow)]
struct MealTimingsRow {
    breakfast_start: String,
    breakfast_end: String,
    lunch_start: String,
    lunch_end: String,
    dinner_start: String,
    dinner_end: String,
}

impl SqliteRepo {
    pub async fn get_operating_window(&self) -> Result<OperatingWindowRaw> {
        let row = sqlx::query_as::<_, TimingsRow>("SELECT open_time, close_time FROM timings WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .log_error_context("reading restaurant timings")
            .map_err(|e| AppError::database("get_operating_window", e))?;

        Ok(row
            .map(|r| OperatingWindowRaw {
                open_time: r.open_time,
                close_time: r.close_time,
            })
            .unwrap_or_default())
    }

    pub async fn set_operating_window(&self, window: &OperatingWindowRaw) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO timings (id, open_time, close_time) VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET open_time = excluded.open_time, close_time = excluded.close_time
            "#,
        )
        .bind(&window.open_time)
        .bind(&window.close_time)
        .execute(self.pool())
        .await
        .log_error_context("updating restaurant timings")
        .map_err(|e| AppError::database("set_operating_window", e))?;

        tracing::info!(
            open_time = %window.open_time,
            close_time = %window.close_time,
            "Horario de apertura actualizado"
        );
        Ok(())
    }

    pub async fn get_meal_windows(&self) -> Result<MealWindowsRaw> {
        let row = sqlx::query_as::<_, MealTimingsRow>(
            r#"
            SELECT breakfast_start, breakfast_end, lunch_start, lunch_end, dinner_start, dinner_end
            FROM meal_timings WHERE id = 1
            "#,
        )
        .fetch_optional(self.pool())
        .await
        .log_error_context("reading meal timings")
        .map_err(|e| AppError::database("get_meal_windows", e))?;

        Ok(row
            .map(|r| MealWindowsRaw {
                breakfast_start: r.breakfast_start,
                breakfast_end: r.breakfast_end,
                lunch_start: r.lunch_start,
                lunch_end: r.lunch_end,
                dinner_start: r.dinner_start,
                dinner_end: r.dinner_end,
            })
            .unwrap_or_default())
    }

    pub async fn set_meal_windows(&self, windows: &MealWindowsRaw) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meal_timings
                (id, breakfast_start, breakfast_end, lunch_start, lunch_end, dinner_start, dinner_end)
            VALUES (1, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                breakfast_start = excluded.breakfast_start,
                breakfast_end = excluded.breakfast_end,
                lunch_start = excluded.lunch_start,
                lunch_end = excluded.lunch_end,
                dinner_start = excluded.dinner_start,
                dinner_end = excluded.dinner_end
            "#,
        )
        .bind(&windows.breakfast_start)
        .bind(&windows.breakfast_end)
        .bind(&windows.lunch_start)
        .bind(&windows.lunch_end)
        .bind(&windows.dinner_start)
        .bind(&windows.dinner_end)
        .execute(self.pool())
        .await
        .log_error_context("updating meal timings")
        .map_err(|e| AppError::database("set_meal_windows", e))?;

        tracing::info!(?windows, "Horarios de comidas actualizados");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{resolve, MealCategory, TimeOfDay};
    use tokio_test::assert_ok;

    #[actix_web::test]
    async fn seeded_defaults_are_returned() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        assert_eq!(assert_ok!(repo.get_operating_window().await), OperatingWindowRaw::default());
        assert_eq!(assert_ok!(repo.get_meal_windows().await), MealWindowsRaw::default());
    }

    #[actix_web::test]
    async fn missing_rows_read_as_defaults() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        sqlx::query("DELETE FROM timings").execute(repo.pool()).await.unwrap();
        sqlx::query("DELETE FROM meal_timings").execute(repo.pool()).await.unwrap();

        assert_eq!(assert_ok!(repo.get_operating_window().await), OperatingWindowRaw::default());
        assert_eq!(assert_ok!(repo.get_meal_windows().await), MealWindowsRaw::default());

        let window = OperatingWindowRaw {
            open_time: "08:00 AM".to_string(),
            close_time: "09:00 PM".to_string(),
        };
        assert_ok!(repo.set_operating_window(&window).await);
        assert_eq!(assert_ok!(repo.get_operating_window().await), window);
    }

    #[actix_web::test]
    async fn updates_overwrite_the_single_row() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        let meals = MealWindowsRaw {
            breakfast_end: "11:30 AM".to_string(),
            lunch_start: "11:30 AM".to_string(),
            dinner_start: "04:00 PM".to_string(),
            ..MealWindowsRaw::default()
        };
        assert_ok!(repo.set_meal_windows(&meals).await);
        assert_ok!(repo.set_meal_windows(&meals).await);

        assert_eq!(assert_ok!(repo.get_meal_windows().await), meals);
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meal_timings")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[actix_web::test]
    async fn stored_garbage_still_resolves_with_defaults() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        let broken = OperatingWindowRaw {
            open_time: "7am".to_string(),
            close_time: "10:00 PM".to_string(),
        };
        assert_ok!(repo.set_operating_window(&broken).await);

        let operating = assert_ok!(repo.get_operating_window().await);
        let meals = assert_ok!(repo.get_meal_windows().await);
        assert_eq!(resolve(TimeOfDay::hm(8, 0), &operating, &meals), MealCategory::Breakfast);
        assert_eq!(resolve(TimeOfDay::hm(23, 0), &operating, &meals), MealCategory::Closed);
    }
}
