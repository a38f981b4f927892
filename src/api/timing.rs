//! # API de horarios
//!
//! - Consultar el horario de apertura y las sub-ventanas de comidas
//! - Actualizarlos (solo admin)
//! - Consultar la resolución actual, con las marcas de fallback
//!
//! Las horas viajan en el mismo formato en que se guardan: `"07:00 AM"`.

use actix_web::{get, put, web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use super::auth::require_admin;
use super::{AppResult, ResultExt};
use crate::config::ServingClock;
use crate::db::SqliteRepo;
use crate::schedule::{resolve_detailed, MealCategory, MealWindowsRaw, OperatingWindowRaw, TimeOfDay};

#[derive(Serialize)]
struct CurrentResolution {
    current_time: TimeOfDay,
    category: MealCategory,
    operating_fallback: bool,
    meals_fallback: bool,
}

/// Comprueba que cada campo sea una hora de 12 horas válida
fn validate_times(fields: &[(&str, &str)]) -> AppResult<()> {
    for (field, value) in fields {
        TimeOfDay::parse(value).map_err_validation(field)?;
    }
    Ok(())
}

/// Normaliza las horas al formato de almacenamiento (`7:00 am` → `07:00 AM`)
fn normalize(value: &str) -> String {
    TimeOfDay::parse(value)
        .map(|t| t.to_string())
        .unwrap_or_else(|_| value.to_string())
}

#[get("/timings/operating")]
async fn get_operating(repo: web::Data<SqliteRepo>) -> AppResult<impl Responder> {
    Ok(HttpResponse::Ok().json(repo.get_operating_window().await?))
}

/// Actualiza el horario de apertura
///
/// # Cuerpo
/// ```json
/// { "open_time": "07:00 AM", "close_time": "10:00 PM" }
/// ```
///
/// # Errores
/// - `400 Bad Request`: Alguna hora no tiene formato `HH:MM AM/PM`
/// - `401 Unauthorized` / `403 Forbidden`: Sin sesión de admin
#[put("/timings/operating")]
async fn update_operating(
    repo: web::Data<SqliteRepo>,
    data: web::Json<OperatingWindowRaw>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "update_restaurant_timings").await?;

    validate_times(&[("open_time", data.open_time.as_str()), ("close_time", data.close_time.as_str())])?;

    let window = OperatingWindowRaw {
        open_time: normalize(&data.open_time),
        close_time: normalize(&data.close_time),
    };

    if let Ok(parsed) = window.parse() {
        if parsed.open >= parsed.close {
            tracing::warn!(?window, "La apertura no es anterior al cierre, el restaurante quedará cerrado");
        }
    }

    repo.set_operating_window(&window).await?;
    Ok(HttpResponse::Ok().json(window))
}

#[get("/timings/meals")]
async fn get_meals(repo: web::Data<SqliteRepo>) -> AppResult<impl Responder> {
    Ok(HttpResponse::Ok().json(repo.get_meal_windows().await?))
}

/// Actualiza las sub-ventanas de desayuno, comida y cena
///
/// No se comprueba el solapamiento ni las ventanas que cruzan medianoche.
#[put("/timings/meals")]
async fn update_meals(
    repo: web::Data<SqliteRepo>,
    data: web::Json<MealWindowsRaw>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "update_meal_timings").await?;

    validate_times(&[
        ("breakfast_start", data.breakfast_start.as_str()),
        ("breakfast_end", data.breakfast_end.as_str()),
        ("lunch_start", data.lunch_start.as_str()),
        ("lunch_end", data.lunch_end.as_str()),
        ("dinner_start", data.dinner_start.as_str()),
        ("dinner_end", data.dinner_end.as_str()),
    ])?;

    let windows = MealWindowsRaw {
        breakfast_start: normalize(&data.breakfast_start),
        breakfast_end: normalize(&data.breakfast_end),
        lunch_start: normalize(&data.lunch_start),
        lunch_end: normalize(&data.lunch_end),
        dinner_start: normalize(&data.dinner_start),
        dinner_end: normalize(&data.dinner_end),
    };

    repo.set_meal_windows(&windows).await?;
    Ok(HttpResponse::Ok().json(windows))
}

/// Resolución a la hora actual, indicando si se usaron valores por defecto
#[get("/timings/current")]
async fn current(
    repo: web::Data<SqliteRepo>,
    clock: web::Data<ServingClock>,
) -> AppResult<impl Responder> {
    let operating = repo.get_operating_window().await?;
    let meals = repo.get_meal_windows().await?;
    let now = clock.time_of_day();
    let resolution = resolve_detailed(now, &operating, &meals);

    Ok(HttpResponse::Ok().json(CurrentResolution {
        current_time: now,
        category: resolution.category,
        operating_fallback: resolution.operating_fallback,
        meals_fallback: resolution.meals_fallback,
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_operating);
    cfg.service(update_operating);
    cfg.service(get_meals);
    cfg.service(update_meals);
    cfg.service(current);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::NaiveDate;
    use serde_json::json;

    async fn setup(hour: u32, minute: u32) -> (web::Data<SqliteRepo>, web::Data<ServingClock>, String) {
        let repo = SqliteRepo::in_memory().await.unwrap();
        let admin = repo.authenticate("admin", "1234").await.unwrap().unwrap();
        let token = repo.issue_access_token(admin.id).await.unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        let clock = ServingClock::frozen(chrono_tz::Asia::Kolkata, at);
        (web::Data::new(repo), web::Data::new(clock), token)
    }

    #[actix_web::test]
    async fn admin_updates_meal_windows_and_resolution_follows() {
        let (repo, clock, token) = setup(11, 15).await;
        let app = test::init_service(
            App::new()
                .app_data(repo.clone())
                .app_data(clock)
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/timings/current").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "Closed");

        let req = test::TestRequest::put()
            .uri("/timings/meals")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "breakfast_start": "7:00 am",
                "breakfast_end": "11:30 AM",
                "lunch_start": "11:30 AM",
                "lunch_end": "04:00 PM",
                "dinner_start": "04:00 PM",
                "dinner_end": "10:00 PM"
            }))
            .to_request();
        let stored: MealWindowsRaw = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored.breakfast_start, "07:00 AM");

        let req = test::TestRequest::get().uri("/timings/current").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "Breakfast");
        assert_eq!(body["meals_fallback"], false);
    }

    #[actix_web::test]
    async fn malformed_times_are_rejected_before_storing() {
        let (repo, clock, token) = setup(9, 0).await;
        let app = test::init_service(
            App::new()
                .app_data(repo.clone())
                .app_data(clock)
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/timings/operating")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({ "open_time": "07:00", "close_time": "10:00 PM" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repo.get_operating_window().await.unwrap(), OperatingWindowRaw::default());
    }

    #[actix_web::test]
    async fn stored_garbage_is_reported_as_fallback() {
        let (repo, clock, _) = setup(9, 0).await;
        repo.set_operating_window(&OperatingWindowRaw {
            open_time: "seven".to_string(),
            close_time: "10:00 PM".to_string(),
        })
        .await
        .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(repo)
                .app_data(clock)
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/timings/current").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "Breakfast");
        assert_eq!(body["operating_fallback"], true);
        assert_eq!(body["current_time"], "09:00 AM");
    }

    #[actix_web::test]
    async fn updating_requires_admin() {
        let (repo, clock, _) = setup(9, 0).await;
        let app = test::init_service(
            App::new()
                .app_data(repo)
                .app_data(clock)
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/timings/operating")
            .set_json(json!({ "open_time": "08:00 AM", "close_time": "10:00 PM" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
