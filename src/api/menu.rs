//! # API de la carta
//!
//! - Carta actual según la hora (clientes)
//! - Listado de platos disponibles por categoría
//! - Alta, cambio de disponibilidad y borrado de platos (solo admin)

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::auth::require_admin;
use super::{AppError, AppResult};
use crate::config::ServingClock;
use crate::db::{MenuItem, NewMenuItem, SqliteRepo};
use crate::schedule::{resolve, MealCategory, TimeOfDay};

/// Estado de un plato tal y como lo elige el personal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
enum ItemStatus {
    #[default]
    Available,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl ItemStatus {
    fn is_available(self) -> bool {
        self == ItemStatus::Available
    }
}

#[derive(Deserialize)]
struct CreateMenuItem {
    name: String,
    price: f64,
    image_url: String,
    category: MealCategory,
    #[serde(default)]
    status: ItemStatus,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct AvailabilityUpdate {
    status: ItemStatus,
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: Option<MealCategory>,
}

#[derive(Deserialize)]
struct DeleteQuery {
    name: String,
}

/// Carta que se sirve ahora
#[derive(Serialize)]
struct CurrentMenu {
    /// Categoría resuelta (`Closed` si no hay carta)
    category: MealCategory,
    /// Hora local en formato `hh:mm AM/PM`
    current_time: TimeOfDay,
    items: Vec<MenuItem>,
}

/// Carta actual según la hora del restaurante
///
/// Lee los horarios guardados, resuelve la categoría a la hora actual y
/// devuelve los platos disponibles de esa categoría. Con el restaurante
/// cerrado (o entre comidas) la lista está vacía.
///
/// # Respuesta
/// ```json
/// {
///   "category": "Breakfast",
///   "current_time": "08:15 AM",
///   "items": [{ "id": 1, "name": "Masala Dosa", "price": 50.0, ... }]
/// }
/// ```
#[get("/menu")]
async fn current_menu(
    repo: web::Data<SqliteRepo>,
    clock: web::Data<ServingClock>,
) -> AppResult<impl Responder> {
    let operating = repo.get_operating_window().await?;
    let meals = repo.get_meal_windows().await?;

    let now = clock.time_of_day();
    let category = resolve(now, &operating, &meals);

    let items = repo.list_available_items(Some(category)).await?;
    if !category.is_serving() {
        tracing::debug!(now = %now, "Restaurante cerrado, sin carta");
    }

    Ok(HttpResponse::Ok().json(CurrentMenu {
        category,
        current_time: now,
        items,
    }))
}

/// Platos disponibles, filtrados opcionalmente por `?category=Lunch`
#[get("/menu/items")]
async fn list_items(
    repo: web::Data<SqliteRepo>,
    query: web::Query<CategoryQuery>,
) -> AppResult<impl Responder> {
    let items = repo.list_available_items(query.category).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Da de alta un plato
///
/// # Autenticación
/// Requiere token Bearer de un admin.
///
/// # Validaciones
/// - Nombre e imagen no pueden estar vacíos
/// - El precio debe ser mayor a 0
/// - La categoría debe ser Breakfast, Lunch o Dinner
///
/// # Errores
/// - `400 Bad Request`: Datos de validación incorrectos
/// - `401 Unauthorized` / `403 Forbidden`: Sin sesión de admin
#[post("/menu/items")]
async fn create_item(
    repo: web::Data<SqliteRepo>,
    data: web::Json<CreateMenuItem>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "create_menu_item").await?;

    let data = data.into_inner();
    let name = data.name.trim();
    let image_url = data.image_url.trim();

    if name.is_empty() {
        return Err(AppError::validation_field("name", "El nombre del plato es requerido"));
    }

    if image_url.is_empty() {
        return Err(AppError::validation_field("image_url", "La URL de la imagen es requerida"));
    }

    if !(data.price.is_finite() && data.price > 0.0) {
        return Err(AppError::validation_field("price", "El precio debe ser mayor a 0"));
    }

    if !data.category.is_serving() {
        return Err(AppError::validation_field(
            "category",
            "La categoría debe ser Breakfast, Lunch o Dinner",
        ));
    }

    let item = NewMenuItem {
        category: data.category,
        name: name.to_string(),
        description: data.description.filter(|d| !d.trim().is_empty()),
        price: data.price,
        image_url: Some(image_url.to_string()),
        available: data.status.is_available(),
    };

    let created = repo.create_menu_item(&item).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Cambia la disponibilidad de un plato (`Available` / `Out of Stock`)
///
/// # Errores
/// - `404 Not Found`: El plato no existe
#[patch("/menu/items/{id}/availability")]
async fn update_availability(
    repo: web::Data<SqliteRepo>,
    path: web::Path<i64>,
    data: web::Json<AvailabilityUpdate>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "update_menu_item_status").await?;

    let id = path.into_inner();
    repo.set_item_availability(id, data.status.is_available()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Disponibilidad actualizada",
        "id": id,
        "status": data.status
    })))
}

/// Borra los platos con el nombre dado (`?name=Upma`)
///
/// Un nombre inexistente no es un error: responde 200 con `deleted: 0`.
#[delete("/menu/items")]
async fn delete_item(
    repo: web::Data<SqliteRepo>,
    query: web::Query<DeleteQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "delete_menu_item").await?;

    let name = query.name.trim();
    if name.is_empty() {
        return Err(AppError::validation_field("name", "El nombre del plato es requerido"));
    }

    let deleted = repo.delete_items_by_name(name).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Borrado completado",
        "name": name,
        "deleted": deleted
    })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(current_menu);
    cfg.service(list_items);
    cfg.service(create_item);
    cfg.service(update_availability);
    cfg.service(delete_item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::NaiveDate;

    fn clock_at(hour: u32, minute: u32) -> web::Data<ServingClock> {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        web::Data::new(ServingClock::frozen(chrono_tz::Asia::Kolkata, at))
    }

    async fn seeded_repo() -> web::Data<SqliteRepo> {
        let repo = SqliteRepo::in_memory().await.unwrap();
        repo.seed_menu().await.unwrap();
        web::Data::new(repo)
    }

    async fn token_for(repo: &SqliteRepo, role: Role) -> String {
        let user = match role {
            Role::Admin => repo.authenticate("admin", "1234").await.unwrap().unwrap(),
            Role::Staff => repo.create_user("ravi", "chai", Role::Staff).await.unwrap(),
        };
        repo.issue_access_token(user.id).await.unwrap()
    }

    #[actix_web::test]
    async fn breakfast_menu_at_eight() {
        let repo = seeded_repo().await;
        let app = test::init_service(
            App::new()
                .app_data(repo.clone())
                .app_data(clock_at(8, 0))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/menu").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["category"], "Breakfast");
        assert_eq!(body["current_time"], "08:00 AM");
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 8);
        assert!(items.iter().all(|i| i["category"] == "Breakfast"));
    }

    #[actix_web::test]
    async fn closed_between_meals_and_after_hours() {
        for (hour, minute) in [(11, 15), (23, 0)] {
            let repo = seeded_repo().await;
            let app = test::init_service(
                App::new()
                    .app_data(repo.clone())
                    .app_data(clock_at(hour, minute))
                    .configure(routes),
            )
            .await;

            let req = test::TestRequest::get().uri("/menu").to_request();
            let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["category"], "Closed");
            assert!(body["items"].as_array().unwrap().is_empty());
        }
    }

    #[actix_web::test]
    async fn category_filter_on_item_listing() {
        let repo = seeded_repo().await;
        let app = test::init_service(App::new().app_data(repo.clone()).configure(routes)).await;

        let req = test::TestRequest::get().uri("/menu/items?category=Dinner").to_request();
        let items: Vec<MenuItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.category == MealCategory::Dinner && i.available));

        let req = test::TestRequest::get().uri("/menu/items").to_request();
        let items: Vec<MenuItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(items.len(), 18);
    }

    #[actix_web::test]
    async fn admin_manages_items() {
        let repo = seeded_repo().await;
        let token = token_for(&repo, Role::Admin).await;
        let app = test::init_service(App::new().app_data(repo.clone()).configure(routes)).await;
        let auth = ("Authorization", format!("Bearer {token}"));

        let req = test::TestRequest::post()
            .uri("/menu/items")
            .insert_header(auth.clone())
            .set_json(json!({
                "name": "Filter Coffee",
                "price": 20.0,
                "image_url": "https://example.com/coffee.jpg",
                "category": "Breakfast",
                "status": "Out of Stock"
            }))
            .to_request();
        let created: MenuItem = test::call_and_read_body_json(&app, req).await;
        assert!(!created.available);

        let req = test::TestRequest::patch()
            .uri(&format!("/menu/items/{}/availability", created.id))
            .insert_header(auth.clone())
            .set_json(json!({ "status": "Available" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let breakfast = repo.list_available_items(Some(MealCategory::Breakfast)).await.unwrap();
        assert!(breakfast.iter().any(|i| i.name == "Filter Coffee"));

        let req = test::TestRequest::patch()
            .uri("/menu/items/9999/availability")
            .insert_header(auth.clone())
            .set_json(json!({ "status": "Available" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/menu/items?name=Nonexistent%20Item")
            .insert_header(auth.clone())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["deleted"], 0);
        assert_eq!(repo.list_available_items(None).await.unwrap().len(), 19);
    }

    #[actix_web::test]
    async fn invalid_items_are_rejected() {
        let repo = seeded_repo().await;
        let token = token_for(&repo, Role::Admin).await;
        let app = test::init_service(App::new().app_data(repo.clone()).configure(routes)).await;

        let bad = [
            json!({ "name": " ", "price": 10.0, "image_url": "u", "category": "Lunch" }),
            json!({ "name": "Lassi", "price": 10.0, "image_url": "", "category": "Lunch" }),
            json!({ "name": "Lassi", "price": 0.0, "image_url": "u", "category": "Lunch" }),
            json!({ "name": "Lassi", "price": 10.0, "image_url": "u", "category": "Closed" }),
        ];
        for payload in bad {
            let req = test::TestRequest::post()
                .uri("/menu/items")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(payload)
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(repo.list_available_items(None).await.unwrap().len(), 18);
    }

    #[actix_web::test]
    async fn staff_cannot_change_the_menu() {
        let repo = seeded_repo().await;
        let token = token_for(&repo, Role::Staff).await;
        let app = test::init_service(App::new().app_data(repo.clone()).configure(routes)).await;

        let req = test::TestRequest::delete()
            .uri("/menu/items?name=Upma")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
        assert_eq!(repo.list_available_items(None).await.unwrap().len(), 18);
    }
}
