//! # API de autenticación
//!
//! - Login del personal (admin o staff) con usuario y contraseña
//! - Alta de personal (solo admin)
//! - Extracción y validación del token Bearer
//!
//! El resto de módulos usan [`require_staff`] y [`require_admin`] para proteger
//! sus rutas.

use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use super::{AppError, AppResult};
use crate::db::{Role, SqliteRepo, StaffUser};

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct NewStaff {
    username: String,
    password: String,
    role: Role,
}

/// Extrae el token Bearer del header Authorization
///
/// # Errores
/// - `Unauthorized`: Si falta el header, es inválido o no tiene el formato correcto
fn extract_token(req: &HttpRequest) -> AppResult<&str> {
    let auth_header = req
        .headers()
        .get("authorization")
        .ok_or(AppError::Unauthorized("Falta header Authorization".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Header Authorization inválido".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized("Formato de token inválido".to_string()))
}

/// Usuario autenticado de la petición (admin o staff)
pub async fn require_staff(repo: &SqliteRepo, req: &HttpRequest) -> AppResult<StaffUser> {
    let token = extract_token(req)?;

    repo.find_user_by_token(token)
        .await?
        .ok_or(AppError::Unauthorized("Token inválido".to_string()))
}

/// Usuario autenticado con rol admin
///
/// # Errores
/// - `Unauthorized`: sin token o token inválido
/// - `Forbidden`: el usuario no es admin
pub async fn require_admin(repo: &SqliteRepo, req: &HttpRequest, operation: &str) -> AppResult<StaffUser> {
    let user = require_staff(repo, req).await?;

    if !user.is_admin() {
        return Err(AppError::forbidden(operation, "Se requiere rol admin"));
    }

    Ok(user)
}

/// Inicia sesión y devuelve un token de acceso
///
/// # Respuesta
/// ```json
/// {
///   "access_token": "uuid-token",
///   "username": "admin",
///   "role": "admin",
///   "message": "Login exitoso"
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: Usuario o contraseña vacíos
/// - `401 Unauthorized`: Credenciales incorrectas
#[post("/auth/login")]
async fn login(repo: web::Data<SqliteRepo>, data: web::Json<LoginRequest>) -> AppResult<impl Responder> {
    if data.username.trim().is_empty() || data.password.is_empty() {
        return Err(AppError::Validation("Usuario y contraseña son requeridos".to_string()));
    }

    let user = repo
        .authenticate(data.username.trim(), &data.password)
        .await?
        .ok_or(AppError::Unauthorized("Credenciales incorrectas".to_string()))?;

    let access_token = repo.issue_access_token(user.id).await?;
    tracing::info!(username = %user.username, role = user.role.as_str(), "Login correcto");

    Ok(HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "username": user.username,
        "role": user.role,
        "message": "Login exitoso"
    })))
}

/// Da de alta un miembro del personal
///
/// # Autenticación
/// Requiere token Bearer de un admin.
///
/// # Errores
/// - `400 Bad Request`: Usuario vacío o contraseña de menos de 4 caracteres
/// - `409 Conflict`: El usuario ya existe
#[post("/auth/users")]
async fn create_staff(
    repo: web::Data<SqliteRepo>,
    data: web::Json<NewStaff>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_admin(&repo, &req, "create_staff").await?;

    let username = data.username.trim();
    if username.is_empty() {
        return Err(AppError::validation_field("username", "El usuario es requerido"));
    }

    if data.password.len() < 4 {
        return Err(AppError::validation_field(
            "password",
            "La contraseña debe tener al menos 4 caracteres",
        ));
    }

    let user = repo
        .create_user(username, &data.password, data.role)
        .await
        .map_err(|e| match e {
            AppError::Database {
                source: sqlx::Error::Database(ref db),
                ..
            } if db.is_unique_violation() => AppError::Conflict(format!("El usuario '{}' ya existe", username)),
            other => other,
        })?;

    Ok(HttpResponse::Created().json(user))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(create_staff);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    async fn app_repo() -> web::Data<SqliteRepo> {
        web::Data::new(SqliteRepo::in_memory().await.unwrap())
    }

    #[actix_web::test]
    async fn login_returns_token_usable_for_admin_routes() {
        let repo = app_repo().await;
        let app = test::init_service(App::new().app_data(repo.clone()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "admin", "password": "1234" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let token = body["access_token"].as_str().unwrap().to_string();
        assert_eq!(body["role"], "admin");

        let req = test::TestRequest::post()
            .uri("/auth/users")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({ "username": "ravi", "password": "chai123", "role": "staff" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/auth/users")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({ "username": "ravi", "password": "chai123", "role": "staff" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn bad_credentials_are_unauthorized() {
        let repo = app_repo().await;
        let app = test::init_service(App::new().app_data(repo).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "admin", "password": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn staff_token_is_not_admin() {
        let repo = app_repo().await;
        let staff = repo.create_user("ravi", "chai", Role::Staff).await.unwrap();
        let token = repo.issue_access_token(staff.id).await.unwrap();

        let req = test::TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();

        assert_eq!(require_staff(&repo, &req).await.unwrap(), staff);
        let err = require_admin(&repo, &req, "update_timings").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[actix_web::test]
    async fn missing_or_malformed_header_is_unauthorized() {
        let repo = app_repo().await;

        let req = test::TestRequest::default().to_http_request();
        assert!(matches!(require_staff(&repo, &req).await, Err(AppError::Unauthorized(_))));

        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Token abc"))
            .to_http_request();
        assert!(matches!(require_staff(&repo, &req).await, Err(AppError::Unauthorized(_))));

        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Bearer not-a-session"))
            .to_http_request();
        assert!(matches!(require_staff(&repo, &req).await, Err(AppError::Unauthorized(_))));
    }
}
