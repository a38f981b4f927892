//! Personal y sesiones (tabla `users`)
//!
//! Las contraseñas se comparan en texto plano contra la tabla. La sesión es un
//! token uuid guardado en la fila del usuario; cada login lo reemplaza.

use uuid::Uuid;

use super::models::{Role, StaffUser, StaffUserRow};
use super::sqlite::{Result, SqliteRepo};
use crate::api::middleware::ErrorLogExt;
use crate::api::AppError;

impl SqliteRepo {
    /// Busca al usuario con esas credenciales
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<StaffUser>> {
        let row = sqlx::query_as::<_, StaffUserRow>(
            "SELECT id, username, role FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(self.pool())
        .await
        .log_error_context("authenticating user")
        .map_err(|e| AppError::database("authenticate", e))?;

        Ok(row.map(StaffUser::from))
    }

    /// Genera y guarda un token de acceso nuevo para el usuario
    pub async fn issue_access_token(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().to_string();

        let result = sqlx::query("UPDATE users SET access_token = ? WHERE id = ?")
            .bind(&token)
            .bind(user_id)
            .execute(self.pool())
            .await
            .log_error_context("issuing access token")
            .map_err(|e| AppError::database("issue_access_token", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found_id("User", user_id));
        }

        Ok(token)
    }

    /// Usuario dueño del token, si lo hay
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<StaffUser>> {
        let row = sqlx::query_as::<_, StaffUserRow>(
            "SELECT id, username, role FROM users WHERE access_token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await
        .log_error_context("validating access token")
        .map_err(|e| AppError::database("find_user_by_token", e))?;

        Ok(row.map(StaffUser::from))
    }

    /// Da de alta un miembro del personal
    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> Result<StaffUser> {
        let result = sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password)
            .bind(role.as_str())
            .execute(self.pool())
            .await
            .log_error_context("creating user")
            .map_err(|e| AppError::database("create_user", e))?;

        Ok(StaffUser {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            role,
        })
    }
}
