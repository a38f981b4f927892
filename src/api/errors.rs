//! # Manejo de errores
//!
//! Jerarquía de errores de la aplicación construida con thiserror. Cada
//! variante sabe cómo convertirse en respuesta HTTP con cuerpo
//! `{ "error": ..., "message": ... }`.

use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

/// Tipos de error de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Error de base de datos con la operación que falló
    ///
    /// Si la base de datos no está disponible (pool agotado o cerrado, error de
    /// E/S) la respuesta es 503; cualquier otro fallo es 500.
    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField { field: String, message: String },

    /// Error de validación general
    #[error("Error de validación: {0}")]
    Validation(String),

    /// Falta la sesión o el token no es válido
    #[error("No autorizado: {0}")]
    Unauthorized(String),

    /// Sesión válida sin permisos para la operación
    #[error("Prohibido para operación '{operation}': {reason}")]
    Forbidden { operation: String, reason: String },

    /// Error de recurso no encontrado
    #[error("No encontrado: {resource_type} con ID '{id}'")]
    NotFoundWithId { resource_type: String, id: String },

    /// Error de conflicto
    #[error("Conflicto: {0}")]
    Conflict(String),

    /// Error interno con código de rastreo
    #[error("Error interno (trace: {trace_id}): {message}")]
    InternalWithTrace { trace_id: String, message: String },
}

impl AppError {
    /// Crea un error de base de datos con contexto de operación
    pub fn database(operation: &str, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Crea un error de permisos para una operación
    pub fn forbidden(operation: &str, reason: &str) -> Self {
        Self::Forbidden {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Crea un error de no encontrado con ID
    pub fn not_found_id(resource_type: &str, id: impl ToString) -> Self {
        Self::NotFoundWithId {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Crea un error interno con trace ID
    pub fn internal_trace(message: &str, trace_id: Option<String>) -> Self {
        Self::InternalWithTrace {
            trace_id: trace_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            message: message.to_string(),
        }
    }

    /// La base de datos no se puede alcanzar o escribir
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database {
                source: sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
                ..
            }
        )
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Database { operation, source } if self.is_store_unavailable() => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    "Store unavailable"
                );
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    error: "Servicio no disponible".to_string(),
                    message: "La base de datos no está disponible, inténtelo de nuevo".to_string(),
                })
            }
            Self::Database { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "Database error occurred"
                );
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error de base de datos".to_string(),
                    message: "Error interno del servidor".to_string(),
                })
            }
            Self::ValidationWithField { field, message } => {
                tracing::warn!(
                    field = %field,
                    message = %message,
                    "Validation error"
                );
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Error de validación".to_string(),
                    message: format!("Campo '{}': {}", field, message),
                })
            }
            Self::Validation(message) => {
                tracing::warn!(message = %message, "Validation error");
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Error de validación".to_string(),
                    message: message.clone(),
                })
            }
            Self::Unauthorized(reason) => {
                tracing::warn!(reason = %reason, "Unauthorized access attempt");
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "No autorizado".to_string(),
                    message: reason.clone(),
                })
            }
            Self::Forbidden { operation, reason } => {
                tracing::warn!(
                    operation = %operation,
                    reason = %reason,
                    "Forbidden operation attempt"
                );
                HttpResponse::Forbidden().json(ErrorResponse {
                    error: "Prohibido".to_string(),
                    message: format!("Operación '{}': {}", operation, reason),
                })
            }
            Self::NotFoundWithId { resource_type, id } => {
                tracing::info!(
                    resource_type = %resource_type,
                    id = %id,
                    "Resource not found"
                );
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "No encontrado".to_string(),
                    message: format!("{} con ID '{}' no encontrado", resource_type, id),
                })
            }
            Self::Conflict(message) => {
                tracing::info!(message = %message, "Conflict");
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "Conflicto".to_string(),
                    message: message.clone(),
                })
            }
            Self::InternalWithTrace { trace_id, message } => {
                tracing::error!(
                    trace_id = %trace_id,
                    message = %message,
                    "Internal error with trace"
                );
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error interno".to_string(),
                    message: format!("Error interno (trace: {})", trace_id),
                })
            }
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

pub trait ResultExt<T> {
    fn map_err_validation(self, field: &str) -> AppResult<T>;
    fn map_err_internal(self, message: &str) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + 'static,
{
    fn map_err_validation(self, field: &str) -> AppResult<T> {
        self.map_err(|e| AppError::validation_field(field, &e.to_string()))
    }

    fn map_err_internal(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::internal_trace(&format!("{}: {}", message, e), None))
    }
}
