//! # Utilidades de logging para errores
//!
//! Registra la cadena completa de `source()` de un error antes de
//! convertirlo en [`AppError`](super::AppError).

use std::error::Error as StdError;

/// Registra la cadena completa de errores
///
/// # Ejemplo
/// ```ignore
/// if let Err(e) = pool.acquire().await {
///     log_error_chain(&e, Some("acquiring connection"));
/// }
/// ```
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let error_chain = collect_chain(error);

    match context {
        Some(ctx) => tracing::error!(
            context = %ctx,
            error_chain = ?error_chain,
            "Error with full chain (with context)"
        ),
        None => tracing::error!(error_chain = ?error_chain, "Error with full chain"),
    }
}

fn collect_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut error_chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }

    error_chain
}

/// Extension trait para Results que registra la cadena de errores
///
/// ```ignore
/// sqlx::query("DELETE FROM menu WHERE name = ?")
///     .execute(&pool)
///     .await
///     .log_error_context("deleting menu item")?;
/// ```
pub trait ErrorLogExt<T, E> {
    /// Registra la cadena de errores con contexto adicional
    fn log_error_context(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }
}
