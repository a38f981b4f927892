//! # Resolución de la comida actual
//!
//! Decide, a partir de la hora actual y de la configuración guardada, si el
//! restaurante está abierto y qué categoría de carta se sirve.
//!
//! ## Algoritmo
//!
//! 1. Interpretar apertura/cierre; si falla cualquiera, usar 07:00–22:00.
//! 2. Fuera de `[apertura, cierre)` el resultado es `Closed`.
//! 3. Interpretar las tres sub-ventanas; si falla cualquiera, usar las de por defecto.
//! 4. Devolver la primera categoría (desayuno, comida, cena) que contiene la hora.
//! 5. Abierto pero entre comidas también es `Closed`.
//!
//! Nunca devuelve error: los fallos de formato se absorben en el fallback.

use super::category::MealCategory;
use super::time::TimeOfDay;
use super::windows::{MealWindowsRaw, OperatingWindowRaw};

/// Resultado detallado de una resolución
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub category: MealCategory,
    /// El horario de apertura se sustituyó por el de por defecto
    pub operating_fallback: bool,
    /// Las sub-ventanas se sustituyeron por las de por defecto
    pub meals_fallback: bool,
}

/// Categoría que se sirve a la hora `now`
pub fn resolve(
    now: TimeOfDay,
    operating: &OperatingWindowRaw,
    meals: &MealWindowsRaw,
) -> MealCategory {
    resolve_detailed(now, operating, meals).category
}

/// Igual que [`resolve`] pero indicando si se aplicaron valores por defecto
pub fn resolve_detailed(
    now: TimeOfDay,
    operating: &OperatingWindowRaw,
    meals: &MealWindowsRaw,
) -> Resolution {
    let operating_window = operating.resolve();
    if operating_window.used_fallback {
        tracing::warn!(
            open_time = %operating.open_time,
            close_time = %operating.close_time,
            "Horario de apertura no válido, usando 07:00 AM - 10:00 PM"
        );
    }

    if !operating_window.value.contains(now) {
        return Resolution {
            category: MealCategory::Closed,
            operating_fallback: operating_window.used_fallback,
            meals_fallback: false,
        };
    }

    let meal_windows = meals.resolve();
    if meal_windows.used_fallback {
        tracing::warn!(?meals, "Horarios de comidas no válidos, usando los de por defecto");
    }

    let category = meal_windows
        .value
        .category_at(now)
        .unwrap_or(MealCategory::Closed);

    tracing::debug!(now = %now, category = %category, "Categoría resuelta");

    Resolution {
        category,
        operating_fallback: operating_window.used_fallback,
        meals_fallback: meal_windows.used_fallback,
    }
}
