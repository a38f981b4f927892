//! # Módulo de horarios
//!
//! Núcleo de decisión del servicio: qué carta se sirve en cada momento.
//!
//! - [`time`] - Horas del día y su formato de 12 horas
//! - [`windows`] - Horario de apertura, sub-ventanas de comidas y valores por defecto
//! - [`resolver`] - Resolución de la categoría actual
//! - [`category`] - Categorías de comida

pub mod category;
pub mod resolver;
pub mod time;
pub mod windows;

pub use category::MealCategory;
pub use resolver::{resolve, resolve_detailed};
pub use time::TimeOfDay;
pub use windows::{MealWindowsRaw, OperatingWindowRaw};
