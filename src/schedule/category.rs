use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Categoría de comida que se está sirviendo
///
/// `Closed` no es una categoría de carta: indica que no hay menú disponible,
/// ya sea porque el restaurante está cerrado o porque estamos entre comidas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Categoría '{0}' desconocida, use Breakfast, Lunch o Dinner")]
pub struct UnknownCategory(pub String);

impl MealCategory {
    /// Categorías con carta, en el orden en que se evalúan
    pub const SERVING: [MealCategory; 3] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
            MealCategory::Closed => "Closed",
        }
    }

    pub fn is_serving(self) -> bool {
        self != MealCategory::Closed
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [
            MealCategory::Breakfast,
            MealCategory::Lunch,
            MealCategory::Dinner,
            MealCategory::Closed,
        ]
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for MealCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
