//! # Ventanas horarias
//!
//! El horario del restaurante tiene dos niveles:
//!
//! - [`OperatingWindow`]: apertura y cierre del local.
//! - [`MealWindows`]: tres sub-ventanas (desayuno, comida, cena).
//!
//! La configuración se guarda como texto (`"07:00 AM"`), representado por
//! [`OperatingWindowRaw`] y [`MealWindowsRaw`]. Al interpretarla se aplica la
//! política de fallback conjunto: si falla cualquier campo de un grupo, el grupo
//! entero vuelve a los valores por defecto. El resultado lleva la marca
//! `used_fallback` para que el llamador sepa si hubo sustitución.
//!
//! Las ventanas que cruzan medianoche no están soportadas: un intervalo con
//! `start >= end` queda vacío.

use serde::{Deserialize, Serialize};

use super::category::MealCategory;
use super::time::{TimeOfDay, TimeParseError};

/// Apertura por defecto (07:00)
pub const DEFAULT_OPEN: TimeOfDay = TimeOfDay::hm(7, 0);
/// Cierre por defecto (22:00)
pub const DEFAULT_CLOSE: TimeOfDay = TimeOfDay::hm(22, 0);

pub const DEFAULT_BREAKFAST: Interval = Interval::new(TimeOfDay::hm(7, 0), TimeOfDay::hm(11, 0));
pub const DEFAULT_LUNCH: Interval = Interval::new(TimeOfDay::hm(12, 0), TimeOfDay::hm(16, 0));
pub const DEFAULT_DINNER: Interval = Interval::new(TimeOfDay::hm(17, 0), TimeOfDay::hm(22, 0));

/// Intervalo semiabierto `[start, end)` dentro de un mismo día
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Interval { start, end }
    }

    pub fn contains(&self, now: TimeOfDay) -> bool {
        self.start <= now && now < self.end
    }
}

/// Horario de apertura del local
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindow {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl OperatingWindow {
    pub const DEFAULT: OperatingWindow = OperatingWindow {
        open: DEFAULT_OPEN,
        close: DEFAULT_CLOSE,
    };

    /// Apertura inclusiva, cierre exclusivo
    pub fn contains(&self, now: TimeOfDay) -> bool {
        self.open <= now && now < self.close
    }
}

impl Default for OperatingWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Sub-ventanas de servicio por categoría
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWindows {
    pub breakfast: Interval,
    pub lunch: Interval,
    pub dinner: Interval,
}

impl MealWindows {
    pub const DEFAULT: MealWindows = MealWindows {
        breakfast: DEFAULT_BREAKFAST,
        lunch: DEFAULT_LUNCH,
        dinner: DEFAULT_DINNER,
    };

    pub fn window(&self, category: MealCategory) -> Option<Interval> {
        match category {
            MealCategory::Breakfast => Some(self.breakfast),
            MealCategory::Lunch => Some(self.lunch),
            MealCategory::Dinner => Some(self.dinner),
            MealCategory::Closed => None,
        }
    }

    /// Primera categoría (desayuno, comida, cena) cuyo intervalo contiene `now`
    ///
    /// No se valida el solapamiento: si dos ventanas se pisan gana la primera.
    pub fn category_at(&self, now: TimeOfDay) -> Option<MealCategory> {
        MealCategory::SERVING
            .into_iter()
            .find(|c| self.window(*c).is_some_and(|w| w.contains(now)))
    }
}

impl Default for MealWindows {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Resultado de interpretar la configuración, con la marca de sustitución
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub used_fallback: bool,
}

/// Horario de apertura tal y como se guarda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindowRaw {
    pub open_time: String,
    pub close_time: String,
}

impl OperatingWindowRaw {
    pub fn parse(&self) -> Result<OperatingWindow, TimeParseError> {
        Ok(OperatingWindow {
            open: TimeOfDay::parse(&self.open_time)?,
            close: TimeOfDay::parse(&self.close_time)?,
        })
    }

    /// Interpreta ambos campos o sustituye los dos por [`OperatingWindow::DEFAULT`]
    pub fn resolve(&self) -> Parsed<OperatingWindow> {
        match self.parse() {
            Ok(value) => Parsed {
                value,
                used_fallback: false,
            },
            Err(_) => Parsed {
                value: OperatingWindow::DEFAULT,
                used_fallback: true,
            },
        }
    }
}

impl Default for OperatingWindowRaw {
    fn default() -> Self {
        OperatingWindow::DEFAULT.into()
    }
}

impl From<OperatingWindow> for OperatingWindowRaw {
    fn from(window: OperatingWindow) -> Self {
        OperatingWindowRaw {
            open_time: window.open.to_string(),
            close_time: window.close.to_string(),
        }
    }
}

/// Sub-ventanas de servicio tal y como se guardan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWindowsRaw {
    pub breakfast_start: String,
    pub breakfast_end: String,
    pub lunch_start: String,
    pub lunch_end: String,
    pub dinner_start: String,
    pub dinner_end: String,
}

impl MealWindowsRaw {
    pub fn parse(&self) -> Result<MealWindows, TimeParseError> {
        let interval = |start: &str, end: &str| -> Result<Interval, TimeParseError> {
            Ok(Interval::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?))
        };

        Ok(MealWindows {
            breakfast: interval(&self.breakfast_start, &self.breakfast_end)?,
            lunch: interval(&self.lunch_start, &self.lunch_end)?,
            dinner: interval(&self.dinner_start, &self.dinner_end)?,
        })
    }

    /// Interpreta los seis campos o sustituye el conjunto por [`MealWindows::DEFAULT`]
    pub fn resolve(&self) -> Parsed<MealWindows> {
        match self.parse() {
            Ok(value) => Parsed {
                value,
                used_fallback: false,
            },
            Err(_) => Parsed {
                value: MealWindows::DEFAULT,
                used_fallback: true,
            },
        }
    }
}

impl Default for MealWindowsRaw {
    fn default() -> Self {
        MealWindows::DEFAULT.into()
    }
}

impl From<MealWindows> for MealWindowsRaw {
    fn from(windows: MealWindows) -> Self {
        MealWindowsRaw {
            breakfast_start: windows.breakfast.start.to_string(),
            breakfast_end: windows.breakfast.end.to_string(),
            lunch_start: windows.lunch.start.to_string(),
            lunch_end: windows.lunch.end.to_string(),
            dinner_start: windows.dinner.start.to_string(),
            dinner_end: windows.dinner.end.to_string(),
        }
    }
}
