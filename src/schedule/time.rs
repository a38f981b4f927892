//! # Horas del día
//!
//! [`TimeOfDay`] representa una hora de reloj (hora y minuto) sin fecha. Se
//! compara por minutos transcurridos desde medianoche, así que el orden es total.
//!
//! El formato persistido y el que introduce el personal es el de 12 horas con
//! marcador AM/PM, por ejemplo `"07:00 AM"` o `"10:00 PM"`.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Formato `strftime` de las horas guardadas en la base de datos
pub const DISPLAY_FORMAT: &str = "%I:%M %p";

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error al interpretar una hora en formato de 12 horas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Hora '{input}' no válida, use el formato HH:MM AM/PM")]
pub struct TimeParseError {
    pub input: String,
}

/// Hora del día con precisión de minutos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Construye una hora en contextos `const`
    ///
    /// # Panics
    /// Si `hour >= 24` o `minute >= 60`.
    pub const fn hm(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "hora fuera de rango");
        TimeOfDay { minutes: hour * 60 + minute }
    }

    pub fn hour(self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(self) -> u16 {
        self.minutes % 60
    }

    /// Interpreta una hora de 12 horas como `"07:00 AM"`
    ///
    /// Acepta espacios alrededor y el marcador en minúsculas. Cualquier otra
    /// forma (por ejemplo `"19:00"`) es un [`TimeParseError`].
    pub fn parse(text: &str) -> Result<Self, TimeParseError> {
        NaiveTime::parse_from_str(text.trim(), DISPLAY_FORMAT)
            .map(Self::from)
            .map_err(|_| TimeParseError {
                input: text.to_string(),
            })
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        let minutes = (time.hour() * 60 + time.minute()) as u16;
        debug_assert!(minutes < MINUTES_PER_DAY);
        TimeOfDay { minutes }
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{:02}:{:02} {}", hour12, self.minute(), suffix)
    }
}
