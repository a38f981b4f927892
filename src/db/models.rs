use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::{AppError, ResultExt};
use crate::schedule::MealCategory;

/// Plato de la carta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub category: MealCategory,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub available: bool,
}

/// Datos para dar de alta un plato
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub category: MealCategory,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub available: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MenuItemRow {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub available: bool,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = AppError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<MealCategory>()
            .map_err_internal(&format!("Plato {}", row.id))?;

        Ok(MenuItem {
            id: row.id,
            category,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            available: row.available,
        })
    }
}

/// Estado de un pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Served,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Served => "Served",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(OrderStatus::Pending),
            "Served" => Ok(OrderStatus::Served),
            other => Err(AppError::validation_field(
                "status",
                &format!("Estado '{}' desconocido, use Pending o Served", other),
            )),
        }
    }
}

/// Pedido de una mesa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub table_id: String,
    /// Nombres de los platos separados por ", "
    pub items: String,
    pub instructions: Option<String>,
    pub status: OrderStatus,
    /// `YYYY-MM-DD HH:MM:SS` en la zona horaria del restaurante
    pub timestamp: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub table_id: String,
    pub items: String,
    pub instructions: Option<String>,
    pub status: String,
    pub timestamp: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err_internal(&format!("Pedido {}", row.id))?;

        Ok(Order {
            id: row.id,
            table_id: row.table_id,
            items: row.items,
            instructions: row.instructions,
            status,
            timestamp: row.timestamp,
        })
    }
}

/// Rol del personal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

/// Miembro del personal con sesión
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl StaffUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StaffUserRow {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl From<StaffUserRow> for StaffUser {
    fn from(row: StaffUserRow) -> Self {
        // La tabla restringe el rol con CHECK(role IN ('admin', 'staff'))
        let role = if row.role == "admin" { Role::Admin } else { Role::Staff };
        StaffUser {
            id: row.id,
            username: row.username,
            role,
        }
    }
}
