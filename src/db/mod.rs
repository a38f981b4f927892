// src/db/mod.rs
pub mod menu;
pub mod models;
pub mod orders;
pub mod sqlite;
pub mod timings;
pub mod users;

pub use models::{MenuItem, NewMenuItem, OrderStatus, Role, StaffUser};
pub use sqlite::SqliteRepo;
