pub mod clean;
pub mod db;
pub mod error;
pub mod history;
pub mod models;
pub mod validate;

pub use rusqlite;
