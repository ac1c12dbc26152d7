pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod foods;
pub mod meals;
pub mod pagination;
pub mod state;
