pub mod admin;
pub mod app;
pub mod appointments;
pub mod auth;
pub mod config;
pub mod contacts;
pub mod datetime;
pub mod error;
pub mod session;
pub mod state;
pub mod validation;
