//! API route handlers

pub mod dashboard;
pub mod health;
pub mod products;
pub mod stores;
