//! Page-navigation front door: the route guard as axum middleware, and the
//! shell router it protects.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
