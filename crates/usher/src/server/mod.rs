//! REST server, request handlers, and the recommendation services

pub mod handlers;
pub mod models;
pub mod routing;
pub mod server;
pub mod services;
pub mod types;
