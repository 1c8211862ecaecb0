pub mod admin;
pub mod auth;
pub mod chirps;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod service;
pub mod tokens;
pub mod webhooks;
