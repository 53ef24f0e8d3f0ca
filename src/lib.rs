//! Server side of the cinemood movie/TV recommendation app.
//!
//! Proxies a third-party movie metadata API, manages a saved-items list
//! behind an injected repository, and derives recommendations from the
//! actors appearing across the user's saved titles.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
