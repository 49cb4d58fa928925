//! HTTP API module for arbitrage queries, health and metrics.

pub mod docs;
pub mod handlers;
pub mod params;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
