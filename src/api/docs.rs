//! OpenAPI document served at /api-docs/openapi.json.

use utoipa::OpenApi;

use super::handlers;
use crate::arbitrage::{Opportunity, OpportunityLeg};

/// OpenAPI document for the arbitrage API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sports Arbitrage API",
        description = "Detects guaranteed-profit betting combinations across bookmakers."
    ),
    paths(
        handlers::health,
        handlers::ready,
        handlers::sports,
        handlers::arbitrage_get,
        handlers::arbitrage_post,
    ),
    components(schemas(
        handlers::HealthResponse,
        handlers::ReadyResponse,
        handlers::SportsResponse,
        handlers::ArbitrageResponse,
        handlers::ErrorResponse,
        Opportunity,
        OpportunityLeg,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/api/v1/arbitrage"));
    }
}
