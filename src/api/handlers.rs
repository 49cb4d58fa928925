//! HTTP API handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::params::{resolve, ArbitrageQuery, ParamError, ScanRequest};
use crate::arbitrage::{find_opportunities, Opportunity};
use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::OddsError;
use crate::metrics;
use crate::odds::{draw_sport_prefixes, MatchEvent, OddsSource};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<Config>,
    /// Upstream odds source.
    pub odds: Arc<dyn OddsSource>,
    /// Fetched odds per sport, with TTL from config.
    pub odds_cache: Arc<TtlCache<Vec<MatchEvent>>>,
    /// Prometheus exporter handle, if metrics are enabled.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state around an odds source.
    pub fn new(config: Config, odds: Arc<dyn OddsSource>) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_seconds);
        Self {
            config: Arc::new(config),
            odds,
            odds_cache: Arc::new(TtlCache::new(ttl)),
            prometheus: None,
        }
    }

    /// Attach a Prometheus exporter handle.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

/// API error with an HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    /// Request was malformed (missing sport, bad numbers).
    BadRequest(String),
    /// The requested sport is not known upstream.
    NotFound(String),
    /// Upstream odds provider failed us.
    Upstream(String),
}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<OddsError> for ApiError {
    fn from(err: OddsError) -> Self {
        match err {
            OddsError::UnknownSport { .. } => ApiError::NotFound(err.to_string()),
            _ => ApiError::Upstream(err.to_string()),
        }
    }
}

/// Error payload returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the service can reach its odds provider.
    pub ready: bool,
    /// Why not, when not ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Sports listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SportsResponse {
    /// Sport key prefixes evaluated as 3-way (win/draw/win) markets.
    pub three_way: Vec<&'static str>,
    /// How every other sport key is evaluated.
    pub default_market: &'static str,
}

/// Result of an arbitrage scan.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArbitrageResponse {
    /// Sport that was scanned.
    pub sport: String,
    /// Number of opportunities found.
    pub count: usize,
    /// Opportunities, best profit first.
    pub opportunities: Vec<Opportunity>,
    /// When this response was produced.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub generated_at: OffsetDateTime,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Ready to serve", body = ReadyResponse),
        (status = 503, description = "Upstream credentials missing", body = ReadyResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.config.has_api_key() {
        (StatusCode::OK, Json(ReadyResponse { ready: true, reason: None }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                reason: Some("ODDS_API_KEY not configured"),
            }),
        )
    }
}

/// List how sport keys map to market types.
#[utoipa::path(
    get,
    path = "/api/v1/sports",
    responses((status = 200, description = "Market type per sport", body = SportsResponse))
)]
pub async fn sports() -> impl IntoResponse {
    Json(SportsResponse {
        three_way: draw_sport_prefixes().to_vec(),
        default_market: "two_way",
    })
}

/// Prometheus metrics in text exposition format.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics exporter not installed").into_response(),
    }
}

/// GET variant of the arbitrage endpoint.
#[utoipa::path(
    get,
    path = "/api/v1/arbitrage",
    params(ArbitrageQuery),
    responses(
        (status = 200, description = "Detected opportunities", body = ArbitrageResponse),
        (status = 400, description = "Missing or malformed parameters", body = ErrorResponse),
        (status = 404, description = "Unknown sport", body = ErrorResponse),
        (status = 502, description = "Upstream odds provider failed", body = ErrorResponse)
    )
)]
pub async fn arbitrage_get(
    State(state): State<AppState>,
    Query(query): Query<ArbitrageQuery>,
) -> Result<Json<ArbitrageResponse>, ApiError> {
    let request = resolve(&query, None, &state.config)?;
    scan(&state, request).await.map(Json)
}

/// POST variant of the arbitrage endpoint; parameters come from the
/// JSON body with the query as fallback.
#[utoipa::path(
    post,
    path = "/api/v1/arbitrage",
    params(ArbitrageQuery),
    responses(
        (status = 200, description = "Detected opportunities", body = ArbitrageResponse),
        (status = 400, description = "Missing or malformed parameters", body = ErrorResponse),
        (status = 404, description = "Unknown sport", body = ErrorResponse),
        (status = 502, description = "Upstream odds provider failed", body = ErrorResponse)
    )
)]
pub async fn arbitrage_post(
    State(state): State<AppState>,
    Query(query): Query<ArbitrageQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<ArbitrageResponse>, ApiError> {
    let body = body.map(|Json(v)| v);
    let request = resolve(&query, body.as_ref(), &state.config)?;
    scan(&state, request).await.map(Json)
}

/// Shared scan path behind both endpoint variants.
#[instrument(skip(state), fields(sport = %request.sport))]
async fn scan(state: &AppState, request: ScanRequest) -> Result<ArbitrageResponse, ApiError> {
    let started = Instant::now();
    metrics::inc_requests();

    let odds = state.odds.clone();
    let sport = request.sport.clone();
    let matches = state
        .odds_cache
        .get_or_compute(&request.sport, || async move {
            let fetch_started = Instant::now();
            let matches = odds.fetch_matches(&sport).await?;
            metrics::record_odds_fetch_latency(fetch_started);
            Ok::<_, OddsError>(matches)
        })
        .await?;

    // Arbitrage needs at least two bookmakers to hedge across; the
    // engine itself does not enforce this.
    let eligible: Vec<MatchEvent> = matches
        .into_iter()
        .filter(|m| m.distinct_bookmakers() >= 2)
        .collect();

    metrics::add_matches_evaluated(eligible.len() as u64);
    let opportunities = find_opportunities(&eligible, request.params);
    metrics::add_opportunities_detected(opportunities.len() as u64);
    metrics::record_request_latency(started, &request.sport);

    info!(
        sport = %request.sport,
        matches = eligible.len(),
        opportunities = opportunities.len(),
        "Scan complete"
    );

    Ok(ArbitrageResponse {
        sport: request.sport,
        count: opportunities.len(),
        opportunities,
        generated_at: OffsetDateTime::now_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::MockOddsSource;

    fn test_state() -> AppState {
        AppState::new(Config::default(), Arc::new(MockOddsSource::new()))
    }

    #[tokio::test]
    async fn ready_reflects_api_key_presence() {
        let state = test_state();
        let response = ready(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let config = Config {
            odds_api_key: Some("key".to_string()),
            ..Config::default()
        };
        let state = AppState::new(config, Arc::new(MockOddsSource::new()));
        let response = ready(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_unavailable_without_exporter() {
        let response = render_metrics(State(test_state())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
