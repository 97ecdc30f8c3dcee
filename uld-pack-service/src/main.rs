//! Entry point for the HTTP request/response layer (§6): an axum router
//! over a single SQLite-backed request cache, matching the teacher's
//! split between an async IO shell and synchronous, CPU-bound solve work
//! dispatched via `spawn_blocking` (§5's "Service task model").

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::LevelFilter;
use uld_pack::config::SolverConfig;

use uld_pack_service::cache::RequestCache;
use uld_pack_service::dto::{
    self, MetricsRequestBody, MetricsResponseDto, RequestIdBody, RequestStatus, SolveRequestBody, SolveResponseBody,
    SolveStatusDto,
};
use uld_pack_service::error::ApiError;
use uld_pack_service::state::AppState;
use uld_pack_service::{hash, metrics, solve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    uld_pack::util::init_logger(LevelFilter::Info)?;

    let database_url = std::env::var("ULD_PACK_DATABASE_URL").unwrap_or_else(|_| "sqlite://uld-pack.db?mode=rwc".to_string());
    let bind_addr = std::env::var("ULD_PACK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let cache = RequestCache::connect(&database_url).await?;
    let state = AppState { cache: Arc::new(cache), config: SolverConfig::default() };

    let app = Router::new()
        .route("/api", post(post_solve))
        .route("/api/request", post(post_request))
        .route("/api/requests", get(get_requests))
        .route("/api/metrics", post(post_metrics))
        .with_state(state);

    let addr: SocketAddr = bind_addr.parse().with_context(|| format!("invalid bind address {bind_addr:?}"))?;
    log::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("could not bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// `POST /api` (§6): cache-or-kick-off. A `mock` request never touches the
/// cache or the solver. A cache hit on the canonicalised body's SHA-256
/// returns the stored result (or its still-pending request id) directly;
/// a miss inserts a `PENDING` row, kicks the solve off in the background,
/// and returns the new request id immediately.
async fn post_solve(State(state): State<AppState>, Json(body): Json<SolveRequestBody>) -> Result<Json<SolveStatusDto>, ApiError> {
    if body.mock {
        return Ok(Json(SolveStatusDto::Processed { result: solve::mock_response(&body) }));
    }

    let value = serde_json::to_value(&body).context("could not serialise request body")?;
    let request_hash = hash::canonical_hash(&value);

    if let Some(existing) = state.cache.find_by_hash(&request_hash).await? {
        return Ok(Json(match existing.status {
            RequestStatus::Completed => {
                let result: SolveResponseBody =
                    serde_json::from_slice(&existing.content).context("could not deserialise cached result")?;
                SolveStatusDto::Processed { result }
            }
            RequestStatus::Pending => SolveStatusDto::Processing { request_id: existing.id },
        }));
    }

    let (instance, labels) = solve::build_instance(&body).map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let timestamp = jiff::Timestamp::now().to_string();
    let request_id = state.cache.insert_pending(&request_hash, &timestamp).await?;

    let config = state.config;
    let cache = Arc::clone(&state.cache);
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || solve::solve(&instance, config)).await;
        match outcome {
            Ok(Ok(report)) => {
                let response = solve::response_body(&report, &labels);
                match serde_json::to_vec(&response) {
                    Ok(bytes) => {
                        if let Err(err) = cache.complete(request_id, &bytes).await {
                            log::error!("could not store completed request {request_id}: {err:#}");
                        }
                    }
                    Err(err) => log::error!("could not serialise solve response for request {request_id}: {err:#}"),
                }
            }
            Ok(Err(err)) => log::error!("solve failed for request {request_id}: {err:#}"),
            Err(err) => log::error!("solve task panicked for request {request_id}: {err:#}"),
        }
    });

    Ok(Json(SolveStatusDto::Processing { request_id }))
}

/// `POST /api/request` (§6): fetch a previously submitted solve by id.
/// Unknown ids are `404 not_found`; a still-`PENDING` row is `202
/// pending` (§9 Open Question: the spec's "HTTP 301-class error" read as
/// a non-2xx client status, resolved as these two codes per DESIGN.md).
async fn post_request(State(state): State<AppState>, Json(body): Json<RequestIdBody>) -> Result<Json<SolveResponseBody>, ApiError> {
    let stored = state.cache.find_by_id(body.id).await?.ok_or(ApiError::NotFound)?;
    match stored.status {
        RequestStatus::Pending => Err(ApiError::Pending),
        RequestStatus::Completed => {
            let result: SolveResponseBody =
                serde_json::from_slice(&stored.content).context("could not deserialise completed result")?;
            Ok(Json(result))
        }
    }
}

/// `GET /api/requests` (§6): the full request ledger, newest-last.
async fn get_requests(State(state): State<AppState>) -> Result<Json<Vec<dto::RequestSummaryDto>>, ApiError> {
    Ok(Json(state.cache.list().await?))
}

/// `POST /api/metrics` (§6): stateless, recomputed straight from the
/// request body; never touches the cache.
async fn post_metrics(Json(body): Json<MetricsRequestBody>) -> Json<MetricsResponseDto> {
    Json(metrics::compute(&body))
}
