use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::debug;

use allowlist::{parse_address, GateError, HashAlgorithm, Leaf, MerkleProof};

use crate::state::AppState;

/// Header carrying the caller identity, set by the authenticating front proxy.
pub const CALLER_HEADER: &str = "x-caller-address";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/root", get(get_root))
        .route("/claims/:address", get(get_claim))
        .route("/mint", post(post_mint))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Siblings stay as strings here so a malformed one is reported as an
/// invalid proof rather than an extractor rejection.
#[derive(Debug, Serialize, Deserialize)]
pub struct MintRequest {
    pub proof: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MintResponse {
    pub status: &'static str,
    pub leaf: Leaf,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub root: String,
    pub hash: HashAlgorithm,
}

#[derive(Debug, Serialize)]
pub struct ClaimStatus {
    pub address: String,
    pub claimed: bool,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        root: state.gate.root_hex(),
        hash: state.gate.hash_algorithm(),
    })
}

/// GET /claims/:address
pub async fn get_claim(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ClaimStatus>, AppError> {
    let raw = parse_address(&address)?;
    let claimed = state.gate.is_claimed(&raw)?;
    Ok(Json(ClaimStatus { address, claimed }))
}

/// POST /mint: admits the caller named in [`CALLER_HEADER`] once.
pub async fn post_mint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MintRequest>, JsonRejection>,
) -> Result<Json<MintResponse>, AppError> {
    let caller = headers
        .get(CALLER_HEADER)
        .ok_or_else(|| AppError::Unauthorized(format!("missing {CALLER_HEADER} header")))?
        .to_str()
        .map_err(|_| AppError::from(GateError::InvalidAddressFormat))?;
    let caller = parse_address(caller)?;

    let Json(req) = body.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "mint: unreadable body");
        AppError::from(GateError::InvalidMerkleProof)
    })?;
    let proof = MerkleProof::from_hex(&req.proof)?;

    // hashing walk and snapshot write stay off the async workers
    let gate = state.gate.clone();
    let admission = tokio::task::spawn_blocking(move || gate.mint(&caller, &proof))
        .await
        .map_err(|e| AppError::Internal(format!("mint task failed: {e}")))??;

    Ok(Json(MintResponse {
        status: "admitted",
        leaf: admission.leaf,
    }))
}

// ── Error handling ──

/// Maps gate failures to HTTP status codes; the body carries the exact reason.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

impl From<GateError> for AppError {
    fn from(e: GateError) -> Self {
        match &e {
            GateError::AlreadyClaimed => AppError::Conflict(e.to_string()),
            GateError::Storage(_) | GateError::Serialization(_) => AppError::Internal(e.to_string()),
            _ => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m),
            AppError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}
