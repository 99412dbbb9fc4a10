//! HTTP API handlers.
//!
//! The substrate contract: every mutating request carries the
//! authenticated caller identity in the `X-Player-Id` header, and each
//! operation runs to completion under the state lock before the next
//! one is applied.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rps_wager_core::{Commitment, GameId, Move, PlayerId, RevealStatus, Salt, WagerError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

// ============ Request types ============

#[derive(Deserialize)]
pub struct AmountRequest {
    pub amount: u64,
}

#[derive(Deserialize)]
pub struct CommitRequest {
    pub bet_amount: u64,
    /// 32-byte commitment hash, hex encoded
    pub commitment: String,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    #[serde(rename = "move")]
    pub mv: Move,
    /// 32-byte reveal secret, hex encoded
    pub salt: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub commitment: String,
    #[serde(rename = "move")]
    pub mv: Move,
    pub salt: String,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub ticks: u64,
}

// ============ Error mapping ============

/// API error with a JSON body
pub enum ApiError {
    MissingIdentity,
    BadRequest(&'static str),
    Wager(WagerError),
}

impl From<WagerError> for ApiError {
    fn from(err: WagerError) -> Self {
        ApiError::Wager(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                "missing or malformed X-Player-Id header".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::Wager(err) => {
                let status = match err {
                    WagerError::Unauthorized => StatusCode::UNAUTHORIZED,
                    WagerError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn caller(headers: &HeaderMap) -> Result<PlayerId, ApiError> {
    headers
        .get("X-Player-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or(ApiError::MissingIdentity)
}

fn parse_commitment(hex: &str) -> Result<Commitment, ApiError> {
    Commitment::from_hex(hex).ok_or(ApiError::BadRequest("commitment must be 32 bytes of hex"))
}

fn parse_salt(hex: &str) -> Result<Salt, ApiError> {
    Salt::from_hex(hex).ok_or(ApiError::BadRequest("salt must be 32 bytes of hex"))
}

// ============ Ledger handlers ============

pub async fn deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AmountRequest>,
) -> Result<Json<Value>, ApiError> {
    let player = caller(&headers)?;
    let balance = state.with_engine(|engine| {
        engine.deposit(player, req.amount)?;
        Ok::<_, WagerError>(engine.balance_of(player))
    })?;

    tracing::info!(%player, amount = req.amount, "deposit credited");
    Ok(Json(json!({ "balance": balance })))
}

pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AmountRequest>,
) -> Result<Json<Value>, ApiError> {
    let player = caller(&headers)?;
    let (moved, balance) = state.with_engine(|engine| {
        let moved = engine.withdraw(player, req.amount)?;
        Ok::<_, WagerError>((moved, engine.balance_of(player)))
    })?;

    // Signal to the external transfer collaborator
    tracing::info!(%player, amount = moved, "withdrawal, transfer out requested");
    Ok(Json(json!({ "withdrawn": moved, "balance": balance })))
}

pub async fn account(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let player: PlayerId = player_id
        .parse()
        .map_err(|_| ApiError::BadRequest("player id must be a UUID"))?;
    let (available, locked) =
        state.with_engine(|engine| (engine.balance_of(player), engine.locked_amount(player)));

    Ok(Json(json!({ "available": available, "locked": locked })))
}

// ============ Game handlers ============

pub async fn commit(
    State(state): State<AppState>,
    Path(game_id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<CommitRequest>,
) -> Result<Json<Value>, ApiError> {
    let player = caller(&headers)?;
    let commitment = parse_commitment(&req.commitment)?;
    let game = GameId::new(game_id);
    let phase = state.with_engine(|engine| engine.commit(player, game, req.bet_amount, commitment))?;

    tracing::info!(%player, %game, "move committed");
    Ok(Json(json!({ "phase": phase })))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(game_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let player = caller(&headers)?;
    let game = GameId::new(game_id);
    let refunded = state.with_engine(|engine| engine.cancel(player, game))?;

    tracing::info!(%player, %game, refunded, "game cancelled");
    Ok(Json(json!({ "refunded": refunded })))
}

pub async fn reveal(
    State(state): State<AppState>,
    Path(game_id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<RevealRequest>,
) -> Result<Json<Value>, ApiError> {
    let player = caller(&headers)?;
    let salt = parse_salt(&req.salt)?;
    let game = GameId::new(game_id);
    let status = state.with_engine(|engine| engine.reveal(player, game, req.mv, &salt))?;

    // Settlements are logged as the audit trail; the record itself is
    // discarded and the identifier freed.
    match status {
        RevealStatus::Settled(outcome) => {
            tracing::info!(%player, %game, %outcome, "game settled")
        }
        RevealStatus::WaitingForOpponent => {
            tracing::info!(%player, %game, "first reveal recorded")
        }
    }
    Ok(Json(json!({ "status": status })))
}

pub async fn claim_timeout(
    State(state): State<AppState>,
    Path(game_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let player = caller(&headers)?;
    let game = GameId::new(game_id);
    let pot = state.with_engine(|engine| engine.claim_timeout(player, game))?;

    tracing::info!(%player, %game, pot, "timeout claimed, pot awarded");
    Ok(Json(json!({ "pot": pot })))
}

pub async fn game_state(
    State(state): State<AppState>,
    Path(game_id): Path<u64>,
) -> Json<Value> {
    let phase = state.with_engine(|engine| engine.game_state(GameId::new(game_id)));
    Json(json!({ "phase": phase }))
}

// ============ Utilities ============

/// Pure commitment self-check for client tooling
pub async fn verify_commitment(Json(req): Json<VerifyRequest>) -> Result<Json<Value>, ApiError> {
    let commitment = parse_commitment(&req.commitment)?;
    let salt = parse_salt(&req.salt)?;
    let valid = commitment.verify(req.mv, &salt);

    Ok(Json(json!({ "valid": valid })))
}

/// Advance the logical clock (the clock is external to the engine;
/// in a deployment this is driven by the substrate, not exposed)
pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> Json<Value> {
    let now = state.advance_clock(req.ticks);
    Json(json!({ "now": now }))
}

/// Build the API router
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/deposit", post(deposit))
        .route("/api/withdraw", post(withdraw))
        .route("/api/account/:player_id", get(account))
        .route("/api/game/:game_id", get(game_state))
        .route("/api/game/:game_id/commit", post(commit))
        .route("/api/game/:game_id/cancel", post(cancel))
        .route("/api/game/:game_id/reveal", post(reveal))
        .route("/api/game/:game_id/claim-timeout", post(claim_timeout))
        .route("/api/verify", post(verify_commitment))
        .route("/api/clock/tick", post(tick))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        api_router(AppState::new(5))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        player: Option<&PlayerId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(player) = player {
            builder = builder.header("X-Player-Id", player.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn commitment_for(mv: Move) -> (String, String) {
        let salt = Salt::random();
        let commitment = Commitment::new(mv, &salt);
        (commitment.to_hex(), salt.to_hex())
    }

    #[tokio::test]
    async fn test_deposit_and_account_query() {
        let app = test_app();
        let alice = PlayerId::new();

        let (status, body) = send(
            &app,
            "POST",
            "/api/deposit",
            Some(&alice),
            Some(json!({ "amount": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 100);

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/account/{}", alice),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], 100);
        assert_eq!(body["locked"], 0);
    }

    #[tokio::test]
    async fn test_missing_identity_rejected() {
        let app = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/deposit",
            None,
            Some(json!({ "amount": 10 })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("X-Player-Id"));
    }

    #[tokio::test]
    async fn test_full_game_flow_over_http() {
        let app = test_app();
        let alice = PlayerId::new();
        let bob = PlayerId::new();

        for player in [&alice, &bob] {
            send(
                &app,
                "POST",
                "/api/deposit",
                Some(player),
                Some(json!({ "amount": 50 })),
            )
            .await;
        }

        let (commit_a, salt_a) = commitment_for(Move::Rock);
        let (commit_b, salt_b) = commitment_for(Move::Scissors);

        let (status, body) = send(
            &app,
            "POST",
            "/api/game/1/commit",
            Some(&alice),
            Some(json!({ "bet_amount": 10, "commitment": commit_a })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "first_committed");

        let (status, body) = send(
            &app,
            "POST",
            "/api/game/1/commit",
            Some(&bob),
            Some(json!({ "bet_amount": 999, "commitment": commit_b })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "both_committed");

        let (status, _) = send(
            &app,
            "POST",
            "/api/game/1/reveal",
            Some(&alice),
            Some(json!({ "move": "Rock", "salt": salt_a })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            "/api/game/1/reveal",
            Some(&bob),
            Some(json!({ "move": "Scissors", "salt": salt_b })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"]["settled"], "Player1Wins");

        // Alice nets +10, Bob nets -10, nothing stays locked
        let (_, alice_account) = send(
            &app,
            "GET",
            &format!("/api/account/{}", alice),
            None,
            None,
        )
        .await;
        assert_eq!(alice_account["available"], 60);
        assert_eq!(alice_account["locked"], 0);

        let (_, bob_account) =
            send(&app, "GET", &format!("/api/account/{}", bob), None, None).await;
        assert_eq!(bob_account["available"], 40);

        let (_, game) = send(&app, "GET", "/api/game/1", None, None).await;
        assert_eq!(game["phase"], "no_game");
    }

    #[tokio::test]
    async fn test_timeout_flow_over_http() {
        let app = test_app();
        let alice = PlayerId::new();
        let bob = PlayerId::new();

        for player in [&alice, &bob] {
            send(
                &app,
                "POST",
                "/api/deposit",
                Some(player),
                Some(json!({ "amount": 50 })),
            )
            .await;
        }

        let (commit_a, salt_a) = commitment_for(Move::Paper);
        let (commit_b, _) = commitment_for(Move::Rock);
        send(
            &app,
            "POST",
            "/api/game/9/commit",
            Some(&alice),
            Some(json!({ "bet_amount": 20, "commitment": commit_a })),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/game/9/commit",
            Some(&bob),
            Some(json!({ "bet_amount": 20, "commitment": commit_b })),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/game/9/reveal",
            Some(&alice),
            Some(json!({ "move": "Paper", "salt": salt_a })),
        )
        .await;

        // Too early
        let (status, _) = send(&app, "POST", "/api/game/9/claim-timeout", Some(&alice), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(
            &app,
            "POST",
            "/api/clock/tick",
            None,
            Some(json!({ "ticks": 6 })),
        )
        .await;

        let (_, game) = send(&app, "GET", "/api/game/9", None, None).await;
        assert_eq!(game["phase"], "timed_out");

        // Bob cannot claim what Alice earned
        let (status, _) = send(&app, "POST", "/api/game/9/claim-timeout", Some(&bob), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) =
            send(&app, "POST", "/api/game/9/claim-timeout", Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pot"], 40);
    }

    #[tokio::test]
    async fn test_verify_commitment_endpoint() {
        let app = test_app();
        let (commitment, salt) = commitment_for(Move::Scissors);

        let (status, body) = send(
            &app,
            "POST",
            "/api/verify",
            None,
            Some(json!({ "commitment": commitment, "move": "Scissors", "salt": salt })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);

        let (_, body) = send(
            &app,
            "POST",
            "/api/verify",
            None,
            Some(json!({ "commitment": commitment, "move": "Rock", "salt": salt })),
        )
        .await;
        assert_eq!(body["valid"], false);
    }
}
