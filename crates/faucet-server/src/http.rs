//! HTTP server and API endpoints for the faucet server.

use crate::{
    config::{FaucetConfig, TransferConfig},
    error::{FaucetError, FaucetResult},
    eth::{Dispatcher, EthDispatcher},
};
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use faucet_core::{parse_address, FaucetRequest, FaucetResponse, FAUCET_PATH};
use serde::Serialize;
use std::{any::Any, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct SharedState {
    pub dispatcher: Arc<dyn Dispatcher>,
    pub transfer: Arc<TransferConfig>,
}

impl SharedState {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, transfer: TransferConfig) -> Self {
        Self {
            dispatcher,
            transfer: Arc::new(transfer),
        }
    }
}

/// Whether the faucet can currently send funds
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub configured: bool,
    pub faucet_address: Option<String>,
    pub amount: String,
    pub symbol: String,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(FAUCET_PATH, post(request_funds))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

/// Root endpoint - provides basic information
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Faucet Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/faucet": "Send test tokens to an address (provide address)",
            "GET /health": "Health check",
        }
    }))
}

/// Health check endpoint. Reports configuration only, without calling the node.
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let faucet_address = state.dispatcher.faucet_address();
    let configured = faucet_address.is_some();

    let response = HealthResponse {
        status: if configured {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        configured,
        faucet_address: faucet_address.map(|address| address.to_string()),
        amount: state.transfer.amount.clone(),
        symbol: state.transfer.token_symbol.clone(),
    };

    debug!("Health check completed: {:?}", response);
    Json(response)
}

/// Validate the address and send it the faucet amount.
///
/// The body is parsed as JSON whatever `Content-Type` the caller sent.
async fn request_funds(
    State(state): State<SharedState>,
    body: Bytes,
) -> FaucetResult<Json<FaucetResponse>> {
    let request: FaucetRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected faucet request body: {}", e);
        FaucetError::Validation("invalid request body".to_string())
    })?;

    let recipient = parse_address(request.address.as_deref().unwrap_or_default())?;

    info!("Faucet request for {}", recipient);

    match state.dispatcher.dispatch(recipient).await {
        Ok(receipt) => {
            let tx_hash = format!("{:#x}", receipt.tx_hash);
            info!("Funded {} (tx: {})", recipient, tx_hash);

            Ok(Json(FaucetResponse::funded(
                state.transfer.success_message(),
                tx_hash,
            )))
        }
        Err(e) => {
            warn!("Failed to fund {}: {}", recipient, e);
            Err(e)
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!("Request handler panicked: {}", details);
    FaucetError::Internal(anyhow::anyhow!("handler panicked")).into_response()
}

/// Start the HTTP server
pub async fn start_server(config: &FaucetConfig) -> FaucetResult<()> {
    info!("Starting faucet server...");

    let dispatcher = EthDispatcher::new(config.ethereum.clone(), &config.transfer)?;

    match dispatcher.faucet_address() {
        Some(address) => info!("Faucet wallet: {}", address),
        None => warn!(
            "Wallet private key or RPC URL missing or invalid; every funding request will fail"
        ),
    }
    warn!("No rate limiting is in place: any caller can request funds repeatedly");

    let state = SharedState::new(Arc::new(dispatcher), config.transfer.clone());
    let app = create_router(state);

    let bind_addr = format!("{}:{}", config.http.bind_address, config.http.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| FaucetError::Internal(anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e)))?;

    info!("Faucet server listening on {}", bind_addr);
    info!("Endpoints:");
    info!("  GET  /           - Server information");
    info!("  GET  /health     - Health check");
    info!("  POST {} - Request test tokens", FAUCET_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FaucetError::Internal(anyhow::anyhow!("Server error: {}", e)))?;

    info!("Faucet server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
