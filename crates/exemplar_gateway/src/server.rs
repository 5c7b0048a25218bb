use crate::types::{DatasetResponse, ErrorBody, EvaluateRequest, FrequencyEntry, ViewReply};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use exemplar_core::{
    Dashboard, DashboardFrame, Dataset, ExemplarConfig, ModelDefaults, ModelError,
    FREQUENCY_DELTA_TABLE,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

/// Shared state for the gateway server.
#[derive(Clone)]
struct AppState {
    /// Immutable dataset bound to plot settings.
    dashboard: Dashboard,
    /// Fallbacks for α, δ, τ and frequency.
    defaults: Arc<ModelDefaults>,
    /// Number of open WebSocket views.
    active_views: Arc<AtomicUsize>,
}

/// The gateway HTTP + WebSocket server.
///
/// Serves dashboard frames to a rendering front end:
/// - `POST /evaluate` — one frame per request
/// - `GET /ws` — one view per connection, requests answered in order
/// - `GET /dataset` — exemplars and per-category summary
/// - `GET /frequency-table` — δ for each type frequency
/// - `GET /health` — health check
pub struct GatewayServer {
    state: AppState,
    host: String,
    port: u16,
}

impl GatewayServer {
    pub fn new(dataset: Dataset, config: &ExemplarConfig) -> Self {
        let state = AppState {
            dashboard: Dashboard::new(dataset, config.plot.clone()),
            defaults: Arc::new(config.model.clone()),
            active_views: Arc::new(AtomicUsize::new(0)),
        };
        Self {
            state,
            host: config.gateway.host.clone(),
            port: config.gateway.port,
        }
    }

    /// Number of open WebSocket views.
    pub fn active_views(&self) -> Arc<AtomicUsize> {
        self.state.active_views.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/dataset", get(dataset))
            .route("/frequency-table", get(frequency_table))
            .route("/evaluate", post(evaluate))
            .route("/ws", get(ws_upgrade))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind the listener, then serve from a background task.
    ///
    /// Bind failures are returned to the caller; only errors after the
    /// listener is up are logged from the task.
    pub async fn start(self) -> std::io::Result<tokio::task::JoinHandle<()>> {
        let app = self.router();
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Gateway listening on {}", listener.local_addr()?);

        Ok(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Gateway server error: {}", e);
            }
        }))
    }
}

/// A model error rendered as `422 {error, kind}`.
#[derive(Debug)]
pub struct ApiError(pub ModelError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ModelError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

// ============================================================================
// Route handlers
// ============================================================================

async fn health() -> &'static str {
    "ok"
}

async fn dataset(State(state): State<AppState>) -> Json<DatasetResponse> {
    let ds = state.dashboard.dataset();
    Json(DatasetResponse {
        observations: ds.observations().to_vec(),
        summary: ds.summary(),
    })
}

async fn frequency_table() -> Json<Vec<FrequencyEntry>> {
    let entries = FREQUENCY_DELTA_TABLE
        .iter()
        .zip(1u32..)
        .map(|(&delta, frequency)| FrequencyEntry { frequency, delta })
        .collect();
    Json(entries)
}

/// POST /evaluate — recompute all four views for one parameter state.
async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<DashboardFrame>, ApiError> {
    let params = req.into_params(&state.defaults);
    match state.dashboard.render(&params) {
        Ok(frame) => Ok(Json(frame)),
        Err(e) => {
            tracing::warn!("Rejected evaluation ({}): {}", e.kind(), e);
            Err(ApiError(e))
        }
    }
}

/// GET /ws — WebSocket upgrade.
async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Compute the reply for one inbound view message.
fn view_reply(state: &AppState, seq: u64, text: &str) -> ViewReply {
    let req: EvaluateRequest = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            return ViewReply::Error {
                seq,
                body: ErrorBody {
                    error: format!("Invalid JSON: {}", e),
                    kind: "invalid_request".to_string(),
                },
            }
        }
    };
    let params = req.into_params(&state.defaults);
    match state.dashboard.render(&params) {
        Ok(frame) => ViewReply::Frame {
            seq,
            frame: Box::new(frame),
        },
        Err(e) => ViewReply::Error {
            seq,
            body: ErrorBody::from(&e),
        },
    }
}

/// Handle one WebSocket view.
///
/// Messages are processed strictly one after another, so a view always sees
/// frames in the order it sent parameter changes.
async fn handle_ws(socket: WebSocket, state: AppState) {
    let view_id = Uuid::new_v4();
    let open = state.active_views.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::info!(%view_id, open, "View connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut seq: u64 = 0;

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => {
                seq += 1;
                let reply = view_reply(&state, seq, &text);
                let json = match serde_json::to_string(&reply) {
                    Ok(j) => j,
                    Err(e) => {
                        tracing::error!(%view_id, "Failed to encode reply: {}", e);
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.active_views.fetch_sub(1, Ordering::Relaxed);
    tracing::info!(%view_id, requests = seq, "View disconnected");
}
