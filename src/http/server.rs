//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Stop accepting on the shutdown broadcast

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::FrontendConfig;
use crate::http::profile::get_profile;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::withdraw::{get_withdraw, refresh_balances, set_session_profile, start_withdraw};
use crate::profile::ProfileClient;
use crate::withdraw::WithdrawPage;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileClient,
    pub withdraw: Arc<WithdrawPage>,
}

/// HTTP server for the verified profile front end.
pub struct HttpServer {
    router: Router,
    config: FrontendConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: FrontendConfig, profiles: ProfileClient, withdraw: Arc<WithdrawPage>) -> Self {
        let state = AppState { profiles, withdraw };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FrontendConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/profiles/{id}", get(get_profile))
            .route("/api/withdraw", get(get_withdraw))
            .route("/api/withdraw/refresh", post(refresh_balances))
            .route("/api/withdraw/{symbol}", post(start_withdraw))
            .route("/api/session/profile", put(set_session_profile))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let rpc_healthy = state.withdraw.gateway().is_healthy().await;
    Json(json!({ "status": "ok", "rpc_healthy": rpc_healthy }))
}
