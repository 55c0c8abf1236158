use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use cdr_analytics_core::CdrStore;
use cdr_analytics_insights::InsightsEngine;

/// Shared request state: the insights engine and the store it reads,
/// which the upload endpoint also writes.
pub struct AppState {
    pub engine: InsightsEngine,
    pub store: Arc<dyn CdrStore>,
}

pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    #[must_use]
    pub fn new(store: Arc<dyn CdrStore>) -> Self {
        let state = AppState {
            engine: InsightsEngine::new(store.clone()),
            store,
        };
        Self {
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/cdr/upload", post(handlers::upload))
            .route("/cdr/average-cost", get(handlers::average_cost))
            .route("/cdr/max-cost", get(handlers::max_cost))
            .route("/cdr/longest-call", get(handlers::longest_call))
            .route(
                "/cdr/average-calls-per-day",
                get(handlers::average_calls_per_day),
            )
            .route(
                "/cdr/total-cost-by-currency",
                get(handlers::total_cost_by_currency),
            )
            .route("/cdr/top-callers", get(handlers::top_callers))
            .route("/cdr/daily-summary", get(handlers::daily_summary))
            .route("/cdr/count", get(handlers::call_count))
            .route("/cdr/total-duration", get(handlers::total_duration))
            .route("/health", get(handlers::health))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or
    /// serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("CDR analytics API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
