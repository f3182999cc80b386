//! HTTP server: shared state, routing and lifecycle

use crate::config::{ServerConfig, ServerSettings};
use crate::error::{RecError, RecResult};
use crate::handlers;
use crate::middleware::{request_correlation_id, response_logging};
use crate::recommender::Recommender;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

/// State shared by all handlers, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub config: Arc<ServerConfig>,
    pub startup_time: Instant,
}

impl AppState {
    pub fn new(recommender: Recommender, config: ServerConfig) -> Self {
        Self {
            recommender: Arc::new(recommender),
            config: Arc::new(config),
            startup_time: Instant::now(),
        }
    }

    /// Build the recommender described by `config.model`
    pub fn from_config(config: ServerConfig) -> RecResult<Self> {
        let recommender = Recommender::from_config(&config.model)?;
        Ok(Self::new(recommender, config))
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let settings: &ServerSettings = &state.config.server;
    let timeout = settings.request_timeout();
    let cors = settings.cors;

    let mut router = Router::new()
        .route("/", get(handlers::home_handler))
        .route("/recommend", post(handlers::recommend_handler))
        .route("/api/recommend", post(handlers::recommend_handler))
        .route("/health", get(handlers::health_handler))
        .route("/health/live", get(handlers::liveness_handler))
        .with_state(state);

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    // Outermost first: correlation id, tracing, response log, timeout
    let service = ServiceBuilder::new()
        .layer(axum::middleware::from_fn(request_correlation_id))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(response_logging))
        .layer(TimeoutLayer::new(timeout));

    router.layer(service)
}

/// Bound server runtime
pub struct Runtime {
    listener: TcpListener,
    router: Router,
}

impl Runtime {
    /// Bind the configured address and build the router
    pub async fn bind(state: AppState) -> RecResult<Self> {
        let addr = state.config.server.resolve_addr().await?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            RecError::configuration(format!("Failed to bind to address {addr}: {e}"))
        })?;
        Ok(Self {
            listener,
            router: create_router(state),
        })
    }

    pub fn local_addr(&self) -> RecResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> RecResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Recommendation service listening on {}", self.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RecError::internal(format!("Server error: {e}")))?;
        info!("Recommendation service stopped");
        Ok(())
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn serve(self) -> RecResult<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
