use crate::{
    config::AppConfig,
    error::{ErrorBody, Result, ServiceError},
    gateway,
    invoker::{ProcedureRunner, SqlCmdRunner},
    models::ProcResponse,
    request::ProcParams,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use std::{any::Any, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

pub struct Server {
    config: Arc<AppConfig>,
    state: AppState,
}

impl Server {
    pub fn new(config: AppConfig) -> Self {
        let runner = SqlCmdRunner::from_config(&config);
        Self::with_runner(config, Arc::new(runner))
    }

    pub fn with_runner(config: AppConfig, runner: Arc<dyn ProcedureRunner>) -> Self {
        let config = Arc::new(config);
        let state = AppState::new(Arc::clone(&config), runner);

        Self { config, state }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api", Self::api_routes())
            .route("/api/", Self::api_routes())
            .fallback(Self::not_found)
            .with_state(self.state.clone())
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
    }

    // Without an explicit HEAD route axum serves HEAD with the GET handler.
    fn api_routes() -> MethodRouter<AppState> {
        get(Self::api_get)
            .post(Self::api_post)
            .head(Self::reject_head)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.listen_addr;
        let listener = TcpListener::bind(addr).await?;
        info!(
            %addr,
            database = %self.config.database,
            sql_server = %self.config.sql_server,
            procedures = self.config.allowlist.len(),
            "SQL HTTP bridge listening"
        );
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    async fn api_get(
        State(state): State<AppState>,
        RawQuery(query): RawQuery,
    ) -> Result<Json<ProcResponse>> {
        let params = ProcParams::from_urlencoded(query.unwrap_or_default().as_bytes())?;
        Ok(Json(gateway::execute(&state, params).await?))
    }

    async fn api_post(State(state): State<AppState>, body: Bytes) -> Result<Json<ProcResponse>> {
        let params = ProcParams::from_urlencoded(&body)?;
        Ok(Json(gateway::execute(&state, params).await?))
    }

    async fn reject_head() -> StatusCode {
        StatusCode::METHOD_NOT_ALLOWED
    }

    async fn not_found() -> ServiceError {
        ServiceError::NotFound
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "request handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
}
