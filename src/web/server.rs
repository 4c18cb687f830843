//! Axum HTTP server for the consultation form

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue},
    response::Html,
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::gateway::{TaskGateway, TranscriptInput};
use crate::web::page::{render_page, PageView, CONTENT_SECURITY_POLICY};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<TaskGateway>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub action: String,
}

/// Build the application router.
pub fn router(gateway: Arc<TaskGateway>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(AppState { gateway })
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(
    gateway: Arc<TaskGateway>,
    addr: SocketAddr,
    max_body_bytes: usize,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(gateway, max_body_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn index_handler() -> Html<String> {
    Html(render_page(&PageView::default()))
}

async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Html<String> {
    let span = info_span!("submission", request_id = %Uuid::new_v4(), action = %form.action);

    async move {
        let input = TranscriptInput::new(form.transcript);
        let submission = state.gateway.handle_submission(&form.action, &input).await;

        Html(render_page(&PageView::with_result(
            &input.text,
            submission.action,
            &submission.output.html,
        )))
    }
    .instrument(span)
    .await
}
