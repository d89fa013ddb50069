//! HTTP surface: liveness on `GET /`, Telegram webhook on `POST /`.

use crate::core::clock::TimeSource;
use crate::core::handler::EventHandler;
use crate::errors::AppResult;
use crate::sheets::SheetBackend;
use crate::telegram::{ChatApi, Update};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const LIVENESS_TEXT: &str = "Bot is running!";

/// The handler is the single owner of the session; the mutex serializes updates.
pub type SharedHandler<S, C, T> = Arc<Mutex<EventHandler<S, C, T>>>;

pub fn router<S, C, T>(handler: SharedHandler<S, C, T>) -> Router
where
    S: SheetBackend + 'static,
    C: ChatApi + 'static,
    T: TimeSource + 'static,
{
    Router::new()
        .route("/", get(keepalive).post(webhook::<S, C, T>))
        .with_state(handler)
}

async fn keepalive() -> impl IntoResponse {
    (StatusCode::OK, LIVENESS_TEXT)
}

async fn webhook<S, C, T>(
    State(handler): State<SharedHandler<S, C, T>>,
    body: Bytes,
) -> impl IntoResponse
where
    S: SheetBackend + 'static,
    C: ChatApi + 'static,
    T: TimeSource + 'static,
{
    let update: Update = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(err) => {
            tracing::warn!(error = %err, "webhook body is not a telegram update");
            return (StatusCode::BAD_REQUEST, "bad update");
        }
    };

    let update_id = update.update_id;
    let mut guard = handler.lock().await;
    if let Err(err) = guard.handle_update(&update).await {
        tracing::error!(update_id, error = %err, "update handling failed");
    }

    (StatusCode::OK, "ok")
}

/// Serve until the process is stopped.
pub async fn serve(listener: TcpListener, app: Router) -> AppResult<()> {
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind `addr:port`; port 0 picks a free one.
pub async fn bind(addr: &str, port: u16) -> AppResult<TcpListener> {
    Ok(TcpListener::bind((addr, port)).await?)
}
