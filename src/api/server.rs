use std::sync::Arc;
use std::{net::SocketAddr, time::Duration};
use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::get,
    Extension,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::api::action::hello::hello;
use crate::api::action::replicas::list as replicas_list;
use crate::fleet::replica::Replica;
use crate::runtime::error::RuntimeError;

pub(crate) type Replicas = Arc<Vec<Replica>>;

pub(crate) fn router(replicas: Replicas) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/replicas", get(replicas_list))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(|error: BoxError| async move {
                    if error.is::<tower::timeout::error::Elapsed>() {
                        Ok(StatusCode::REQUEST_TIMEOUT)
                    } else {
                        Err((
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Unhandled internal error: {}", error),
                        ))
                    }
                }))
                .timeout(Duration::from_secs(10))
                .layer(Extension(replicas))
                .into_inner(),
        )
}

pub(crate) async fn bind(port: u16) -> Result<TcpListener, RuntimeError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    TcpListener::bind(addr)
        .await
        .map_err(|e| RuntimeError::Other(format!("Unable to bind status server on {}: {}", addr, e)))
}

/// Serve the status endpoint until `shutdown` fires.
pub(crate) async fn serve(listener: TcpListener, replicas: Replicas, shutdown: oneshot::Receiver<()>) -> Result<(), RuntimeError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Starting status server on {}", addr);
    }

    axum::serve(listener, router(replicas))
        .with_graceful_shutdown(async {
            shutdown.await.ok();
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Status server error: {}", e)))
}
