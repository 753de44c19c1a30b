use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, dashboard, entries, recognition};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(entries::router())
                .merge(recognition::router())
                .merge(dashboard::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub fn bind_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", config.host, config.port).parse()?)
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(config)?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_comes_from_config() {
        let mut config = AppConfig::test_default();
        config.host = "10.1.2.3".into();
        config.port = 9999;
        let addr = bind_addr(&config).unwrap();
        assert_eq!(addr.to_string(), "10.1.2.3:9999");
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let mut config = AppConfig::test_default();
        config.host = "not a host".into();
        assert!(bind_addr(&config).is_err());
    }
}
