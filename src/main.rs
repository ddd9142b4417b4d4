mod config;
mod deposits;
mod uploads;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{
    config::ConsoleConfig,
    deposits::handlers::{
        close_details, get_review_state, open_details, refresh, set_filter, set_page,
        stage_action, submit, ReviewContext,
    },
    deposits::review::ReviewEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenv().ok();

    let config = ConsoleConfig::new();
    let listen_port = config.listen_port();

    let cors = CorsLayer::new().allow_origin(Any);

    // Shared review session state
    let context = Arc::new(ReviewContext::new(&config));

    // Populate the listing without blocking bind
    tokio::spawn({
        let context = Arc::clone(&context);
        async move {
            context
                .controller
                .dispatch(ReviewEvent::RefreshRequested)
                .await;
        }
    });

    let app = Router::new()
        .route(
            "/api/review",
            get({
                let context = Arc::clone(&context);
                move || get_review_state(Arc::clone(&context))
            }),
        )
        .route(
            "/api/review/filter",
            post({
                let context = Arc::clone(&context);
                move |body| set_filter(Arc::clone(&context), body)
            }),
        )
        .route(
            "/api/review/page",
            post({
                let context = Arc::clone(&context);
                move |body| set_page(Arc::clone(&context), body)
            }),
        )
        .route(
            "/api/review/refresh",
            post({
                let context = Arc::clone(&context);
                move || refresh(Arc::clone(&context))
            }),
        )
        .route(
            "/api/review/open/:id",
            post({
                let context = Arc::clone(&context);
                move |path| open_details(Arc::clone(&context), path)
            }),
        )
        .route(
            "/api/review/close",
            post({
                let context = Arc::clone(&context);
                move || close_details(Arc::clone(&context))
            }),
        )
        .route(
            "/api/review/action",
            post({
                let context = Arc::clone(&context);
                move |body| stage_action(Arc::clone(&context), body)
            }),
        )
        .route(
            "/api/review/submit",
            post({
                let context = Arc::clone(&context);
                move || submit(Arc::clone(&context))
            }),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port));
    info!(%addr, "Server running at http://");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
