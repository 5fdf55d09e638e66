mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;

use std::net::SocketAddr;
use axum::{Router, routing::get, response::Html};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::energy_routes::{cors_layer, energy_routes};
use crate::services::wind_predictor::load_predictor;
use crate::shared_state::AppState;

fn build_app(config: &Config, state: AppState) -> Router {
    Router::new()
        .nest("/api", energy_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(cors_layer(&config.server.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wind_energy_estimator=info,tower_http=info")),
        )
        .init();

    // 1. Load configuration
    let config_path = Config::path_from_env();
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to load {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };
    info!(
        variant = ?config.predictor.variant,
        rated_band = config.power_curve.rated_band.as_str(),
        max_days = config.max_days,
        max_candidates = config.max_candidates,
        "configuration loaded"
    );

    // 2. Load the model once; no partial service without it
    let predictor = match load_predictor(&config.predictor) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("failed to load wind speed model: {}", e);
            std::process::exit(1);
        }
    };

    // 3. Start HTTP server
    let state = AppState::new(predictor, &config);
    let app = build_app(&config, state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
