mod handlers;
mod static_files;

use anyhow::Context;
use axum::{
    extract::FromRef,
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use axum_template::engine::Engine;

use iqr_calculator::{Config, StatsCache};
use minijinja::Environment;

pub(crate) type AppEngine = Engine<Environment<'static>>;

#[derive(Clone, FromRef)]
struct AppState {
    engine: AppEngine,
    config: Config,
    cache: StatsCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "iqr_server=debug,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (config, config_file) = Config::load()?;
    tracing::info!("Config {:?}:\n{}", config_file, config);

    let mut minijinja = Environment::new();
    minijinja
        .add_template("calc", include_str!("wwwroot/html/calc.html"))
        .context("Failed to load page template")?;

    let bind_addr = config.bind_addr;
    let cache = StatsCache::new(config.cache_capacity);

    let app = Router::new()
        .route("/", get(|| async { Redirect::permanent("/calc") }))
        .route("/calc", get(handlers::handle_calc))
        .route("/api/stats", post(handlers::handle_stats))
        .route("/api/random", post(handlers::handle_random))
        .route("/api/upload", post(handlers::handle_upload))
        .route("/api/export/:kind", post(handlers::handle_export))
        .route("/static/:file", get(static_files::handle_static))
        .with_state(AppState {
            engine: Engine::from(minijinja),
            config,
            cache,
        })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    tracing::info!("Listening on {}", bind_addr);
    axum_server::bind(bind_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
