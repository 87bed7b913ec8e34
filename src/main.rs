use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use assembler::DocumentAssembler;
use cache::{CacheStore, MokaStore};
use config::Config;
use scanner::{ApiScanner, FragmentScanner};
use ui::UiRenderer;

/// Handlers
mod api;
/// DocumentAssembler, cache policy and metadata overlay
mod assembler;
/// CacheStore trait and Moka Cache wrapper
mod cache;
/// configuration from file
mod config;
/// OpenAPI document model
mod doc;
/// error taxonomy
mod error;
/// ApiScanner trait and fragment scanner
mod scanner;
/// UI page renderer
mod ui;

#[derive(Clone)]
struct AppState {
    assembler: Arc<DocumentAssembler>,
    ui: Arc<UiRenderer>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("loading configuration file");
    let config = confy::load_path::<Config>("/etc/calliope/config.toml")?;
    let listen = config.listen_address;
    info!("preparing the document assembler and UI renderer...");
    let state = new_state(config)?;
    info!("Done.");
    let route = router().with_state(state);
    info!("starting to listen on {listen}");
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, route.into_make_service()).await?;
    Ok(())
}

fn router() -> Router<AppState> {
    Router::new()
        .merge(docs_router())
        .route("/docs", get(api::serve_ui))
}

// the cross-origin headers belong to the json endpoint only
fn docs_router() -> Router<AppState> {
    Router::new()
        .route("/openapi.json", get(api::serve_docs))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, DELETE, PUT"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, api_key, Authorization, Authorization Bearer"),
        ))
}

fn new_state(config: Config) -> Result<AppState, error::Error> {
    let store = MokaStore::new(&config.cache);
    new_state_with(Arc::new(FragmentScanner), Arc::new(store), config)
}

fn new_state_with(
    scanner: Arc<dyn ApiScanner>,
    store: Arc<dyn CacheStore>,
    config: Config,
) -> Result<AppState, error::Error> {
    let ui = UiRenderer::new(&config.ui)?;
    let assembler = DocumentAssembler::new(scanner, store, config.scan, config.cache, config.api);
    Ok(AppState {
        assembler: Arc::new(assembler),
        ui: Arc::new(ui),
    })
}

// tests
