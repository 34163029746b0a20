use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loom_api::{
    config::Config,
    middleware::logging,
    routes::{health, messages, threads},
    state::AppState,
};
use loom_chat::ChatService;
use loom_llm::ClientFactory;
use loom_persist::{ChatStore, MongoChatStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("starting loom API server");

    tracing::info!(provider = %config.llm.provider, "initializing completion client");
    let client = ClientFactory::create(config.provider_config())
        .map_err(|e| anyhow::anyhow!("failed to create completion client: {}", e))?;

    tracing::info!(database = %config.mongodb.database, "connecting to MongoDB");
    let store: Arc<dyn ChatStore> = Arc::new(
        MongoChatStore::connect(&config.mongodb_uri, &config.mongodb.database).await?,
    );

    let chat = ChatService::new(Arc::clone(&store), client, config.chat_config());
    let state = Arc::new(AppState::new(config.clone(), store, chat));

    let app = build_router(state.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/threads",
            post(threads::create_thread).get(threads::list_threads),
        )
        .route("/threads/:thread_id", put(threads::rename_thread))
        .route(
            "/threads/:thread_id/messages",
            post(messages::post_message).get(messages::list_messages),
        );

    Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(120)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
