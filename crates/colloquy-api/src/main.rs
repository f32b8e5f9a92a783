use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use colloquy_api::{
    config::Config,
    middleware::logging,
    routes::{chat, conversations, health},
    state::AppState,
};
use colloquy_core::ChatService;
use colloquy_llm::OpenAIClient;
use colloquy_persist::{ConversationStore, MongoConversationStore, MongoTurnStore, TurnStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Colloquy API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize LLM client
    tracing::info!("Initializing completion client");
    let provider: Arc<dyn colloquy_llm::ChatClient> =
        Arc::new(OpenAIClient::new(config.openai_api_key.clone())?);

    // Initialize persistence (MongoDB)
    tracing::info!("Connecting to MongoDB");
    let mongo_client = colloquy_persist::connect(&config.mongodb_uri).await?;
    let conversations: Arc<dyn ConversationStore> = Arc::new(MongoConversationStore::new(
        &mongo_client,
        &config.mongodb.database,
    ));
    let turns: Arc<dyn TurnStore> =
        Arc::new(MongoTurnStore::new(&mongo_client, &config.mongodb.database));

    tracing::info!("MongoDB connected");

    // Assemble the conversation engine
    let chat_service = Arc::new(ChatService::new(
        Arc::clone(&conversations),
        turns,
        provider,
        config.chat.clone().into(),
    ));

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), chat_service, conversations));

    // Build router
    let app = build_router(state.clone());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chat
        .route("/v1/chat", post(chat::send_message))
        // Conversations
        .route("/v1/conversations", get(conversations::list_conversations))
        .route(
            "/v1/conversations/:conversation_id/messages",
            get(conversations::list_messages),
        )
        .route(
            "/v1/conversations/:conversation_id",
            delete(conversations::delete_conversation),
        );

    Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300)))
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
                axum::http::Method::DELETE,
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
