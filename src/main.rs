use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    response::Json,
    routing::get,
    Router,
};
use dotenv::dotenv;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pharma_inventory::{
    cache::{CacheManager, RedisConfig},
    config::Config,
    repository::{DatabaseManager, MedicineRepository, UserRepository},
    routes, AppState,
};

async fn health_checker_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "success",
        "message": "Pharmacy inventory server is running! 🚀",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::init();

    let db = DatabaseManager::new(&config.mongodb_uri, &config.mongodb_database)
        .await
        .expect("Failed to connect to MongoDB");

    // The cache comes up even when Redis is down; requests just fall
    // through to MongoDB until it recovers.
    let cache = Arc::new(
        CacheManager::new(&RedisConfig {
            url: config.redis_url.clone(),
            ..Default::default()
        })
        .await
        .expect("Invalid Redis configuration"),
    );

    let medicines = Arc::new(
        MedicineRepository::new(db.get_database(), cache.clone())
            .await
            .expect("Failed to initialize medicine repository"),
    );
    let users = Arc::new(
        UserRepository::new(db.get_database())
            .await
            .expect("Failed to initialize user repository"),
    );

    let cors = CorsLayer::new()
        .allow_origin(config.client_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    let app_state = AppState {
        env: Arc::new(config.clone()),
        cache,
        medicines,
        users,
    };

    let app = Router::new()
        .route("/api/healthchecker", get(health_checker_handler))
        .nest("/api/auth", routes::auth_router())
        .nest("/api/medicines", routes::medicine_router(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    println!("🚀 Server started successfully on port {}", config.port);
    println!("📊 Health check: http://localhost:{}/api/healthchecker", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
