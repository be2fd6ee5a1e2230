mod database;
mod error;
mod handlers;
mod middleware;
mod models;
mod seed;
mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use std::env;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use dotenvy::dotenv;

use database::{Database, create_database_pool};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    // Initialize database
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    let db = create_database_pool(&database_url).await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    println!("Database connection successful!");

    if env::var("SEED_DEMO_DATA").map(|v| v == "true" || v == "1").unwrap_or(false) {
        seed::run(&db).await.expect("Failed to seed demo data");
    }

    // Build the application router
    let app = create_router(db);

    // Get port from environment or use default
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("🚀 BoK Pharm server starting on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(db: Database) -> Router {
    Router::new()
        // Auth routes
        .route("/api/auth/user", get(handlers::auth::current_user))
        .route("/api/auth/setup-pharmacy", post(handlers::auth::setup_pharmacy))
        .route("/api/auth/assign-pharmacy", post(handlers::auth::assign_pharmacy))

        // Medication catalog routes
        .route("/api/medications", get(handlers::medications::medications_list))
        .route("/api/medications", post(handlers::medications::create_medication))

        // Inventory routes
        .route("/api/inventory", get(handlers::inventory::inventory_list))
        .route("/api/inventory", post(handlers::inventory::create_inventory_item))
        .route("/api/inventory/:id", patch(handlers::inventory::update_inventory_item))
        .route("/api/inventory/:id", delete(handlers::inventory::delete_inventory_item))

        // Pharmacy routes
        .route("/api/pharmacies", get(handlers::pharmacies::pharmacies_list))
        .route("/api/pharmacies", post(handlers::pharmacies::create_pharmacy))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
        )
        .with_state(db)
}
