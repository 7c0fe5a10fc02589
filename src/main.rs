use std::env;
use std::sync::Arc;

use kudos_api::db::Database;
use kudos_api::{handlers, seed};
use log::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    // Initialize database
    let database = match Database::new().await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    // Demo data is an explicit opt-in at startup, never a side effect of a
    // read endpoint.
    let seed_requested = env::var("SEED_DEMO_DATA")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if seed_requested {
        if let Err(e) = seed::seed_demo_data(&database).await {
            error!("Failed to seed demo data: {}", e);
            return;
        }
    }

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let app = handlers::router(database);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };

    info!("kudos-api listening on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
