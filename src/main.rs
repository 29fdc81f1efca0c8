//! # Saffron Reservation Server
//!
//! Web server for a small restaurant site: public booking and menu
//! endpoints, an admin API for managing reservations, menu categories
//! and items, and best-effort Telegram alerts for new bookings. Built
//! with Actix Web and SQLite.
//!
//! ## Configuration
//!
//! Environment variables (`.env` is loaded if present):
//!
//! ```env
//! # Database
//! DATABASE_URL=sqlite:restaurant.db?mode=rwc
//!
//! # Server
//! BIND_ADDRESS=0.0.0.0:8080
//! STATIC_DIR=./static
//!
//! # Admin account
//! ADMIN_USERNAME=admin
//! ADMIN_PASSWORD=admin123
//! SESSION_TTL_HOURS=24
//!
//! # Telegram alerts (optional, disabled when unset)
//! TELEGRAM_BOT_TOKEN=...
//! TELEGRAM_CHAT_ID=...
//!
//! # Logging
//! RUST_LOG=debug,sqlx=warn
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Front-end (HTML/CSS/JS, served from STATIC_DIR)
//!     ↓ HTTP/JSON
//! REST API (Actix Web)
//!     ↓ sqlx
//! SQLite database          → Telegram Bot API (fire-and-forget)
//! ```

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::env;

mod api;
mod calendar;
mod db;
mod notify;

/// Entry point.
///
/// 1. Loads `.env` and configures tracing
/// 2. Opens the SQLite store and bootstraps the schema
/// 3. Builds the Telegram notifier from the environment
/// 4. Runs the HTTP server with request logging, the API routes, and
///    the static front-end
/// 5. Closes the store after the server stops
///
/// # Errors
///
/// Returns `std::io::Error` when the database cannot be opened, the
/// schema cannot be created, or the bind address is unavailable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("saffron_reservation=debug".parse().unwrap())
                .add_directive("sqlx=warn".parse().unwrap()),
        )
        .init();

    tracing::info!("starting Saffron Reservation Server...");

    let store = match db::Store::init().await {
        Ok(store) => {
            if let Err(e) = store.create_schema().await {
                tracing::error!("error creating schema: {}", e);
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("schema error: {}", e),
                ));
            }
            store
        }
        Err(e) => {
            tracing::error!("error opening database: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("database error: {}", e),
            ));
        }
    };

    let notifier = notify::Notifier::from_env();

    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());

    tracing::info!("server starting on {}", bind_address);

    let app_store = store.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_store.clone()))
            .app_data(web::Data::new(notifier.clone()))
            .wrap(Logger::default())
            .configure(api::init_routes)
            .service(Files::new("/static", static_dir.clone()))
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/static/index.html"))
                        .finish()
                }),
            )
    })
    .bind(&bind_address)?
    .run()
    .await?;

    // Explicit store lifecycle: drain the pool once the server is down.
    store.close().await;

    Ok(())
}
