//! # API module
//!
//! All REST routes and handlers.
//!
//! ## Main modules
//!
//! - [`auth`] - Admin login, session verification, logout
//! - [`reservation`] - Booking, listing, calendar views, status changes
//! - [`menu`] - Public menu listing and admin category/item management
//! - [`errors`] - Application error handling

pub mod auth;
pub mod errors;
pub mod menu;
pub mod reservation;
mod middleware;

// Re-export common types
pub use errors::{AppError, AppResult, ErrorResponse};

use actix_web::web;

/// Registers every API route.
///
/// # Routes
///
/// - `/auth/*` - see [`auth::routes`]
/// - `/reservations/*` - see [`reservation::routes`]
/// - `/menu/*` - see [`menu::routes`]
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    auth::routes(cfg);
    reservation::routes(cfg);
    menu::routes(cfg);
}
