//! Admin authentication: login/logout, session verification and the
//! session guard used by every admin handler.
//!
//! A successful login stores an opaque UUID token server-side and hands
//! it to the browser as an HTTP-only cookie. Session lifetime is fixed
//! at creation (24 hours by default), there is no refresh.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::Cookie;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use std::env;

use super::middleware::ErrorLogExt;
use super::{AppError, AppResult};
use crate::db::Store;

pub const SESSION_COOKIE: &str = "session_id";

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

fn session_ttl_seconds() -> i64 {
    env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
        * 3600
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Gate for admin operations: the request must carry a session cookie
/// naming a live server-side session.
///
/// # Errors
/// - `Unauthorized`: cookie absent, token unknown, or session expired
pub async fn require_session(store: &Store, req: &HttpRequest) -> AppResult<()> {
    let cookie = req
        .cookie(SESSION_COOKIE)
        .ok_or_else(|| AppError::Unauthorized("missing session cookie".to_string()))?;

    if store.verify_session(cookie.value()).await? {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "invalid or expired session".to_string(),
        ))
    }
}

/// Exchanges admin credentials for a session cookie.
///
/// Credentials come from `ADMIN_USERNAME` / `ADMIN_PASSWORD`
/// (defaults `admin` / `admin123`, override them in production).
///
/// # Response
/// ```json
/// { "success": true }
/// ```
/// plus an HTTP-only `session_id` cookie.
///
/// # Errors
/// - `400 Bad Request`: empty username or password
/// - `401 Unauthorized`: credentials do not match
#[post("/auth/login")]
async fn login(store: web::Data<Store>, data: web::Json<LoginRequest>) -> AppResult<impl Responder> {
    if data.username.is_empty() || data.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    if data.username != admin_username || data.password != admin_password {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let ttl = session_ttl_seconds();
    let session = store
        .create_session(ttl)
        .await
        .log_error_context("creating admin session")?;

    tracing::info!(session_id = %session.id, "admin login");

    let cookie = Cookie::build(SESSION_COOKIE, session.id.clone())
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(ttl))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({ "success": true })))
}

/// 200 when the cookie names a live session, 401 otherwise. Used by the
/// front-end route guard.
#[get("/auth/verify")]
async fn verify(store: web::Data<Store>, req: HttpRequest) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Invalidates the server-side session and expires the cookie.
/// Idempotent: logging out twice is fine.
#[post("/auth/logout")]
async fn logout(store: web::Data<Store>, req: HttpRequest) -> AppResult<impl Responder> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        store.delete_session(cookie.value()).await?;
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();

    Ok(HttpResponse::Ok().cookie(removal).json(json!({ "success": true })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(verify);
    cfg.service(logout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_store;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn login_with_default_credentials_sets_cookie() {
        let store = test_store().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "admin", "password": "admin123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE);
        assert!(cookie.is_some());
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let store = test_store().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "admin", "password": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn verify_accepts_live_session_and_rejects_the_rest() {
        let store = test_store().await;
        let session = store.create_session(3600).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .service(verify),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/auth/verify")
            .cookie(Cookie::new(SESSION_COOKIE, session.id.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get().uri("/auth/verify").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/auth/verify")
            .cookie(Cookie::new(SESSION_COOKIE, "stale-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
