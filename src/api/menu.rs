//! Menu API: public grouped listing plus admin CRUD for categories and
//! items. Mutations require a valid session cookie; the wire format is
//! camelCase (`imageUrl`, `isActive`, `categoryId`) as the front-end
//! expects.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use super::auth::require_session;
use super::middleware::ErrorLogExt;
use super::{AppError, AppResult};
use crate::db::models::{MenuItemPatch, NewMenuItem};
use crate::db::Store;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCategory {
    name: String,
    #[serde(default)]
    order_index: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMenuItem {
    category_id: i64,
    name: String,
    description: String,
    /// Externally hosted image (the admin UI uploads to an image CDN and
    /// sends the resulting URL).
    image_url: String,
    #[serde(default)]
    order_index: i64,
}

/// Full menu grouped by category, empty categories included. Public.
#[get("/menu")]
async fn get_menu(store: web::Data<Store>) -> AppResult<impl Responder> {
    let menu = store.list_menu().await?;
    Ok(HttpResponse::Ok().json(menu))
}

/// Flat category list in display order. Public.
#[get("/menu/categories")]
async fn get_categories(store: web::Data<Store>) -> AppResult<impl Responder> {
    let categories = store.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Creates a category. Admin only.
#[post("/menu/categories")]
async fn create_category(
    store: web::Data<Store>,
    data: web::Json<CreateCategory>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    if data.name.trim().is_empty() {
        return Err(AppError::Validation("category name is required".to_string()));
    }

    let id = store
        .create_category(data.name.trim(), data.order_index)
        .await
        .log_error_context("creating menu category")?;

    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "name": data.name.trim(),
        "message": "category created"
    })))
}

/// Deletes a category. Admin only.
///
/// # Errors
/// - `404 Not Found`: unknown category
/// - `409 Conflict`: the category still has items (no cascade)
#[delete("/menu/categories/{id}")]
async fn delete_category(
    store: web::Data<Store>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    store.delete_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "category deleted" })))
}

/// Creates a menu item under an existing category, visible by default.
/// Admin only.
///
/// # Errors
/// - `400 Bad Request`: empty name/description/imageUrl
/// - `404 Not Found`: the category does not exist
#[post("/menu")]
async fn create_item(
    store: web::Data<Store>,
    data: web::Json<CreateMenuItem>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    if data.name.trim().is_empty() {
        return Err(AppError::Validation("item name is required".to_string()));
    }
    if data.description.trim().is_empty() {
        return Err(AppError::Validation("description is required".to_string()));
    }
    if data.image_url.trim().is_empty() {
        return Err(AppError::Validation("imageUrl is required".to_string()));
    }

    let new = NewMenuItem {
        category_id: data.category_id,
        name: data.name.trim().to_string(),
        description: data.description.trim().to_string(),
        image_url: data.image_url.trim().to_string(),
        order_index: data.order_index,
    };

    let id = store
        .create_item(&new)
        .await
        .log_error_context("creating menu item")?;

    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "message": "menu item created"
    })))
}

/// Coalesce-style partial update; `isActive` toggles visibility without
/// deleting. Admin only.
#[patch("/menu/{id}")]
async fn update_item(
    store: web::Data<Store>,
    path: web::Path<i64>,
    data: web::Json<MenuItemPatch>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    let patch = data.into_inner();
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("item name cannot be empty".to_string()));
        }
    }

    let updated = store.update_item(path.into_inner(), &patch).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Physically removes a menu item. Admin only.
#[delete("/menu/{id}")]
async fn delete_item(
    store: web::Data<Store>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    store.delete_item(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "menu item deleted" })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    // Category routes first so /menu/categories/... never falls through
    // to /menu/{id}.
    cfg.service(get_categories);
    cfg.service(create_category);
    cfg.service(delete_category);
    cfg.service(get_menu);
    cfg.service(create_item);
    cfg.service(update_item);
    cfg.service(delete_item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::SESSION_COOKIE;
    use crate::db::store::test_store;
    use actix_web::cookie::Cookie;
    use actix_web::{test, App};

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($store))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn public_menu_is_grouped_by_category() {
        let store = test_store().await;
        let session = store.create_session(3600).await.unwrap();
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/menu/categories")
            .cookie(Cookie::new(SESSION_COOKIE, session.id.clone()))
            .set_json(json!({ "name": "Starters" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/menu")
            .cookie(Cookie::new(SESSION_COOKIE, session.id.clone()))
            .set_json(json!({
                "categoryId": 1,
                "name": "Lentil soup",
                "description": "Red lentils, mint butter",
                "imageUrl": "https://img.example.com/soup.jpg"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        // Listing is public, no cookie needed.
        let req = test::TestRequest::get().uri("/menu").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["name"], "Starters");
        assert_eq!(body[0]["items"][0]["imageUrl"], "https://img.example.com/soup.jpg");
        assert_eq!(body[0]["items"][0]["isActive"], true);
    }

    #[actix_web::test]
    async fn mutations_require_a_session() {
        let store = test_store().await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/menu/categories")
            .set_json(json!({ "name": "Starters" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete().uri("/menu/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
