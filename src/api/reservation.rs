//! Reservation API
//!
//! Handles the public booking endpoint and the admin operations:
//! - Create a booking (public, always starts `pending`)
//! - List all reservations, newest first
//! - Per-day calendar aggregation and day detail
//! - Partial updates (including status changes) and deletion
//!
//! Admin operations require a valid session cookie.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use super::auth::require_session;
use super::{AppError, AppResult};
use crate::calendar;
use crate::db::models::{NewReservation, ReservationPatch};
use crate::db::Store;
use crate::notify::Notifier;

/// Practical bound on party size.
const MAX_GUESTS: i64 = 20;

/// Public booking payload.
#[derive(Deserialize)]
struct BookingRequest {
    name: String,
    email: String,
    phone: String,
    /// `yyyy-MM-dd`
    date: String,
    /// `HH:MM`
    time: String,
    guests: i64,
    notes: Option<String>,
}

#[derive(Deserialize)]
struct CalendarQuery {
    /// `yyyy-MM`
    month: String,
}

#[derive(Deserialize)]
struct DayQuery {
    /// `yyyy-MM-dd`
    date: String,
}

/// Minimal sanity check; the form widget does the real validation.
fn validate_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Parses and normalizes a `yyyy-MM-dd` date.
///
/// # Errors
/// - `Validation`: malformed date
fn validate_date(date_str: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("invalid date, use yyyy-MM-dd".to_string()))
}

/// Parses and normalizes an `HH:MM` time.
///
/// # Errors
/// - `Validation`: malformed time
fn validate_time(time_str: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| AppError::Validation("invalid time, use HH:MM".to_string()))
}

fn validate_guests(guests: i64) -> AppResult<()> {
    if !(1..=MAX_GUESTS).contains(&guests) {
        return Err(AppError::Validation(format!(
            "guests must be between 1 and {MAX_GUESTS}"
        )));
    }
    Ok(())
}

/// Creates a new booking. Public, no session required.
///
/// # Validations
/// - name, email and phone must be non-empty (email checked loosely)
/// - date must be `yyyy-MM-dd`, time must be `HH:MM`
/// - guests must be within 1..=20
///
/// # Response
/// ```json
/// { "id": 12, "status": "pending", "message": "reservation created" }
/// ```
///
/// After the row is committed a Telegram alert is dispatched on a
/// detached task; its outcome never affects this response.
///
/// # Errors
/// - `400 Bad Request`: validation failure
/// - `500 Internal Server Error`: storage failure
#[post("/reservations")]
async fn create_reservation(
    store: web::Data<Store>,
    notifier: web::Data<Notifier>,
    data: web::Json<BookingRequest>,
) -> AppResult<impl Responder> {
    if data.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    if !validate_email(&data.email) {
        return Err(AppError::Validation("invalid email".to_string()));
    }

    if data.phone.trim().is_empty() {
        return Err(AppError::Validation("phone is required".to_string()));
    }

    validate_guests(data.guests)?;

    // Store normalized date/time strings so calendar lookups can rely on
    // exact matches.
    let date = validate_date(&data.date)?.format("%Y-%m-%d").to_string();
    let time = validate_time(&data.time)?.format("%H:%M").to_string();

    let new = NewReservation {
        name: data.name.trim().to_string(),
        email: data.email.trim().to_string(),
        phone: data.phone.trim().to_string(),
        date,
        time,
        guests: data.guests,
        notes: data
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    };

    let reservation = store.create_reservation(&new).await?;

    notifier.notify_new_reservation(&reservation);

    Ok(HttpResponse::Created().json(json!({
        "id": reservation.id,
        "status": reservation.status,
        "message": "reservation created"
    })))
}

/// All reservations, newest first. Admin only.
#[get("/reservations")]
async fn list_reservations(
    store: web::Data<Store>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    let reservations = store.list_reservations().await?;
    Ok(HttpResponse::Ok().json(reservations))
}

/// Per-day aggregate stats for one month, keyed `yyyy-MM-dd`. Every day
/// of the month gets an entry, zero-filled when empty. Admin only.
///
/// # Response
/// ```json
/// { "2025-03-10": { "total": 2, "totalGuests": 6, "approved": 1, "pending": 1 }, ... }
/// ```
#[get("/reservations/calendar")]
async fn calendar_view(
    store: web::Data<Store>,
    query: web::Query<CalendarQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    let month_start = NaiveDate::parse_from_str(&format!("{}-01", query.month), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("invalid month, use yyyy-MM".to_string()))?;

    let reservations = store.list_reservations().await?;
    Ok(HttpResponse::Ok().json(calendar::month_stats(&reservations, month_start)))
}

/// Reservations on exactly one date plus that day's stats, for the
/// day-detail panel. Admin only.
#[get("/reservations/day")]
async fn day_view(
    store: web::Data<Store>,
    query: web::Query<DayQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    let date = validate_date(&query.date)?.format("%Y-%m-%d").to_string();

    let reservations = store.list_reservations().await?;
    let stats = calendar::day_stats(&reservations, &date);
    let on_day = calendar::on_date(&reservations, &date);

    Ok(HttpResponse::Ok().json(json!({
        "date": date,
        "stats": stats,
        "reservations": on_day,
    })))
}

/// Partial update of any editable field, including `status`. Coalesce
/// semantics: absent fields keep their stored value. Status changes are
/// unconstrained, approving or rejecting is just `{"status": "..."}`.
/// Admin only.
///
/// # Errors
/// - `400 Bad Request`: a provided field fails validation
/// - `401 Unauthorized`: no valid session
/// - `404 Not Found`: no reservation with this id
#[patch("/reservations/{id}")]
async fn update_reservation(
    store: web::Data<Store>,
    path: web::Path<i64>,
    data: web::Json<ReservationPatch>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    let id = path.into_inner();
    let mut patch = data.into_inner();

    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
    }
    if let Some(email) = &patch.email {
        if !validate_email(email) {
            return Err(AppError::Validation("invalid email".to_string()));
        }
    }
    if let Some(phone) = &patch.phone {
        if phone.trim().is_empty() {
            return Err(AppError::Validation("phone cannot be empty".to_string()));
        }
    }
    if let Some(guests) = patch.guests {
        validate_guests(guests)?;
    }
    if let Some(date) = &patch.date {
        patch.date = Some(validate_date(date)?.format("%Y-%m-%d").to_string());
    }
    if let Some(time) = &patch.time {
        patch.time = Some(validate_time(time)?.format("%H:%M").to_string());
    }

    let updated = store.update_reservation(id, &patch).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Physically removes a reservation. Admin only.
///
/// # Errors
/// - `401 Unauthorized`: no valid session
/// - `404 Not Found`: no reservation with this id
#[delete("/reservations/{id}")]
async fn delete_reservation(
    store: web::Data<Store>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    require_session(store.get_ref(), &req).await?;

    let id = path.into_inner();
    store.delete_reservation(id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "reservation deleted" })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_reservation);
    cfg.service(list_reservations);
    cfg.service(calendar_view);
    cfg.service(day_view);
    cfg.service(update_reservation);
    cfg.service(delete_reservation);
}
