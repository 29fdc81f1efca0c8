use serde::{Deserialize, Serialize};

/// Reservation status. Deliberately unconstrained: every source → target
/// change is allowed through a partial update, the only automatic
/// assignment is `Pending` on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Calendar date, ISO `yyyy-MM-dd`.
    pub date: String,
    /// Time of day, `HH:MM`.
    pub time: String,
    pub guests: i64,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    /// Server-assigned unix timestamp, immutable after insert.
    pub created_at: i64,
}

/// Insert payload for a new booking. Validation happens at the handler
/// boundary, the repository takes these fields as-is.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: i64,
    pub notes: Option<String>,
}

/// Partial update for a reservation with coalesce semantics: a field that
/// is present replaces the stored value, an absent field preserves it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<ReservationStatus>,
}

impl ReservationPatch {
    /// Merges the patch into a loaded row. `created_at` is immutable and
    /// never touched.
    pub fn apply(&self, row: &mut Reservation) {
        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(email) = &self.email {
            row.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            row.phone = phone.clone();
        }
        if let Some(date) = &self.date {
            row.date = date.clone();
        }
        if let Some(time) = &self.time {
            row.time = time.clone();
        }
        if let Some(guests) = self.guests {
            row.guests = guests;
        }
        if let Some(notes) = &self.notes {
            row.notes = Some(notes.clone());
        }
        if let Some(status) = self.status {
            row.status = status;
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: i64,
    pub name: String,
    pub order_index: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub is_active: bool,
    pub order_index: i64,
}

/// Nested category → items structure produced by the menu join.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategoryWithItems {
    pub id: i64,
    pub name: String,
    pub order_index: i64,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub order_index: i64,
}

/// Coalesce-style partial update for a menu item. The owning category is
/// fixed at creation and not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub order_index: Option<i64>,
}

impl MenuItemPatch {
    pub fn apply(&self, row: &mut MenuItem) {
        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            row.image_url = image_url.clone();
        }
        if let Some(is_active) = self.is_active {
            row.is_active = is_active;
        }
        if let Some(order_index) = self.order_index {
            row.order_index = order_index;
        }
    }
}

/// Server-side admin session. Lifetime is fixed at creation, there is no
/// refresh mechanism.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub created_at: i64,
    pub expires_at: i64,
}
