//! Reservation repository: CRUD over the `reservations` table.
//!
//! The repository performs no semantic validation, the API boundary does
//! that before calling in. Update and delete report a missing id as an
//! explicit `NotFound` instead of a silent no-op.

use crate::api::AppError;

use super::models::{NewReservation, Reservation, ReservationPatch, ReservationStatus};
use super::store::{Result, Store};

impl Store {
    /// Inserts a new reservation with `status = pending` and a
    /// server-generated `created_at`; returns the stored row including
    /// the generated id.
    pub async fn create_reservation(&self, new: &NewReservation) -> Result<Reservation> {
        let created_at = Store::current_timestamp();

        let result = sqlx::query(
            "INSERT INTO reservations (name, email, phone, date, time, guests, notes, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.date)
        .bind(&new.time)
        .bind(new.guests)
        .bind(&new.notes)
        .bind(ReservationStatus::Pending)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("create_reservation", e))?;

        Ok(Reservation {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            date: new.date.clone(),
            time: new.time.clone(),
            guests: new.guests,
            notes: new.notes.clone(),
            status: ReservationStatus::Pending,
            created_at,
        })
    }

    /// All reservations, newest first. No pagination, the dataset is
    /// single-restaurant scale.
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT id, name, email, phone, date, time, guests, notes, status, created_at
             FROM reservations
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("list_reservations", e))
    }

    pub async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT id, name, email, phone, date, time, guests, notes, status, created_at
             FROM reservations
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("get_reservation", e))
    }

    /// Applies a coalesce-style partial update and returns the merged row.
    pub async fn update_reservation(&self, id: i64, patch: &ReservationPatch) -> Result<Reservation> {
        let mut row = self
            .get_reservation(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;

        patch.apply(&mut row);

        sqlx::query(
            "UPDATE reservations
             SET name = ?, email = ?, phone = ?, date = ?, time = ?, guests = ?, notes = ?, status = ?
             WHERE id = ?",
        )
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.date)
        .bind(&row.time)
        .bind(row.guests)
        .bind(&row.notes)
        .bind(row.status)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("update_reservation", e))?;

        Ok(row)
    }

    /// Physical delete, irreversible.
    pub async fn delete_reservation(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("delete_reservation", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("reservation {id}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_store;

    fn booking(name: &str, date: &str, guests: i64) -> NewReservation {
        NewReservation {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "+90 555 000 0000".to_string(),
            date: date.to_string(),
            time: "19:00".to_string(),
            guests,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_pending_and_monotonic_ids() {
        let store = test_store().await;

        let first = store
            .create_reservation(&booking("Ayse", "2025-09-01", 2))
            .await
            .unwrap();
        let second = store
            .create_reservation(&booking("Mehmet", "2025-09-02", 4))
            .await
            .unwrap();

        assert_eq!(first.status, ReservationStatus::Pending);
        assert_eq!(second.status, ReservationStatus::Pending);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = test_store().await;

        for name in ["Ali", "Berna", "Cem"] {
            store
                .create_reservation(&booking(name, "2025-09-01", 2))
                .await
                .unwrap();
        }

        let all = store.list_reservations().await.unwrap();
        assert_eq!(all.len(), 3);
        // Same created_at second is possible, the id breaks the tie.
        assert_eq!(all[0].name, "Cem");
        assert_eq!(all[1].name, "Berna");
        assert_eq!(all[2].name, "Ali");
    }

    #[tokio::test]
    async fn approving_changes_only_the_status() {
        let store = test_store().await;
        let created = store
            .create_reservation(&booking("Deniz", "2025-09-05", 3))
            .await
            .unwrap();

        let patch = ReservationPatch {
            status: Some(ReservationStatus::Approved),
            ..ReservationPatch::default()
        };
        store.update_reservation(created.id, &patch).await.unwrap();

        let all = store.list_reservations().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, ReservationStatus::Approved);
        assert_eq!(all[0].name, created.name);
        assert_eq!(all[0].email, created.email);
        assert_eq!(all[0].guests, created.guests);
        assert_eq!(all[0].created_at, created.created_at);
    }

    #[tokio::test]
    async fn status_reversals_are_permitted() {
        let store = test_store().await;
        let created = store
            .create_reservation(&booking("Emre", "2025-09-05", 2))
            .await
            .unwrap();

        for status in [
            ReservationStatus::Rejected,
            ReservationStatus::Approved,
            ReservationStatus::Pending,
        ] {
            let patch = ReservationPatch {
                status: Some(status),
                ..ReservationPatch::default()
            };
            let updated = store.update_reservation(created.id, &patch).await.unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn sequential_partial_updates_compose() {
        let store = test_store().await;
        let created = store
            .create_reservation(&booking("Fatma", "2025-09-10", 2))
            .await
            .unwrap();

        let time_patch = ReservationPatch {
            time: Some("20:30".to_string()),
            ..ReservationPatch::default()
        };
        store.update_reservation(created.id, &time_patch).await.unwrap();

        let guests_patch = ReservationPatch {
            guests: Some(5),
            ..ReservationPatch::default()
        };
        let merged = store.update_reservation(created.id, &guests_patch).await.unwrap();

        assert_eq!(merged.time, "20:30");
        assert_eq!(merged.guests, 5);
        assert_eq!(merged.name, created.name);
        assert_eq!(merged.email, created.email);
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let store = test_store().await;
        let err = store
            .update_reservation(999, &ReservationPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_only_the_target_row() {
        let store = test_store().await;
        let first = store
            .create_reservation(&booking("Gizem", "2025-09-01", 2))
            .await
            .unwrap();
        store
            .create_reservation(&booking("Hakan", "2025-09-02", 4))
            .await
            .unwrap();
        let third = store
            .create_reservation(&booking("Irem", "2025-09-03", 6))
            .await
            .unwrap();

        store.delete_reservation(first.id).await.unwrap();

        let all = store.list_reservations().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, third.id);
        assert!(all.iter().all(|r| r.id != first.id));

        let err = store.delete_reservation(first.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
