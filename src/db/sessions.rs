//! Admin session rows: opaque UUID tokens with a fixed expiry.

use uuid::Uuid;

use crate::api::AppError;

use super::models::Session;
use super::store::{Result, Store};

impl Store {
    /// Inserts a fresh session valid for `ttl_seconds` from now.
    pub async fn create_session(&self, ttl_seconds: i64) -> Result<Session> {
        let now = Store::current_timestamp();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            expires_at: now + ttl_seconds,
        };

        sqlx::query("INSERT INTO sessions (id, created_at, expires_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(session.created_at)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("create_session", e))?;

        Ok(session)
    }

    /// True when the token names a live session. An expired row is
    /// deleted on sight; unknown tokens are simply invalid, not an error.
    pub async fn verify_session(&self, token: &str) -> Result<bool> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, created_at, expires_at FROM sessions WHERE id = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("verify_session", e))?;

        match session {
            Some(session) if session.expires_at > Store::current_timestamp() => Ok(true),
            Some(session) => {
                self.delete_session(&session.id).await?;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Removes a session row. Deleting an unknown token is a no-op so
    /// that logout is idempotent.
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("delete_session", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_store;

    #[tokio::test]
    async fn fresh_session_verifies() {
        let store = test_store().await;
        let session = store.create_session(3600).await.unwrap();
        assert!(store.verify_session(&session.id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let store = test_store().await;
        assert!(!store.verify_session("not-a-session").await.unwrap());
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_purged() {
        let store = test_store().await;
        let session = store.create_session(-10).await.unwrap();

        assert!(!store.verify_session(&session.id).await.unwrap());

        // The expired row is gone afterwards.
        let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let store = test_store().await;
        let session = store.create_session(3600).await.unwrap();

        store.delete_session(&session.id).await.unwrap();
        assert!(!store.verify_session(&session.id).await.unwrap());

        // Idempotent
        store.delete_session(&session.id).await.unwrap();
    }
}
