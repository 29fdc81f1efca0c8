//! Best-effort Telegram alert for new bookings.
//!
//! The message is dispatched on a detached task after the reservation row
//! is committed. Failures are logged and never reach the response path;
//! there are no retries.

use serde_json::json;
use std::env;

use crate::db::models::Reservation;

#[derive(Clone)]
pub struct Notifier {
    inner: Option<Telegram>,
}

#[derive(Clone)]
struct Telegram {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl Notifier {
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`; when either is
    /// missing the notifier is inert and every call is a no-op.
    pub fn from_env() -> Notifier {
        match (env::var("TELEGRAM_BOT_TOKEN"), env::var("TELEGRAM_CHAT_ID")) {
            (Ok(token), Ok(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
                tracing::info!("telegram notifications enabled");
                Notifier {
                    inner: Some(Telegram {
                        client: reqwest::Client::new(),
                        token,
                        chat_id,
                    }),
                }
            }
            _ => {
                tracing::info!(
                    "telegram notifications disabled (TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set)"
                );
                Notifier { inner: None }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn disabled() -> Notifier {
        Notifier { inner: None }
    }

    /// Fire-and-forget. Spawns the delivery and returns immediately; the
    /// outcome is only ever logged.
    pub fn notify_new_reservation(&self, reservation: &Reservation) {
        let Some(telegram) = self.inner.clone() else {
            return;
        };

        let reservation_id = reservation.id;
        let text = format_reservation_alert(reservation);

        tokio::spawn(async move {
            if let Err(e) = telegram.send_message(&text).await {
                tracing::warn!(
                    reservation_id,
                    error = %e,
                    "telegram notification failed"
                );
            } else {
                tracing::debug!(reservation_id, "telegram notification delivered");
            }
        });
    }
}

impl Telegram {
    async fn send_message(&self, text: &str) -> Result<(), reqwest::Error> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        self.client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

fn format_reservation_alert(reservation: &Reservation) -> String {
    let mut text = format!(
        "<b>New reservation!</b>\n\n\
         📝 Name: {}\n\
         📞 Phone: {}\n\
         📧 Email: {}\n\
         📅 Date: {}\n\
         ⏰ Time: {}\n\
         👥 Guests: {}",
        reservation.name,
        reservation.phone,
        reservation.email,
        reservation.date,
        reservation.time,
        reservation.guests,
    );

    if let Some(notes) = &reservation.notes {
        text.push_str(&format!("\n📝 Notes: {notes}"));
    }

    text
}
