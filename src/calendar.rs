//! Per-day aggregation of reservations for the admin calendar.
//!
//! Pure functions over the full reservation list. The stats are
//! recomputed on every request instead of keeping an incremental index,
//! which is fine at single-restaurant scale.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::db::models::{Reservation, ReservationStatus};

/// Aggregate counters for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub total: u32,
    pub total_guests: u32,
    pub approved: u32,
    pub pending: u32,
}

/// Counters for the reservations whose `date` exactly matches `date`
/// (`yyyy-MM-dd` string match). Rejected reservations count toward
/// `total` and `total_guests` but have no dedicated counter.
pub fn day_stats(reservations: &[Reservation], date: &str) -> DayStats {
    let mut stats = DayStats::default();

    for reservation in reservations.iter().filter(|r| r.date == date) {
        stats.total += 1;
        stats.total_guests += reservation.guests.max(0) as u32;
        match reservation.status {
            ReservationStatus::Approved => stats.approved += 1,
            ReservationStatus::Pending => stats.pending += 1,
            ReservationStatus::Rejected => {}
        }
    }

    stats
}

/// One entry per day of the month containing `month_start`, keyed
/// `yyyy-MM-dd`. Days without reservations get a zero entry.
pub fn month_stats(reservations: &[Reservation], month_start: NaiveDate) -> BTreeMap<String, DayStats> {
    let month = month_start.month();
    let first = month_start.with_day(1).unwrap_or(month_start);

    let mut stats = BTreeMap::new();
    let mut day = Some(first);
    while let Some(current) = day {
        if current.month() != month {
            break;
        }
        let key = current.format("%Y-%m-%d").to_string();
        let entry = day_stats(reservations, &key);
        stats.insert(key, entry);
        day = current.succ_opt();
    }

    stats
}

/// Reservations on exactly the given date, in input order. Backs the
/// day-detail panel.
pub fn on_date<'a>(reservations: &'a [Reservation], date: &str) -> Vec<&'a Reservation> {
    reservations.iter().filter(|r| r.date == date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(id: i64, date: &str, guests: i64, status: ReservationStatus) -> Reservation {
        Reservation {
            id,
            name: format!("guest-{id}"),
            email: format!("guest{id}@example.com"),
            phone: "+90 555 000 0000".to_string(),
            date: date.to_string(),
            time: "19:00".to_string(),
            guests,
            notes: None,
            status,
            created_at: 1_700_000_000 + id,
        }
    }

    #[test]
    fn mixed_day_aggregates_counts_and_guests() {
        let reservations = vec![
            reservation(1, "2025-03-10", 2, ReservationStatus::Pending),
            reservation(2, "2025-03-10", 4, ReservationStatus::Approved),
            reservation(3, "2025-03-11", 8, ReservationStatus::Approved),
        ];

        let stats = day_stats(&reservations, "2025-03-10");
        assert_eq!(
            stats,
            DayStats {
                total: 2,
                total_guests: 6,
                approved: 1,
                pending: 1,
            }
        );
    }

    #[test]
    fn rejected_counts_toward_total_only() {
        let reservations = vec![reservation(1, "2025-03-10", 3, ReservationStatus::Rejected)];

        let stats = day_stats(&reservations, "2025-03-10");
        assert_eq!(stats.total, 1);
        assert_eq!(stats.total_guests, 3);
        assert_eq!(stats.approved, 0);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn empty_day_is_a_zero_entry() {
        let stats = day_stats(&[], "2025-03-10");
        assert_eq!(stats, DayStats::default());
    }

    #[test]
    fn month_covers_every_day_exactly_once() {
        let reservations = vec![
            reservation(1, "2025-02-14", 2, ReservationStatus::Pending),
            reservation(2, "2025-02-14", 4, ReservationStatus::Approved),
            // Outside the month, must not leak in
            reservation(3, "2025-03-01", 6, ReservationStatus::Pending),
        ];

        let month_start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let stats = month_stats(&reservations, month_start);

        assert_eq!(stats.len(), 28);
        assert_eq!(stats["2025-02-14"].total, 2);
        assert_eq!(stats["2025-02-14"].total_guests, 6);
        assert_eq!(stats["2025-02-01"], DayStats::default());
        assert!(!stats.contains_key("2025-03-01"));
    }

    #[test]
    fn month_start_may_be_any_day_of_the_month() {
        let month_start = NaiveDate::from_ymd_opt(2024, 2, 17).unwrap();
        let stats = month_stats(&[], month_start);
        // Leap February, normalized back to the 1st.
        assert_eq!(stats.len(), 29);
        assert!(stats.contains_key("2024-02-01"));
        assert!(stats.contains_key("2024-02-29"));
    }

    #[test]
    fn on_date_filters_and_preserves_order() {
        let reservations = vec![
            reservation(3, "2025-03-10", 2, ReservationStatus::Pending),
            reservation(2, "2025-03-11", 4, ReservationStatus::Pending),
            reservation(1, "2025-03-10", 6, ReservationStatus::Approved),
        ];

        let on_day = on_date(&reservations, "2025-03-10");
        let ids: Vec<i64> = on_day.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
