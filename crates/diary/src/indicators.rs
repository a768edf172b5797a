//! Health indicators: a single fold over an owner's complaint history.
//!
//! The total counts every record. Only records with a readable creation time
//! contribute to the trailing window and to the last complaint date; the rest
//! are skipped with a debug event and never fail the request.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    Clock, Complaint, ComplaintStore, GatewayError, HealthIndicators, HealthScore, OwnerId,
    Timestamp,
};

/// Length of the trailing window, in days. The lower bound is inclusive.
pub const WINDOW_DAYS: i64 = 30;

/// Reduces a complaint history into [`HealthIndicators`] relative to `now`.
///
/// Pure and deterministic: the same records and the same `now` always give the
/// same result. Storage order does not matter.
pub fn summarize(owner: &OwnerId, complaints: &[Complaint], now: Timestamp) -> HealthIndicators {
    let window_start = now.days_before(WINDOW_DAYS);

    let mut windowed = 0usize;
    let mut last: Option<Timestamp> = None;

    for complaint in complaints {
        let Some(created_at) = complaint.created_at() else {
            debug!(
                complaint_id = %complaint.id,
                created_at = ?complaint.created_at,
                "skipping complaint with unreadable timestamp"
            );
            continue;
        };

        if last.map_or(true, |seen| created_at > seen) {
            last = Some(created_at);
        }
        if created_at >= window_start {
            windowed += 1;
        }
    }

    HealthIndicators {
        user_id: owner.clone(),
        total_complaints: complaints.len(),
        health_score: HealthScore::from_windowed_count(windowed),
        last_complaint_date: last,
    }
}

/// Fetches an owner's history from storage and summarises it.
#[derive(Clone)]
pub struct HealthIndicatorService {
    store: Arc<dyn ComplaintStore>,
    clock: Arc<dyn Clock>,
}

impl HealthIndicatorService {
    pub fn new(store: Arc<dyn ComplaintStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Computes fresh indicators for `owner`. Nothing is cached.
    ///
    /// # Errors
    ///
    /// Storage failures are mapped with [`GatewayError::from_storage`]: an
    /// unreachable store gives 503, a rejected list passes its status through.
    #[tracing::instrument(name = "health_indicators", skip(self))]
    pub async fn indicators(&self, owner: &OwnerId) -> Result<HealthIndicators, GatewayError> {
        let complaints = self.store.list_by_owner(owner).await.map_err(|err| {
            warn!(error = %err, "listing complaints for health indicators failed");
            GatewayError::from_storage(err)
        })?;

        // Taken once, after the fetch, so every record is judged against the same instant.
        let now = self.clock.now();
        let indicators = summarize(owner, &complaints, now);

        debug!(
            total = indicators.total_complaints,
            score = %indicators.health_score,
            "health indicators computed"
        );
        Ok(indicators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComplaintId;

    fn now() -> Timestamp {
        Timestamp::parse("2026-10-19T12:00:00Z").unwrap()
    }

    fn owner() -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    fn complaint(id: u64, created_at: &str) -> Complaint {
        Complaint {
            id: ComplaintId::new(id),
            user_id: owner(),
            text: "кашель".into(),
            icpc_code: None,
            icd_code: None,
            created_at: Some(created_at.into()),
        }
    }

    #[test]
    fn empty_history_scores_full_marks() {
        let indicators = summarize(&owner(), &[], now());
        assert_eq!(indicators.total_complaints, 0);
        assert_eq!(indicators.health_score, HealthScore::MAX);
        assert_eq!(indicators.last_complaint_date, None);
    }

    #[test]
    fn window_lower_bound_is_inclusive() {
        let exactly = complaint(1, "2026-09-19T12:00:00Z");
        let indicators = summarize(&owner(), &[exactly], now());
        assert_eq!(indicators.health_score.as_u8(), 99);
    }

    #[test]
    fn one_second_outside_the_window_does_not_count() {
        let outside = complaint(1, "2026-09-19T11:59:59Z");
        let indicators = summarize(&owner(), &[outside], now());
        assert_eq!(indicators.total_complaints, 1);
        assert_eq!(indicators.health_score, HealthScore::MAX);
        assert_eq!(
            indicators.last_complaint_date,
            Timestamp::parse("2026-09-19T11:59:59Z")
        );
    }

    #[test]
    fn unreadable_timestamps_count_only_toward_total() {
        let complaints = [
            complaint(1, "2026-10-18T09:00:00Z"),
            complaint(2, "not a date"),
            complaint(3, ""),
        ];
        let indicators = summarize(&owner(), &complaints, now());
        assert_eq!(indicators.total_complaints, 3);
        assert_eq!(indicators.health_score.as_u8(), 99);
        assert_eq!(
            indicators.last_complaint_date,
            Timestamp::parse("2026-10-18T09:00:00Z")
        );
    }

    #[test]
    fn last_date_is_the_maximum_regardless_of_order() {
        let complaints = [
            complaint(1, "2026-10-10T09:00:00Z"),
            complaint(2, "2026-10-15T09:00:00Z"),
            complaint(3, "2026-10-01 09:00:00"),
        ];
        let indicators = summarize(&owner(), &complaints, now());
        assert_eq!(
            indicators.last_complaint_date,
            Timestamp::parse("2026-10-15T09:00:00Z")
        );
        assert_eq!(indicators.health_score.as_u8(), 97);
    }

    #[test]
    fn score_bottoms_out_at_zero() {
        let complaints: Vec<_> = (0..150)
            .map(|i| complaint(i, "2026-10-18T09:00:00Z"))
            .collect();
        let indicators = summarize(&owner(), &complaints, now());
        assert_eq!(indicators.total_complaints, 150);
        assert_eq!(indicators.health_score.as_u8(), 0);
    }

    #[test]
    fn score_never_increases_as_the_window_fills() {
        let mut complaints = Vec::new();
        let mut previous = HealthScore::MAX;
        for i in 0..120 {
            complaints.push(complaint(i, "2026-10-18T09:00:00Z"));
            let score = summarize(&owner(), &complaints, now()).health_score;
            assert!(score <= previous);
            previous = score;
        }
    }
}
