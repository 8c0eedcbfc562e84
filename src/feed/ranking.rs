use chrono::{DateTime, Utc};

use crate::constants::{HOT_AGE_OFFSET_HOURS, HOT_GRAVITY};
use crate::models::DealWithDistance;
use crate::utils::datetime::{age_in_hours, parse_datetime};

/// Net votes decayed by age. Deals with an unreadable timestamp count as brand new.
pub fn hot_score(upvotes: u32, downvotes: u32, created_at: Option<&str>, now: DateTime<Utc>) -> f64 {
    let net = f64::from(upvotes) - f64::from(downvotes);
    let age = created_at
        .and_then(parse_datetime)
        .map(|created| age_in_hours(created, now))
        .unwrap_or(0.0);

    net / (age + HOT_AGE_OFFSET_HOURS).powf(HOT_GRAVITY)
}

/// Sorts by descending hot score and keeps the first `limit`. Ties keep input order.
pub fn rank_hot(
    deals: Vec<DealWithDistance>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<DealWithDistance> {
    let mut scored: Vec<(f64, DealWithDistance)> = deals
        .into_iter()
        .map(|item| {
            let deal = &item.deal;
            let score = hot_score(deal.upvotes, deal.downvotes, deal.created_at.as_deref(), now);
            (score, item)
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, item)| item).collect()
}
