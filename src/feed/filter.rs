use crate::models::{Coordinates, Deal, DealWithDistance, FilterCriteria, SavedIds};
use crate::utils::distance::distance_between;

/// Attaches a distance to every deal. Deals without coordinates, or any deal when
/// the reference location is unknown, get `0.0`.
pub fn annotate_distances<D: AsRef<Deal>>(
    deals: &[D],
    user_location: Option<Coordinates>,
) -> Vec<DealWithDistance> {
    deals
        .iter()
        .map(|d| {
            let deal = d.as_ref();
            let distance = match (user_location, deal.coordinates) {
                (Some(origin), Some(target)) => distance_between(origin, target),
                _ => 0.0,
            };
            DealWithDistance::new(deal.clone(), distance)
        })
        .collect()
}

/// Annotates and filters `deals`, keeping input order.
///
/// Every active criterion must hold. Category and tag comparisons ignore case.
/// A distance bound without a reference location constrains nothing, since every
/// distance is `0.0` in that case.
pub fn filter_deals<D: AsRef<Deal>>(
    deals: &[D],
    user_location: Option<Coordinates>,
    criteria: &FilterCriteria,
    saved_ids: &SavedIds,
) -> Vec<DealWithDistance> {
    let category = criteria.category.as_deref().map(fold);
    let tags: Vec<String> = criteria.tags.iter().map(|t| fold(t)).collect();

    let mut annotated = annotate_distances(deals, user_location);
    annotated.retain(|item| {
        let deal = &item.deal;

        if let Some(min) = criteria.min_price {
            if deal.discounted_price < min {
                return false;
            }
        }

        if let Some(max) = criteria.max_price {
            if deal.discounted_price > max {
                return false;
            }
        }

        if let Some(max) = criteria.max_distance {
            if item.distance > max {
                return false;
            }
        }

        if let Some(category) = category.as_deref() {
            if !deal.categories.iter().any(|c| fold(c) == category) {
                return false;
            }
        }

        if !tags.is_empty() {
            let deal_tags: Vec<String> = deal.tags.iter().map(|t| fold(t)).collect();
            if !tags.iter().all(|wanted| deal_tags.contains(wanted)) {
                return false;
            }
        }

        if criteria.saved_only && !saved_ids.contains(&deal.id) {
            return false;
        }

        if let Some(owner) = criteria.created_by.as_ref() {
            if deal.created_by.as_ref() != Some(owner) {
                return false;
            }
        }

        true
    });

    annotated
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}
