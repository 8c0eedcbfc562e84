use tracing::debug;

use crate::models::Deal;
use crate::utils::geocoding::GeocodeProvider;

/// Deals ready for the map plus how many had to be left off.
#[derive(Debug, Default)]
pub struct ResolvedDeals {
    pub deals: Vec<Deal>,
    pub unresolved: usize,
}

/// Fills in coordinates from each deal's address where the backend sent none.
///
/// Deals that still have no coordinates afterwards are dropped. Lookups run one at a
/// time in input order so the provider's rate limit holds.
pub async fn resolve_coordinates(deals: Vec<Deal>, geocoder: &dyn GeocodeProvider) -> ResolvedDeals {
    let mut resolved = ResolvedDeals::default();

    for mut deal in deals {
        if deal.coordinates.is_none() && !deal.address.trim().is_empty() {
            deal.coordinates = geocoder.geocode(&deal.address).await;
        }

        if deal.coordinates.is_some() {
            resolved.deals.push(deal);
        } else {
            debug!("Deal {} has no resolvable location", deal.id);
            resolved.unresolved += 1;
        }
    }

    resolved
}
