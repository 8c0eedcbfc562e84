use indexmap::IndexMap;
use tracing::debug;

use crate::constants::COORDINATE_KEY_PRECISION;
use crate::models::{Coordinates, DealWithDistance};

/// Deals sharing one rounded coordinate. Rendered as a single map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGroup {
    pub key: String,
    pub position: Coordinates,
    pub deals: Vec<DealWithDistance>,
}

impl MarkerGroup {
    pub fn count(&self) -> usize {
        self.deals.len()
    }
}

/// `"{lat},{lng}"` with both values rounded to six fixed decimal places.
pub fn coordinate_key(coordinates: Coordinates) -> String {
    format!("{},{}", fixed(coordinates.lat), fixed(coordinates.lng))
}

fn fixed(value: f64) -> String {
    let formatted = format!("{:.*}", COORDINATE_KEY_PRECISION, value);
    // "-0.000000" and "0.000000" name the same spot.
    match formatted.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => unsigned.to_string(),
        _ => formatted,
    }
}

/// Partitions deals by coordinate key. Group order follows the first occurrence of each
/// key and deals keep their input order inside a group. Deals without coordinates are skipped.
pub fn group_by_coordinate(deals: &[DealWithDistance]) -> IndexMap<String, Vec<DealWithDistance>> {
    let mut grouped: IndexMap<String, Vec<DealWithDistance>> = IndexMap::new();

    for item in deals {
        let Some(coordinates) = item.deal.coordinates else {
            debug!("Skipping deal {} without coordinates", item.deal.id);
            continue;
        };
        grouped
            .entry(coordinate_key(coordinates))
            .or_default()
            .push(item.clone());
    }

    grouped
}

/// Same partition as [`group_by_coordinate`], positioned at each group's first deal.
pub fn marker_groups(deals: &[DealWithDistance]) -> Vec<MarkerGroup> {
    group_by_coordinate(deals)
        .into_iter()
        .filter_map(|(key, deals)| {
            let position = deals.first()?.deal.coordinates?;
            Some(MarkerGroup {
                key,
                position,
                deals,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::annotate_distances;
    use crate::test_utils::{deal, deal_at};

    #[test]
    fn test_coordinate_key_format() {
        assert_eq!(coordinate_key(Coordinates::new(1.0, 1.0)), "1.000000,1.000000");
        assert_eq!(
            coordinate_key(Coordinates::new(29.6535, -82.3388)),
            "29.653500,-82.338800"
        );
        assert_eq!(
            coordinate_key(Coordinates::new(1e-7, -1e-7)),
            "0.000000,0.000000"
        );
        assert_eq!(
            coordinate_key(Coordinates::new(0.0000004, 12.1234567)),
            "0.000000,12.123457"
        );
    }

    #[test]
    fn test_groups_identical_coordinates() {
        let deals = annotate_distances(
            &[deal_at(1, 1.0, 1.0), deal_at(2, 1.0, 1.0), deal_at(3, 2.0, 2.0)],
            None,
        );

        let grouped = group_by_coordinate(&deals);

        assert_eq!(grouped.len(), 2);
        let (first_key, first) = grouped.get_index(0).unwrap();
        assert_eq!(first_key, "1.000000,1.000000");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].deal.id.as_key(), "1");
        assert_eq!(first[1].deal.id.as_key(), "2");
        assert_eq!(grouped.get_index(1).unwrap().1.len(), 1);
    }

    #[test]
    fn test_group_order_is_first_occurrence() {
        let deals = annotate_distances(
            &[
                deal_at(1, 5.0, 5.0),
                deal_at(2, 1.0, 1.0),
                deal_at(3, 5.0, 5.0),
                deal_at(4, 1.0000001, 1.0),
            ],
            None,
        );

        let keys: Vec<String> = group_by_coordinate(&deals).keys().cloned().collect();

        assert_eq!(keys, vec!["5.000000,5.000000", "1.000000,1.000000"]);
    }

    #[test]
    fn test_every_member_shares_the_key() {
        let deals = annotate_distances(
            &[
                deal_at(1, 29.65350001, -82.3388),
                deal_at(2, 29.6535, -82.33880002),
                deal_at(3, 29.6536, -82.3388),
            ],
            None,
        );

        for (key, members) in group_by_coordinate(&deals) {
            for member in members {
                assert_eq!(coordinate_key(member.deal.coordinates.unwrap()), key);
            }
        }
    }

    #[test]
    fn test_deals_without_coordinates_are_skipped() {
        let deals = annotate_distances(&[deal(1), deal_at(2, 3.0, 4.0)], None);

        let grouped = group_by_coordinate(&deals);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0][0].deal.id.as_key(), "2");
    }

    #[test]
    fn test_marker_groups_expose_count() {
        let deals = annotate_distances(
            &[deal_at(1, 1.0, 1.0), deal_at(2, 1.0, 1.0), deal_at(3, 2.0, 2.0)],
            None,
        );

        let groups = marker_groups(&deals);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[0].position, Coordinates::new(1.0, 1.0));
        assert_eq!(groups[1].count(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_coordinate(&[]).is_empty());
        assert!(marker_groups(&[]).is_empty());
    }
}
