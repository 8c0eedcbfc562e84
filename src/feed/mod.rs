//! In-memory deal pipeline shared by the list and map views.
//!
//! Raw deals are annotated with their distance from the reference location,
//! filtered, and for the map grouped by rounded coordinate. Nothing here
//! performs I/O except [`resolve`], which asks a geocoder for missing coordinates.

mod engagement;
mod filter;
mod grouping;
mod ranking;
mod resolve;

pub use engagement::{
    comment_count_after_add, comment_count_after_delete, reconcile_vote, savings_percent,
    VoteOutcome, VoteTally,
};
pub use filter::{annotate_distances, filter_deals};
pub use grouping::{coordinate_key, group_by_coordinate, marker_groups, MarkerGroup};
pub use ranking::{hot_score, rank_hot};
pub use resolve::{resolve_coordinates, ResolvedDeals};
