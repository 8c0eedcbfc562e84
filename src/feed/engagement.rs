use serde::Serialize;

use crate::models::VoteType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl VoteTally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self { upvotes, downvotes }
    }

    fn add(&mut self, vote: VoteType) {
        match vote {
            VoteType::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteType::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
    }

    fn retract(&mut self, vote: VoteType) {
        match vote {
            VoteType::Up => self.upvotes = self.upvotes.saturating_sub(1),
            VoteType::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
    }
}

/// Result of a vote click: the optimistic counts plus the backend calls needed to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub user_vote: Option<VoteType>,
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(skip)]
    pub remove_existing: bool,
    #[serde(skip)]
    pub add: Option<VoteType>,
}

/// Clicking the vote already cast withdraws it. Clicking the other side switches.
pub fn reconcile_vote(tally: VoteTally, current: Option<VoteType>, clicked: VoteType) -> VoteOutcome {
    let mut next = tally;

    if current == Some(clicked) {
        next.retract(clicked);
        return VoteOutcome {
            user_vote: None,
            upvotes: next.upvotes,
            downvotes: next.downvotes,
            remove_existing: true,
            add: None,
        };
    }

    if let Some(previous) = current {
        next.retract(previous);
    }
    next.add(clicked);

    VoteOutcome {
        user_vote: Some(clicked),
        upvotes: next.upvotes,
        downvotes: next.downvotes,
        remove_existing: current.is_some(),
        add: Some(clicked),
    }
}

pub fn comment_count_after_add(count: u32) -> u32 {
    count.saturating_add(1)
}

pub fn comment_count_after_delete(count: u32) -> u32 {
    count.saturating_sub(1)
}

/// Whole-percent discount, or 0 when there is no meaningful original price.
pub fn savings_percent(original: Option<f64>, discounted: Option<f64>) -> u32 {
    match (original, discounted) {
        (Some(original), Some(discounted))
            if original.is_finite() && discounted > 0.0 && original > discounted =>
        {
            (((original - discounted) / original) * 100.0).round() as u32
        }
        _ => 0,
    }
}
