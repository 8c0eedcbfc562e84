use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::auth::{AppState, BearerToken, CurrentUser};
use crate::error::AppResult;
use crate::feed::{reconcile_vote, VoteOutcome, VoteTally};
use crate::models::{AddVoteInput, CastVoteRequest, RemoveVoteInput, VotesResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/deals/:id/votes", get(get_votes).post(cast_vote))
}

async fn get_votes(
    State(state): State<AppState>,
    token: BearerToken,
    Path(deal_id): Path<String>,
) -> AppResult<Json<VotesResponse>> {
    let votes = state.backend.get_votes(&deal_id, token.as_deref()).await?;
    Ok(Json(votes))
}

async fn cast_vote(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(deal_id): Path<String>,
    Json(req): Json<CastVoteRequest>,
) -> AppResult<Json<VoteOutcome>> {
    let token = Some(current_user.token.as_str());

    let (deal, votes) = futures::try_join!(
        state.backend.get_deal(&deal_id, token),
        state.backend.get_votes(&deal_id, token)
    )?;

    let current = votes.vote_of(req.user_id);
    let outcome = reconcile_vote(
        VoteTally::new(deal.upvotes, deal.downvotes),
        current,
        req.vote_type,
    );

    if outcome.remove_existing {
        state
            .backend
            .remove_vote(&deal_id, &RemoveVoteInput { user_id: req.user_id }, token)
            .await?;
    }
    if let Some(vote_type) = outcome.add {
        state
            .backend
            .add_vote(
                &deal_id,
                &AddVoteInput {
                    user_id: req.user_id,
                    vote_type,
                },
                token,
            )
            .await?;
    }

    info!(
        "Vote on deal {}: {:?} -> {:?}",
        deal_id, current, outcome.user_vote
    );
    Ok(Json(outcome))
}
