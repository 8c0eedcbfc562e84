use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Identifier;

/// Backend encoding: `1` for an upvote, `-1` for a downvote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum VoteType {
    Up,
    Down,
}

impl TryFrom<i8> for VoteType {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteType::Up),
            -1 => Ok(VoteType::Down),
            other => Err(format!("invalid vote type {}", other)),
        }
    }
}

impl From<VoteType> for i8 {
    fn from(value: VoteType) -> Self {
        match value {
            VoteType::Up => 1,
            VoteType::Down => -1,
        }
    }
}

// Stored rows with any other value (`0` for a cleared vote, say) hold no vote.
fn de_stored_vote<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<VoteType>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .and_then(|n| i8::try_from(n).ok())
        .and_then(|n| VoteType::try_from(n).ok()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: Identifier,
    pub deal_id: Identifier,
    pub user_id: Uuid,
    #[serde(default, deserialize_with = "de_stored_vote")]
    pub vote_type: Option<VoteType>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VotesResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

impl VotesResponse {
    pub fn vote_of(&self, user_id: Uuid) -> Option<VoteType> {
        self.votes
            .iter()
            .find(|v| v.user_id == user_id)
            .and_then(|v| v.vote_type)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddVoteInput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveVoteInput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub user_id: Uuid,
    #[serde(alias = "vote_type")]
    pub vote_type: VoteType,
}
