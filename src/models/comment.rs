use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identifier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Identifier,
    pub deal_id: Identifier,
    pub user_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentInput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentInput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreatedResponse {
    pub comment: Comment,
    pub comment_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDeletedResponse {
    pub comment_count: u32,
}
