use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identifier;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Identifier,
    #[serde(alias = "deal_id")]
    pub deal_id: Identifier,
    #[serde(alias = "user_id")]
    pub user_id: Uuid,
    pub reason: String,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReportInput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReportInput {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}
