use reqwest::Method;

use super::{BackendClient, BackendError};
use crate::models::{CreateDealRequest, Deal, DealListParams, UpdateDealRequest};

impl BackendClient {
    pub async fn list_deals(
        &self,
        params: &DealListParams,
        token: Option<&str>,
    ) -> Result<Vec<Deal>, BackendError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = params.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        if let Some(created_by) = params.created_by.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("createdBy", created_by.trim().to_string()));
        }

        let builder = self.request(Method::GET, &["deals"], token)?.query(&query);
        self.send_list(builder, "list deals").await
    }

    pub async fn get_deal(&self, id: &str, token: Option<&str>) -> Result<Deal, BackendError> {
        let builder = self.request(Method::GET, &["deals", id], token)?;
        self.send_json(builder, &format!("get deal {}", id)).await
    }

    pub async fn create_deal(
        &self,
        deal: &CreateDealRequest,
        token: Option<&str>,
    ) -> Result<Deal, BackendError> {
        let builder = self.request(Method::POST, &["deals"], token)?.json(deal);
        self.send_json(builder, "create deal").await
    }

    pub async fn update_deal(
        &self,
        id: &str,
        changes: &UpdateDealRequest,
        token: Option<&str>,
    ) -> Result<Deal, BackendError> {
        let builder = self.request(Method::PUT, &["deals", id], token)?.json(changes);
        self.send_json(builder, &format!("update deal {}", id)).await
    }

    pub async fn delete_deal(&self, id: &str, token: Option<&str>) -> Result<(), BackendError> {
        let builder = self.request(Method::DELETE, &["deals", id], token)?;
        self.send_empty(builder).await
    }
}
