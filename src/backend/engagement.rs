use reqwest::Method;

use super::{BackendClient, BackendError};
use crate::models::{
    AddCommentInput, AddReportInput, AddVoteInput, Comment, Deal, DeleteCommentInput,
    DeleteReportInput, RemoveVoteInput, Report, VotesResponse,
};

impl BackendClient {
    pub async fn get_votes(
        &self,
        deal_id: &str,
        token: Option<&str>,
    ) -> Result<VotesResponse, BackendError> {
        let builder = self.request(Method::GET, &["deals", deal_id, "votes"], token)?;
        self.send_json(builder, &format!("votes for deal {}", deal_id)).await
    }

    pub async fn add_vote(
        &self,
        deal_id: &str,
        vote: &AddVoteInput,
        token: Option<&str>,
    ) -> Result<(), BackendError> {
        let builder = self
            .request(Method::POST, &["deals", deal_id, "votes"], token)?
            .json(vote);
        self.send_empty(builder).await
    }

    pub async fn remove_vote(
        &self,
        deal_id: &str,
        vote: &RemoveVoteInput,
        token: Option<&str>,
    ) -> Result<(), BackendError> {
        let builder = self
            .request(Method::DELETE, &["deals", deal_id, "votes"], token)?
            .query(vote);
        self.send_empty(builder).await
    }

    pub async fn list_comments(
        &self,
        deal_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<Comment>, BackendError> {
        let builder = self.request(Method::GET, &["deals", deal_id, "comments"], token)?;
        self.send_list(builder, &format!("comments for deal {}", deal_id)).await
    }

    pub async fn add_comment(
        &self,
        deal_id: &str,
        comment: &AddCommentInput,
        token: Option<&str>,
    ) -> Result<Comment, BackendError> {
        let builder = self
            .request(Method::POST, &["deals", deal_id, "comments"], token)?
            .json(comment);
        self.send_json(builder, "add comment").await
    }

    pub async fn delete_comment(
        &self,
        comment_id: &str,
        input: &DeleteCommentInput,
        token: Option<&str>,
    ) -> Result<(), BackendError> {
        let builder = self
            .request(Method::DELETE, &["comments", comment_id], token)?
            .query(input);
        self.send_empty(builder).await
    }

    pub async fn list_saved_deals(&self, token: Option<&str>) -> Result<Vec<Deal>, BackendError> {
        let builder = self.request(Method::GET, &["saved-deals"], token)?;
        self.send_list(builder, "saved deals").await
    }

    pub async fn save_deal(&self, deal_id: &str, token: Option<&str>) -> Result<(), BackendError> {
        let builder = self.request(Method::POST, &["saved-deals", deal_id], token)?;
        self.send_empty(builder).await
    }

    pub async fn unsave_deal(&self, deal_id: &str, token: Option<&str>) -> Result<(), BackendError> {
        let builder = self.request(Method::DELETE, &["saved-deals", deal_id], token)?;
        self.send_empty(builder).await
    }

    pub async fn list_reports(
        &self,
        deal_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<Report>, BackendError> {
        let builder = self.request(Method::GET, &["deals", deal_id, "reports"], token)?;
        self.send_list(builder, &format!("reports for deal {}", deal_id)).await
    }

    pub async fn add_report(
        &self,
        deal_id: &str,
        report: &AddReportInput,
        token: Option<&str>,
    ) -> Result<Report, BackendError> {
        let builder = self
            .request(Method::POST, &["deals", deal_id, "reports"], token)?
            .json(report);
        self.send_json(builder, "add report").await
    }

    pub async fn delete_report(
        &self,
        report_id: &str,
        input: &DeleteReportInput,
        token: Option<&str>,
    ) -> Result<(), BackendError> {
        let builder = self
            .request(Method::DELETE, &["reports", report_id], token)?
            .query(input);
        self.send_empty(builder).await
    }
}
