use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::{AuthSession, ConsoleConfig};
use crate::deposits::errors::{FetchError, TransitionError};
use crate::deposits::types::{DepositPage, DepositRecord, Pagination, ReviewAction, StatusFilter};

/// Paginated listing and single-record retrieval for manual deposits
#[async_trait]
pub(crate) trait DepositQuery: Send + Sync {
    async fn list(
        &self,
        page: u64,
        limit: u64,
        status: StatusFilter,
    ) -> Result<DepositPage, FetchError>;

    async fn get_by_id(&self, id: &str) -> Result<DepositRecord, FetchError>;
}

/// Applies an approve/reject transition to a pending deposit
#[async_trait]
pub(crate) trait StatusTransition: Send + Sync {
    /// The backend does not return the updated record; callers re-list
    /// after a successful transition.
    async fn update_status(&self, id: &str, action: &ReviewAction) -> Result<(), TransitionError>;
}

/// Combined seam the review controller depends on
pub(crate) trait DepositApi: DepositQuery + StatusTransition {}

impl<T: DepositQuery + StatusTransition> DepositApi for T {}

/// Wire shape of `GET /admin/deposits`
#[derive(Deserialize, Debug)]
struct ListDepositsResponse {
    deposits: Vec<DepositRecord>,
    pagination: Pagination,
}

/// Wire shape of `GET /admin/deposits/:id`
#[derive(Deserialize, Debug)]
struct DepositDetailResponse {
    deposit: DepositRecord,
}

/// Wire shape of `PUT /admin/deposits/:id/status`
#[derive(Serialize, Debug)]
struct UpdateStatusBody<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

/// Marketplace backend client for the deposit review endpoints
#[derive(Clone, Debug)]
pub(crate) struct HttpDepositApi {
    client: Client,
    base_url: String,
    auth: AuthSession,
}

impl HttpDepositApi {
    pub(crate) fn new(config: &ConsoleConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_s()))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.backend_url().trim_end_matches('/').to_string(),
            auth: config.auth_session().clone(),
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: AuthSession::new(None),
        }
    }

    fn deposits_url(&self) -> String {
        format!("{}/admin/deposits", self.base_url)
    }
}

#[async_trait]
impl DepositQuery for HttpDepositApi {
    async fn list(
        &self,
        page: u64,
        limit: u64,
        status: StatusFilter,
    ) -> Result<DepositPage, FetchError> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(status) = status.as_query() {
            query.push(("status", status.to_string()));
        }

        let request = self.client.get(self.deposits_url()).query(&query);
        let response = self.auth.apply(request).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus(response.status()));
        }

        let value: serde_json::Value = response.json().await?;
        let body: ListDepositsResponse = serde_json::from_value(value)?;
        debug!(
            page,
            limit,
            fetched = body.deposits.len(),
            "Fetched deposit listing"
        );

        Ok(DepositPage {
            records: body.deposits,
            pagination: body.pagination,
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<DepositRecord, FetchError> {
        let url = format!("{}/{id}", self.deposits_url());
        let response = self.auth.apply(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus(response.status()));
        }

        let value: serde_json::Value = response.json().await?;
        let body: DepositDetailResponse = serde_json::from_value(value)?;
        Ok(body.deposit)
    }
}

#[async_trait]
impl StatusTransition for HttpDepositApi {
    async fn update_status(&self, id: &str, action: &ReviewAction) -> Result<(), TransitionError> {
        let url = format!("{}/{id}/status", self.deposits_url());
        let note = action.note.trim();
        let body = UpdateStatusBody {
            status: action.kind.as_str(),
            note: (!note.is_empty()).then_some(note),
        };

        let request = self.client.put(&url).json(&body);
        let response = self.auth.apply(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            let message = if detail.is_empty() {
                format!("status {status}")
            } else {
                format!("status {status}: {detail}")
            };
            return Err(TransitionError::Rejected(message));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposits::types::{DepositStatus, ReviewActionKind};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn list_body() -> serde_json::Value {
        json!({
            "deposits": [
                {
                    "id": "dep-1",
                    "sellerId": "s-1",
                    "sellerName": "Acme Traders",
                    "amount": 120.0,
                    "currency": "USD",
                    "screenshotUrl": "uploads/receipts/a.png",
                    "screenshotMimetype": "image/png",
                    "status": "pending",
                    "createdAt": "2025-03-10T12:00:00Z"
                }
            ],
            "pagination": { "page": 1, "limit": 10, "total": 1, "pages": 1 }
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_list_with_status_filter() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("GET", "/admin/deposits")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("status".into(), "pending".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(list_body().to_string())
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        let page = api.list(1, 10, StatusFilter::Pending).await.unwrap();

        mock_endpoint.assert_async().await;
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "dep-1");
        assert_eq!(page.records[0].status, DepositStatus::Pending);
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_list_all_omits_status_param() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("GET", "/admin/deposits")
            .match_query(Matcher::Exact("page=2&limit=10".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(list_body().to_string())
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        api.list(2, 10, StatusFilter::All).await.unwrap();

        mock_endpoint.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_list_upstream_failure() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/admin/deposits")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        let err = api.list(1, 10, StatusFilter::All).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::UpstreamStatus(status) if status.as_u16() == 500
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_get_by_id() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("GET", "/admin/deposits/dep-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "deposit": {
                        "id": "dep-1",
                        "sellerId": "s-1",
                        "reference": "wire-778",
                        "status": "approved",
                        "createdAt": "2025-03-10T12:00:00Z"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        let record = api.get_by_id("dep-1").await.unwrap();

        mock_endpoint.assert_async().await;
        assert_eq!(record.id, "dep-1");
        assert_eq!(record.reference.as_deref(), Some("wire-778"));
        assert!(record.status.is_terminal());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_update_status_sends_note() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("PUT", "/admin/deposits/dep-1/status")
            .match_body(Matcher::Json(json!({
                "status": "rejected",
                "note": "blurry screenshot"
            })))
            .with_status(204)
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        let action = ReviewAction {
            kind: ReviewActionKind::Reject,
            note: "blurry screenshot".to_string(),
        };
        api.update_status("dep-1", &action).await.unwrap();

        mock_endpoint.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_update_status_omits_empty_note() {
        let mut server = Server::new_async().await;

        let mock_endpoint = server
            .mock("PUT", "/admin/deposits/dep-1/status")
            .match_body(Matcher::Json(json!({ "status": "approved" })))
            .with_status(200)
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        api.update_status("dep-1", &ReviewAction::approve())
            .await
            .unwrap();

        mock_endpoint.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_update_status_rejection() {
        let mut server = Server::new_async().await;

        server
            .mock("PUT", "/admin/deposits/dep-1/status")
            .with_status(409)
            .with_body("already reviewed")
            .create_async()
            .await;

        let api = HttpDepositApi::with_base_url(&server.url());
        let err = api
            .update_status("dep-1", &ReviewAction::approve())
            .await
            .unwrap_err();

        match err {
            TransitionError::Rejected(message) => {
                assert!(message.contains("409"));
                assert!(message.contains("already reviewed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
