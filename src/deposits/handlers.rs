use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::deposits::api::HttpDepositApi;
use crate::deposits::review::{ReviewController, ReviewEvent, ReviewState};
use crate::deposits::types::{ReviewAction, StatusFilter};
use crate::uploads::{resolve_upload_url, ProofKind};

/// Shared context for the review console API
pub(crate) struct ReviewContext {
    pub(crate) controller: ReviewController,
    backend_url: String,
}

impl ReviewContext {
    pub(crate) fn new(config: &ConsoleConfig) -> Self {
        let api = Arc::new(HttpDepositApi::new(config));
        Self {
            controller: ReviewController::new(api, config.page_limit()),
            backend_url: config.backend_url().to_string(),
        }
    }
}

/// Proof-of-payment asset for the selected record, resolved for rendering
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProofView {
    url: String,
    kind: ProofKind,
}

/// State snapshot returned by every console endpoint
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewSnapshot {
    #[serde(flatten)]
    state: ReviewState,
    proof: Option<ProofView>,
}

/// Decorate a state snapshot with the selected record's resolved proof URL
fn decorate(state: ReviewState, backend_url: &str) -> ReviewSnapshot {
    let proof = state.selected.as_ref().and_then(|record| {
        let url = resolve_upload_url(backend_url, record.raw_proof_path());
        if url.is_empty() {
            return None;
        }
        Some(ProofView {
            url,
            kind: ProofKind::from_mimetype(record.screenshot_mimetype.as_deref()),
        })
    });

    ReviewSnapshot { state, proof }
}

async fn snapshot(context: &ReviewContext) -> Json<ReviewSnapshot> {
    let state = context.controller.snapshot().await;
    Json(decorate(state, &context.backend_url))
}

#[derive(Deserialize, Debug)]
pub(crate) struct FilterBody {
    status: StatusFilter,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PageBody {
    page: u64,
}

/// GET `/api/review`
pub(crate) async fn get_review_state(context: Arc<ReviewContext>) -> Json<ReviewSnapshot> {
    snapshot(&context).await
}

/// POST `/api/review/filter`
pub(crate) async fn set_filter(
    context: Arc<ReviewContext>,
    Json(body): Json<FilterBody>,
) -> Json<ReviewSnapshot> {
    context
        .controller
        .dispatch(ReviewEvent::FilterChanged(body.status))
        .await;
    snapshot(&context).await
}

/// POST `/api/review/page`
pub(crate) async fn set_page(
    context: Arc<ReviewContext>,
    Json(body): Json<PageBody>,
) -> Json<ReviewSnapshot> {
    context
        .controller
        .dispatch(ReviewEvent::PageChanged(body.page))
        .await;
    snapshot(&context).await
}

/// POST `/api/review/refresh` — retry affordance after a failed listing
pub(crate) async fn refresh(context: Arc<ReviewContext>) -> Json<ReviewSnapshot> {
    context
        .controller
        .dispatch(ReviewEvent::RefreshRequested)
        .await;
    snapshot(&context).await
}

/// POST `/api/review/open/:id`
pub(crate) async fn open_details(
    context: Arc<ReviewContext>,
    Path(id): Path<String>,
) -> Result<Json<ReviewSnapshot>, StatusCode> {
    let Some(record) = context.controller.find_record(&id).await else {
        return Err(StatusCode::NOT_FOUND);
    };
    context
        .controller
        .dispatch(ReviewEvent::DetailsOpened { record })
        .await;
    Ok(snapshot(&context).await)
}

/// POST `/api/review/close`
pub(crate) async fn close_details(context: Arc<ReviewContext>) -> Json<ReviewSnapshot> {
    context
        .controller
        .dispatch(ReviewEvent::DetailsClosed)
        .await;
    snapshot(&context).await
}

/// POST `/api/review/action`
pub(crate) async fn stage_action(
    context: Arc<ReviewContext>,
    Json(action): Json<ReviewAction>,
) -> Json<ReviewSnapshot> {
    context
        .controller
        .dispatch(ReviewEvent::ActionStaged { action })
        .await;
    snapshot(&context).await
}

/// POST `/api/review/submit`
pub(crate) async fn submit(context: Arc<ReviewContext>) -> Json<ReviewSnapshot> {
    context
        .controller
        .dispatch(ReviewEvent::SubmitRequested)
        .await;
    snapshot(&context).await
}
