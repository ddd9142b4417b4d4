use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::deposits::api::DepositApi;
use crate::deposits::summary::{summarize, PageSummary};
use crate::deposits::types::{
    DepositPage, DepositRecord, Pagination, ReviewAction, StatusFilter,
};

/// What the review session is currently doing
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ReviewPhase {
    /// No record selected
    Idle,
    /// Detail panel open for the selected record
    Viewing,
    /// A status transition is in flight
    Submitting,
}

/// Full state of one review session.
///
/// Mutated exclusively through [`reduce`]; the sequence counters let the
/// effect runner discard out-of-order responses so the last invocation
/// always wins.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewState {
    pub records: Vec<DepositRecord>,
    pub pagination: Pagination,
    pub status_filter: StatusFilter,
    pub page: u64,
    pub limit: u64,
    pub summary: PageSummary,
    pub selected: Option<DepositRecord>,
    pub pending_action: Option<ReviewAction>,
    pub phase: ReviewPhase,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    list_seq: u64,
    #[serde(skip)]
    detail_seq: u64,
}

impl ReviewState {
    pub(crate) fn new(limit: u64) -> Self {
        Self {
            records: Vec::new(),
            pagination: Pagination::new(1, limit, 0),
            status_filter: StatusFilter::default(),
            page: 1,
            limit: limit.max(1),
            summary: PageSummary::default(),
            selected: None,
            pending_action: None,
            phase: ReviewPhase::Idle,
            loading: false,
            error: None,
            list_seq: 0,
            detail_seq: 0,
        }
    }

    fn begin_list_fetch(&mut self) -> Effect {
        self.list_seq += 1;
        self.loading = true;
        self.error = None;
        Effect::FetchList {
            seq: self.list_seq,
            page: self.page,
            limit: self.limit,
            status: self.status_filter,
        }
    }
}

/// Everything that can happen to a review session
#[derive(Clone, Debug)]
pub(crate) enum ReviewEvent {
    FilterChanged(StatusFilter),
    PageChanged(u64),
    RefreshRequested,
    ListLoaded { seq: u64, page: DepositPage },
    ListFailed { seq: u64, message: String },
    DetailsOpened { record: DepositRecord },
    DetailLoaded { seq: u64, record: DepositRecord },
    DetailFailed { seq: u64 },
    ActionStaged { action: ReviewAction },
    SubmitRequested,
    SubmitSucceeded,
    SubmitFailed { message: String },
    DetailsClosed,
}

/// Side effects requested by the reducer and driven by the controller
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Effect {
    FetchList {
        seq: u64,
        page: u64,
        limit: u64,
        status: StatusFilter,
    },
    FetchDetail {
        seq: u64,
        id: String,
    },
    SubmitTransition {
        id: String,
        action: ReviewAction,
    },
}

/// Pure transition function of the review workflow. No I/O happens here;
/// fetches and submissions are returned as [`Effect`]s.
pub(crate) fn reduce(state: &mut ReviewState, event: ReviewEvent) -> Vec<Effect> {
    match event {
        ReviewEvent::FilterChanged(filter) => {
            // A filter change always restarts from the first page
            state.status_filter = filter;
            state.page = 1;
            vec![state.begin_list_fetch()]
        }

        ReviewEvent::PageChanged(page) => {
            let page = state.pagination.clamp_page(page);
            if page == state.page {
                return Vec::new();
            }
            state.page = page;
            vec![state.begin_list_fetch()]
        }

        ReviewEvent::RefreshRequested => vec![state.begin_list_fetch()],

        ReviewEvent::ListLoaded { seq, page } => {
            if seq != state.list_seq {
                // A newer fetch is already in flight
                return Vec::new();
            }

            state.records = dedupe_by_id(page.records);
            state.pagination = page.pagination;
            state.summary = summarize(&state.records);
            state.loading = false;
            state.error = None;

            // Never trust the server page blindly; if the collection shrank
            // below the current page, clamp and fetch the real last page
            let clamped = state.pagination.clamp_page(state.page);
            if clamped != state.page {
                state.page = clamped;
                return vec![state.begin_list_fetch()];
            }
            Vec::new()
        }

        ReviewEvent::ListFailed { seq, message } => {
            if seq != state.list_seq {
                return Vec::new();
            }
            // Prior records stay untouched so the admin keeps a usable view
            state.loading = false;
            state.error = Some(message);
            Vec::new()
        }

        ReviewEvent::DetailsOpened { record } => {
            state.phase = ReviewPhase::Viewing;
            state.pending_action = if record.status.is_terminal() {
                None
            } else {
                Some(ReviewAction::approve())
            };
            state.detail_seq += 1;
            let effect = Effect::FetchDetail {
                seq: state.detail_seq,
                id: record.id.clone(),
            };
            state.selected = Some(record);
            vec![effect]
        }

        ReviewEvent::DetailLoaded { seq, record } => {
            if seq != state.detail_seq || state.phase == ReviewPhase::Idle {
                return Vec::new();
            }
            if record.status.is_terminal() {
                // Another admin may have reviewed it while we were fetching
                state.pending_action = None;
            }
            state.selected = Some(record);
            Vec::new()
        }

        // The list-row copy already on screen is the fallback
        ReviewEvent::DetailFailed { seq: _ } => Vec::new(),

        ReviewEvent::ActionStaged { action } => {
            let can_stage = state.phase == ReviewPhase::Viewing
                && state
                    .selected
                    .as_ref()
                    .is_some_and(|r| !r.status.is_terminal());
            if can_stage {
                state.pending_action = Some(action);
            }
            Vec::new()
        }

        ReviewEvent::SubmitRequested => {
            if state.phase != ReviewPhase::Viewing {
                return Vec::new();
            }
            let Some(action) = state.pending_action.clone() else {
                return Vec::new();
            };
            let Some(record) = state.selected.as_ref() else {
                return Vec::new();
            };
            if record.status.is_terminal() {
                // Terminal records are rejected locally, without any call
                // to the transition service
                return Vec::new();
            }
            let id = record.id.clone();

            state.phase = ReviewPhase::Submitting;
            state.error = None;
            vec![Effect::SubmitTransition { id, action }]
        }

        ReviewEvent::SubmitSucceeded => {
            state.phase = ReviewPhase::Idle;
            state.selected = None;
            state.pending_action = None;
            // The transition endpoint returns no record; re-list to pick
            // up the new status
            vec![state.begin_list_fetch()]
        }

        ReviewEvent::SubmitFailed { message } => {
            // Keep the detail open so the admin can retry
            state.phase = ReviewPhase::Viewing;
            state.error = Some(message);
            Vec::new()
        }

        ReviewEvent::DetailsClosed => {
            state.phase = ReviewPhase::Idle;
            state.selected = None;
            state.pending_action = None;
            Vec::new()
        }
    }
}

/// The record id is the sole identity key for list de-duplication
fn dedupe_by_id(records: Vec<DepositRecord>) -> Vec<DepositRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}

/// Effect runner driving the review workflow against the marketplace API.
///
/// All mutation goes through [`reduce`] under a single write lock, taken
/// per reduction and never held across an await of an API call.
pub(crate) struct ReviewController {
    api: Arc<dyn DepositApi>,
    state: RwLock<ReviewState>,
}

impl ReviewController {
    pub(crate) fn new(api: Arc<dyn DepositApi>, page_limit: u64) -> Self {
        Self {
            api,
            state: RwLock::new(ReviewState::new(page_limit)),
        }
    }

    pub(crate) async fn snapshot(&self) -> ReviewState {
        self.state.read().await.clone()
    }

    /// Look up a record on the currently loaded page
    pub(crate) async fn find_record(&self, id: &str) -> Option<DepositRecord> {
        let state = self.state.read().await;
        state.records.iter().find(|r| r.id == id).cloned()
    }

    /// Apply an event, then run the resulting effects to completion,
    /// feeding each follow-up event back through the reducer
    pub(crate) async fn dispatch(&self, event: ReviewEvent) {
        let mut queue = {
            let mut state = self.state.write().await;
            reduce(&mut state, event)
        };

        while !queue.is_empty() {
            let mut follow_ups = Vec::new();
            for effect in queue.drain(..) {
                if let Some(event) = self.run_effect(effect).await {
                    let mut state = self.state.write().await;
                    follow_ups.extend(reduce(&mut state, event));
                }
            }
            queue = follow_ups;
        }
    }

    async fn run_effect(&self, effect: Effect) -> Option<ReviewEvent> {
        match effect {
            Effect::FetchList {
                seq,
                page,
                limit,
                status,
            } => match self.api.list(page, limit, status).await {
                Ok(page) => Some(ReviewEvent::ListLoaded { seq, page }),
                Err(e) => {
                    error!(error = %e, page, "Failed to fetch deposit listing");
                    Some(ReviewEvent::ListFailed {
                        seq,
                        message: e.to_string(),
                    })
                }
            },

            Effect::FetchDetail { seq, id } => match self.api.get_by_id(&id).await {
                Ok(record) => Some(ReviewEvent::DetailLoaded { seq, record }),
                Err(e) => {
                    warn!(error = %e, %id, "Falling back to list row for deposit detail");
                    Some(ReviewEvent::DetailFailed { seq })
                }
            },

            Effect::SubmitTransition { id, action } => {
                match self.api.update_status(&id, &action).await {
                    Ok(()) => {
                        info!(%id, action = ?action.kind, "Deposit transition applied");
                        Some(ReviewEvent::SubmitSucceeded)
                    }
                    Err(e) => {
                        error!(error = %e, %id, "Deposit transition failed");
                        Some(ReviewEvent::SubmitFailed {
                            message: e.to_string(),
                        })
                    }
                }
            }
        }
    }
}
