use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a manual deposit submission
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DepositStatus {
    Pending,
    Approved,
    Rejected,
}

impl DepositStatus {
    /// Approved and rejected records accept no further transitions
    pub(crate) fn is_terminal(&self) -> bool {
        !matches!(self, DepositStatus::Pending)
    }
}

/// Status filter applied to the deposit listing
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    /// Query parameter value sent upstream; `All` omits the parameter
    pub(crate) fn as_query(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some("pending"),
            StatusFilter::Approved => Some("approved"),
            StatusFilter::Rejected => Some("rejected"),
        }
    }

}

/// A seller-submitted manual deposit awaiting admin review
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DepositRecord {
    pub id: String,
    pub seller_id: String,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub method_id: Option<String>,
    #[serde(default)]
    pub method_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, serialize_with = "serialize_display_currency")]
    pub currency: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub screenshot_mimetype: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    pub status: DepositStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DepositRecord {
    /// Amount used for aggregation; absent or invalid values count as zero
    pub(crate) fn amount_or_zero(&self) -> f64 {
        self.amount
            .filter(|a| a.is_finite() && *a >= 0.0)
            .unwrap_or(0.0)
    }

    /// Raw stored path of the proof-of-payment file, preferring the screenshot
    pub(crate) fn raw_proof_path(&self) -> Option<&str> {
        self.screenshot_url
            .as_deref()
            .or(self.file_url.as_deref())
    }
}

/// Absent currency renders as USD
fn serialize_display_currency<S>(
    currency: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(currency.as_deref().unwrap_or("USD"))
}

/// 1-based pagination metadata as reported by the marketplace backend
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub(crate) fn new(page: u64, limit: u64, total: u64) -> Self {
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }

    /// Clamp a requested page into the valid range; an empty collection
    /// still has page 1
    pub(crate) fn clamp_page(&self, page: u64) -> u64 {
        page.clamp(1, self.pages.max(1))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(1, 10, 0)
    }
}

/// One loaded page of deposit records
#[derive(Clone, Debug)]
pub(crate) struct DepositPage {
    pub records: Vec<DepositRecord>,
    pub pagination: Pagination,
}

/// Kind of status transition an admin can run on a pending deposit
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ReviewActionKind {
    Approve,
    Reject,
}

impl ReviewActionKind {
    pub(crate) fn target_status(&self) -> DepositStatus {
        match self {
            ReviewActionKind::Approve => DepositStatus::Approved,
            ReviewActionKind::Reject => DepositStatus::Rejected,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self.target_status() {
            DepositStatus::Approved => "approved",
            DepositStatus::Rejected => "rejected",
            DepositStatus::Pending => unreachable!(), // Never a transition target
        }
    }
}

/// A staged approve/reject decision with the admin's note
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReviewAction {
    #[serde(rename = "type")]
    pub kind: ReviewActionKind,
    #[serde(default)]
    pub note: String,
}

impl ReviewAction {
    pub(crate) fn approve() -> Self {
        Self {
            kind: ReviewActionKind::Approve,
            note: String::new(),
        }
    }
}

/// Test fixture shared by the workflow and summary tests
#[cfg(test)]
pub(crate) fn sample_record(id: &str, status: DepositStatus, amount: Option<f64>) -> DepositRecord {
    DepositRecord {
        id: id.to_string(),
        seller_id: format!("seller-{id}"),
        seller_name: None,
        method_id: None,
        method_name: None,
        amount,
        currency: None,
        screenshot_url: None,
        file_url: None,
        screenshot_mimetype: None,
        reference: None,
        status,
        admin_note: None,
        created_at: Utc::now(),
    }
}
