use serde::{Deserialize, Serialize};

use crate::deposits::types::{DepositRecord, DepositStatus};

/// Counts and amount total for the currently loaded page of records.
/// Page-scoped only; never aggregates beyond what is in memory.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageSummary {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub amount_total: f64,
}

/// Single pass over the loaded records
pub(crate) fn summarize(records: &[DepositRecord]) -> PageSummary {
    let mut summary = PageSummary::default();

    for record in records {
        summary.total += 1;
        match record.status {
            DepositStatus::Pending => summary.pending += 1,
            DepositStatus::Approved => summary.approved += 1,
            DepositStatus::Rejected => summary.rejected += 1,
        }
        summary.amount_total += record.amount_or_zero();
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposits::types::sample_record;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), PageSummary::default());
    }

    #[test]
    fn test_summarize_counts_and_amounts() {
        let records = vec![
            sample_record("a", DepositStatus::Pending, Some(10.0)),
            sample_record("b", DepositStatus::Approved, Some(25.5)),
            sample_record("c", DepositStatus::Rejected, None),
            sample_record("d", DepositStatus::Pending, Some(4.5)),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.amount_total, 40.0);
    }

    #[test]
    fn test_status_counts_cover_all_records() {
        let records = vec![
            sample_record("a", DepositStatus::Pending, Some(1.0)),
            sample_record("b", DepositStatus::Approved, Some(-7.0)),
            sample_record("c", DepositStatus::Rejected, Some(f64::INFINITY)),
        ];

        let summary = summarize(&records);
        assert_eq!(
            summary.pending + summary.approved + summary.rejected,
            records.len() as u64
        );
        // Invalid amounts count as zero
        assert_eq!(summary.amount_total, 1.0);
    }
}
