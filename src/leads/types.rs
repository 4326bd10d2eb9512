//! Lead records and their lifecycle

use serde::{Deserialize, Serialize};

/// Lifecycle status of a lead.
///
/// The advisory path is `new → pick|dnp → contacted → {callback,
/// not_interested, interested} → under-review → closed-success`. The client
/// does not enforce it; the backend is the authority on which transitions
/// are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Pick,
    Dnp,
    Contacted,
    Callback,
    NotInterested,
    Interested,
    #[serde(rename = "under-review")]
    UnderReview,
    #[serde(rename = "closed-success")]
    ClosedSuccess,
}

impl LeadStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Pick => "pick",
            LeadStatus::Dnp => "dnp",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Callback => "callback",
            LeadStatus::NotInterested => "not_interested",
            LeadStatus::Interested => "interested",
            LeadStatus::UnderReview => "under-review",
            LeadStatus::ClosedSuccess => "closed-success",
        }
    }

    /// The statuses the advisory lifecycle suggests next, for UI dropdowns.
    ///
    /// Advisory only: any status may still be submitted and the backend
    /// decides what it accepts.
    pub fn advisory_next(&self) -> &'static [LeadStatus] {
        match self {
            LeadStatus::New => &[LeadStatus::Pick, LeadStatus::Dnp],
            LeadStatus::Pick => &[LeadStatus::Contacted],
            LeadStatus::Contacted => &[
                LeadStatus::Callback,
                LeadStatus::NotInterested,
                LeadStatus::Interested,
            ],
            LeadStatus::Callback => &[LeadStatus::Contacted],
            LeadStatus::Interested => &[LeadStatus::UnderReview],
            LeadStatus::UnderReview => &[LeadStatus::ClosedSuccess],
            LeadStatus::Dnp | LeadStatus::NotInterested | LeadStatus::ClosedSuccess => &[],
        }
    }

    /// Whether no further action is expected for this status
    pub fn is_soft_terminal(&self) -> bool {
        matches!(self, LeadStatus::Dnp | LeadStatus::NotInterested)
    }
}

/// Verdict on a lead's payment proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentVerification {
    Unverified,
    Verified,
    Fake,
}

/// Board exam scores captured for a lead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardScore {
    #[serde(default)]
    pub pcm_score: Option<f64>,
    #[serde(default)]
    pub english_score: Option<f64>,
}

/// Sale-side details of a lead, filled in by the sales team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleDetails {
    #[serde(default)]
    pub status: Option<String>,
    /// Batch id the converted lead is assigned to
    #[serde(default)]
    pub batch: Option<i64>,
    #[serde(default)]
    pub buy_books: Option<bool>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Proof file references, set server-side after an upload
    #[serde(default)]
    pub payment_ss: Option<String>,
    #[serde(default)]
    pub discount_ss: Option<String>,
    #[serde(default)]
    pub books_ss: Option<String>,
    #[serde(default)]
    pub form_ss: Option<String>,
}

/// Accounts-side details of a lead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountDetails {
    #[serde(default)]
    pub payment_verification_status: Option<PaymentVerification>,
}

/// A prospective student record moving through the sales pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub source: String,
    pub status: LeadStatus,
    #[serde(default)]
    pub board_score: BoardScore,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    pub created_at: String,
    #[serde(default)]
    pub sale_details: SaleDetails,
    #[serde(default)]
    pub account_details: AccountDetails,
}

/// Partial update of a lead's sale details.
///
/// Only the fields actually set are serialized, so the PATCH body stays a
/// true partial update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SaleDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_books: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SaleDetailsPatch {
    /// Start an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(mut self, batch_id: i64) -> Self {
        self.batch = Some(batch_id);
        self
    }

    pub fn buy_books(mut self, value: bool) -> Self {
        self.buy_books = Some(value);
        self
    }

    pub fn discount(mut self, value: f64) -> Self {
        self.discount = Some(value);
        self
    }

    pub fn follow_up_date(mut self, date: impl Into<String>) -> Self {
        self.follow_up_date = Some(date.into());
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        let status: LeadStatus = serde_json::from_str("\"under-review\"").unwrap();
        assert_eq!(status, LeadStatus::UnderReview);
        assert_eq!(
            serde_json::to_string(&LeadStatus::ClosedSuccess).unwrap(),
            "\"closed-success\""
        );
        assert_eq!(
            serde_json::to_string(&LeadStatus::NotInterested).unwrap(),
            "\"not_interested\""
        );
    }

    #[test]
    fn advisory_lifecycle_shape() {
        assert_eq!(
            LeadStatus::New.advisory_next(),
            &[LeadStatus::Pick, LeadStatus::Dnp]
        );
        assert!(LeadStatus::Dnp.advisory_next().is_empty());
        assert!(LeadStatus::Dnp.is_soft_terminal());
        assert!(LeadStatus::NotInterested.is_soft_terminal());
        assert!(!LeadStatus::ClosedSuccess.is_soft_terminal());
    }

    #[test]
    fn lead_deserializes_with_sparse_details() {
        let lead: Lead = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Ravi",
                "contact_number": "555-0199",
                "email": "ravi@example.com",
                "source": "website",
                "status": "new",
                "created_at": "2026-01-10T09:00:00Z"
            }"#,
        )
        .unwrap();
        assert!(lead.assigned_to.is_none());
        assert!(lead.sale_details.batch.is_none());
        assert!(lead.account_details.payment_verification_status.is_none());
    }

    #[test]
    fn sale_details_patch_is_partial() {
        let patch = SaleDetailsPatch::new().batch(4).comment("call after 6pm");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["batch"], 4);
        assert_eq!(json["comment"], "call after 6pm");
        assert!(json.get("discount").is_none());
        assert!(json.get("buy_books").is_none());
    }
}
