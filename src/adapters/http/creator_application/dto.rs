//! HTTP DTOs for creator application endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::creator_application::{
    ApplicationStatus, CreatorApplication, ReapplicationDecision, ReapplicationLock,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to apply for a creator account.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitApplicationRequest {
    pub user_id: String,
}

/// Request to reject a pending application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectApplicationRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub user_id: String,
    pub status: ApplicationStatus,
    pub submitted_at: String,
    pub reviewed_at: Option<String>,
    pub rejection_reason: Option<String>,
}

impl From<CreatorApplication> for ApplicationResponse {
    fn from(app: CreatorApplication) -> Self {
        Self {
            id: app.id.to_string(),
            user_id: app.user_id.to_string(),
            status: app.status,
            submitted_at: app.submitted_at.to_rfc3339(),
            reviewed_at: app.reviewed_at.map(|t| t.to_rfc3339()),
            rejection_reason: app.rejection_reason,
        }
    }
}

/// Whether and when a user may apply again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub rejection_count: u32,
    pub reapplication_allowed_at: Option<String>,
    pub requires_support: bool,
}

impl From<ReapplicationDecision> for EligibilityResponse {
    fn from(decision: ReapplicationDecision) -> Self {
        Self {
            eligible: decision.is_eligible(),
            rejection_count: decision.rejection_count,
            reapplication_allowed_at: decision.reapplication_allowed_at.map(|t| t.to_rfc3339()),
            requires_support: matches!(decision.lock, ReapplicationLock::RequiresSupport),
        }
    }
}

/// A rejected application plus the applicant's new eligibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionResponse {
    pub application: ApplicationResponse,
    pub reapplication: EligibilityResponse,
}
