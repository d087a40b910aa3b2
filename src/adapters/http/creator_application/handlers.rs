//! HTTP handlers for creator application endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::creator_application::{
    ApproveCreatorApplicationCommand, ApproveCreatorApplicationHandler, CheckReapplicationHandler,
    CheckReapplicationQuery, RejectCreatorApplicationCommand, RejectCreatorApplicationHandler,
    SubmitCreatorApplicationCommand, SubmitCreatorApplicationHandler,
};
use crate::domain::creator_application::{CreatorApplicationError, ReapplicationPolicy};
use crate::domain::foundation::{ApplicationId, ErrorCode, UserId, ValidationError};
use crate::ports::{AccountDirectory, Clock, CreatorApplicationRepository};

use super::super::error::ErrorResponse;
use super::dto::{
    ApplicationResponse, EligibilityResponse, RejectApplicationRequest, RejectionResponse,
    SubmitApplicationRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CreatorApplicationAppState {
    pub repository: Arc<dyn CreatorApplicationRepository>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub clock: Arc<dyn Clock>,
    pub policy: ReapplicationPolicy,
}

impl CreatorApplicationAppState {
    pub fn submit_handler(&self) -> SubmitCreatorApplicationHandler {
        SubmitCreatorApplicationHandler::new(
            self.repository.clone(),
            self.accounts.clone(),
            self.clock.clone(),
            self.policy,
        )
    }

    pub fn reject_handler(&self) -> RejectCreatorApplicationHandler {
        RejectCreatorApplicationHandler::new(
            self.repository.clone(),
            self.clock.clone(),
            self.policy,
        )
    }

    pub fn approve_handler(&self) -> ApproveCreatorApplicationHandler {
        ApproveCreatorApplicationHandler::new(
            self.repository.clone(),
            self.accounts.clone(),
            self.clock.clone(),
        )
    }

    pub fn eligibility_handler(&self) -> CheckReapplicationHandler {
        CheckReapplicationHandler::new(self.repository.clone(), self.clock.clone(), self.policy)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/creator-applications - Apply for a creator account
pub async fn submit_application(
    State(state): State<CreatorApplicationAppState>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<impl IntoResponse, CreatorApplicationApiError> {
    let user_id = UserId::new(request.user_id)?;

    let application = state
        .submit_handler()
        .handle(SubmitCreatorApplicationCommand { user_id })
        .await?;

    Ok((StatusCode::CREATED, Json(ApplicationResponse::from(application))))
}

/// POST /api/creator-applications/:id/reject
pub async fn reject_application(
    State(state): State<CreatorApplicationAppState>,
    Path(id): Path<String>,
    body: Option<Json<RejectApplicationRequest>>,
) -> Result<impl IntoResponse, CreatorApplicationApiError> {
    let application_id = parse_application_id(&id)?;
    let reason = body.and_then(|Json(req)| req.reason);

    let result = state
        .reject_handler()
        .handle(RejectCreatorApplicationCommand {
            application_id,
            reason,
        })
        .await?;

    Ok(Json(RejectionResponse {
        application: ApplicationResponse::from(result.application),
        reapplication: EligibilityResponse::from(result.reapplication),
    }))
}

/// POST /api/creator-applications/:id/approve
pub async fn approve_application(
    State(state): State<CreatorApplicationAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CreatorApplicationApiError> {
    let application_id = parse_application_id(&id)?;

    let application = state
        .approve_handler()
        .handle(ApproveCreatorApplicationCommand { application_id })
        .await?;

    Ok(Json(ApplicationResponse::from(application)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/creator-applications/eligibility/:user_id
pub async fn get_eligibility(
    State(state): State<CreatorApplicationAppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, CreatorApplicationApiError> {
    let user_id = UserId::new(user_id)?;

    let decision = state
        .eligibility_handler()
        .handle(CheckReapplicationQuery { user_id })
        .await?;

    Ok(Json(EligibilityResponse::from(decision)))
}

fn parse_application_id(id: &str) -> Result<ApplicationId, ValidationError> {
    id.parse()
        .map_err(|_| ValidationError::invalid_format("application_id", "must be a UUID"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum CreatorApplicationApiError {
    BadRequest(ValidationError),
    Domain(CreatorApplicationError),
}

impl From<ValidationError> for CreatorApplicationApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err)
    }
}

impl From<CreatorApplicationError> for CreatorApplicationApiError {
    fn from(err: CreatorApplicationError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for CreatorApplicationApiError {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            Self::BadRequest(err) => {
                let body = ErrorResponse::with_details(
                    ErrorCode::ValidationFailed.to_string(),
                    err.to_string(),
                    serde_json::json!({ "field": err.field() }),
                );
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            Self::Domain(err) => err,
        };

        let status = match &err {
            CreatorApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
            CreatorApplicationError::ReapplicationLocked { .. }
            | CreatorApplicationError::RequiresSupport { .. }
            | CreatorApplicationError::AlreadyPending(_)
            | CreatorApplicationError::AlreadyReviewed(_)
            | CreatorApplicationError::AlreadyCreator(_)
            | CreatorApplicationError::InvalidState { .. } => StatusCode::CONFLICT,
            CreatorApplicationError::Infrastructure(_) => {
                tracing::warn!(error = %err, "Creator application request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let code = err.code().to_string();
        let body = match &err {
            CreatorApplicationError::ReapplicationLocked { allowed_at } => {
                ErrorResponse::with_details(
                    code,
                    err.to_string(),
                    serde_json::json!({ "reapplication_allowed_at": allowed_at.to_rfc3339() }),
                )
            }
            CreatorApplicationError::RequiresSupport { rejection_count } => {
                ErrorResponse::with_details(
                    code,
                    err.to_string(),
                    serde_json::json!({ "rejection_count": rejection_count }),
                )
            }
            _ => ErrorResponse::new(code, err.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
