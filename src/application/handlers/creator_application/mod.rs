//! Creator application handlers.
//!
//! ## Commands
//! - Submitting an application (subject to the reapplication lock)
//! - Rejecting or approving a pending application
//!
//! ## Queries
//! - Reapplication eligibility

mod check_reapplication;
mod review_application;
mod submit_application;

// Commands
pub use review_application::{
    ApproveCreatorApplicationCommand, ApproveCreatorApplicationHandler,
    ApproveCreatorApplicationResult, RejectCreatorApplicationCommand,
    RejectCreatorApplicationHandler, RejectCreatorApplicationResult,
};
pub use submit_application::{
    SubmitCreatorApplicationCommand, SubmitCreatorApplicationHandler,
    SubmitCreatorApplicationResult,
};

// Queries
pub use check_reapplication::{
    CheckReapplicationHandler, CheckReapplicationQuery, CheckReapplicationResult,
};
