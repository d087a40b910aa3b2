//! Creator application domain module.
//!
//! Users apply to become creators; reviewers approve or reject. Repeated
//! rejections lock reapplication, first behind a cooldown and then behind
//! support.

mod aggregate;
mod errors;
mod policy;
mod status;

pub use aggregate::CreatorApplication;
pub use errors::CreatorApplicationError;
pub use policy::{ReapplicationDecision, ReapplicationLock, ReapplicationPolicy};
pub use status::ApplicationStatus;
