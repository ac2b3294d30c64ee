//! Status summaries shown on the profile card for each track.

use serde::{Deserialize, Serialize};

use super::model::UserProfile;
use super::state::{determine_flow_state, determine_job_flow_state, FlowState, JobFlowState};

const RED: &str = "#EF4444";
const AMBER: &str = "#F59E0B";
const VIOLET: &str = "#8B5CF6";
const GREEN: &str = "#10B981";
const GRAY: &str = "#6B7280";

/// Label, color and one-line description for a flow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub label: String,
    pub color: String,
    pub description: String,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl StatusSummary {
    fn new(label: &str, color: &str, description: &str, is_complete: bool) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            description: description.to_string(),
            is_complete,
        }
    }

    /// Shown before the profile has loaded.
    pub fn loading() -> Self {
        Self::new("Loading...", GRAY, "Please wait", false)
    }
}

/// Summary for the worker track. `None` means the profile is still loading.
pub fn worker_setup_status(profile: Option<&UserProfile>) -> StatusSummary {
    match profile {
        Some(profile) => worker_summary(determine_flow_state(profile)),
        None => StatusSummary::loading(),
    }
}

/// Summary for the job-seeker track. `None` means the profile is still loading.
pub fn job_setup_status(profile: Option<&UserProfile>) -> StatusSummary {
    match profile {
        Some(profile) => job_summary(determine_job_flow_state(profile)),
        None => StatusSummary::loading(),
    }
}

pub fn worker_summary(state: FlowState) -> StatusSummary {
    match state {
        FlowState::KycRequired => StatusSummary::new(
            "KYC Required",
            RED,
            "Complete verification to become a worker",
            false,
        ),
        FlowState::KycUnderReview => StatusSummary::new(
            "KYC Under Review",
            AMBER,
            "Documents are being verified",
            false,
        ),
        FlowState::KycRejected => {
            StatusSummary::new("KYC Rejected", RED, "Please resubmit documents", false)
        }
        FlowState::SubscriptionRequired => StatusSummary::new(
            "Choose Plan",
            VIOLET,
            "Subscribe to create worker profile",
            false,
        ),
        FlowState::WorkerProfileRequired => {
            StatusSummary::new("Create Profile", GREEN, "Set up your worker profile", false)
        }
        FlowState::WorkerPending => {
            StatusSummary::new("Under Review", AMBER, "Profile is being verified", false)
        }
        FlowState::WorkerVerified => {
            StatusSummary::new("Verified", GREEN, "Ready to receive jobs", true)
        }
        FlowState::Complete | FlowState::Loading => {
            StatusSummary::new("Setup Required", GRAY, "Complete your worker setup", false)
        }
    }
}

pub fn job_summary(state: JobFlowState) -> StatusSummary {
    match state {
        JobFlowState::KycRequired => StatusSummary::new(
            "KYC Required",
            RED,
            "Complete verification to find jobs",
            false,
        ),
        JobFlowState::KycUnderReview => StatusSummary::new(
            "KYC Under Review",
            AMBER,
            "Documents are being verified",
            false,
        ),
        JobFlowState::KycRejected => {
            StatusSummary::new("KYC Rejected", RED, "Please resubmit documents", false)
        }
        JobFlowState::JobSubscriptionRequired => StatusSummary::new(
            "Choose Plan",
            VIOLET,
            "Subscribe to create job profile",
            false,
        ),
        JobFlowState::JobProfileRequired => StatusSummary::new(
            "Create Profile",
            GREEN,
            "Set up your job seeker profile",
            false,
        ),
        JobFlowState::JobProfilePending => {
            StatusSummary::new("Under Review", AMBER, "Profile is being verified", false)
        }
        JobFlowState::JobProfileVerified => {
            StatusSummary::new("Verified", GREEN, "Ready to apply for jobs", true)
        }
        JobFlowState::Complete | JobFlowState::Loading => StatusSummary::new(
            "Setup Required",
            GRAY,
            "Complete your job seeker setup",
            false,
        ),
    }
}
