//! Setup progress steps and the modal that opens for a given state.

use serde::{Deserialize, Serialize};

use super::model::UserProfile;
use super::state::{FlowState, JobFlowState, Progress, Track, TrackStage};

/// Status of one progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
}

/// One row of the three-step setup progress card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupStep {
    pub number: u8,
    pub title: &'static str,
    pub status: StepStatus,
}

/// Modals in the setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupModal {
    Kyc,
    Subscription,
    WorkerProfile,
    JobProfile,
}

impl SetupModal {
    /// Modal to open once this one completes successfully.
    pub fn next_after_success(self, track: Track) -> Option<SetupModal> {
        match self {
            Self::Kyc => Some(Self::Subscription),
            Self::Subscription => Some(track.profile_modal()),
            Self::WorkerProfile | Self::JobProfile => None,
        }
    }
}

impl Track {
    pub fn profile_modal(self) -> SetupModal {
        match self {
            Self::Worker => SetupModal::WorkerProfile,
            Self::JobSeeker => SetupModal::JobProfile,
        }
    }

    fn profile_step_title(self) -> &'static str {
        match self {
            Self::Worker => "Create Worker Profile",
            Self::JobSeeker => "Create Job Profile",
        }
    }

    /// Modal that opens by itself when the screen lands in `stage`.
    ///
    /// KYC has its own screen, so the KYC modal never opens by itself.
    pub fn auto_open_modal(self, stage: TrackStage) -> Option<SetupModal> {
        match stage {
            TrackStage::SubscriptionRequired => Some(SetupModal::Subscription),
            TrackStage::ProfileRequired => Some(self.profile_modal()),
            TrackStage::KycRequired
            | TrackStage::KycUnderReview
            | TrackStage::KycRejected
            | TrackStage::ProfilePending
            | TrackStage::ProfileVerified => None,
        }
    }

    /// Progress steps for a track.
    pub fn progress_steps(self, progress: Progress, profile: Option<&UserProfile>) -> [SetupStep; 3] {
        let (kyc, subscription, role_profile) = match progress {
            Progress::Loading => (StepStatus::Pending, StepStatus::Pending, StepStatus::Pending),
            Progress::Complete => (
                StepStatus::Completed,
                StepStatus::Completed,
                StepStatus::Completed,
            ),
            Progress::At(stage) => {
                let subscribed =
                    profile.is_some_and(|p| self.selector().has_subscription(p));
                (
                    kyc_step(stage),
                    subscription_step(stage, subscribed),
                    profile_step(stage),
                )
            }
        };

        [
            SetupStep {
                number: 1,
                title: "KYC Verification",
                status: kyc,
            },
            SetupStep {
                number: 2,
                title: "Choose Subscription",
                status: subscription,
            },
            SetupStep {
                number: 3,
                title: self.profile_step_title(),
                status: role_profile,
            },
        ]
    }
}

fn kyc_step(stage: TrackStage) -> StepStatus {
    match stage {
        TrackStage::KycRequired | TrackStage::KycRejected => StepStatus::Active,
        TrackStage::KycUnderReview => StepStatus::Pending,
        _ => StepStatus::Completed,
    }
}

fn subscription_step(stage: TrackStage, subscribed: bool) -> StepStatus {
    match stage {
        TrackStage::KycRequired | TrackStage::KycRejected => StepStatus::Pending,
        TrackStage::SubscriptionRequired => StepStatus::Active,
        // Users may pay while their documents are still being reviewed
        TrackStage::KycUnderReview if !subscribed => StepStatus::Active,
        _ => StepStatus::Completed,
    }
}

fn profile_step(stage: TrackStage) -> StepStatus {
    match stage {
        TrackStage::KycRequired
        | TrackStage::KycRejected
        | TrackStage::KycUnderReview
        | TrackStage::SubscriptionRequired => StepStatus::Pending,
        TrackStage::ProfileRequired => StepStatus::Active,
        TrackStage::ProfilePending | TrackStage::ProfileVerified => StepStatus::Completed,
    }
}

/// Progress steps for the worker setup screen.
pub fn worker_progress_steps(state: FlowState, profile: Option<&UserProfile>) -> [SetupStep; 3] {
    Track::Worker.progress_steps(state.progress(), profile)
}

/// Progress steps for the job-seeker setup screen.
pub fn job_progress_steps(state: JobFlowState, profile: Option<&UserProfile>) -> [SetupStep; 3] {
    Track::JobSeeker.progress_steps(state.progress(), profile)
}

/// Modal the worker screen opens on its own, if any.
pub fn worker_auto_open_modal(state: FlowState) -> Option<SetupModal> {
    match state.progress() {
        Progress::At(stage) => Track::Worker.auto_open_modal(stage),
        Progress::Loading | Progress::Complete => None,
    }
}

/// Modal the job-seeker screen opens on its own, if any.
pub fn job_auto_open_modal(state: JobFlowState) -> Option<SetupModal> {
    match state.progress() {
        Progress::At(stage) => Track::JobSeeker.auto_open_modal(stage),
        Progress::Loading | Progress::Complete => None,
    }
}
