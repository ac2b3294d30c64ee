//! Onboarding flow — KYC → subscription → role profile, per track.
//!
//! A user profile snapshot is classified into a flow state for the worker
//! track and, independently, for the job-seeker track. The states drive the
//! status card, the three-step progress card, and which setup modal opens
//! on its own. Nothing here is persisted; states are recomputed from the
//! snapshot on every read.

pub mod manager;
pub mod model;
pub mod plans;
pub mod progress;
pub mod routes;
pub mod source;
pub mod state;
pub mod status;

pub use manager::{OnboardingStatus, ProfileManager};
pub use model::{ExtendedDate, JobSeekerProfile, KycStatus, LooseFlag, RecordId, UserProfile};
pub use plans::{SubscriptionPlan, find_plan, job_seeker_plans, worker_plans};
pub use progress::{SetupModal, SetupStep, StepStatus};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use source::{FileProfileSource, ProfileSource};
pub use state::{
    FlowState, JobFlowState, Track, TrackSelector, TrackStage, determine_flow_state,
    determine_job_flow_state,
};
pub use status::{StatusSummary, job_setup_status, worker_setup_status};
