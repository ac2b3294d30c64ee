//! Flow-state resolver — classifies a profile into an onboarding state.
//!
//! Each track (worker, job seeker) walks the same three tiers, first match
//! wins:
//!
//! 1. role profile exists → verified / pending
//! 2. subscription exists → profile required
//! 3. otherwise the KYC status decides
//!
//! The tiers are shared; what differs per track is which fields are read,
//! how strictly the verified flag is checked, and whether another track's
//! fields stand in when this track's are unset. That is captured in a
//! [`TrackSelector`].

use serde::{Deserialize, Serialize};

use super::model::{id_is_set, KycStatus, LooseFlag, RecordId, UserProfile};

/// Onboarding track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Worker,
    JobSeeker,
}

impl Track {
    /// Field selector used to resolve this track.
    pub fn selector(self) -> &'static TrackSelector {
        match self {
            Self::Worker => &WORKER_TRACK,
            Self::JobSeeker => &JOB_SEEKER_TRACK,
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Worker => write!(f, "worker"),
            Self::JobSeeker => write!(f, "job_seeker"),
        }
    }
}

/// How a verified flag is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Only JSON `true` counts.
    Strict,
    /// `true`, `1` and `"true"` count.
    Loose,
}

impl Verification {
    pub fn accepts(self, flag: Option<&LooseFlag>) -> bool {
        match (self, flag) {
            (_, None) => false,
            (Self::Strict, Some(flag)) => flag.is_strictly_true(),
            (Self::Loose, Some(flag)) => flag.is_truthy(),
        }
    }
}

/// Which profile fields a track reads.
pub struct TrackSelector {
    pub profile_id: fn(&UserProfile) -> Option<&RecordId>,
    pub subscription_id: fn(&UserProfile) -> Option<&RecordId>,
    pub verified: fn(&UserProfile) -> Option<&LooseFlag>,
    pub verification: Verification,
    /// Selector consulted as well when this track's own fields are unset.
    pub fallback: Option<&'static TrackSelector>,
}

impl TrackSelector {
    /// This selector followed by its fallbacks.
    pub fn chain(&self) -> impl Iterator<Item = &TrackSelector> {
        std::iter::successors(Some(self), |selector| selector.fallback)
    }

    pub fn has_profile(&self, profile: &UserProfile) -> bool {
        self.chain()
            .any(|selector| id_is_set((selector.profile_id)(profile)))
    }

    pub fn has_subscription(&self, profile: &UserProfile) -> bool {
        self.chain()
            .any(|selector| id_is_set((selector.subscription_id)(profile)))
    }

    pub fn is_verified(&self, profile: &UserProfile) -> bool {
        self.chain()
            .any(|selector| self.verification.accepts((selector.verified)(profile)))
    }
}

impl std::fmt::Debug for TrackSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackSelector")
            .field("verification", &self.verification)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

fn worker_profile_id(p: &UserProfile) -> Option<&RecordId> {
    p.worker_profile_id.as_ref()
}

fn worker_subscription_id(p: &UserProfile) -> Option<&RecordId> {
    p.subscription_id.as_ref()
}

fn worker_is_verified(p: &UserProfile) -> Option<&LooseFlag> {
    p.worker_is_verified.as_ref()
}

fn job_seeker_profile_id(p: &UserProfile) -> Option<&RecordId> {
    p.job_seeker_profile_id.as_ref()
}

fn job_seeker_subscription_id(p: &UserProfile) -> Option<&RecordId> {
    p.job_seeker_subscription_id.as_ref()
}

fn job_seeker_is_verified(p: &UserProfile) -> Option<&LooseFlag> {
    p.job_seeker_is_verified.as_ref()
}

/// Worker fields, strict `=== true` verification, no fallback.
pub static WORKER_TRACK: TrackSelector = TrackSelector {
    profile_id: worker_profile_id,
    subscription_id: worker_subscription_id,
    verified: worker_is_verified,
    verification: Verification::Strict,
    fallback: None,
};

/// Job-seeker fields, loose verification, falling back to worker fields.
pub static JOB_SEEKER_TRACK: TrackSelector = TrackSelector {
    profile_id: job_seeker_profile_id,
    subscription_id: job_seeker_subscription_id,
    verified: job_seeker_is_verified,
    verification: Verification::Loose,
    fallback: Some(&WORKER_TRACK),
};

/// Track-neutral result of the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackStage {
    KycRequired,
    KycUnderReview,
    KycRejected,
    SubscriptionRequired,
    ProfileRequired,
    ProfilePending,
    ProfileVerified,
}

/// Resolve a profile against one track. Total: never fails, never panics.
pub fn resolve_stage(profile: &UserProfile, track: &TrackSelector) -> TrackStage {
    if track.has_profile(profile) {
        return if track.is_verified(profile) {
            TrackStage::ProfileVerified
        } else {
            TrackStage::ProfilePending
        };
    }

    if track.has_subscription(profile) {
        return TrackStage::ProfileRequired;
    }

    match profile.kyc_status {
        Some(KycStatus::Approved) => TrackStage::SubscriptionRequired,
        Some(KycStatus::Submitted) => TrackStage::KycUnderReview,
        Some(KycStatus::Rejected) => TrackStage::KycRejected,
        Some(KycStatus::Pending) | Some(KycStatus::Unknown(_)) | None => TrackStage::KycRequired,
    }
}

/// Where a flow currently stands, including the UI-only bookkeeping states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Loading,
    At(TrackStage),
    Complete,
}

/// Worker onboarding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    KycRequired,
    KycUnderReview,
    KycRejected,
    SubscriptionRequired,
    WorkerProfileRequired,
    WorkerPending,
    WorkerVerified,
    Complete,
    Loading,
}

impl FlowState {
    pub fn progress(self) -> Progress {
        match self {
            Self::KycRequired => Progress::At(TrackStage::KycRequired),
            Self::KycUnderReview => Progress::At(TrackStage::KycUnderReview),
            Self::KycRejected => Progress::At(TrackStage::KycRejected),
            Self::SubscriptionRequired => Progress::At(TrackStage::SubscriptionRequired),
            Self::WorkerProfileRequired => Progress::At(TrackStage::ProfileRequired),
            Self::WorkerPending => Progress::At(TrackStage::ProfilePending),
            Self::WorkerVerified => Progress::At(TrackStage::ProfileVerified),
            Self::Complete => Progress::Complete,
            Self::Loading => Progress::Loading,
        }
    }
}

impl From<TrackStage> for FlowState {
    fn from(stage: TrackStage) -> Self {
        match stage {
            TrackStage::KycRequired => Self::KycRequired,
            TrackStage::KycUnderReview => Self::KycUnderReview,
            TrackStage::KycRejected => Self::KycRejected,
            TrackStage::SubscriptionRequired => Self::SubscriptionRequired,
            TrackStage::ProfileRequired => Self::WorkerProfileRequired,
            TrackStage::ProfilePending => Self::WorkerPending,
            TrackStage::ProfileVerified => Self::WorkerVerified,
        }
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::KycRequired => "kyc_required",
            Self::KycUnderReview => "kyc_under_review",
            Self::KycRejected => "kyc_rejected",
            Self::SubscriptionRequired => "subscription_required",
            Self::WorkerProfileRequired => "worker_profile_required",
            Self::WorkerPending => "worker_pending",
            Self::WorkerVerified => "worker_verified",
            Self::Complete => "complete",
            Self::Loading => "loading",
        };
        write!(f, "{s}")
    }
}

/// Job-seeker onboarding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobFlowState {
    KycRequired,
    KycUnderReview,
    KycRejected,
    JobSubscriptionRequired,
    JobProfileRequired,
    JobProfilePending,
    JobProfileVerified,
    Complete,
    Loading,
}

impl JobFlowState {
    pub fn progress(self) -> Progress {
        match self {
            Self::KycRequired => Progress::At(TrackStage::KycRequired),
            Self::KycUnderReview => Progress::At(TrackStage::KycUnderReview),
            Self::KycRejected => Progress::At(TrackStage::KycRejected),
            Self::JobSubscriptionRequired => Progress::At(TrackStage::SubscriptionRequired),
            Self::JobProfileRequired => Progress::At(TrackStage::ProfileRequired),
            Self::JobProfilePending => Progress::At(TrackStage::ProfilePending),
            Self::JobProfileVerified => Progress::At(TrackStage::ProfileVerified),
            Self::Complete => Progress::Complete,
            Self::Loading => Progress::Loading,
        }
    }
}

impl From<TrackStage> for JobFlowState {
    fn from(stage: TrackStage) -> Self {
        match stage {
            TrackStage::KycRequired => Self::KycRequired,
            TrackStage::KycUnderReview => Self::KycUnderReview,
            TrackStage::KycRejected => Self::KycRejected,
            TrackStage::SubscriptionRequired => Self::JobSubscriptionRequired,
            TrackStage::ProfileRequired => Self::JobProfileRequired,
            TrackStage::ProfilePending => Self::JobProfilePending,
            TrackStage::ProfileVerified => Self::JobProfileVerified,
        }
    }
}

impl std::fmt::Display for JobFlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::KycRequired => "kyc_required",
            Self::KycUnderReview => "kyc_under_review",
            Self::KycRejected => "kyc_rejected",
            Self::JobSubscriptionRequired => "job_subscription_required",
            Self::JobProfileRequired => "job_profile_required",
            Self::JobProfilePending => "job_profile_pending",
            Self::JobProfileVerified => "job_profile_verified",
            Self::Complete => "complete",
            Self::Loading => "loading",
        };
        write!(f, "{s}")
    }
}

/// Resolve the worker flow state.
pub fn determine_flow_state(profile: &UserProfile) -> FlowState {
    resolve_stage(profile, &WORKER_TRACK).into()
}

/// Resolve the job-seeker flow state, reading worker fields where the
/// job-seeker ones are unset.
pub fn determine_job_flow_state(profile: &UserProfile) -> JobFlowState {
    resolve_stage(profile, &JOB_SEEKER_TRACK).into()
}
