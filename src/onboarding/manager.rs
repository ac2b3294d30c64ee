//! ProfileManager — loads the user profile, normalizes it, and derives the
//! onboarding status for both tracks.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::model::{id_is_set, UserProfile};
use super::progress::{
    job_auto_open_modal, job_progress_steps, worker_auto_open_modal, worker_progress_steps,
    SetupModal, SetupStep,
};
use super::source::ProfileSource;
use super::state::{determine_flow_state, determine_job_flow_state, FlowState, JobFlowState};
use super::status::{job_summary, worker_summary, StatusSummary};
use crate::error::ApiError;
use crate::format::format_subscription_expiry;

/// Everything the setup screens need, derived from one profile snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    /// False until the first successful load.
    pub loaded: bool,
    pub flow_state: FlowState,
    pub job_flow_state: JobFlowState,
    pub worker_status: StatusSummary,
    pub job_status: StatusSummary,
    pub worker_steps: [SetupStep; 3],
    pub job_steps: [SetupStep; 3],
    /// Modal the worker screen should open on its own.
    pub worker_modal: Option<SetupModal>,
    pub job_modal: Option<SetupModal>,
    pub subscription_expiry: String,
    pub job_subscription_expiry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

impl OnboardingStatus {
    /// Derive the status. `None` yields the loading status.
    pub fn from_profile(profile: Option<&UserProfile>) -> Self {
        let (flow_state, job_flow_state) = match profile {
            Some(p) => (determine_flow_state(p), determine_job_flow_state(p)),
            None => (FlowState::Loading, JobFlowState::Loading),
        };

        let (worker_status, job_status) = match profile {
            Some(_) => (worker_summary(flow_state), job_summary(job_flow_state)),
            None => (StatusSummary::loading(), StatusSummary::loading()),
        };

        Self {
            loaded: profile.is_some(),
            flow_state,
            job_flow_state,
            worker_status,
            job_status,
            worker_steps: worker_progress_steps(flow_state, profile),
            job_steps: job_progress_steps(job_flow_state, profile),
            worker_modal: worker_auto_open_modal(flow_state),
            job_modal: job_auto_open_modal(job_flow_state),
            subscription_expiry: format_subscription_expiry(
                profile.and_then(|p| p.subscription_expires_at.as_ref()),
            ),
            job_subscription_expiry: format_subscription_expiry(
                profile.and_then(|p| p.job_seeker_subscription_expires_at.as_ref()),
            ),
            profile: profile.cloned(),
        }
    }
}

/// Holds the latest profile snapshot and recomputes state on every read.
pub struct ProfileManager {
    source: Arc<dyn ProfileSource>,
    profile: Arc<RwLock<Option<UserProfile>>>,
}

impl ProfileManager {
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        Self {
            source,
            profile: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch, normalize and cache the profile.
    ///
    /// An authorization failure signs the user out: the cached profile and
    /// the source's credentials are dropped before the error is returned.
    pub async fn load(&self) -> Result<OnboardingStatus, ApiError> {
        let mut profile = match self.source.fetch_user_profile().await {
            Ok(profile) => profile,
            Err(e) if e.is_auth_failure() => {
                tracing::warn!(error = %e, "Profile fetch not authorized, signing out");
                self.sign_out().await;
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load user profile");
                return Err(e);
            }
        };

        profile.normalize_job_seeker_fields();

        if id_is_set(profile.job_seeker_profile_id.as_ref()) {
            match self.source.fetch_job_seeker_profile().await {
                Ok(Some(record)) => {
                    if profile.backfill_job_seeker_verification(&record) {
                        tracing::debug!("Took job seeker verification from job seeker profile");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch job seeker profile");
                }
            }
        }

        let status = OnboardingStatus::from_profile(Some(&profile));
        tracing::debug!(
            flow_state = %status.flow_state,
            job_flow_state = %status.job_flow_state,
            "Resolved onboarding state"
        );

        *self.profile.write().await = Some(profile);
        Ok(status)
    }

    /// Current status, recomputed from the cached profile.
    pub async fn status(&self) -> OnboardingStatus {
        let profile = self.profile.read().await;
        OnboardingStatus::from_profile(profile.as_ref())
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    /// Drop the cached profile and the source's credentials.
    pub async fn sign_out(&self) {
        *self.profile.write().await = None;
        self.source.sign_out().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::onboarding::model::{
        ExtendedDate, JobSeekerProfile, KycStatus, LooseFlag, RecordId,
    };
    use crate::onboarding::progress::StepStatus;

    /// Stub source returning canned responses.
    struct StubSource {
        profile: Mutex<Result<UserProfile, fn() -> ApiError>>,
        job_seeker: Option<JobSeekerProfile>,
        job_seeker_fetches: AtomicUsize,
        sign_outs: AtomicUsize,
    }

    impl StubSource {
        fn with_profile(profile: UserProfile) -> Self {
            Self {
                profile: Mutex::new(Ok(profile)),
                job_seeker: None,
                job_seeker_fetches: AtomicUsize::new(0),
                sign_outs: AtomicUsize::new(0),
            }
        }

        fn failing(err: fn() -> ApiError) -> Self {
            Self {
                profile: Mutex::new(Err(err)),
                ..Self::with_profile(UserProfile::default())
            }
        }
    }

    #[async_trait]
    impl ProfileSource for StubSource {
        async fn fetch_user_profile(&self) -> Result<UserProfile, ApiError> {
            match &*self.profile.lock().unwrap() {
                Ok(profile) => Ok(profile.clone()),
                Err(make) => Err(make()),
            }
        }

        async fn fetch_job_seeker_profile(&self) -> Result<Option<JobSeekerProfile>, ApiError> {
            self.job_seeker_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.job_seeker.clone())
        }

        async fn sign_out(&self) {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn status_before_load_is_loading() {
        let manager = ProfileManager::new(Arc::new(StubSource::with_profile(UserProfile::default())));
        let status = manager.status().await;

        assert!(!status.loaded);
        assert_eq!(status.flow_state, FlowState::Loading);
        assert_eq!(status.job_flow_state, JobFlowState::Loading);
        assert_eq!(status.worker_status, StatusSummary::loading());
        assert_eq!(status.job_status, StatusSummary::loading());
        assert!(status.worker_modal.is_none());
        assert!(status.worker_steps.iter().all(|s| s.status == StepStatus::Pending));
        assert_eq!(status.subscription_expiry, "");
        assert!(status.profile.is_none());
    }

    #[tokio::test]
    async fn load_resolves_both_tracks() {
        let profile = UserProfile {
            kyc_status: Some(KycStatus::Approved),
            subscription_id: Some(RecordId::new("s1")),
            subscription_expires_at: Some(ExtendedDate::from_millis(1_700_000_000_000)),
            ..Default::default()
        };
        let manager = ProfileManager::new(Arc::new(StubSource::with_profile(profile)));

        let status = manager.load().await.unwrap();
        assert!(status.loaded);
        assert_eq!(status.flow_state, FlowState::WorkerProfileRequired);
        assert_eq!(status.job_flow_state, JobFlowState::JobProfileRequired);
        assert_eq!(status.worker_modal, Some(SetupModal::WorkerProfile));
        assert_eq!(status.job_modal, Some(SetupModal::JobProfile));
        assert_eq!(status.subscription_expiry, "15 Nov 2023");
        assert_eq!(status.job_subscription_expiry, "");

        // Cached: status() recomputes the same answer
        let again = manager.status().await;
        assert_eq!(again.flow_state, status.flow_state);
        assert_eq!(again.worker_status, status.worker_status);
    }

    #[tokio::test]
    async fn load_normalizes_job_seeker_fields() {
        let profile = UserProfile {
            worker_profile_id: Some(RecordId::new("w1")),
            worker_is_verified: Some(LooseFlag::from(false)),
            subscription_id: Some(RecordId::new("s1")),
            ..Default::default()
        };
        let manager = ProfileManager::new(Arc::new(StubSource::with_profile(profile)));
        manager.load().await.unwrap();

        let cached = manager.profile().await.unwrap();
        assert_eq!(cached.job_seeker_profile_id, Some(RecordId::new("w1")));
        assert_eq!(cached.job_seeker_subscription_id, Some(RecordId::new("s1")));
        assert_eq!(cached.job_seeker_is_verified, Some(LooseFlag::from(false)));
    }

    #[tokio::test]
    async fn job_seeker_record_backfills_verification() {
        let profile = UserProfile {
            job_seeker_profile_id: Some(RecordId::new("j1")),
            ..Default::default()
        };
        let source = Arc::new(StubSource {
            job_seeker: Some(JobSeekerProfile {
                is_verified: Some(LooseFlag::from(true)),
                ..Default::default()
            }),
            ..StubSource::with_profile(profile)
        });
        let manager = ProfileManager::new(source.clone());

        let status = manager.load().await.unwrap();
        assert_eq!(source.job_seeker_fetches.load(Ordering::SeqCst), 1);
        assert_eq!(status.job_flow_state, JobFlowState::JobProfileVerified);
        assert!(status.job_status.is_complete);
        // Worker track is untouched
        assert_eq!(status.flow_state, FlowState::KycRequired);
    }

    #[tokio::test]
    async fn null_job_seeker_flag_is_backfilled_despite_worker_flag() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "worker_profile_id": "w1",
            "worker_is_verified": false,
            "job_seeker_profile_id": "j1",
            "job_seeker_is_verified": null
        }))
        .unwrap();
        let source = Arc::new(StubSource {
            job_seeker: Some(JobSeekerProfile {
                is_verified: Some(LooseFlag::from(true)),
                ..Default::default()
            }),
            ..StubSource::with_profile(profile)
        });
        let manager = ProfileManager::new(source);

        let status = manager.load().await.unwrap();
        assert_eq!(status.job_flow_state, JobFlowState::JobProfileVerified);
        assert_eq!(status.flow_state, FlowState::WorkerPending);
        let cached = manager.profile().await.unwrap();
        assert_eq!(cached.job_seeker_is_verified, Some(LooseFlag::from(true)));
    }

    #[tokio::test]
    async fn no_job_seeker_fetch_without_profile_id() {
        let source = Arc::new(StubSource::with_profile(UserProfile::default()));
        let manager = ProfileManager::new(source.clone());
        manager.load().await.unwrap();
        assert_eq!(source.job_seeker_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn auth_failure_signs_out() {
        let source = Arc::new(StubSource::failing(|| ApiError::SessionExpired));
        let manager = ProfileManager::new(source.clone());

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(source.sign_outs.load(Ordering::SeqCst), 1);
        assert!(manager.profile().await.is_none());
    }

    #[tokio::test]
    async fn other_failures_keep_cached_profile() {
        let source = Arc::new(StubSource::with_profile(UserProfile {
            kyc_status: Some(KycStatus::Submitted),
            ..Default::default()
        }));
        let manager = ProfileManager::new(source.clone());
        manager.load().await.unwrap();

        *source.profile.lock().unwrap() = Err(|| ApiError::Status {
            endpoint: "/user/profile".into(),
            status: 502,
        });
        assert!(manager.load().await.is_err());
        assert_eq!(source.sign_outs.load(Ordering::SeqCst), 0);
        assert_eq!(manager.status().await.flow_state, FlowState::KycUnderReview);
    }

    #[test]
    fn status_serializes_snake_case_states() {
        let status = OnboardingStatus::from_profile(Some(&UserProfile {
            kyc_status: Some(KycStatus::Rejected),
            ..Default::default()
        }));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["flow_state"], "kyc_rejected");
        assert_eq!(json["job_flow_state"], "kyc_rejected");
        assert_eq!(json["worker_modal"], serde_json::Value::Null);
        assert_eq!(json["job_modal"], serde_json::Value::Null);
        assert_eq!(json["worker_steps"][0]["status"], "active");
        assert_eq!(json["worker_status"]["isComplete"], false);
    }
}
