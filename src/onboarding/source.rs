//! Where profiles come from.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use super::model::{JobSeekerProfile, UserProfile};
use crate::error::ApiError;

/// Backend-agnostic source of user profile snapshots.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the current user's profile.
    async fn fetch_user_profile(&self) -> Result<UserProfile, ApiError>;

    /// Fetch the job-seeker record, `None` if the user has none.
    async fn fetch_job_seeker_profile(&self) -> Result<Option<JobSeekerProfile>, ApiError>;

    /// Drop any credentials held for the current user.
    async fn sign_out(&self) {}
}

/// Reads a profile from a JSON file, either bare or wrapped in the
/// backend's `{ success, data }` envelope.
#[derive(Debug, Clone)]
pub struct FileProfileSource {
    path: PathBuf,
}

impl FileProfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProfileSource for FileProfileSource {
    async fn fetch_user_profile(&self) -> Result<UserProfile, ApiError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let value: Value = serde_json::from_str(&raw)?;

        let profile = match value {
            Value::Object(mut obj) if obj.contains_key("success") && obj.contains_key("data") => {
                let data = obj.remove("data").unwrap_or(Value::Null);
                if data.is_null() {
                    return Err(ApiError::InvalidResponse {
                        endpoint: self.path.display().to_string(),
                        reason: "envelope has no data".to_string(),
                    });
                }
                serde_json::from_value(data)?
            }
            other => serde_json::from_value(other)?,
        };

        tracing::debug!(path = %self.path.display(), "Loaded profile from file");
        Ok(profile)
    }

    async fn fetch_job_seeker_profile(&self) -> Result<Option<JobSeekerProfile>, ApiError> {
        Ok(None)
    }
}
