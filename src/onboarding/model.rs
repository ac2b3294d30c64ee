//! User profile data model, as returned by the backend's `/user/profile`.
//!
//! Every field is optional. The backend is loosely typed: ids may arrive as
//! plain strings or MongoDB `{ "$oid": ... }` objects, verified flags may be
//! booleans, numbers or strings, and dates use extended-JSON
//! `{ "$date": { "$numberLong": ... } }`. The types here absorb those quirks
//! so the resolver can stay total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Opaque backend id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id counts as unset.
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Plain(String),
            ObjectId {
                #[serde(rename = "$oid")]
                oid: String,
            },
            Number(serde_json::Number),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Plain(s) => Self(s),
            Wire::ObjectId { oid } => Self(oid),
            Wire::Number(n) => Self(n.to_string()),
        })
    }
}

/// Whether an optional id is present and non-empty.
pub fn id_is_set(id: Option<&RecordId>) -> bool {
    id.is_some_and(RecordId::is_set)
}

/// A verification flag kept as the raw JSON value the backend sent.
///
/// Different backends have sent `true`, `1` and `"true"` for the same
/// field, so callers pick between a strict and a loose reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LooseFlag(Value);

impl LooseFlag {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Only JSON `true`.
    pub fn is_strictly_true(&self) -> bool {
        matches!(self.0, Value::Bool(true))
    }

    /// JSON `true`, the number `1`, or the string `"true"`.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            Value::String(s) => s == "true",
            _ => false,
        }
    }

    /// Sent as JSON `null`, as opposed to not sent at all.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// Keep an explicit `null` as `Some(LooseFlag(null))`.
///
/// Paired with `#[serde(default)]`, so only a missing key becomes `None`.
fn present_flag<'de, D>(deserializer: D) -> Result<Option<LooseFlag>, D::Error>
where
    D: Deserializer<'de>,
{
    LooseFlag::deserialize(deserializer).map(Some)
}

impl From<bool> for LooseFlag {
    fn from(value: bool) -> Self {
        Self(Value::Bool(value))
    }
}

/// KYC verification status.
///
/// Matching is exact and case-sensitive; anything unrecognized is kept as
/// `Unknown` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KycStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
    Unknown(String),
}

impl KycStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "submitted" => Self::Submitted,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KycStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KycStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Self::parse(&s),
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// `$numberLong` payload of an extended-JSON date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLong {
    #[serde(rename = "$numberLong")]
    pub number_long: String,
}

/// MongoDB extended-JSON date: `{ "$date": { "$numberLong": "<millis>" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedDate {
    #[serde(rename = "$date")]
    pub date: NumberLong,
}

impl ExtendedDate {
    pub fn from_millis(millis: i64) -> Self {
        Self {
            date: NumberLong {
                number_long: millis.to_string(),
            },
        }
    }

    /// Milliseconds since the epoch, if the payload is a number.
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.date.number_long.trim().parse().ok()
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.timestamp_millis()
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// User state snapshot from `GET /user/profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: Option<RecordId>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile_photo: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,

    pub kyc_status: Option<KycStatus>,

    // Worker track
    pub subscription_id: Option<RecordId>,
    /// "silver" | "gold"
    pub subscription_plan: Option<String>,
    pub subscription_expires_at: Option<ExtendedDate>,
    pub worker_profile_id: Option<RecordId>,
    /// `None` when the key is missing, `Some(null)` when sent as null.
    #[serde(deserialize_with = "present_flag")]
    pub worker_is_verified: Option<LooseFlag>,

    // Job-seeker track
    pub job_seeker_subscription_id: Option<RecordId>,
    /// "basic" | "premium"
    pub job_seeker_subscription_plan: Option<String>,
    pub job_seeker_subscription_expires_at: Option<ExtendedDate>,
    pub job_seeker_profile_id: Option<RecordId>,
    #[serde(deserialize_with = "present_flag")]
    pub job_seeker_is_verified: Option<LooseFlag>,
}

impl UserProfile {
    /// Copy worker-track fields into unset job-seeker fields.
    ///
    /// Older backends only populate the worker fields for both roles. The
    /// verified flag is copied only when the job-seeker key was missing; an
    /// explicit null is left for [`Self::backfill_job_seeker_verification`].
    pub fn normalize_job_seeker_fields(&mut self) {
        if !id_is_set(self.job_seeker_subscription_id.as_ref())
            && id_is_set(self.subscription_id.as_ref())
        {
            self.job_seeker_subscription_id = self.subscription_id.clone();
        }
        if !id_is_set(self.job_seeker_profile_id.as_ref())
            && id_is_set(self.worker_profile_id.as_ref())
        {
            self.job_seeker_profile_id = self.worker_profile_id.clone();
        }
        if self.job_seeker_is_verified.is_none() && self.worker_is_verified.is_some() {
            self.job_seeker_is_verified = self.worker_is_verified.clone();
        }
    }

    /// Fill a missing or null `job_seeker_is_verified` from the job-seeker
    /// record.
    ///
    /// Returns true if the profile changed.
    pub fn backfill_job_seeker_verification(&mut self, record: &JobSeekerProfile) -> bool {
        if self
            .job_seeker_is_verified
            .as_ref()
            .is_some_and(|flag| !flag.is_null())
        {
            return false;
        }
        match &record.is_verified {
            Some(flag) if flag.is_truthy() => {
                self.job_seeker_is_verified = Some(flag.clone());
                true
            }
            _ => false,
        }
    }
}

/// Job-seeker role record from `GET /job-seeker/profile`.
///
/// Only the fields the onboarding flow reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSeekerProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub is_verified: Option<LooseFlag>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "65f0c0ffee",
            "mobile": "9876543210",
            "email": null,
            "name": "Asha",
            "kyc_status": "approved",
            "subscription_id": {"$oid": "65f0aa"},
            "subscription_plan": "gold",
            "subscription_expires_at": {"$date": {"$numberLong": "1700000000000"}},
            "worker_profile_id": null,
            "worker_is_verified": null
        }))
        .unwrap();

        assert_eq!(profile.id, Some(RecordId::new("65f0c0ffee")));
        assert_eq!(profile.kyc_status, Some(KycStatus::Approved));
        assert_eq!(profile.subscription_id, Some(RecordId::new("65f0aa")));
        assert_eq!(
            profile
                .subscription_expires_at
                .as_ref()
                .and_then(ExtendedDate::timestamp_millis),
            Some(1_700_000_000_000)
        );
        assert!(profile.worker_profile_id.is_none());
        assert!(profile.worker_is_verified.as_ref().is_some_and(LooseFlag::is_null));
        // Missing keys default to unset
        assert!(profile.job_seeker_profile_id.is_none());
        assert!(profile.job_seeker_is_verified.is_none());
    }

    #[test]
    fn accepts_mongo_style_id() {
        let profile: UserProfile =
            serde_json::from_value(json!({"_id": {"$oid": "abc123"}})).unwrap();
        assert_eq!(profile.id.unwrap().as_str(), "abc123");
    }

    #[test]
    fn empty_id_is_unset() {
        assert!(!id_is_set(None));
        assert!(!id_is_set(Some(&RecordId::new(""))));
        assert!(id_is_set(Some(&RecordId::new("w1"))));

        let numeric: RecordId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(numeric.as_str(), "42");
    }

    #[test]
    fn unknown_kyc_status_never_fails() {
        let cases = [
            (json!("pending"), KycStatus::Pending),
            (json!("submitted"), KycStatus::Submitted),
            (json!("rejected"), KycStatus::Rejected),
            (json!("Approved"), KycStatus::Unknown("Approved".into())),
            (json!("on_hold"), KycStatus::Unknown("on_hold".into())),
            (json!(3), KycStatus::Unknown("3".into())),
        ];
        for (raw, expected) in cases {
            let parsed: KycStatus = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(parsed, expected, "parsing {raw}");
        }

        let profile: UserProfile = serde_json::from_value(json!({"kyc_status": null})).unwrap();
        assert!(profile.kyc_status.is_none());
    }

    #[test]
    fn kyc_status_serializes_as_string() {
        assert_eq!(serde_json::to_value(KycStatus::Submitted).unwrap(), json!("submitted"));
        assert_eq!(
            serde_json::to_value(KycStatus::Unknown("on_hold".into())).unwrap(),
            json!("on_hold")
        );
    }

    #[test]
    fn loose_flag_readings() {
        let truthy = [json!(true), json!(1), json!(1.0), json!("true")];
        for raw in truthy {
            assert!(LooseFlag::new(raw.clone()).is_truthy(), "{raw} should be truthy");
        }

        let falsy = [json!(false), json!(0), json!("false"), json!("yes"), json!(null), json!(2)];
        for raw in falsy {
            assert!(!LooseFlag::new(raw.clone()).is_truthy(), "{raw} should not be truthy");
        }

        assert!(LooseFlag::from(true).is_strictly_true());
        assert!(!LooseFlag::new(json!(1)).is_strictly_true());
        assert!(!LooseFlag::new(json!("true")).is_strictly_true());
    }

    #[test]
    fn normalize_copies_worker_fields() {
        let mut profile = UserProfile {
            subscription_id: Some(RecordId::new("s1")),
            worker_profile_id: Some(RecordId::new("w1")),
            worker_is_verified: Some(LooseFlag::from(true)),
            ..Default::default()
        };
        profile.normalize_job_seeker_fields();

        assert_eq!(profile.job_seeker_subscription_id, Some(RecordId::new("s1")));
        assert_eq!(profile.job_seeker_profile_id, Some(RecordId::new("w1")));
        assert_eq!(profile.job_seeker_is_verified, Some(LooseFlag::from(true)));
    }

    #[test]
    fn normalize_keeps_existing_job_seeker_fields() {
        let mut profile = UserProfile {
            subscription_id: Some(RecordId::new("s1")),
            job_seeker_subscription_id: Some(RecordId::new("js1")),
            worker_is_verified: Some(LooseFlag::from(true)),
            job_seeker_is_verified: Some(LooseFlag::from(false)),
            ..Default::default()
        };
        profile.normalize_job_seeker_fields();

        assert_eq!(profile.job_seeker_subscription_id, Some(RecordId::new("js1")));
        assert_eq!(profile.job_seeker_is_verified, Some(LooseFlag::from(false)));
        assert!(profile.job_seeker_profile_id.is_none());
    }

    #[test]
    fn backfill_only_when_unset_and_verified() {
        let verified = JobSeekerProfile {
            is_verified: Some(LooseFlag::from(true)),
            ..Default::default()
        };
        let unverified = JobSeekerProfile {
            is_verified: Some(LooseFlag::from(false)),
            ..Default::default()
        };

        let mut profile = UserProfile::default();
        assert!(!profile.backfill_job_seeker_verification(&unverified));
        assert!(profile.job_seeker_is_verified.is_none());
        assert!(profile.backfill_job_seeker_verification(&verified));
        assert_eq!(profile.job_seeker_is_verified, Some(LooseFlag::from(true)));

        let mut explicit = UserProfile {
            job_seeker_is_verified: Some(LooseFlag::from(false)),
            ..Default::default()
        };
        assert!(!explicit.backfill_job_seeker_verification(&verified));

        let mut null = UserProfile {
            job_seeker_is_verified: Some(LooseFlag::new(Value::Null)),
            ..Default::default()
        };
        assert!(null.backfill_job_seeker_verification(&verified));
        assert_eq!(null.job_seeker_is_verified, Some(LooseFlag::from(true)));
    }

    #[test]
    fn explicit_null_flag_is_not_overwritten_by_worker_flag() {
        let mut profile: UserProfile = serde_json::from_value(json!({
            "worker_profile_id": "w1",
            "worker_is_verified": false,
            "job_seeker_profile_id": "j1",
            "job_seeker_is_verified": null
        }))
        .unwrap();
        profile.normalize_job_seeker_fields();
        assert!(profile.job_seeker_is_verified.as_ref().is_some_and(LooseFlag::is_null));

        // A missing key still takes the worker flag, null included
        let mut missing: UserProfile = serde_json::from_value(json!({
            "worker_is_verified": null
        }))
        .unwrap();
        missing.normalize_job_seeker_fields();
        assert!(missing.job_seeker_is_verified.as_ref().is_some_and(LooseFlag::is_null));
    }

    #[test]
    fn extended_date_to_datetime() {
        let date = ExtendedDate::from_millis(1_700_000_000_000);
        assert_eq!(
            date.to_datetime().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
        let json = serde_json::to_value(&date).unwrap();
        assert_eq!(json, json!({"$date": {"$numberLong": "1700000000000"}}));
    }
}
