//! Mento onboarding — flow-state derivation for the worker and job-seeker
//! setup funnels.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod onboarding;
