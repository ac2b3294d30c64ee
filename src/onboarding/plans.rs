//! Subscription plan catalog for both tracks.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::state::Track;
use crate::format::adjust_color;

/// How much darker the second gradient stop of a plan card is.
const GRADIENT_SHADE: i32 = -20;

/// A paid plan unlocking profile creation for one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in rupees.
    pub price: Decimal,
    pub duration: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
    pub color: &'static str,
}

impl SubscriptionPlan {
    /// Base color and its pressed/darker stop for the plan card gradient.
    pub fn gradient(&self) -> (String, String) {
        (self.color.to_string(), adjust_color(self.color, GRADIENT_SHADE))
    }
}

/// Worker plans.
pub fn worker_plans() -> Vec<SubscriptionPlan> {
    vec![
        SubscriptionPlan {
            id: "silver",
            name: "Silver",
            price: dec!(499),
            duration: "1 Year",
            features: &[
                "Profile visibility boost",
                "Priority in search results",
                "Basic analytics",
                "Email support",
            ],
            popular: false,
            color: "#9CA3AF",
        },
        SubscriptionPlan {
            id: "gold",
            name: "Gold",
            price: dec!(799),
            duration: "1 Year",
            features: &[
                "All Silver features",
                "Featured profile badge",
                "Advanced analytics",
                "Priority support",
                "Unlimited job applications",
            ],
            popular: true,
            color: "#F59E0B",
        },
    ]
}

/// Job-seeker plans.
pub fn job_seeker_plans() -> Vec<SubscriptionPlan> {
    vec![
        SubscriptionPlan {
            id: "basic",
            name: "Basic",
            price: dec!(299),
            duration: "1 Year",
            features: &[
                "Profile visibility to employers",
                "Apply to unlimited jobs",
                "Basic job alerts",
                "Email support",
            ],
            popular: false,
            color: "#6B7280",
        },
        SubscriptionPlan {
            id: "premium",
            name: "Premium",
            price: dec!(599),
            duration: "1 Year",
            features: &[
                "All Basic features",
                "Featured profile badge",
                "Priority job alerts",
                "Resume boost in searches",
                "Priority support",
                "Advanced analytics",
            ],
            popular: true,
            color: "#8B5CF6",
        },
    ]
}

/// Plans offered on `track`'s subscription modal.
pub fn plans_for(track: Track) -> Vec<SubscriptionPlan> {
    match track {
        Track::Worker => worker_plans(),
        Track::JobSeeker => job_seeker_plans(),
    }
}

/// Look up a plan by id. Case-insensitive, since the backend has stored
/// both "gold" and "Gold".
pub fn find_plan(track: Track, id: &str) -> Option<SubscriptionPlan> {
    plans_for(track)
        .into_iter()
        .find(|plan| plan.id.eq_ignore_ascii_case(id.trim()))
}
