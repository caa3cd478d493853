//! Billing domain rules
//!
//! Pure subscription-state logic shared between the cloud service and its
//! tests. Nothing here touches the database: the usability rule is evaluated
//! lazily wherever a handler needs an access decision.

use serde::{Deserialize, Serialize};

/// Gateway subscription lifecycle status
///
/// Mirrors the raw status strings Razorpay reports on subscription entities.
/// Unknown strings map to `None` in [`SubscriptionStatus::from_db`] and are
/// treated as not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created at the gateway, trial running, first charge pending
    Created,
    /// Payment method authenticated, first charge pending
    Authenticated,
    /// Charged and current
    Active,
    /// Awaiting gateway confirmation
    Pending,
    /// Charges failing, gateway paused the subscription
    Halted,
    /// Cancelled by the educator or the gateway
    Cancelled,
    /// All scheduled charges finished
    Completed,
    /// Never authenticated before the gateway deadline
    Expired,
}

impl SubscriptionStatus {
    /// Parse from the stored/gateway string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "authenticated" => Some(Self::Authenticated),
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "halted" => Some(Self::Halted),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Authenticated => "authenticated",
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Halted => "halted",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }
}

/// Does the subscription currently grant access?
///
/// - `active` and `authenticated` are always usable.
/// - `created` is usable only while the trial is still running, i.e. while
///   `now_ms < start_at_ms`. Once `start_at` passes with the status still
///   `created`, access lapses on the next check. A `created` subscription
///   with no recorded `start_at` is not usable.
/// - Every other status denies access.
pub fn is_usable(status: &str, start_at_ms: Option<i64>, now_ms: i64) -> bool {
    match SubscriptionStatus::from_db(status) {
        Some(SubscriptionStatus::Active) | Some(SubscriptionStatus::Authenticated) => true,
        Some(SubscriptionStatus::Created) => match start_at_ms {
            Some(start_at) => now_ms < start_at,
            None => false,
        },
        _ => false,
    }
}
