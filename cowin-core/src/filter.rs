//! Acceptance rules for sessions and centers, and filtering of a merged center map.
//!
//! Filtering always drops sessions without available capacity, even when no criteria are set.
//! A record missing a field a rule needs, or holding it with an unexpected JSON type, is rejected.
//! Accepted records are copied as received apart from their pruned session lists.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{CenterMap, CenterRecord, FeeType, SessionRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// User supplied criteria; absent fields impose no constraint.
pub struct FilterSpec {
    /// Age of the person to vaccinate; sessions with a higher minimum age are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Acceptable vaccine names, compared ignoring case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccine: Option<Vec<String>>,
    /// Wanted fee type; ignored unless it names a known [`FeeType`].
    #[serde(
        default,
        rename = "feeType",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_type: Option<String>,
}

impl FilterSpec {
    /// The requested fee type, if it is one the API knows about.
    #[must_use]
    pub fn wanted_fee(&self) -> Option<FeeType> {
        self.fee_type.as_deref().and_then(FeeType::parse)
    }
}

/// Whether a session has capacity left and satisfies the age and vaccine criteria.
#[must_use]
pub fn is_valid_session(session: &SessionRecord, filters: &FilterSpec) -> bool {
    let Some(capacity) = session.available_capacity() else {
        debug!("Session without a numeric available_capacity, rejecting");
        return false;
    };
    if capacity <= 0.0 {
        return false;
    }

    if let Some(age) = filters.age {
        let Some(min_age_limit) = session.min_age_limit() else {
            debug!("Session without a numeric min_age_limit, rejecting");
            return false;
        };
        if age < min_age_limit {
            return false;
        }
    }

    if let Some(vaccines) = &filters.vaccine {
        let Some(vaccine) = session.vaccine() else {
            debug!("Session without a vaccine name, rejecting");
            return false;
        };
        let vaccine = vaccine.to_uppercase();
        if !vaccines
            .iter()
            .any(|candidate| candidate.to_uppercase() == vaccine)
        {
            return false;
        }
    }

    true
}

/// The center restricted to its acceptable sessions, or `None` if it is rejected.
///
/// A center is rejected when it charges the wrong fee type, has no session list, or when none of
/// its sessions pass [`is_valid_session`]. The input is left untouched.
#[must_use]
pub fn valid_center(center: &CenterRecord, filters: &FilterSpec) -> Option<CenterRecord> {
    if let Some(wanted) = filters.wanted_fee() {
        let Some(fee_type) = center.fee_type() else {
            warn!(
                "Center {:?} has no fee_type string, rejecting",
                center.center_id()
            );
            return None;
        };
        if FeeType::parse(fee_type) != Some(wanted) {
            return None;
        }
    }

    let Some(listed) = center.sessions() else {
        warn!(
            "Center {:?} has no session list, rejecting",
            center.center_id()
        );
        return None;
    };

    let sessions: Vec<SessionRecord> = listed
        .iter()
        .filter(|session| is_valid_session(session, filters))
        .cloned()
        .collect();

    if sessions.is_empty() {
        return None;
    }

    Some(center.with_sessions(sessions))
}

/// Whether [`valid_center`] accepts the center.
#[must_use]
pub fn is_valid_center(center: &CenterRecord, filters: &FilterSpec) -> bool {
    valid_center(center, filters).is_some()
}

/// Centers that satisfy `filters`, each with only its acceptable sessions.
#[must_use]
pub fn filter_available_centers(centers: &CenterMap, filters: &FilterSpec) -> CenterMap {
    centers
        .iter()
        .filter_map(|(center_id, center)| {
            valid_center(center, filters).map(|accepted| (*center_id, accepted))
        })
        .collect()
}
