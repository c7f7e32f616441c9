//! Union of center maps keyed by center and session identifier.

use std::collections::btree_map::Entry;

use tracing::{debug, warn};

use crate::model::{CenterMap, CenterRecord};

/// Merge `src` into `dst` and return the result.
///
/// See [`merge_into`] for the collision rules.
#[must_use]
pub fn merge(mut dst: CenterMap, src: CenterMap) -> CenterMap {
    merge_into(&mut dst, src);
    dst
}

/// Merge `src` into `dst` in place.
///
/// Centers missing from `dst` are inserted as they are. For centers present in both, only
/// sessions whose identifier is not yet listed in `dst` are appended, so merging the same
/// result twice changes nothing. Centers without a `center_id` and sessions without a
/// `session_id` are skipped. A center in `dst` without a session list is left as it is.
pub fn merge_into(dst: &mut CenterMap, src: CenterMap) {
    for (center_id, center) in src {
        if center.center_id().is_none() {
            warn!("Skipping center {center_id} without a center_id field");
            continue;
        }

        match dst.entry(center_id) {
            Entry::Vacant(slot) => {
                slot.insert(center);
            }
            Entry::Occupied(mut slot) => merge_sessions(center_id, slot.get_mut(), center),
        }
    }
}

fn merge_sessions(center_id: i64, dst: &mut CenterRecord, src: CenterRecord) {
    let Some(incoming) = src.sessions() else {
        debug!("Center {center_id} result has no session list");
        return;
    };

    for session in incoming {
        let Some(session_id) = session.session_id() else {
            warn!("Skipping session without a session_id in center {center_id}");
            continue;
        };

        if dst.has_session(&session_id) {
            debug!("Session {session_id} already known for center {center_id}");
            continue;
        }

        let Some(known) = dst.sessions_mut() else {
            warn!("Center {center_id} has no session list, keeping it unchanged");
            return;
        };
        known.push(session.clone());
    }
}
