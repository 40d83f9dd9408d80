//! Thread-safe record of who is in the session and what they are sending.
//!
//! Every operation takes the single internal lock; readers always get
//! copies, never references into the live containers.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_model::{Participant, ParticipantId, Resolution};

#[derive(Debug, Default)]
struct MembershipState {
    /// Active participants in join order.
    members: Vec<ParticipantId>,
    /// Last decoded resolution per active participant.
    resolutions: BTreeMap<ParticipantId, Resolution>,
}

/// Active participant set plus last known source resolutions.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    state: Mutex<MembershipState>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. Returns `false` if it was already a member.
    pub fn add(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        if state.members.iter().any(|m| m == id) {
            return false;
        }
        state.members.push(id.to_string());
        true
    }

    /// Remove a participant and forget its resolution. Returns `false` if
    /// it was not a member.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        let before = state.members.len();
        state.members.retain(|m| m != id);
        state.resolutions.remove(id);
        state.members.len() != before
    }

    /// Record the decoded resolution of a member.
    ///
    /// Returns `Ok(false)` when `id` is not a member; the update is dropped
    /// so that filtered or departed participants never enter the mix.
    pub fn set_resolution(&self, id: &str, width: u32, height: u32) -> StagemixResult<bool> {
        let resolution = Resolution::new(width, height);
        if !resolution.is_valid() {
            return Err(StagemixError::invalid_dimension(width, height));
        }

        let mut state = self.state.lock();
        if !state.members.iter().any(|m| m == id) {
            return Ok(false);
        }
        state.resolutions.insert(id.to_string(), resolution);
        Ok(true)
    }

    /// Consistent copy of the membership in join order.
    pub fn snapshot(&self) -> Vec<Participant> {
        let state = self.state.lock();
        state
            .members
            .iter()
            .map(|id| Participant {
                id: id.clone(),
                resolution: state.resolutions.get(id).copied(),
            })
            .collect()
    }

    /// Active participant IDs, sorted.
    pub fn ids(&self) -> BTreeSet<ParticipantId> {
        self.state.lock().members.iter().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().members.iter().any(|m| m == id)
    }

    pub fn resolution(&self, id: &str) -> Option<Resolution> {
        self.state.lock().resolutions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.state.lock().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().members.is_empty()
    }

    /// Members whose first frame has been decoded.
    pub fn ready_count(&self) -> usize {
        self.state.lock().resolutions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_then_remove_restores_state() {
        let tracker = MembershipTracker::new();
        tracker.add("a");
        let before = tracker.snapshot();

        assert!(tracker.add("b"));
        tracker.set_resolution("b", 1280, 720).unwrap();
        assert!(tracker.remove("b"));

        assert_eq!(tracker.snapshot(), before);
        assert!(!tracker.contains("b"));
        assert!(tracker.resolution("b").is_none());
        assert_eq!(tracker.ready_count(), 0);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let tracker = MembershipTracker::new();
        assert!(tracker.add("a"));
        assert!(!tracker.add("a"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_remove_non_member_is_noop() {
        let tracker = MembershipTracker::new();
        tracker.add("a");
        assert!(!tracker.remove("ghost"));
        assert!(!tracker.remove("ghost"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_join_order() {
        let tracker = MembershipTracker::new();
        for id in ["zed", "amy", "kim"] {
            tracker.add(id);
        }
        tracker.remove("amy");
        tracker.add("amy");
        let order: Vec<_> = tracker.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(order, ["zed", "kim", "amy"]);

        let ids: Vec<_> = tracker.ids().into_iter().collect();
        assert_eq!(ids, ["amy", "kim", "zed"]);
    }

    #[test]
    fn test_resolution_for_non_member_is_dropped() {
        let tracker = MembershipTracker::new();
        assert!(!tracker.set_resolution("ghost", 640, 360).unwrap());
        assert!(tracker.resolution("ghost").is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let tracker = MembershipTracker::new();
        tracker.add("a");
        let err = tracker.set_resolution("a", 640, 0).unwrap_err();
        assert!(matches!(err, StagemixError::InvalidDimension { .. }));
        assert!(tracker.resolution("a").is_none());
    }

    #[test]
    fn test_resolution_update_replaces_previous() {
        let tracker = MembershipTracker::new();
        tracker.add("a");
        tracker.set_resolution("a", 640, 360).unwrap();
        tracker.set_resolution("a", 1280, 720).unwrap();
        assert_eq!(tracker.resolution("a"), Some(Resolution::new(1280, 720)));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let tracker = MembershipTracker::new();
        tracker.add("a");
        let snapshot = tracker.snapshot();
        tracker.add("b");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_concurrent_readers_see_consistent_state() {
        let tracker = Arc::new(MembershipTracker::new());
        let writer = {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let id = format!("p{i}");
                    tracker.add(&id);
                    tracker.set_resolution(&id, 640, 360).unwrap();
                    if i % 2 == 0 {
                        tracker.remove(&id);
                    }
                }
            })
        };

        for _ in 0..200 {
            let snapshot = tracker.snapshot();
            // a member never carries a resolution that belongs to someone else
            for participant in &snapshot {
                if let Some(resolution) = participant.resolution {
                    assert_eq!(resolution, Resolution::new(640, 360));
                }
            }
        }

        writer.join().unwrap();
        assert_eq!(tracker.len(), 250);
        assert_eq!(tracker.ready_count(), 250);
    }
}
