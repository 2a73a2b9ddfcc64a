//! Image-tracking seam: anchors, lifecycle events and the per-anchor state
//! machine that keeps found/lost handling idempotent.

use anyhow::Result;

use crate::data_structures::transform::Transform;

/// Handle to a tracking anchor. Anchors live for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnchorId(pub usize);

/// Lifecycle event emitted by the tracking engine when the tracked image
/// enters or leaves the camera's recognized view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetEvent {
    Found(AnchorId),
    Lost(AnchorId),
}

impl TargetEvent {
    pub fn anchor(&self) -> AnchorId {
        match self {
            TargetEvent::Found(anchor) | TargetEvent::Lost(anchor) => *anchor,
        }
    }
}

/// Two-state machine per anchor. Engines may repeat events (found/found,
/// lost/lost); `apply` reports a state only on an actual transition so
/// downstream triggers fire exactly once per change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetState {
    #[default]
    Lost,
    Found,
}

impl TargetState {
    pub fn apply(&mut self, event: &TargetEvent) -> Option<TargetState> {
        let next = match event {
            TargetEvent::Found(_) => TargetState::Found,
            TargetEvent::Lost(_) => TargetState::Lost,
        };
        if *self == next {
            None
        } else {
            *self = next;
            Some(next)
        }
    }
}

/// The image-tracking engine: estimates camera pose relative to one reference
/// image and keeps anchored content aligned while the target is visible.
pub trait TrackingEngine {
    /// Registers an anchor for the given target index and returns its handle.
    fn add_anchor(&mut self, target_index: usize) -> AnchorId;

    /// Starts the tracking session (camera access, feature matching, ...).
    async fn start(&mut self) -> Result<()>;

    /// Current world pose of an anchor, or `None` while its target is lost.
    fn anchor_pose(&self, anchor: AnchorId) -> Option<Transform>;

    /// Drains lifecycle events queued since the last call. Events arrive on
    /// the single-threaded session queue, never concurrently.
    fn drain_events(&mut self) -> Vec<TargetEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_fire_once_per_change() {
        let anchor = AnchorId(0);
        let mut state = TargetState::default();
        assert_eq!(
            state.apply(&TargetEvent::Found(anchor)),
            Some(TargetState::Found)
        );
        assert_eq!(state.apply(&TargetEvent::Found(anchor)), None);
        assert_eq!(
            state.apply(&TargetEvent::Lost(anchor)),
            Some(TargetState::Lost)
        );
        assert_eq!(state.apply(&TargetEvent::Lost(anchor)), None);
    }

    #[test]
    fn initial_lost_event_is_a_noop() {
        let mut state = TargetState::default();
        assert_eq!(state.apply(&TargetEvent::Lost(AnchorId(3))), None);
    }
}
