//! Tracks which cells any traced path touched and reports state changes.

use crate::types::GridPos;

/// Presentation hook invoked once per activation-state change. The core
/// only emits the notification; what "activated" looks like is the
/// collaborator's business.
pub trait ActivationSink {
    fn activation_changed(&mut self, pos: GridPos, activated: bool);
}

/// Sink for callers that do not present anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ActivationSink for NullSink {
    fn activation_changed(&mut self, _pos: GridPos, _activated: bool) {}
}

/// Per-cell activation flags for one generation run.
pub(crate) struct ActivationTracker {
    flags: Vec<bool>,
    slots_per_floor: u32,
}

impl ActivationTracker {
    pub(crate) fn new(columns: u32, slots_per_floor: u32) -> Self {
        Self {
            flags: vec![false; columns as usize * slots_per_floor as usize],
            slots_per_floor,
        }
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.floor as usize * self.slots_per_floor as usize + pos.slot as usize
    }

    /// Marks `pos` activated, notifying the sink only on the first change.
    pub(crate) fn activate(&mut self, pos: GridPos, sink: &mut dyn ActivationSink) {
        let index = self.index(pos);
        if !self.flags[index] {
            self.flags[index] = true;
            sink.activation_changed(pos, true);
        }
    }

    pub(crate) fn is_activated(&self, pos: GridPos) -> bool {
        self.flags[self.index(pos)]
    }

    /// Reports every cell no path ever touched as deactivated.
    pub(crate) fn prune_untouched(&self, sink: &mut dyn ActivationSink) {
        for (index, &activated) in self.flags.iter().enumerate() {
            if !activated {
                let pos = GridPos {
                    floor: (index / self.slots_per_floor as usize) as u32,
                    slot: (index % self.slots_per_floor as usize) as u32,
                };
                sink.activation_changed(pos, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(GridPos, bool)>,
    }

    impl ActivationSink for RecordingSink {
        fn activation_changed(&mut self, pos: GridPos, activated: bool) {
            self.events.push((pos, activated));
        }
    }

    #[test]
    fn repeated_activation_notifies_once() {
        let mut tracker = ActivationTracker::new(3, 2);
        let mut sink = RecordingSink::default();
        let pos = GridPos { floor: 1, slot: 1 };

        tracker.activate(pos, &mut sink);
        tracker.activate(pos, &mut sink);

        assert!(tracker.is_activated(pos));
        assert_eq!(sink.events, vec![(pos, true)]);
    }

    #[test]
    fn prune_reports_exactly_the_untouched_cells() {
        let mut tracker = ActivationTracker::new(2, 2);
        let mut sink = RecordingSink::default();
        tracker.activate(GridPos { floor: 0, slot: 1 }, &mut sink);
        tracker.activate(GridPos { floor: 1, slot: 0 }, &mut sink);
        sink.events.clear();

        tracker.prune_untouched(&mut sink);

        assert_eq!(
            sink.events,
            vec![
                (GridPos { floor: 0, slot: 0 }, false),
                (GridPos { floor: 1, slot: 1 }, false),
            ]
        );
    }
}
