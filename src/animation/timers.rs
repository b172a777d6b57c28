use std::collections::BTreeMap;

use crate::foundation::core::TickIndex;

/// Per-label arming ticks used to stagger reveals.
///
/// A label is either unarmed or holds the tick at which it was first armed. The set is owned by
/// the phase payload that needs it, so entering that phase always starts from all-unarmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerSet<L: Ord + Copy> {
    armed: BTreeMap<L, Option<TickIndex>>,
}

impl<L: Ord + Copy> TimerSet<L> {
    pub fn new(labels: impl IntoIterator<Item = L>) -> Self {
        Self {
            armed: labels.into_iter().map(|l| (l, None)).collect(),
        }
    }

    /// Record `now` under `label` unless it is already armed. Returns the stored tick.
    pub fn arm(&mut self, label: L, now: TickIndex) -> TickIndex {
        let slot = self.armed.entry(label).or_insert(None);
        *slot.get_or_insert(now)
    }

    pub fn is_armed(&self, label: L) -> bool {
        matches!(self.armed.get(&label), Some(Some(_)))
    }

    pub fn armed_at(&self, label: L) -> Option<TickIndex> {
        self.armed.get(&label).copied().flatten()
    }

    pub fn elapsed_since(&self, label: L, now: TickIndex) -> Option<u64> {
        self.armed_at(label).map(|at| now.since(at))
    }

    pub fn has_elapsed(&self, label: L, threshold: u64, now: TickIndex) -> bool {
        self.elapsed_since(label, now)
            .is_some_and(|elapsed| elapsed >= threshold)
    }

    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.armed.keys().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timers.rs"]
mod tests;
