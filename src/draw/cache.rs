use std::collections::BTreeMap;

use crate::{draw::procedure::DrawProcedure, render::port::RenderPort, search::state::Pointer};

/// Named slot for a reusable visual element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ProcedureLabel {
    IndexGrid,
    NeedleBanner,
    HighMarker,
    LowMarker,
    MidMarker,
    RevealedValues,
}

impl ProcedureLabel {
    pub fn marker(pointer: Pointer) -> Self {
        match pointer {
            Pointer::High => Self::HighMarker,
            Pointer::Low => Self::LowMarker,
            Pointer::Mid => Self::MidMarker,
        }
    }
}

/// Last-captured draw record per label.
///
/// Later phases replay what earlier phases drew without recomputing it, while the element that
/// is currently animating is re-captured every tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawCache {
    slots: BTreeMap<ProcedureLabel, DrawProcedure>,
}

impl DrawCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `procedure` now and keep it under `label`, replacing any earlier capture.
    pub fn capture_and_run(
        &mut self,
        label: ProcedureLabel,
        procedure: DrawProcedure,
        port: &mut dyn RenderPort,
    ) {
        procedure.draw(port);
        self.slots.insert(label, procedure);
    }

    /// Redraw the stored records for `labels`, in order. Labels never captured draw nothing.
    pub fn replay(&self, labels: &[ProcedureLabel], port: &mut dyn RenderPort) {
        for label in labels {
            if let Some(procedure) = self.slots.get(label) {
                procedure.draw(port);
            }
        }
    }

    pub fn get(&self, label: ProcedureLabel) -> Option<&DrawProcedure> {
        self.slots.get(&label)
    }

    pub fn contains(&self, label: ProcedureLabel) -> bool {
        self.slots.contains_key(&label)
    }

    pub fn labels(&self) -> impl Iterator<Item = ProcedureLabel> + '_ {
        self.slots.keys().copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/cache.rs"]
mod tests;
