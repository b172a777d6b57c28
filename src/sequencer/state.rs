use crate::{
    animation::{
        timers::TimerSet,
        tween::{Fade, Glide},
    },
    foundation::{
        core::{Point, TickIndex},
        error::ReelResult,
    },
    search::state::Pointer,
    sequencer::phase::Phase,
};

/// Old and new text of a readout while it crossfades.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TextTransitionSlot {
    pub outgoing: String,
    pub incoming: String,
}

impl TextTransitionSlot {
    pub fn steady(text: impl Into<String>) -> Self {
        Self {
            outgoing: String::new(),
            incoming: text.into(),
        }
    }

    /// The current text becomes `outgoing`; `next` becomes `incoming`.
    pub fn stage(&mut self, next: impl Into<String>) {
        self.outgoing = std::mem::replace(&mut self.incoming, next.into());
    }
}

/// Where a pointer's outline currently sits and what its readout says.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MarkerTrack {
    pub position: Point,
    pub readout: TextTransitionSlot,
}

/// A glide of one pointer's outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerGlide {
    pub pointer: Pointer,
    pub target_index: usize,
    pub glide: Glide,
}

/// Payload of the active phase. Only the current phase's data exists, and every entry builds
/// a fresh one, so nothing carries over between loop iterations.
#[derive(Clone, Debug, PartialEq)]
pub enum PhaseState {
    Start,
    Collect,
    Gather,
    Spin {
        ticks: u64,
    },
    Deal {
        container_alpha: u8,
    },
    Calc {
        timers: TimerSet<Pointer>,
    },
    RevealMid {
        fade: Fade,
    },
    AdjustHighLow {
        /// `None` until the comparison has run on the phase's first tick.
        glide: Option<PointerGlide>,
    },
    AdjustHighLowNums {
        pointer: Pointer,
        fade: Fade,
    },
    AdjustMid {
        /// `None` until `mid` has been recomputed on the phase's first tick.
        glide: Option<PointerGlide>,
    },
    AdjustMidNum {
        fade: Fade,
    },
    End,
}

impl PhaseState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Start => Phase::Start,
            Self::Collect => Phase::CollectNumbers,
            Self::Gather => Phase::SpawnRandomNumbers,
            Self::Spin { .. } => Phase::SpinNumbersSpinning,
            Self::Deal { .. } => Phase::SpitOut10,
            Self::Calc { .. } => Phase::BsHighLowMidCalc,
            Self::RevealMid { .. } => Phase::BsRevealMidAndTransition,
            Self::AdjustHighLow { .. } => Phase::AdjustHighLow,
            Self::AdjustHighLowNums { .. } => Phase::AdjustHighLowNums,
            Self::AdjustMid { .. } => Phase::AdjustMid,
            Self::AdjustMidNum { .. } => Phase::AdjustMidNum,
            Self::End => Phase::End,
        }
    }

    pub fn spin() -> Self {
        Self::Spin { ticks: 0 }
    }

    pub fn deal() -> Self {
        Self::Deal {
            container_alpha: u8::MAX,
        }
    }

    pub fn calc() -> Self {
        Self::Calc {
            timers: TimerSet::new([Pointer::High, Pointer::Low, Pointer::Mid]),
        }
    }

    pub fn reveal_mid(fade_step: f64) -> ReelResult<Self> {
        Ok(Self::RevealMid {
            fade: Fade::fade_in(fade_step)?,
        })
    }

    pub fn adjust_high_low() -> Self {
        Self::AdjustHighLow { glide: None }
    }

    pub fn adjust_high_low_nums(pointer: Pointer, fade_step: f64) -> ReelResult<Self> {
        Ok(Self::AdjustHighLowNums {
            pointer,
            fade: Fade::fade_out(fade_step)?,
        })
    }

    pub fn adjust_mid() -> Self {
        Self::AdjustMid { glide: None }
    }

    pub fn adjust_mid_num(fade_step: f64) -> ReelResult<Self> {
        Ok(Self::AdjustMidNum {
            fade: Fade::fade_out(fade_step)?,
        })
    }
}

/// One edge taken in the phase graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhaseChange {
    /// Tick on which the exit predicate held.
    pub tick: TickIndex,
    pub from: Phase,
    pub to: Phase,
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/state.rs"]
mod tests;
