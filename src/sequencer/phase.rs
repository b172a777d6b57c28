use crate::foundation::error::{ReelError, ReelResult};

/// Top-level animation phase. Exactly one is current at any tick.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Start,
    CollectNumbers,
    SpawnRandomNumbers,
    SpinNumbersSpinning,
    #[serde(rename = "SPIT_OUT_10")]
    SpitOut10,
    BsHighLowMidCalc,
    BsRevealMidAndTransition,
    AdjustHighLow,
    AdjustHighLowNums,
    AdjustMid,
    AdjustMidNum,
    End,
}

impl Phase {
    /// Every phase in transition-table order.
    pub const ALL: [Phase; 12] = [
        Phase::Start,
        Phase::CollectNumbers,
        Phase::SpawnRandomNumbers,
        Phase::SpinNumbersSpinning,
        Phase::SpitOut10,
        Phase::BsHighLowMidCalc,
        Phase::BsRevealMidAndTransition,
        Phase::AdjustHighLow,
        Phase::AdjustHighLowNums,
        Phase::AdjustMid,
        Phase::AdjustMidNum,
        Phase::End,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::CollectNumbers => "COLLECT_NUMBERS",
            Self::SpawnRandomNumbers => "SPAWN_RANDOM_NUMBERS",
            Self::SpinNumbersSpinning => "SPIN_NUMBERS_SPINNING",
            Self::SpitOut10 => "SPIT_OUT_10",
            Self::BsHighLowMidCalc => "BS_HIGH_LOW_MID_CALC",
            Self::BsRevealMidAndTransition => "BS_REVEAL_MID_AND_TRANSITION",
            Self::AdjustHighLow => "ADJUST_HIGH_LOW",
            Self::AdjustHighLowNums => "ADJUST_HIGH_LOW_NUMS",
            Self::AdjustMid => "ADJUST_MID",
            Self::AdjustMidNum => "ADJUST_MID_NUM",
            Self::End => "END",
        }
    }

    /// Phases a run may be started in; everything they depend on can be synthesized.
    pub fn is_entry_point(self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::CollectNumbers
                | Self::SpinNumbersSpinning
                | Self::SpitOut10
                | Self::BsHighLowMidCalc
        )
    }

    /// Legal successors of this phase in the transition table.
    pub fn successors(self) -> &'static [Phase] {
        match self {
            Self::Start => &[Self::CollectNumbers],
            Self::CollectNumbers => &[Self::SpawnRandomNumbers],
            Self::SpawnRandomNumbers => &[Self::SpinNumbersSpinning],
            Self::SpinNumbersSpinning => &[Self::SpitOut10],
            Self::SpitOut10 => &[Self::BsHighLowMidCalc],
            Self::BsHighLowMidCalc => &[Self::BsRevealMidAndTransition],
            Self::BsRevealMidAndTransition => &[Self::AdjustHighLow],
            Self::AdjustHighLow => &[Self::AdjustHighLowNums, Self::End],
            Self::AdjustHighLowNums => &[Self::AdjustMid],
            Self::AdjustMid => &[Self::AdjustMidNum],
            Self::AdjustMidNum => &[Self::BsRevealMidAndTransition],
            Self::End => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::End
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Phase {
    type Err = ReelError;

    fn from_str(s: &str) -> ReelResult<Self> {
        Phase::ALL
            .iter()
            .copied()
            .find(|p| p.tag() == s.trim())
            .ok_or_else(|| ReelError::unknown_phase(s))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/phase.rs"]
mod tests;
