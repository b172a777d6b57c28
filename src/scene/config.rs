use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Canvas, Point, Rgba8, TickRate},
        error::{ReelError, ReelResult},
        math::Rng64,
    },
    scene::dataset::{Dataset, TOKEN_COUNT},
    sequencer::phase::Phase,
};

/// Every tunable of a run. All fields have defaults, so an empty JSON object is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Seed for every random choice in the run.
    pub seed: u64,
    /// Ticks per second.
    pub tick_rate: u32,
    pub canvas: Canvas,
    pub background: Rgba8,

    /// Pin the ten values (in spawn order) instead of drawing them.
    pub values: Option<Vec<i64>>,
    /// Pin the needle instead of applying the presence policy.
    pub needle: Option<i64>,
    /// Values are drawn from `[0, value_ceiling)`.
    pub value_ceiling: i64,
    /// Probability that a drawn needle is one of the values.
    pub needle_present_probability: f64,

    /// A token spawns on every tick divisible by this.
    pub spawn_interval_ticks: u64,
    /// Maximum spawn offset from the container on each axis.
    pub spawn_spread: f64,

    pub container_size: f64,
    /// Point the spawned tokens gather at before sorting.
    pub container_anchor: Point,
    /// Container alpha lost per tick while dealing, out of 255.
    pub container_fade_step: u8,
    pub spin_seconds: f64,
    /// Container rotation per tick while spinning, in radians.
    pub spin_speed: f64,

    /// Lerp rate for gathering tokens into the container.
    pub gather_rate: f64,
    /// Lerp rate for dealing tokens and moving pointer outlines.
    pub glide_rate: f64,

    /// Horizontal distance between slots.
    pub slot_spacing: f64,
    /// Top-left corner of slot 0.
    pub slot_origin: Point,
    pub square_size: f64,

    /// Ticks between the high, low and mid reveals.
    pub reveal_stagger_ticks: u64,
    /// Alpha change per tick for value reveals and readout crossfades.
    pub fade_step: f64,

    /// Phase to begin in; see [`Phase::is_entry_point`].
    pub start_phase: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            tick_rate: 60,
            canvas: Canvas::default(),
            background: Rgba8::SKY_BLUE,
            values: None,
            needle: None,
            value_ceiling: 100,
            needle_present_probability: 0.9,
            spawn_interval_ticks: 15,
            spawn_spread: 100.0,
            container_size: 50.0,
            container_anchor: Point::new(-10.0, 10.0),
            container_fade_step: 3,
            spin_seconds: 3.0,
            spin_speed: 0.225,
            gather_rate: 0.5,
            glide_rate: 0.05,
            slot_spacing: 70.0,
            slot_origin: Point::new(-350.0, 100.0),
            square_size: 50.0,
            reveal_stagger_ticks: 60,
            fade_step: 0.02,
            start_phase: Phase::Start.tag().to_string(),
        }
    }
}

fn unit_rate(value: f64, name: &str) -> ReelResult<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ReelError::validation(format!(
            "{name} must be in (0, 1], got {value}"
        )));
    }
    Ok(())
}

fn finite_point(point: Point, name: &str) -> ReelResult<()> {
    if !(point.x.is_finite() && point.y.is_finite()) {
        return Err(ReelError::validation(format!(
            "{name} must have finite coordinates, got ({}, {})",
            point.x, point.y
        )));
    }
    Ok(())
}

fn positive(value: f64, name: &str) -> ReelResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ReelError::validation(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

impl SceneConfig {
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ReelError::serde(format!("scene config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    pub fn validate(&self) -> ReelResult<()> {
        TickRate::new(self.tick_rate)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if let Some(values) = &self.values
            && values.len() != TOKEN_COUNT
        {
            return Err(ReelError::validation(format!(
                "values must list exactly {TOKEN_COUNT} numbers, got {}",
                values.len()
            )));
        }
        if self.value_ceiling <= 0 {
            return Err(ReelError::validation("value_ceiling must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.needle_present_probability) {
            return Err(ReelError::validation(
                "needle_present_probability must be in [0, 1]",
            ));
        }
        if self.spawn_interval_ticks == 0 {
            return Err(ReelError::validation("spawn_interval_ticks must be > 0"));
        }
        if self.container_fade_step == 0 {
            return Err(ReelError::validation("container_fade_step must be > 0"));
        }
        if !(self.spawn_spread.is_finite() && self.spawn_spread >= 0.0) {
            return Err(ReelError::validation("spawn_spread must be >= 0"));
        }
        finite_point(self.container_anchor, "container_anchor")?;
        finite_point(self.slot_origin, "slot_origin")?;
        positive(self.container_size, "container_size")?;
        positive(self.square_size, "square_size")?;
        positive(self.slot_spacing, "slot_spacing")?;
        if !(self.spin_seconds.is_finite() && self.spin_seconds >= 0.0) {
            return Err(ReelError::validation("spin_seconds must be >= 0"));
        }
        unit_rate(self.gather_rate, "gather_rate")?;
        unit_rate(self.glide_rate, "glide_rate")?;
        unit_rate(self.fade_step, "fade_step")?;
        let start = self.start_phase()?;
        if !start.is_entry_point() {
            return Err(ReelError::validation(format!(
                "phase {start} cannot be used as a start phase"
            )));
        }
        Ok(())
    }

    pub fn tick_rate(&self) -> ReelResult<TickRate> {
        TickRate::new(self.tick_rate)
    }

    pub fn start_phase(&self) -> ReelResult<Phase> {
        self.start_phase.parse()
    }

    /// Top-left corner of slot `index`.
    pub fn slot_position(&self, index: usize) -> Point {
        Point::new(
            self.slot_origin.x + index as f64 * self.slot_spacing,
            self.slot_origin.y,
        )
    }

    /// Where the "find N" banner sits.
    pub fn banner_position(&self) -> Point {
        Point::new(0.0, self.slot_origin.y - 150.0)
    }

    /// The dataset for a run: pinned values/needle where given, drawn from `rng` otherwise.
    pub fn build_dataset(&self, rng: &mut Rng64) -> ReelResult<Dataset> {
        let ceiling = self.value_ceiling;
        let p = self.needle_present_probability;
        match (&self.values, self.needle) {
            (None, None) => Ok(Dataset::generate(rng, ceiling, p)),
            (Some(values), Some(needle)) => Dataset::from_values(values.clone(), needle),
            (Some(values), None) => Dataset::with_needle_policy(values.clone(), rng, ceiling, p),
            (None, Some(needle)) => {
                let drawn = Dataset::generate(rng, ceiling, p);
                Dataset::from_values(drawn.values().to_vec(), needle)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
