use crate::foundation::{
    core::Point,
    error::{ReelError, ReelResult},
    math::Rng64,
};

/// Every run animates exactly this many numbers.
pub const TOKEN_COUNT: usize = 10;

/// One animated number.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NumberToken {
    pub value: i64,
    /// Current on-screen position, moved every tick by the active phase.
    pub position: Point,
    /// Slot of this token in ascending order.
    pub home_index: usize,
}

/// The numbers of one run (in spawn order) and the value being searched for.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    values: Vec<i64>,
    needle: i64,
}

/// Wire shape of [`Dataset`]; converted through [`Dataset::from_values`].
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDataset {
    values: Vec<i64>,
    needle: i64,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = ReelError;

    fn try_from(raw: RawDataset) -> ReelResult<Self> {
        Self::from_values(raw.values, raw.needle)
    }
}

impl Dataset {
    /// Draw ten values from `[0, ceiling)` and pick a needle.
    ///
    /// With probability `present_probability` the needle is one of the ten values; otherwise it
    /// is drawn independently and may or may not be present.
    pub fn generate(rng: &mut Rng64, ceiling: i64, present_probability: f64) -> Self {
        let bound = ceiling.max(1) as u64;
        let values: Vec<i64> = (0..TOKEN_COUNT)
            .map(|_| rng.below(bound) as i64)
            .collect();
        let needle = draw_needle(rng, &values, bound, present_probability);
        Self { values, needle }
    }

    /// Pinned values with a needle chosen by the presence policy.
    pub fn with_needle_policy(
        values: Vec<i64>,
        rng: &mut Rng64,
        ceiling: i64,
        present_probability: f64,
    ) -> ReelResult<Self> {
        let mut dataset = Self::from_values(values, 0)?;
        dataset.needle = draw_needle(
            rng,
            &dataset.values,
            ceiling.max(1) as u64,
            present_probability,
        );
        Ok(dataset)
    }

    pub fn from_values(values: Vec<i64>, needle: i64) -> ReelResult<Self> {
        let dataset = Self { values, needle };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.values.len() != TOKEN_COUNT {
            return Err(ReelError::validation(format!(
                "dataset must have exactly {TOKEN_COUNT} values, got {}",
                self.values.len()
            )));
        }
        Ok(())
    }

    /// Values in spawn order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn needle(&self) -> i64 {
        self.needle
    }

    pub fn contains_needle(&self) -> bool {
        self.values.contains(&self.needle)
    }

    /// Values in ascending order.
    pub fn sorted_values(&self) -> Vec<i64> {
        let mut v = self.values.clone();
        v.sort_unstable();
        v
    }

    /// For each value in spawn order, its slot in ascending order. Ties keep spawn order.
    pub fn home_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by_key(|&i| self.values[i]);
        let mut home = vec![0; self.values.len()];
        for (slot, &i) in order.iter().enumerate() {
            home[i] = slot;
        }
        home
    }

    /// Tokens for every value, all placed at `at`.
    pub fn tokens_at(&self, at: Point) -> Vec<NumberToken> {
        self.values
            .iter()
            .zip(self.home_indices())
            .map(|(&value, home_index)| NumberToken {
                value,
                position: at,
                home_index,
            })
            .collect()
    }
}

fn draw_needle(rng: &mut Rng64, values: &[i64], bound: u64, present_probability: f64) -> i64 {
    if !values.is_empty() && rng.chance(present_probability) {
        values[rng.below(values.len() as u64) as usize]
    } else {
        rng.below(bound) as i64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dataset.rs"]
mod tests;
