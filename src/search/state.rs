use crate::foundation::error::{ReelError, ReelResult};

/// Binary-search pointers over the sorted values.
///
/// Bounds are inclusive. While the search is active `0 <= low <= mid <= high < len`; the
/// indices are signed because narrowing past either end (`high = -1`, `low = len`) is how
/// exhaustion shows up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SearchState {
    pub low: isize,
    pub high: isize,
    pub mid: isize,
    pub needle: i64,
    pub is_found: Option<bool>,
}

/// Which pointer a comparison step moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Pointer {
    High,
    Low,
    Mid,
}

impl Pointer {
    pub fn name(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Mid => "mid",
        }
    }
}

/// Result of one comparison step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Narrowing {
    /// `values[mid] > needle`: `high` moved down.
    High { from: isize, to: isize },
    /// `values[mid] < needle`: `low` moved up.
    Low { from: isize, to: isize },
    Found { index: usize },
    /// Bounds crossed; the needle is absent.
    Exhausted,
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { index: usize, value: i64 },
    NotFound { needle: i64 },
}

impl SearchState {
    /// `low = 0`, `high = len - 1`, `mid` between them.
    pub fn new(len: usize, needle: i64) -> ReelResult<Self> {
        if len == 0 {
            return Err(ReelError::validation("cannot search an empty sequence"));
        }
        let high = isize::try_from(len - 1)
            .map_err(|_| ReelError::validation("sequence too long to search"))?;
        Ok(Self {
            low: 0,
            high,
            mid: high / 2,
            needle,
            is_found: None,
        })
    }

    pub fn is_settled(&self) -> bool {
        self.is_found.is_some()
    }

    /// Current `mid` as a slice index; fails when it has left the sequence.
    pub fn mid_index(&self, len: usize) -> ReelResult<usize> {
        index_in(self.mid, len, "mid")
    }

    pub fn index_of(&self, pointer: Pointer, len: usize) -> ReelResult<usize> {
        let (raw, name) = match pointer {
            Pointer::High => (self.high, "high"),
            Pointer::Low => (self.low, "low"),
            Pointer::Mid => (self.mid, "mid"),
        };
        index_in(raw, len, name)
    }

    /// Compare `values[mid]` with the needle and move one bound.
    pub fn narrow(&mut self, values: &[i64]) -> ReelResult<Narrowing> {
        if self.is_settled() {
            return Err(ReelError::invariant(format!(
                "comparison requested on a settled search (low={}, high={})",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(ReelError::invariant(format!(
                "comparison requested with crossed bounds (low={}, high={})",
                self.low, self.high
            )));
        }
        let mid = self.mid_index(values.len())?;
        let probe = values[mid];

        let step = match probe.cmp(&self.needle) {
            std::cmp::Ordering::Equal => {
                self.is_found = Some(true);
                return Ok(Narrowing::Found { index: mid });
            }
            std::cmp::Ordering::Greater => {
                let from = self.high;
                self.high = self.mid - 1;
                Narrowing::High {
                    from,
                    to: self.high,
                }
            }
            std::cmp::Ordering::Less => {
                let from = self.low;
                self.low = self.mid + 1;
                Narrowing::Low { from, to: self.low }
            }
        };

        if self.low > self.high {
            self.is_found = Some(false);
            return Ok(Narrowing::Exhausted);
        }
        Ok(step)
    }

    /// `mid = floor((low + high) / 2)`. Only valid while the bounds have not crossed.
    pub fn recompute_mid(&mut self) -> ReelResult<isize> {
        if self.low > self.high {
            return Err(ReelError::invariant(format!(
                "cannot recompute mid with crossed bounds (low={}, high={})",
                self.low, self.high
            )));
        }
        self.mid = (self.low + self.high).div_euclid(2);
        Ok(self.mid)
    }

    pub fn outcome(&self, values: &[i64]) -> Option<SearchOutcome> {
        if self.is_found? {
            let index = self.mid_index(values.len()).ok()?;
            Some(SearchOutcome::Found {
                index,
                value: values[index],
            })
        } else {
            Some(SearchOutcome::NotFound {
                needle: self.needle,
            })
        }
    }
}

fn index_in(raw: isize, len: usize, name: &str) -> ReelResult<usize> {
    usize::try_from(raw)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| {
            ReelError::invariant(format!("{name} index {raw} is outside 0..{len}"))
        })
}

/// One `(low, mid, high)` probe of a logical search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Probe {
    pub low: isize,
    pub mid: isize,
    pub high: isize,
    pub value: i64,
}

/// Every probe of a search run without animation, plus how it ended.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SearchTrace {
    pub probes: Vec<Probe>,
    pub outcome: SearchOutcome,
}

/// Run the comparison loop to completion over sorted `values`.
pub fn trace(values: &[i64], needle: i64) -> ReelResult<SearchTrace> {
    let mut state = SearchState::new(values.len(), needle)?;
    let mut probes = Vec::new();
    loop {
        let mid = state.mid_index(values.len())?;
        probes.push(Probe {
            low: state.low,
            mid: state.mid,
            high: state.high,
            value: values[mid],
        });
        match state.narrow(values)? {
            Narrowing::Found { .. } | Narrowing::Exhausted => break,
            Narrowing::High { .. } | Narrowing::Low { .. } => {
                state.recompute_mid()?;
            }
        }
    }
    let outcome = state
        .outcome(values)
        .ok_or_else(|| ReelError::invariant("search ended without an outcome"))?;
    Ok(SearchTrace { probes, outcome })
}

#[cfg(test)]
#[path = "../../tests/unit/search/state.rs"]
mod tests;
