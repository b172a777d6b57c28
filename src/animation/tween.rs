use crate::foundation::{
    core::Point,
    error::{ReelError, ReelResult},
};

/// Rounding precision used by every "has it arrived" check in the engine.
pub const DEFAULT_PRECISION: f64 = 100.0;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let next = a + (b - a) * t;
        // A step too small to represent would stall one ULP short of `b`.
        if next == *a { *b } else { next }
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

/// Move `current` a `rate` fraction of the remaining distance toward `target`.
pub fn lerp<T: Lerp>(current: T, target: T, rate: f64) -> T {
    T::lerp(&current, &target, rate)
}

/// `round(a * 100) == round(b * 100)`.
pub fn is_converged(a: f64, b: f64) -> bool {
    is_converged_with(a, b, DEFAULT_PRECISION)
}

pub fn is_converged_with(a: f64, b: f64, precision: f64) -> bool {
    (a * precision).round() == (b * precision).round()
}

/// Both axes converged at the default precision.
pub fn points_converged(a: Point, b: Point) -> bool {
    is_converged(a.x, b.x) && is_converged(a.y, b.y)
}

fn check_rate(rate: f64, what: &str) -> ReelResult<()> {
    if !(rate > 0.0 && rate <= 1.0) {
        return Err(ReelError::validation(format!(
            "{what} must be in (0, 1], got {rate}"
        )));
    }
    Ok(())
}

/// Linear alpha ramp clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    value: f64,
    step: f64, // signed per-tick delta
}

impl Fade {
    /// Starts transparent and rises by `step` each tick.
    pub fn fade_in(step: f64) -> ReelResult<Self> {
        check_rate(step, "fade step")?;
        Ok(Self { value: 0.0, step })
    }

    /// Starts opaque and falls by `step` each tick.
    pub fn fade_out(step: f64) -> ReelResult<Self> {
        check_rate(step, "fade step")?;
        Ok(Self {
            value: 1.0,
            step: -step,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn advance(&mut self) -> f64 {
        self.value = (self.value + self.step).clamp(0.0, 1.0);
        self.value
    }

    /// The ramp has reached the bound it is heading for.
    pub fn is_done(&self) -> bool {
        if self.step > 0.0 {
            self.value >= 1.0
        } else {
            self.value <= 0.0
        }
    }
}

/// A marker moving toward a fixed target slot.
///
/// The target is fixed at construction, so there is no way to ask whether a glide has arrived
/// before it knows where it is going.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glide {
    current: Point,
    target: Point,
    rate: f64,
}

impl Glide {
    pub fn new(from: Point, to: Point, rate: f64) -> ReelResult<Self> {
        check_rate(rate, "glide rate")?;
        Ok(Self {
            current: from,
            target: to,
            rate,
        })
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn advance(&mut self) -> Point {
        self.current = lerp(self.current, self.target, self.rate);
        self.current
    }

    pub fn is_arrived(&self) -> bool {
        points_converged(self.current, self.target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
