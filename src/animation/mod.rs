pub(crate) mod timers;
pub(crate) mod tween;
