//! # Searchreel guide
//!
//! A standalone tour of how a run is put together. For commands, start with the repository
//! `README.md`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`SceneConfig`](crate::SceneConfig): seed, dataset pinning, timings and layout
//! - [`Dataset`](crate::Dataset): the ten values in spawn order plus the needle
//! - [`Sequencer`](crate::Sequencer): owns the run and advances it one tick at a time
//! - [`Phase`](crate::Phase): the current node of the phase graph
//! - [`RenderPort`](crate::RenderPort): the drawing surface phases talk to
//! - [`DrawCache`](crate::DrawCache): last-captured [`DrawProcedure`](crate::DrawProcedure) per
//!   [`ProcedureLabel`](crate::ProcedureLabel)
//!
//! ---
//!
//! ## The phase graph
//!
//! ```text
//! START -> COLLECT_NUMBERS -> SPAWN_RANDOM_NUMBERS -> SPIN_NUMBERS_SPINNING -> SPIT_OUT_10
//!       -> BS_HIGH_LOW_MID_CALC -> BS_REVEAL_MID_AND_TRANSITION -> ADJUST_HIGH_LOW
//! ADJUST_HIGH_LOW -> END                       (values[mid] == needle, or low > high)
//! ADJUST_HIGH_LOW -> ADJUST_HIGH_LOW_NUMS -> ADJUST_MID -> ADJUST_MID_NUM
//!                 -> BS_REVEAL_MID_AND_TRANSITION
//! ```
//!
//! Ticks are numbered from 1. On each tick the sequencer clears the frame, runs the current
//! phase's step and, if that step's exit condition held, records a
//! [`PhaseChange`](crate::PhaseChange) and moves on. A transition never runs the next phase's
//! step in the same tick.
//!
//! Each phase keeps its data in a fresh [`PhaseState`](crate::PhaseState) payload built on
//! entry. Timers, fades and glides from one loop of the search never leak into the next.
//!
//! ## Convergence
//!
//! Moving things use [`lerp`](crate::lerp) with a fixed rate and stop once
//! [`is_converged`](crate::is_converged) holds: both values agree after rounding to two decimals.
//! Fades step linearly and clamp, so they always finish.
//!
//! ## Drawing and replay
//!
//! Once the search starts, the index grid, needle banner, pointer outlines and revealed values
//! are captured as parameter records. Later ticks replay them and only re-capture the element
//! that is currently moving. Replaying a record issues the same primitive calls as capturing it,
//! which [`DrawRecorder`](crate::DrawRecorder) makes easy to check.
//!
//! ## Output
//!
//! - [`headless_run`](crate::headless_run): no pixels, returns phase spans, outcome and a digest
//! - [`render_tick_svg`](crate::render_tick_svg) / [`render_tick_png`](crate::render_tick_png):
//!   one frame
//! - [`render_run`](crate::render_run): every tick plus a hold of END frames into a
//!   [`FrameSink`](crate::FrameSink)
//!
//! MP4 output uses the system `ffmpeg` binary; check with
//! [`is_ffmpeg_on_path`](crate::is_ffmpeg_on_path).
