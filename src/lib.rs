//! Searchreel animates a binary search over ten numbers, one tick at a time.
//!
//! A run is a fixed walk through a phase graph: numbers are collected into a container, spun,
//! dealt face-down into sorted slots, then searched with `high`/`low`/`mid` outlines that glide
//! between slots while the probed values are revealed. Every tick draws one frame through a
//! [`RenderPort`], so the same run can be recorded, written as SVG, rasterized or encoded to MP4.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: [`SceneConfig`] (JSON, validated) picks the seed, dataset and timings
//! 2. **Sequence**: [`Sequencer::tick`] runs one phase step and takes at most one transition
//! 3. **Draw**: phases emit primitives to a [`RenderPort`]; settled elements are replayed from
//!    the [`DrawCache`] instead of being rebuilt
//! 4. **Output** (optional): [`SvgCanvas`] + [`SvgRasterizer`] produce pixels for a
//!    [`FrameSink`] such as [`InMemorySink`] or the `ffmpeg`-backed [`FfmpegSink`]
//!
//! Runs are deterministic for a given config: all randomness comes from one seeded [`Rng64`]
//! and the clock is internal to the sequencer.
//!
//! See [`crate::guide`] for a walkthrough.
#![forbid(unsafe_code)]

mod animation;
mod draw;
mod encode;
mod foundation;
mod pipeline;
mod render;
mod scene;
mod search;
mod sequencer;

/// Walkthrough of the phase graph and the public API.
pub mod guide;

pub use animation::timers::TimerSet;
pub use animation::tween::{
    DEFAULT_PRECISION, Fade, Glide, Lerp, is_converged, is_converged_with, lerp, points_converged,
};
pub use draw::cache::{DrawCache, ProcedureLabel};
pub use draw::procedure::{DrawProcedure, GridCell, Readout, RevealedCard, pointer_color};
pub use encode::ffmpeg::{EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::sink::{FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Point, Rgba8, TickIndex, TickRate, Vec2};
pub use foundation::error::{ReelError, ReelResult};
pub use foundation::math::Rng64;
pub use pipeline::{
    DEFAULT_MAX_TICKS, PhaseSpan, RenderRunOpts, RenderStats, RunSummary, headless_run,
    phase_spans, render_run, render_tick_png, render_tick_svg,
};
pub use render::port::{NullPort, RenderPort, Style, TextAlign};
pub use render::raster::{FrameRGBA, SvgRasterizer, write_png};
pub use render::recorder::{DrawCmd, DrawRecorder};
pub use render::svg::SvgCanvas;
pub use scene::config::SceneConfig;
pub use scene::dataset::{Dataset, NumberToken, TOKEN_COUNT};
pub use search::state::{
    Narrowing, Pointer, Probe, SearchOutcome, SearchState, SearchTrace, trace,
};
pub use sequencer::machine::Sequencer;
pub use sequencer::phase::Phase;
pub use sequencer::state::{
    MarkerTrack, PhaseChange, PhaseState, PointerGlide, TextTransitionSlot,
};
