use std::path::{Path, PathBuf};

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::TickIndex,
        error::{ReelError, ReelResult},
        math::Fnv1a64,
    },
    render::{
        port::NullPort,
        raster::{SvgRasterizer, write_png},
        recorder::DrawRecorder,
        svg::SvgCanvas,
    },
    scene::{config::SceneConfig, dataset::Dataset},
    search::state::SearchOutcome,
    sequencer::{machine::Sequencer, phase::Phase, state::PhaseChange},
};

/// Tick budget used when a caller does not pick one. A default run finishes in a few thousand.
pub const DEFAULT_MAX_TICKS: u64 = 20_000;

/// Contiguous ticks spent in one phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhaseSpan {
    pub phase: Phase,
    pub first_tick: TickIndex,
    pub last_tick: TickIndex,
}

impl PhaseSpan {
    pub fn ticks(&self) -> u64 {
        self.last_tick.since(self.first_tick) + 1
    }
}

/// Everything a headless run produced, minus the pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunSummary {
    pub dataset: Dataset,
    pub sorted: Vec<i64>,
    pub outcome: SearchOutcome,
    /// Ticks executed up to and including the one that entered END.
    pub ticks: u64,
    pub spans: Vec<PhaseSpan>,
    pub transitions: Vec<PhaseChange>,
    /// Digest of every primitive call of every tick.
    pub fingerprint: u64,
}

/// Options for [`render_run`].
#[derive(Clone, Debug)]
pub struct RenderRunOpts {
    /// Extra END frames appended after the search settles.
    pub hold_ticks: u64,
    pub max_ticks: u64,
    /// Directory of additional font files for text rendering.
    pub font_dir: Option<PathBuf>,
}

impl Default for RenderRunOpts {
    fn default() -> Self {
        Self {
            hold_ticks: 120,
            max_ticks: DEFAULT_MAX_TICKS,
            font_dir: None,
        }
    }
}

/// Counters reported by [`render_run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub hold_frames: u64,
    pub outcome: SearchOutcome,
}

/// Run `config` to END without producing pixels.
#[tracing::instrument(skip(config))]
pub fn headless_run(config: &SceneConfig, max_ticks: u64) -> ReelResult<RunSummary> {
    let mut seq = Sequencer::new(config.clone())?;
    let start = seq.phase();
    let mut recorder = DrawRecorder::new();
    let mut digest = Fnv1a64::new_default();

    drive_to_end(&mut seq, max_ticks, |seq| {
        recorder.clear();
        seq.tick(&mut recorder)?;
        digest.write_u64(recorder.fingerprint());
        Ok(())
    })?;

    let outcome = seq
        .outcome()
        .ok_or_else(|| ReelError::invariant("reached END without a settled search"))?;
    tracing::info!(ticks = seq.tick_index().0, ?outcome, "headless run finished");
    Ok(RunSummary {
        dataset: seq.dataset().clone(),
        sorted: seq.sorted_values().to_vec(),
        outcome,
        ticks: seq.tick_index().0,
        spans: phase_spans(start, seq.transitions()),
        transitions: seq.transitions().to_vec(),
        fingerprint: digest.finish(),
    })
}

/// The SVG document drawn on `tick` (1-based) of a run of `config`.
pub fn render_tick_svg(config: &SceneConfig, tick: TickIndex) -> ReelResult<String> {
    if tick.0 == 0 {
        return Err(ReelError::validation("ticks are numbered from 1"));
    }
    let mut seq = Sequencer::new(config.clone())?;
    for _ in 1..tick.0 {
        seq.tick(&mut NullPort)?;
    }
    let mut canvas = SvgCanvas::new(config.canvas);
    seq.tick(&mut canvas)?;
    Ok(canvas.document())
}

/// Rasterize tick `tick` of a run of `config` into a PNG at `out`.
pub fn render_tick_png(
    config: &SceneConfig,
    tick: TickIndex,
    out: &Path,
    font_dir: Option<&Path>,
) -> ReelResult<()> {
    let svg = render_tick_svg(config, tick)?;
    let frame = SvgRasterizer::new(font_dir).rasterize(&svg, config.canvas)?;
    write_png(&frame, config.background, out)
}

/// Render every tick of a run to END, then `hold_ticks` END frames, into `sink`.
#[tracing::instrument(skip(config, sink, opts))]
pub fn render_run(
    config: &SceneConfig,
    sink: &mut dyn FrameSink,
    opts: &RenderRunOpts,
) -> ReelResult<RenderStats> {
    let mut seq = Sequencer::new(config.clone())?;
    let rasterizer = SvgRasterizer::new(opts.font_dir.as_deref());
    let mut canvas = SvgCanvas::new(config.canvas);

    sink.begin(SinkConfig {
        width: config.canvas.width,
        height: config.canvas.height,
        tick_rate: config.tick_rate()?,
    })?;

    let mut frames_total = 0u64;
    let mut push_tick = |seq: &mut Sequencer, canvas: &mut SvgCanvas| -> ReelResult<()> {
        seq.tick(canvas)?;
        let frame = rasterizer.rasterize(&canvas.document(), config.canvas)?;
        sink.push_frame(seq.tick_index(), &frame)?;
        frames_total += 1;
        Ok(())
    };

    drive_to_end(&mut seq, opts.max_ticks, |seq| push_tick(seq, &mut canvas))?;
    for _ in 0..opts.hold_ticks {
        push_tick(&mut seq, &mut canvas)?;
    }
    sink.end()?;

    let outcome = seq
        .outcome()
        .ok_or_else(|| ReelError::invariant("reached END without a settled search"))?;
    tracing::info!(frames_total, ?outcome, "render finished");
    Ok(RenderStats {
        frames_total,
        hold_frames: opts.hold_ticks,
        outcome,
    })
}

fn drive_to_end(
    seq: &mut Sequencer,
    max_ticks: u64,
    mut step: impl FnMut(&mut Sequencer) -> ReelResult<()>,
) -> ReelResult<()> {
    let mut budget = max_ticks;
    while !seq.is_finished() {
        if budget == 0 {
            return Err(ReelError::invariant(format!(
                "run did not reach END within {max_ticks} ticks (stuck in {})",
                seq.phase()
            )));
        }
        budget -= 1;
        step(seq)?;
    }
    Ok(())
}

/// Spans of every phase that ran, reconstructed from the transition log.
pub fn phase_spans(start: Phase, transitions: &[PhaseChange]) -> Vec<PhaseSpan> {
    let mut spans = Vec::with_capacity(transitions.len());
    let mut phase = start;
    let mut first_tick = TickIndex(1);
    for change in transitions {
        spans.push(PhaseSpan {
            phase,
            first_tick,
            last_tick: change.tick,
        });
        phase = change.to;
        first_tick = change.tick.next();
    }
    spans
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
