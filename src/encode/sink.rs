use std::path::PathBuf;

use crate::{
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::{
        core::{Rgba8, TickIndex, TickRate},
        error::{ReelError, ReelResult},
    },
    render::raster::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] at the start of a run render.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Ticks (frames) per second.
    pub tick_rate: TickRate,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`TickIndex`] order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame in strictly increasing tick order.
    fn push_frame(&mut self, tick: TickIndex, frame: &FrameRGBA) -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(TickIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    pub fn frames(&self) -> &[(TickIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, tick: TickIndex, frame: &FrameRGBA) -> ReelResult<()> {
        if let Some((last, _)) = self.frames.last()
            && tick <= *last
        {
            return Err(ReelError::invariant(format!(
                "frames pushed out of order: tick {} after {}",
                tick.0, last.0
            )));
        }
        self.frames.push((tick, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Options for [`FfmpegSink`].
#[derive(Debug, Clone)]
pub struct FfmpegSinkOpts {
    /// Destination MP4 path.
    pub out_path: PathBuf,
    /// Replace an existing file.
    pub overwrite: bool,
    /// Colour transparent pixels are flattened onto.
    pub background: Rgba8,
}

/// Sink that encodes frames to MP4 through the system `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<FfmpegEncoder>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        let enc_cfg = EncodeConfig {
            width: cfg.width,
            height: cfg.height,
            tick_rate: cfg.tick_rate,
            out_path: self.opts.out_path.clone(),
            overwrite: self.opts.overwrite,
        };
        self.encoder = Some(FfmpegEncoder::new(enc_cfg, self.opts.background)?);
        Ok(())
    }

    fn push_frame(&mut self, _tick: TickIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let Some(enc) = self.encoder.as_mut() else {
            return Err(ReelError::render("ffmpeg sink used before begin()"));
        };
        enc.encode_frame(frame)
    }

    fn end(&mut self) -> ReelResult<()> {
        let Some(enc) = self.encoder.take() else {
            return Err(ReelError::render("ffmpeg sink ended before begin()"));
        };
        enc.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
