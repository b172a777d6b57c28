use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Rgba8, TickRate},
        error::{ReelError, ReelResult},
    },
    render::raster::FrameRGBA,
};

/// Output settings for one MP4 file.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub tick_rate: TickRate,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("encode width/height must be non-zero"));
        }
        // yuv420p subsamples chroma 2x2.
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(format!(
                "encode size {}x{} must be even for yuv420p output",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Arguments passed to `ffmpeg`: raw RGBA on stdin, H.264 MP4 out.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args = vec![
            if self.overwrite { "-y" } else { "-n" }.to_owned(),
            "-loglevel".to_owned(),
            "error".to_owned(),
            "-f".to_owned(),
            "rawvideo".to_owned(),
            "-pix_fmt".to_owned(),
            "rgba".to_owned(),
            "-s".to_owned(),
            format!("{}x{}", self.width, self.height),
            "-r".to_owned(),
            self.tick_rate.per_second.to_string(),
            "-i".to_owned(),
            "pipe:0".to_owned(),
            "-an".to_owned(),
            "-c:v".to_owned(),
            "libx264".to_owned(),
            "-pix_fmt".to_owned(),
            "yuv420p".to_owned(),
            "-movflags".to_owned(),
            "+faststart".to_owned(),
        ];
        args.push(self.out_path.to_string_lossy().into_owned());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Create the directory `path` will be written into.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Pipes frames into a running `ffmpeg` process, flattened over the scene background.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    background: Rgba8,
    child: Child,
    stdin: Option<ChildStdin>,
    opaque: Vec<u8>,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, background: Rgba8) -> ReelResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(ReelError::validation(format!(
                "'{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ReelError::render("ffmpeg was not found on PATH"));
        }

        tracing::debug!(out = %cfg.out_path.display(), fps = cfg.tick_rate.per_second, "starting ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(cfg.ffmpeg_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::render(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg stdin was not captured"))?;

        Ok(Self {
            opaque: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
            cfg,
            background,
            child,
            stdin: Some(stdin),
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> ReelResult<()> {
        if (frame.width, frame.height) != (self.cfg.width, self.cfg.height) {
            return Err(ReelError::validation(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        frame.flatten_into(&mut self.opaque, self.background)?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ReelError::render("ffmpeg encoder already finished"))?;
        stdin
            .write_all(&self.opaque)
            .map_err(|e| ReelError::render(format!("write frame to ffmpeg: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    /// Close stdin and wait for `ffmpeg` to write the file.
    pub fn finish(mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| ReelError::render(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(ReelError::render(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::info!(
            out = %self.cfg.out_path.display(),
            frames = self.frames_written,
            "mp4 written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
