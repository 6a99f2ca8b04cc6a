use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// The mixed audio track fed to ffmpeg as a second input: a raw f32le file
/// written by [`crate::write_f32le_file`].
#[derive(Clone, Debug)]
pub struct AudioInputConfig {
    /// Raw interleaved f32le sample file.
    pub path: PathBuf,
    /// Sample rate of the raw samples, in Hz.
    pub sample_rate: u32,
    /// Channel count of the raw samples.
    pub channels: u16,
    /// ffmpeg audio encoder name for the output ("aac", "libmp3lame", ...).
    pub codec: String,
}

/// Subtitle burn-in: the SRT side artifact rendered bottom-center onto the
/// video through ffmpeg's `subtitles` filter.
#[derive(Clone, Debug)]
pub struct SubtitleBurnConfig {
    /// SRT file to burn in.
    pub srt_path: PathBuf,
    /// Font size, typically derived from the output resolution.
    pub fontsize: u32,
    /// Vertical margin from the bottom edge, in pixels.
    pub margin_v: u32,
}

/// Encoder settings for one MP4 render.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Output width in pixels (even).
    pub width: u32,
    /// Output height in pixels (even).
    pub height: u32,
    /// Video frame rate.
    pub fps: u32,
    /// Final output path. Frames are first encoded to a temporary sibling
    /// and renamed here on success, so a failed render leaves no output.
    pub out_path: PathBuf,
    /// Refuse to replace an existing output when false.
    pub overwrite: bool,
    /// Optional mixed audio track.
    pub audio: Option<AudioInputConfig>,
    /// Optional subtitle burn-in.
    pub subtitles: Option<SubtitleBurnConfig>,
}

impl EncodeConfig {
    /// Reject settings ffmpeg would choke on.
    pub fn validate(&self) -> StoryreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StoryreelError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // We target yuv420p output for maximum player compatibility.
            return Err(StoryreelError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.fps == 0 {
            return Err(StoryreelError::validation("encode fps must be non-zero"));
        }
        if let Some(audio) = &self.audio {
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(StoryreelError::validation(
                    "audio input sample_rate/channels must be non-zero",
                ));
            }
            if audio.codec.trim().is_empty() {
                return Err(StoryreelError::validation(
                    "audio codec must be non-empty",
                ));
            }
        }
        Ok(())
    }
}

/// True when a runnable `ffmpeg` binary is on PATH.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> StoryreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streaming MP4 encoder around the system `ffmpeg` binary.
///
/// We intentionally shell out rather than link native FFmpeg libraries, so
/// the crate builds without dev headers. Frames are rawvideo RGBA piped to
/// stdin; audio and subtitles are attached from files.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    tmp_path: PathBuf,
    frame_len: usize,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    /// Validate the config, spawn ffmpeg, and get ready to accept frames.
    pub fn new(cfg: EncodeConfig) -> StoryreelResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(StoryreelError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(StoryreelError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let tmp_path = temp_sibling(&cfg.out_path);
        let args = build_args(&cfg, &tmp_path);

        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                StoryreelError::encoding(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            StoryreelError::encoding("failed to open ffmpeg stdin (unexpected)")
        })?;

        Ok(Self {
            frame_len: cfg.width as usize * cfg.height as usize * 4,
            cfg,
            tmp_path,
            child,
            stdin: Some(stdin),
        })
    }

    /// Stream one RGBA8 frame (`width * height * 4` bytes) to the encoder.
    pub fn encode_frame(&mut self, rgba: &[u8]) -> StoryreelResult<()> {
        if rgba.len() != self.frame_len {
            return Err(StoryreelError::validation(format!(
                "frame size mismatch: got {} bytes, expected {} ({}x{}x4)",
                rgba.len(),
                self.frame_len,
                self.cfg.width,
                self.cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StoryreelError::encoding("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(rgba).map_err(|e| {
            StoryreelError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    /// Close the stream, wait for ffmpeg, and move the finished file to the
    /// final output path. On failure the temporary file is removed and the
    /// output path is left untouched.
    pub fn finish(mut self) -> StoryreelResult<()> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            StoryreelError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let _ = std::fs::remove_file(&self.tmp_path);
            return Err(StoryreelError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        std::fs::rename(&self.tmp_path, &self.cfg.out_path).map_err(|e| {
            StoryreelError::encoding(format!(
                "failed to move '{}' into place at '{}': {e}",
                self.tmp_path.display(),
                self.cfg.out_path.display()
            ))
        })
    }
}

fn temp_sibling(out_path: &Path) -> PathBuf {
    let mut name = out_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output.mp4"));
    name.push(".part");
    out_path.with_file_name(name)
}

fn build_args(cfg: &EncodeConfig, tmp_path: &Path) -> Vec<OsString> {
    fn os(s: impl Into<OsString>) -> OsString {
        s.into()
    }

    let mut args: Vec<OsString> = Vec::new();
    args.push(os(if cfg.overwrite { "-y" } else { "-n" }));
    args.extend([os("-loglevel"), os("error")]);

    // Input 0: rawvideo frames on stdin.
    args.extend([
        os("-f"),
        os("rawvideo"),
        os("-pix_fmt"),
        os("rgba"),
        os("-s"),
        os(format!("{}x{}", cfg.width, cfg.height)),
        os("-r"),
        os(cfg.fps.to_string()),
        os("-i"),
        os("pipe:0"),
    ]);

    // Input 1: the mixed audio track, raw f32le.
    if let Some(audio) = &cfg.audio {
        args.extend([
            os("-f"),
            os("f32le"),
            os("-ar"),
            os(audio.sample_rate.to_string()),
            os("-ac"),
            os(audio.channels.to_string()),
            os("-i"),
            audio.path.clone().into_os_string(),
        ]);
    }

    if let Some(subs) = &cfg.subtitles {
        args.extend([
            os("-vf"),
            os(format!(
                "subtitles={}:force_style='FontSize={},Alignment=2,MarginV={}'",
                filter_escape(&subs.srt_path),
                subs.fontsize,
                subs.margin_v
            )),
        ]);
    }

    args.extend([os("-map"), os("0:v")]);
    if cfg.audio.is_some() {
        args.extend([os("-map"), os("1:a")]);
    }

    args.extend([
        os("-c:v"),
        os("libx264"),
        os("-pix_fmt"),
        os("yuv420p"),
        os("-movflags"),
        os("+faststart"),
    ]);

    if let Some(audio) = &cfg.audio {
        args.extend([
            os("-c:a"),
            os(audio.codec.clone()),
            os("-ar"),
            os(audio.sample_rate.to_string()),
            os("-shortest"),
        ]);
    }

    // The temp name hides the container, so state it explicitly.
    args.extend([os("-f"), os("mp4")]);
    args.push(tmp_path.as_os_str().to_os_string());
    args
}

// Escape a path for use inside an ffmpeg filter argument, where `\`, `:`,
// `'` and brackets are metacharacters.
fn filter_escape(path: &Path) -> String {
    let mut out = String::new();
    for c in path.to_string_lossy().chars() {
        if matches!(c, '\\' | ':' | '\'' | '[' | ']' | ',' | ';') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
