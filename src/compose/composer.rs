use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::Rng;

use crate::assets::decode::{PageImage, load_page_image};
use crate::assets::media::{STEREO_CHANNELS, decode_audio_f32_stereo};
use crate::assets::story::StoryDir;
use crate::audio::buffer::AudioBuffer;
use crate::audio::mix::{
    AudioMixConfig, PagePosition, background_gain, mix_page, write_f32le_file,
};
use crate::captions::srt::write_srt;
use crate::compose::timeline::TimelineCursor;
use crate::config::ComposeConfig;
use crate::effects::motion::{Motion, ZoomAnchor};
use crate::effects::slide::plan_slides;
use crate::encode::ffmpeg::{
    AudioInputConfig, EncodeConfig, FfmpegEncoder, SubtitleBurnConfig, ensure_parent_dir,
};
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::time::{TimeSpan, secs_to_frames_floor};
use crate::render::frame::{PageClip, render_frame};

/// One composable page: a caption, its canvas-sized still, one or more
/// speech utterances, and an optional sound effect.
#[derive(Clone, Debug)]
pub struct PageInput {
    /// 1-based page number; ordering is significant and fixed.
    pub index: usize,
    /// Narration text shown as the page's subtitle.
    pub caption: String,
    /// Prepared still image.
    pub image: PageImage,
    /// Ordered speech utterances, at least one.
    pub speech: Vec<AudioBuffer>,
    /// Optional page-local sound effect.
    pub sound: Option<AudioBuffer>,
}

/// Paths and summary of one finished render.
#[derive(Clone, Debug)]
pub struct ComposeOutput {
    /// Final video file.
    pub video_path: PathBuf,
    /// SRT side artifact.
    pub srt_path: PathBuf,
    /// Composite duration in seconds.
    pub duration_sec: f64,
    /// Number of pages composed.
    pub pages: usize,
}

/// Load and decode every asset of a story directory.
///
/// `captions` defines the page count; any page missing its image or all of
/// its speech aborts the load (no partial-page recovery).
#[tracing::instrument(skip(captions, cfg), fields(pages = captions.len()))]
pub fn load_story(
    story: &StoryDir,
    captions: &[String],
    cfg: &ComposeConfig,
) -> StoryreelResult<Vec<PageInput>> {
    if captions.is_empty() {
        return Err(StoryreelError::validation(
            "a story needs at least one page caption",
        ));
    }

    let mut pages = Vec::with_capacity(captions.len());
    for (idx, caption) in captions.iter().enumerate() {
        let number = idx + 1;
        let image = load_page_image(&story.image_path(number)?, cfg.width, cfg.height)?;

        let mut speech = Vec::new();
        for path in story.speech_paths(number)? {
            let pcm = decode_audio_f32_stereo(&path, cfg.audio_sample_rate)?;
            speech.push(AudioBuffer::from_pcm(pcm)?);
        }

        let sound = match story.sound_path(number) {
            Some(path) => {
                let pcm = decode_audio_f32_stereo(&path, cfg.audio_sample_rate)?;
                Some(AudioBuffer::from_pcm(pcm)?)
            }
            None => None,
        };

        pages.push(PageInput {
            index: number,
            caption: caption.clone(),
            image,
            speech,
            sound,
        });
    }
    Ok(pages)
}

/// Decode the story's shared background music track.
pub fn load_music(story: &StoryDir, cfg: &ComposeConfig) -> StoryreelResult<AudioBuffer> {
    let pcm = decode_audio_f32_stereo(&story.music_path()?, cfg.audio_sample_rate)?;
    AudioBuffer::from_pcm(pcm)
}

/// Absolute per-page narration spans for a page list, without rendering
/// anything. Sound effects do not shift timing, so they are ignored.
pub fn caption_spans(
    pages: &[PageInput],
    cfg: &ComposeConfig,
) -> StoryreelResult<Vec<TimeSpan>> {
    cfg.validate()?;
    let n = pages.len();
    let mix_cfg = mix_config(cfg);
    let mut fold = TimelineCursor::new();
    for (idx, page) in pages.iter().enumerate() {
        let mix = mix_page(&page.speech, None, PagePosition::from_index(idx, n), &mix_cfg)?;
        fold.push_page(&mix.narration, mix.track.duration_sec(), cfg.slide_duration)?;
    }
    Ok(fold.page_spans().to_vec())
}

/// Compose and encode the final video.
///
/// A strictly sequential fold over pages 1..N: mix each page's audio,
/// convert its narration spans to absolute time, pick its motion effect,
/// then sequence the clips with cross-slides, write the SRT, balance and
/// attach the music bed, and stream every frame to ffmpeg. The output is
/// written to a temporary sibling and renamed into place on success.
#[tracing::instrument(skip_all, fields(pages = pages.len(), out = %save_path.display()))]
pub fn compose_video(
    pages: Vec<PageInput>,
    music: AudioBuffer,
    cfg: &ComposeConfig,
    save_path: &Path,
    srt_path: &Path,
    rng: &mut impl Rng,
) -> StoryreelResult<ComposeOutput> {
    cfg.validate()?;
    if pages.is_empty() {
        return Err(StoryreelError::validation("cannot compose zero pages"));
    }

    let n = pages.len();
    let rate = cfg.audio_sample_rate;
    let mix_cfg = mix_config(cfg);

    let mut fold = TimelineCursor::new();
    let mut clips = Vec::with_capacity(n);
    let mut placed_tracks = Vec::with_capacity(n);
    let mut durations = Vec::with_capacity(n);
    let mut captions = Vec::with_capacity(n);
    let mut last_speech_rms = 0.0f32;

    for (idx, page) in pages.into_iter().enumerate() {
        let position = PagePosition::from_index(idx, n);
        let mix = mix_page(&page.speech, page.sound.as_ref(), position, &mix_cfg)?;
        if mix.track.sample_rate() != rate {
            return Err(StoryreelError::validation(format!(
                "page {} audio is {} Hz but the configuration expects {} Hz",
                page.index,
                mix.track.sample_rate(),
                rate
            )));
        }

        let duration = mix.track.duration_sec();
        let start = fold.push_page(&mix.narration, duration, cfg.slide_duration)?;

        let motion = Motion::draw(rng, cfg.zoom_speed, cfg.move_ratio, ZoomAnchor::Center);
        clips.push(PageClip {
            image: page.image,
            motion,
            duration_sec: duration,
        });
        placed_tracks.push((start, mix.track));
        durations.push(duration);
        captions.push(page.caption);
        last_speech_rms = mix.speech_rms;
    }

    let plan = plan_slides(&durations, cfg.slide_duration, rng)?;
    tracing::info!(
        duration_sec = plan.total_duration,
        "timeline planned, writing subtitles"
    );

    write_srt(srt_path, fold.page_spans(), &captions, cfg.caption.max_length)?;

    // Master mix: page tracks at their clip starts (overlaps sum), then the
    // music bed, balanced against the last page's speech RMS.
    let mut master = AudioBuffer::silence(rate, 0.0);
    for (start, track) in &placed_tracks {
        let offset = (start * f64::from(rate)).round() as usize;
        master.add_at(track, offset);
    }
    let music_gain = background_gain(
        cfg.music_volume,
        last_speech_rms,
        music.rms(),
        cfg.bg_speech_ratio,
    );
    if music_gain > 0.0 {
        let mut bed = music.loop_or_fit(master.frames());
        bed.scale(music_gain);
        master.add_at(&bed, 0);
    } else {
        tracing::warn!("music track is silent, skipping the music bed");
    }
    master.clamp();

    ensure_parent_dir(save_path)?;
    let mix_dir = save_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mix_file = tempfile::Builder::new()
        .prefix(".storyreel-mix-")
        .suffix(".f32le")
        .tempfile_in(mix_dir)
        .context("create temporary audio mix file")?;
    write_f32le_file(&master, mix_file.path())?;

    let area_height = cfg.caption.resolved_area_height(cfg.height);
    let encoder_cfg = EncodeConfig {
        width: cfg.width,
        height: cfg.height,
        fps: cfg.fps,
        out_path: save_path.to_path_buf(),
        overwrite: true,
        audio: Some(AudioInputConfig {
            path: mix_file.path().to_path_buf(),
            sample_rate: rate,
            channels: STEREO_CHANNELS,
            codec: cfg.audio_codec.clone(),
        }),
        subtitles: Some(SubtitleBurnConfig {
            srt_path: srt_path.to_path_buf(),
            fontsize: cfg.caption.resolved_fontsize(cfg.width, cfg.height),
            margin_v: area_height / 4,
        }),
    };

    let total_frames = secs_to_frames_floor(plan.total_duration, cfg.fps);
    tracing::info!(total_frames, "encoding");
    let mut encoder = FfmpegEncoder::new(encoder_cfg)?;
    for frame in 0..total_frames {
        let rgba = render_frame(
            frame,
            cfg.fps,
            &clips,
            &plan,
            cfg.fade_duration,
            area_height,
            cfg.width,
            cfg.height,
        );
        encoder.encode_frame(&rgba)?;
    }
    encoder.finish()?;
    drop(mix_file);

    tracing::info!(out = %save_path.display(), "render complete");
    Ok(ComposeOutput {
        video_path: save_path.to_path_buf(),
        srt_path: srt_path.to_path_buf(),
        duration_sec: plan.total_duration,
        pages: n,
    })
}

/// Load a story directory and render it end to end.
///
/// The video lands at `out_path` (default `<story>/output.mp4`) and the
/// subtitles at `<story>/captions.srt`.
pub fn render_story(
    story: &StoryDir,
    captions: &[String],
    cfg: &ComposeConfig,
    out_path: Option<&Path>,
    rng: &mut impl Rng,
) -> StoryreelResult<ComposeOutput> {
    let pages = load_story(story, captions, cfg)?;
    let music = load_music(story, cfg)?;
    let save_path = out_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| story.root().join("output.mp4"));
    let srt_path = story.root().join("captions.srt");
    compose_video(pages, music, cfg, &save_path, &srt_path, rng)
}

fn mix_config(cfg: &ComposeConfig) -> AudioMixConfig {
    AudioMixConfig {
        fade_duration: cfg.fade_duration,
        slide_duration: cfg.slide_duration,
        sound_volume: cfg.sound_volume,
        bg_speech_ratio: cfg.bg_speech_ratio,
    }
}
