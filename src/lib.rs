//! Storyreel turns a directory of per-page stills, narration speech,
//! optional sound effects, and one background music track into a single
//! slideshow MP4 with cross-slide transitions, pan/zoom motion, and an SRT
//! subtitle side artifact.
//!
//! # Pipeline overview
//!
//! 1. **Load**: story assets are decoded up front ([`load_story`],
//!    [`load_music`]): images to canvas-sized premultiplied RGBA8, audio
//!    to interleaved stereo f32 PCM via the system `ffmpeg` binary.
//! 2. **Mix**: each page's utterances are concatenated inside silence
//!    framing and balanced against its sound effect ([`mix_page`]).
//! 3. **Fold**: a [`TimelineCursor`] converts per-page narration spans to
//!    absolute time and places each clip; [`plan_slides`] sequences the
//!    cross-slide transitions.
//! 4. **Render**: frames are composited on the CPU ([`render_frame`]) and
//!    streamed to `ffmpeg` together with the master audio mix and the
//!    burned-in subtitles ([`FfmpegEncoder`]).
//!
//! The engine is single-threaded and strictly sequential: timestamps are
//! threaded through one fold, and a render either completes or fails
//! loudly. There are no retries and no partial output files.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod captions;
mod compose;
mod config;
mod dispatch;
mod effects;
mod encode;
mod foundation;
mod render;

pub use assets::decode::{PageImage, load_page_image};
pub use assets::media::{AudioPcm, STEREO_CHANNELS, decode_audio_f32_stereo};
pub use assets::story::StoryDir;
pub use audio::buffer::{AudioBuffer, rms_of, sec_to_frames};
pub use audio::mix::{
    AudioMixConfig, PageMix, PagePosition, background_gain, framed_duration_sec, mix_page,
    write_f32le_file,
};
pub use captions::segment::segment_caption;
pub use captions::srt::{build_srt, format_timecode, write_srt};
pub use compose::composer::{
    ComposeOutput, PageInput, caption_spans, compose_video, load_music, load_story, render_story,
};
pub use compose::timeline::TimelineCursor;
pub use config::{CaptionConfig, ComposeConfig};
pub use dispatch::{ModalityAgent, ModalityOutcome, ModalityRequest, run_modalities};
pub use effects::motion::{Motion, PanDir, ZoomAnchor, ZoomDir, crossfade_opacity};
pub use effects::slide::{SlideDir, SlidePlan, SlideStep, plan_slides, slide_offset_px};
pub use encode::ffmpeg::{
    AudioInputConfig, EncodeConfig, FfmpegEncoder, SubtitleBurnConfig, ensure_parent_dir,
    is_ffmpeg_on_path,
};
pub use foundation::error::{StoryreelError, StoryreelResult};
pub use foundation::time::{TimeSpan, frame_time_sec, secs_to_frames_floor};
pub use render::composite::{PremulRgba8, over, sample_bilinear, warp_over};
pub use render::frame::{PageClip, render_frame};
