use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use storyreel::{ComposeConfig, StoryDir, caption_spans, load_story, render_story, write_srt};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a story directory into an MP4 slideshow (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Write the SRT subtitle track only, without rendering video.
    Captions(CaptionsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    story: StoryArgs,

    /// Output MP4 path; defaults to `<story-dir>/output.mp4`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed for the motion and transition randomness; a fixed seed
    /// reproduces the exact same render.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    #[command(flatten)]
    story: StoryArgs,

    /// Output SRT path; defaults to `<story-dir>/captions.srt`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StoryArgs {
    /// Story directory (image/, speech/, sound/, music/).
    #[arg(long = "story-dir")]
    story_dir: PathBuf,

    /// Compose configuration JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Captions JSON: a plain array of strings, or a script_data.json with
    /// `{"pages": [{"story": ...}]}`. Defaults to `<story-dir>/script_data.json`.
    #[arg(long)]
    captions: Option<PathBuf>,
}

impl StoryArgs {
    fn load(&self) -> anyhow::Result<(StoryDir, Vec<String>, ComposeConfig)> {
        let cfg = match &self.config {
            Some(path) => ComposeConfig::from_json_file(path)?,
            None => ComposeConfig::default(),
        };
        let captions_path = self
            .captions
            .clone()
            .unwrap_or_else(|| self.story_dir.join("script_data.json"));
        let captions = load_captions(&captions_path)?;
        Ok((StoryDir::new(&self.story_dir), captions, cfg))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => render(args),
        Command::Captions(args) => captions(args),
    }
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let (story, captions, cfg) = args.story.load()?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let output = render_story(&story, &captions, &cfg, args.out.as_deref(), &mut rng)?;
    println!(
        "rendered {} pages ({:.1}s) -> {}",
        output.pages,
        output.duration_sec,
        output.video_path.display()
    );
    println!("subtitles -> {}", output.srt_path.display());
    Ok(())
}

fn captions(args: CaptionsArgs) -> anyhow::Result<()> {
    let (story, captions, cfg) = args.story.load()?;
    let pages = load_story(&story, &captions, &cfg)?;
    let spans = caption_spans(&pages, &cfg)?;
    let out = args
        .out
        .unwrap_or_else(|| story.root().join("captions.srt"));
    write_srt(&out, &spans, &captions, cfg.caption.max_length)?;
    println!("subtitles -> {}", out.display());
    Ok(())
}

// Accept both a plain JSON array of page strings and the story pipeline's
// script_data.json shape.
fn load_captions(path: &Path) -> anyhow::Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read captions file '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse captions file '{}'", path.display()))?;

    let entries = match &value {
        serde_json::Value::Array(entries) => entries.clone(),
        serde_json::Value::Object(map) => map
            .get("pages")
            .and_then(|p| p.as_array())
            .cloned()
            .with_context(|| {
                format!("captions file '{}' has no \"pages\" array", path.display())
            })?,
        _ => anyhow::bail!(
            "captions file '{}' must be a JSON array or an object with \"pages\"",
            path.display()
        ),
    };

    let mut captions = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let text = match entry {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => map
                .get("story")
                .and_then(|s| s.as_str())
                .map(str::to_string)
                .with_context(|| format!("captions entry {idx} has no \"story\" string"))?,
            _ => anyhow::bail!("captions entry {idx} must be a string or an object"),
        };
        captions.push(text);
    }
    if captions.is_empty() {
        anyhow::bail!("captions file '{}' lists zero pages", path.display());
    }
    Ok(captions)
}
