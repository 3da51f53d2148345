use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fcpxgen::{
    Document, FcpxConfig, MediaProbe, MediaProbeResult, Profile, QuickXmlChecker, Session,
    TimelineNode, ValidationReport, validate_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fcpxgen", version)]
struct Cli {
    /// Timing/schema constants as JSON (frame_rate, timebase, frame_duration, ...).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an empty project.
    New(NewArgs),
    /// Write a project with media placed back to back (probed with `ffprobe`).
    Attach(AttachArgs),
    /// Validate an existing FCPXML file.
    Validate(ValidateArgs),
    /// Render a JSON-encoded document to FCPXML.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Output FCPXML path.
    #[arg(long)]
    out: PathBuf,

    /// Project width in pixels.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Project height in pixels.
    #[arg(long, default_value_t = 1920)]
    height: u32,
}

#[derive(Parser, Debug)]
struct AttachArgs {
    #[command(flatten)]
    project: NewArgs,

    /// Seconds each still stays on screen.
    #[arg(long, default_value_t = 5.0)]
    still_duration: f64,

    /// Title text placed after the media.
    #[arg(long)]
    title: Option<String>,

    /// Seconds the title stays on screen.
    #[arg(long, default_value_t = 3.0)]
    title_duration: f64,

    /// Media files, in timeline order.
    #[arg(required = true)]
    media: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// FCPXML file to check.
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output FCPXML path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = load_profile(cli.config.as_deref())?;
    let session = Session::new(profile);
    match cli.cmd {
        Command::New(args) => cmd_new(&session, args),
        Command::Attach(args) => cmd_attach(&session, args),
        Command::Validate(args) => cmd_validate(args),
        Command::Render(args) => cmd_render(&session, args),
    }
}

fn load_profile(config: Option<&Path>) -> anyhow::Result<Profile> {
    let config = match config {
        Some(path) => FcpxConfig::from_path(path)?,
        None => FcpxConfig::default(),
    };
    Ok(Profile::new(config)?)
}

fn cmd_new(session: &Session, args: NewArgs) -> anyhow::Result<()> {
    let doc = session.new_document(args.width, args.height)?;
    save(session, &doc, &args.out)
}

fn cmd_attach(session: &Session, args: AttachArgs) -> anyhow::Result<()> {
    let mut doc = session.new_document(args.project.width, args.project.height)?;
    let clock = *session.profile().clock();

    let mut cursor = 0u64;
    let mut nodes: Vec<TimelineNode> = Vec::with_capacity(args.media.len() + 1);
    for path in &args.media {
        let media = session
            .attach(&mut doc, path, &FfprobeProbe)
            .with_context(|| format!("attach '{}'", path.display()))?;
        let seconds = match clock.duration_frames(&media.asset.duration) {
            Some(frames) if frames > 0 => clock.frames_to_seconds(frames),
            _ => args.still_duration,
        };
        let offset = clock.frames_to_duration(cursor)?;
        let node = session.media_node(&doc, &media, &offset, seconds)?;
        cursor += clock.duration_frames(node.duration()).unwrap_or(0);
        nodes.push(node);
    }

    if let Some(text) = &args.title {
        let offset = clock.frames_to_duration(cursor)?;
        nodes.push(session.title_node(&mut doc, text, &offset, args.title_duration, None)?);
    }

    session.append_by_offset(&mut doc, nodes)?;
    save(session, &doc, &args.project.out)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let report = validate_file(&args.path, &QuickXmlChecker);
    finish(&args.path, &report)
}

fn cmd_render(session: &Session, args: RenderArgs) -> anyhow::Result<()> {
    let f = File::open(&args.in_path)
        .with_context(|| format!("open document '{}'", args.in_path.display()))?;
    let doc: Document = serde_json::from_reader(BufReader::new(f))
        .with_context(|| "parse document JSON")?;
    save(session, &doc, &args.out)
}

fn save(session: &Session, doc: &Document, out: &Path) -> anyhow::Result<()> {
    let report = session.save(doc, out, &QuickXmlChecker)?;
    finish(out, &report)
}

fn finish(path: &Path, report: &ValidationReport) -> anyhow::Result<()> {
    if !report.is_ok() {
        anyhow::bail!("'{}' failed validation: {}", path.display(), report.reason());
    }
    eprintln!("ok {}", path.display());
    Ok(())
}

/// Probe through the system `ffprobe` binary.
struct FfprobeProbe;

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<MediaProbeResult, String> {
        #[derive(serde::Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
            r_frame_rate: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            streams: Vec<ProbeStream>,
            format: Option<ProbeFormat>,
        }

        let out = std::process::Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .output()
            .map_err(|e| format!("failed to run ffprobe: {e}"))?;
        if !out.status.success() {
            return Err(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            ));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| format!("ffprobe json parse failed: {e}"))?;
        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| "no video stream found".to_owned())?;
        let (width, height) = match (video.width, video.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err("missing video geometry from ffprobe".to_owned()),
        };
        let fallback = MediaProbeResult::fallback();

        Ok(MediaProbeResult {
            duration_seconds: parsed
                .format
                .and_then(|f| f.duration)
                .and_then(|d| d.parse().ok())
                .unwrap_or(fallback.duration_seconds),
            width,
            height,
            frame_rate: video
                .r_frame_rate
                .as_deref()
                .and_then(parse_rate)
                .unwrap_or(fallback.frame_rate),
            has_audio: parsed
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("audio")),
            aspect_ratio: f64::from(width) / f64::from(height),
        })
    }
}

fn parse_rate(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let (num, den): (f64, f64) = (num.parse().ok()?, den.parse().ok()?);
    (den > 0.0 && num > 0.0).then_some(num / den)
}
