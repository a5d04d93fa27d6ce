//! Video segmentation CLI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vidseg_engine::{
    segment_video, EngineOptions, FfmpegCodecService, MediaSource, SplitPolicy,
};

/// Split a video into independently playable segments.
#[derive(Parser, Debug)]
#[command(name = "vidseg", version, about)]
struct Cli {
    /// Input media file
    input: PathBuf,

    /// Split into fixed-duration windows of this many seconds
    #[arg(long, value_name = "SECONDS", conflicts_with = "by_size")]
    by_time: Option<f64>,

    /// Split into segments targeting this size in megabytes
    /// (approximate: slices are equal-duration, assuming uniform bitrate)
    #[arg(long, value_name = "MB")]
    by_size: Option<f64>,

    /// Maximum concurrent extractions
    #[arg(long, value_name = "N")]
    max_parallel: Option<usize>,

    /// Directory to write segments and the manifest into
    #[arg(long, value_name = "DIR", default_value = "segments")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let policy = match (cli.by_time, cli.by_size) {
        (Some(secs), None) => SplitPolicy::by_time(secs),
        (None, Some(mb)) => SplitPolicy::by_size((mb * 1024.0 * 1024.0) as u64),
        _ => {
            error!("exactly one of --by-time or --by-size is required");
            std::process::exit(2);
        }
    };
    let Some(policy) = policy else {
        error!("the split value must be positive");
        std::process::exit(2);
    };

    let source = match MediaSource::from_file(&cli.input, content_type_for(&cli.input)) {
        Ok(s) => s,
        Err(e) => {
            error!("cannot read input {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let mut options = EngineOptions::from_env();
    if let Some(n) = cli.max_parallel {
        options = options.with_max_parallel(n);
    }

    let on_progress = Arc::new(|p: vidseg_engine::SegmentationProgress| {
        info!(
            percent = p.percent,
            completed = p.completed_count,
            total = p.total_count,
            phase = p.phase.as_str(),
            detail = p.error_detail.as_deref().unwrap_or(""),
            "progress"
        );
    });

    let service = FfmpegCodecService::new();
    let segments = match segment_video(&service, &source, policy, &options, on_progress).await {
        Ok(segments) => segments,
        Err(e) => {
            error!("segmentation failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_results(&cli.out_dir, &segments).await {
        error!("writing results failed: {}", e);
        std::process::exit(1);
    }

    for segment in &segments {
        info!(
            id = %segment.id,
            size = %vidseg_engine::format_size(segment.byte_size),
            "{}",
            segment.display_name
        );
    }
    info!(
        count = segments.len(),
        out_dir = %cli.out_dir.display(),
        "segments written"
    );
}

/// Write each segment payload plus a JSON manifest of the metadata.
async fn write_results(
    out_dir: &PathBuf,
    segments: &[vidseg_engine::Segment],
) -> std::io::Result<()> {
    tokio::fs::create_dir_all(out_dir).await?;

    for segment in segments {
        let path = out_dir.join(format!("{}.{}", segment.id, segment.extension));
        tokio::fs::write(&path, &segment.payload).await?;
    }

    let manifest = serde_json::to_vec_pretty(segments)?;
    tokio::fs::write(out_dir.join("manifest.json"), manifest).await?;

    Ok(())
}

/// Guess a MIME type from the file extension; the engine only forwards
/// it as metadata.
fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        _ => "video/mp4",
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vidseg=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
