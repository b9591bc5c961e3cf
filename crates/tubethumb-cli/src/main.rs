//! `tubethumb` binary.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use tubethumb_ai::AnalysisClient;
use tubethumb_cli::logging::init_tracing;
use tubethumb_cli::{AnalysisOutcome, AppConfig, Orchestrator};
use tubethumb_media::DeliveryOutcome;
use tubethumb_models::{AnalysisResult, ImageFormat, VariantKey, VideoLookupRecord};

/// Find, download and critique YouTube thumbnails
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the synthetic lookup delay
    #[arg(long, global = true)]
    no_delay: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a video URL into its thumbnail variants
    Lookup {
        url: String,

        /// Check which variants actually exist on the CDN
        #[arg(long)]
        probe: bool,
    },

    /// Download one thumbnail variant
    Download {
        url: String,

        #[arg(long, default_value = "maxres")]
        variant: VariantKey,

        #[arg(long, default_value = "original")]
        format: ImageFormat,

        /// Output directory (overrides TUBETHUMB_OUTPUT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the AI for a critique of the best thumbnail
    Analyze { url: String },

    /// Show or manage past lookups
    History {
        /// Forget every past lookup
        #[arg(long, conflicts_with = "select")]
        clear: bool,

        /// Re-run the lookup at this position (0 = newest)
        #[arg(long)]
        select: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::from_env();
    if cli.no_delay {
        config = config.without_delay();
    }
    if let Command::Download { out: Some(dir), .. } = &cli.command {
        config.output_dir = dir.clone();
    }
    debug!(?config, "Loaded configuration");

    let analysis = AnalysisClient::from_env()
        .transpose()
        .context("Failed to create analysis client")?;

    let mut app = Orchestrator::from_config(config, analysis)
        .await
        .context("Failed to initialise")?;

    match cli.command {
        Command::Lookup { url, probe } => {
            let record = app.lookup(&url, report_progress).await?.clone();
            finish_progress();
            print_record(&record, cli.json)?;

            if probe {
                for (key, availability) in app.probe_variants().await? {
                    println!("{:<7} {}", key.as_str(), availability.as_str());
                }
            }
        }

        Command::Download { url, variant, format, .. } => {
            app.lookup(&url, report_progress).await?;
            finish_progress();

            match app.download(variant, format).await? {
                DeliveryOutcome::Saved { path, format, converted } => {
                    let note = if converted { " (converted)" } else { "" };
                    println!("Saved {} as {}{}", path.display(), format, note);
                }
                DeliveryOutcome::OpenedExternally { url, reason, opened } => {
                    eprintln!("Download failed: {}", reason);
                    if opened {
                        println!("Opened {} instead", url);
                    } else {
                        println!("Could not open {}; open it manually", url);
                    }
                }
            }
        }

        Command::Analyze { url } => {
            app.lookup(&url, report_progress).await?;
            finish_progress();

            match app.analyze().await? {
                AnalysisOutcome::Completed(result) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                AnalysisOutcome::Completed(result) => {
                    print!("{}", render_analysis(&result));
                }
                AnalysisOutcome::Disabled => {
                    println!("AI analysis is unavailable: set GEMINI_API_KEY to enable it.");
                }
            }
        }

        Command::History { clear: true, .. } => {
            app.clear_history().await;
            println!("History cleared");
        }

        Command::History { select: Some(index), .. } => {
            let record = app.reselect(index, report_progress).await?.clone();
            finish_progress();
            print_record(&record, cli.json)?;
        }

        Command::History { .. } => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(app.history())?);
            } else if app.history().is_empty() {
                println!("No history yet");
            } else {
                for (i, record) in app.history().iter().enumerate() {
                    print!("{}", render_history_entry(i, record));
                }
            }
        }
    }

    Ok(())
}

fn report_progress(percent: f32) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\rLooking up thumbnails... {:>3.0}%", percent);
    let _ = stderr.flush();
}

fn finish_progress() {
    eprintln!();
}

fn print_record(record: &VideoLookupRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!("Video {}", record.id);
    for variant in &record.thumbnails {
        let best = if variant.is_best { "  [best]" } else { "" };
        println!(
            "  {:<7} {:<28} {:<18} {}{}",
            variant.key.as_str(),
            variant.label,
            variant.resolution,
            variant.url,
            best
        );
    }
    Ok(())
}

/// Plain-text critique, one section per field that is present.
fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = format!(
        "Score: {}/100 ({})\n\n{}\n",
        result.score,
        result.score_band(),
        result.summary
    );
    push_list(&mut out, "Strengths", &result.strengths);
    push_list(&mut out, "Weaknesses", &result.weaknesses);
    push_list(&mut out, "Suggestions", &result.suggestions);

    if let Some(hashtags) = &result.hashtags {
        push_list(&mut out, "Hashtags", hashtags);
    }
    if let Some(colors) = &result.dominant_colors {
        push_list(&mut out, "Dominant colors", colors);
    }
    if let Some(caption) = &result.caption {
        out.push_str(&format!("\nCaption: {}\n", caption));
    }
    if let Some(sentiment) = &result.sentiment {
        out.push_str(&format!("Mood: {}\n", sentiment));
    }
    out
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}:\n", title));
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}

/// One history line plus the small preview variant.
fn render_history_entry(index: usize, record: &VideoLookupRecord) -> String {
    let mut out = format!(
        "{:>2}  {}  {}  {}\n",
        index,
        record.id,
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.original_url
    );
    if let Some(preview) = record.thumbnails.history_preview() {
        out.push_str(&format!("    preview: {}\n", preview.url));
    }
    out
}
