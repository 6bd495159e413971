//! chatdoc CLI - chat transcript export tool

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use chatdoc::export::parse_utc_offset;
use chatdoc::layout::TimelineMerger;
use chatdoc::model::TimelineItem;
use chatdoc::{
    DirectoryResolver, ExportOptions, Exporter, JsonFormat, OutputFormat, TieBreak, Transcript,
    Viewer,
};

#[derive(Parser)]
#[command(name = "chatdoc")]
#[command(version)]
#[command(about = "Export chat transcripts to paginated documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a transcript to a paginated document
    Export {
        /// Transcript JSON file
        #[arg(value_name = "TRANSCRIPT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Render from this participant's perspective
        #[arg(long, value_name = "ID", conflicts_with = "observer")]
        viewer: Option<String>,

        /// Render as an outside observer (default)
        #[arg(long)]
        observer: bool,

        /// Embed image attachments
        #[arg(long)]
        include_media: bool,

        /// Directory holding media files, looked up by URL file name
        #[arg(long, value_name = "DIR", requires = "include_media")]
        media_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Application name used in the file name and footer
        #[arg(long, env = "CHATDOC_APP_NAME", default_value = "Chatdoc")]
        app_name: String,

        /// Chat identifier (defaults to the transcript file stem)
        #[arg(long)]
        subject: Option<String>,

        /// Offset for dates and times, e.g. +02:00
        #[arg(long, default_value = "+00:00", allow_hyphen_values = true)]
        utc_offset: String,

        /// Export timestamp (RFC 3339), defaults to now
        #[arg(long, value_name = "TIME")]
        exported_at: Option<String>,

        /// Order calls before messages with the same timestamp
        #[arg(long)]
        calls_first: bool,

        /// Keep media links as they are instead of forcing a download
        #[arg(long)]
        no_download_links: bool,
    },

    /// Dump the page layout of a transcript as JSON
    Layout {
        /// Transcript JSON file
        #[arg(value_name = "TRANSCRIPT")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render from this participant's perspective
        #[arg(long, value_name = "ID")]
        viewer: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show a timeline summary of a transcript
    Info {
        /// Transcript JSON file
        #[arg(value_name = "TRANSCRIPT")]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Draw-operation log as JSON
    Json,
    /// Plain text pages
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

/// Arguments of the export command.
struct ExportArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    viewer: Option<String>,
    include_media: bool,
    media_dir: Option<PathBuf>,
    format: Format,
    app_name: String,
    subject: Option<String>,
    utc_offset: String,
    exported_at: Option<String>,
    calls_first: bool,
    no_download_links: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            input,
            output,
            viewer,
            observer: _,
            include_media,
            media_dir,
            format,
            app_name,
            subject,
            utc_offset,
            exported_at,
            calls_first,
            no_download_links,
        } => cmd_export(ExportArgs {
            input,
            output,
            viewer,
            include_media,
            media_dir,
            format,
            app_name,
            subject,
            utc_offset,
            exported_at,
            calls_first,
            no_download_links,
        })
        .map(|_| ()),
        Commands::Layout {
            input,
            output,
            viewer,
            compact,
        } => cmd_layout(&input, output.as_deref(), viewer, compact),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_transcript(input: &Path) -> Result<Transcript, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(input)?;
    Ok(Transcript::from_json(&json)?)
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chat".to_string())
}

fn viewer_from(id: Option<String>) -> Viewer {
    id.map(Viewer::participant).unwrap_or(Viewer::Observer)
}

fn cmd_export(args: ExportArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let transcript = read_transcript(&args.input)?;

    let mut options = ExportOptions::new()
        .with_app_name(args.app_name)
        .with_subject(args.subject.unwrap_or_else(|| file_stem(&args.input)))
        .with_viewer(viewer_from(args.viewer))
        .with_media(args.include_media)
        .with_format(args.format.into())
        .with_utc_offset(parse_utc_offset(&args.utc_offset)?)
        .with_forced_downloads(!args.no_download_links);

    if args.calls_first {
        options = options.with_tie_break(TieBreak::CallsFirst);
    }
    if let Some(at) = args.exported_at {
        let at = DateTime::parse_from_rfc3339(&at)
            .map_err(|e| format!("Invalid export time '{}': {}", at, e))?;
        options = options.with_exported_at(at.with_timezone(&Utc));
    }

    let resolver = args.media_dir.map(DirectoryResolver::new);
    let exporter = Exporter::new(options);
    let result = match &resolver {
        Some(resolver) => exporter.with_resolver(resolver).export(&transcript)?,
        None => exporter.export(&transcript)?,
    };

    let output_dir = args.output.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;
    let path = result.write_to(&output_dir)?;

    println!("{} {}", "Saved to".green(), path.display());
    println!(
        "  {} {} pages, {} messages, {} calls",
        "├─".dimmed(),
        result.stats.page_count,
        result.stats.message_count,
        result.stats.call_count
    );
    println!(
        "  {} {} media ({} embedded)",
        "└─".dimmed(),
        result.stats.media_count,
        result.stats.embedded_image_count
    );

    for warning in &result.warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    Ok(path)
}

fn cmd_layout(
    input: &Path,
    output: Option<&Path>,
    viewer: Option<String>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let transcript = read_transcript(input)?;
    let options = ExportOptions::new()
        .with_subject(file_stem(input))
        .with_viewer(viewer_from(viewer));

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = chatdoc::layout_json(&transcript, options, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let transcript = read_transcript(input)?;
    let items = TimelineMerger::default().merge(&transcript.messages, &transcript.calls);

    let messages = items.iter().filter(|i| i.is_message()).count();
    let calls = items.iter().filter(|i| i.is_call()).count();
    let attachments = items
        .iter()
        .filter(|i| matches!(i, TimelineItem::Message(m) if m.attachment.is_some()))
        .count();
    let skipped = transcript.messages.len() - messages;
    let days: BTreeSet<_> = items.iter().map(|i| i.timestamp().date_naive()).collect();
    let first = items.first().map(|i| i.timestamp().to_rfc3339());
    let last = items.last().map(|i| i.timestamp().to_rfc3339());

    if as_json {
        let summary = serde_json::json!({
            "file": input.display().to_string(),
            "participants": transcript.participants.len(),
            "messages": messages,
            "calls": calls,
            "attachments": attachments,
            "skipped": skipped,
            "days": days.len(),
            "first": first,
            "last": last,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Transcript Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Participants".bold(), transcript.participants.len());
    println!("{}: {}", "Messages".bold(), messages);
    println!("{}: {}", "Calls".bold(), calls);
    println!("{}: {}", "Attachments".bold(), attachments);
    if skipped > 0 {
        println!("{}: {}", "Skipped (deleted or empty)".bold(), skipped);
    }

    println!();
    println!("{}", "Timeline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Days".bold(), days.len());
    if let (Some(first), Some(last)) = (first, last) {
        println!("{}: {}", "First".bold(), first);
        println!("{}: {}", "Last".bold(), last);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "chatdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Chat transcript export tool");
    println!();
    println!("License: MIT");
}
