use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use insim_tools::{inspect_capture, schema_reports, FrameReport, InspectOptions};
use tracing_subscriber::EnvFilter;
use wire::{Limits, PaddingPolicy};

#[derive(Parser)]
#[command(
    name = "insim-tools",
    version,
    about = "InSim capture inspection and schema tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a raw capture into frames and decode each one.
    Inspect {
        /// Capture file, or a directory of capture files.
        capture_path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Include the raw bytes of every frame.
        #[arg(long)]
        hex: bool,
        /// The size byte counts 4-byte units.
        #[arg(long)]
        large_packets: bool,
        /// Reject frames with non-zero reserved bytes.
        #[arg(long)]
        strict: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the layout of the known messages.
    Schema {
        /// Only this message, e.g. `IS_MCI` or `mci`.
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// One JSON object per frame.
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            capture_path,
            glob,
            hex,
            large_packets,
            strict,
            format,
        } => {
            let base = if large_packets {
                Limits::large_packets()
            } else {
                Limits::default()
            };
            let padding = if strict {
                PaddingPolicy::Strict
            } else {
                PaddingPolicy::Tolerate
            };
            let options = InspectOptions {
                limits: base.with_padding(padding),
                hex,
            };
            if capture_path.is_dir() {
                for path in collect_captures(&capture_path, glob.as_deref())? {
                    println!("== {} ==", path.display());
                    inspect_file(&path, &options, format)?;
                }
            } else {
                inspect_file(&capture_path, &options, format)?;
            }
        }
        Command::Schema { name } => {
            let reports = schema_reports(name.as_deref());
            if reports.is_empty() {
                anyhow::bail!("no message named {}", name.unwrap_or_default());
            }
            let json = serde_json::to_string_pretty(&reports).context("serialize json")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn inspect_file(path: &Path, options: &InspectOptions, format: OutputFormat) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read capture {}", path.display()))?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "inspecting capture");
    for report in inspect_capture(&bytes, options) {
        match format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&report).context("serialize json")?;
                println!("{line}");
            }
            OutputFormat::Pretty => print_pretty(&report),
        }
    }
    Ok(())
}

fn collect_captures(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = glob
        .map(Pattern::new)
        .transpose()
        .context("invalid glob pattern")?;

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !pattern.matches_path(&path) && !matches_name {
                continue;
            }
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

fn print_pretty(report: &FrameReport) {
    let name = report.name.unwrap_or("?");
    let tag = report
        .type_tag
        .map_or_else(|| "-".to_string(), |tag| tag.to_string());
    let reqi = report
        .request_id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    print!(
        "@{:<6} {:>4} bytes  {name} ({tag}) reqi {reqi}",
        report.offset, report.size
    );
    if let Some(sub_type) = report.sub_type {
        print!(" subt {sub_type}");
    }
    println!();
    if let Some(hex) = &report.hex {
        println!("  {hex}");
    }
    if let Some(packet) = &report.packet {
        println!("  {packet}");
    }
    if let Some(error) = &report.error {
        println!("  error: {error}");
    }
}
