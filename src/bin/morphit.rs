//! CLI binary for morphit.
//!
//! A thin shim over the library crate: read the input file into memory,
//! run one conversion, write the result next to the input (or to `-o`).

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use morphit::{classify, convert, source, ConvertError, SourceFile, TargetFormat};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Image to JPEG (writes holiday.jpg next to the input)
  morphit holiday.png --to jpg

  # Image to a single-page PDF
  morphit holiday.png --to pdf

  # First page of a PDF as PNG
  morphit report.pdf --to png

  # DOCX to PDF or plain text
  morphit letter.docx --to pdf
  morphit letter.docx --to txt -o letter-plain.txt

  # Audio to WAV or MP3
  morphit voicemail.m4a --to wav
  morphit session.wav --to mp3

  # What can this file become?
  morphit mystery.webp --list-targets

SUPPORTED CONVERSIONS:
  Source            Targets
  ───────────────   ─────────────────────────────
  raster image      jpg, png, webp, gif, pdf
  PDF               jpg, png, webp, gif  (page 1)
  DOCX              pdf, txt
  audio container   wav, mp3

NOTES:
  PDF input and output require the pdfium shared library at runtime
  (place libpdfium next to the executable or install it system-wide).
  All other conversions are fully self-contained.
"#;

/// Convert a file to another format, entirely in memory.
#[derive(Parser, Debug)]
#[command(
    name = "morphit",
    version,
    about = "Convert a file to another format, entirely in memory",
    long_about = "Convert files between content formats — raster images, PDF, DOCX, plain \
text and audio containers. The whole conversion runs in memory; the only I/O is reading \
the input file and writing the result.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file path.
    input: PathBuf,

    /// Target format token (e.g. jpg, png, pdf, txt, wav, mp3). Case-insensitive.
    #[arg(short = 't', long = "to", env = "MORPHIT_TARGET")]
    to: Option<String>,

    /// Write the result to this path instead of deriving a name from the input.
    #[arg(short, long, env = "MORPHIT_OUTPUT")]
    output: Option<PathBuf>,

    /// List the target formats offered for this input, then exit.
    #[arg(long)]
    list_targets: bool,

    /// Print a JSON summary of the conversion instead of the human line.
    #[arg(long, env = "MORPHIT_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "MORPHIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MORPHIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MORPHIT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Load the input ───────────────────────────────────────────────────
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read input file {:?}", cli.input))?;

    let name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = classify::extension(&name);
    let declared_mime = source::mime_for_extension(&ext);
    let src = SourceFile::new(&bytes, declared_mime, &name);

    // ── List-targets mode ────────────────────────────────────────────────
    if cli.list_targets {
        let category = morphit::classify(declared_mime, &name);
        let current = TargetFormat::parse(&ext);
        let targets: Vec<&str> = category
            .targets()
            .iter()
            // A file is never offered its own current format.
            .filter(|t| Some(**t) != current)
            .map(|t| t.token())
            .collect();

        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "input": name,
                    "category": category.to_string(),
                    "targets": targets,
                })
            );
        } else if targets.is_empty() {
            println!("{name}: {category} — no conversions offered");
        } else {
            println!("{name}: {category} → {}", targets.join(", "));
        }
        return Ok(());
    }

    let Some(ref target) = cli.to else {
        bail!("Missing --to <FORMAT>. Try --list-targets to see what this file can become.");
    };

    // ── Run the conversion ───────────────────────────────────────────────
    let spinner = if !cli.quiet && !cli.no_progress && !cli.json {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(format!("Converting {name} → {target}…"));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = convert(&src, target).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = match result {
        Ok(output) => output,
        Err(e @ ConvertError::Unsupported { .. }) => {
            eprintln!("{} {e}", red("✘"));
            std::process::exit(2);
        }
        Err(e) => return Err(e).context("Conversion failed"),
    };

    // ── Write the result ─────────────────────────────────────────────────
    let out_path = match cli.output {
        Some(path) => path,
        None => {
            // Normalized token: the parse cannot fail after a successful route.
            let format = TargetFormat::parse(target)
                .context("target token disappeared after conversion")?;
            cli.input.with_file_name(src.output_name(format))
        }
    };

    let mut file = std::fs::File::create(&out_path)
        .with_context(|| format!("Failed to create output file {:?}", out_path))?;
    file.write_all(&output.bytes)
        .with_context(|| format!("Failed to write output file {:?}", out_path))?;

    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "input": name,
                "output": out_path.to_string_lossy(),
                "mime": output.mime,
                "bytes": output.bytes.len(),
            })
        );
    } else if !cli.quiet {
        eprintln!(
            "{} {}  {}  {}",
            green("✔"),
            bold(&out_path.display().to_string()),
            output.mime,
            dim(&format!("{} bytes", output.bytes.len())),
        );
    }

    Ok(())
}
